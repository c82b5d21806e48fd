// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::sync::Mutex;

/// A generic, thread-safe broadcast channel for change notification.
///
/// The bus is generic over the event type `T` it transports, keeping this
/// crate decoupled from the concrete events defined by higher-level crates.
/// Each call to [`subscribe`](EventBus::subscribe) registers an independent
/// channel, and every emitted event is delivered to every live subscriber.
/// With no subscribers an emission is dropped outright, so an unobserved
/// bus accumulates nothing over a long-running process.
#[derive(Debug)]
pub struct EventBus<T: Clone + Send + Sync + 'static> {
    subscribers: Mutex<Vec<flume::Sender<T>>>,
}

impl<T: Clone + Send + Sync + 'static> EventBus<T> {
    /// Creates a new bus with no subscribers.
    pub fn new() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Sends an event to every live subscriber.
    ///
    /// Subscribers whose receiver has been dropped are pruned here. Send
    /// failures are swallowed rather than propagated, since notification
    /// must never roll back a committed write.
    pub fn emit(&self, event: T) {
        let Ok(mut subscribers) = self.subscribers.lock() else {
            log::error!("Subscriber list poisoned; dropping event.");
            return;
        };
        log::trace!("Emitting an event to {} subscriber(s).", subscribers.len());
        subscribers.retain(|sender| sender.send(event.clone()).is_ok());
    }

    /// Registers a new subscriber, returning a receiver that observes every
    /// event emitted after this call.
    pub fn subscribe(&self) -> flume::Receiver<T> {
        let (sender, receiver) = flume::unbounded();
        if let Ok(mut subscribers) = self.subscribers.lock() {
            subscribers.push(sender);
        }
        receiver
    }

    /// Returns the number of currently registered subscribers, counting
    /// those whose receiver has been dropped but not yet pruned by an
    /// emission.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().map(|s| s.len()).unwrap_or(0)
    }
}

impl<T: Clone + Send + Sync + 'static> Default for EventBus<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flume::TryRecvError;
    use std::time::Duration;

    #[derive(Debug, Clone, PartialEq)]
    struct TestEvent(u32);

    #[test]
    fn bus_starts_without_subscribers() {
        let bus = EventBus::<TestEvent>::new();
        assert_eq!(bus.subscriber_count(), 0);
        assert!(bus.subscribe().is_empty());
    }

    #[test]
    fn emit_and_receive_single_event() {
        let bus = EventBus::<TestEvent>::new();
        let receiver = bus.subscribe();

        bus.emit(TestEvent(1));

        match receiver.recv_timeout(Duration::from_millis(100)) {
            Ok(event) => assert_eq!(event, TestEvent(1)),
            Err(e) => panic!("Failed to receive event: {e:?}"),
        }
    }

    #[test]
    fn try_receive_empty() {
        let bus = EventBus::<TestEvent>::new();
        let receiver = bus.subscribe();

        match receiver.try_recv() {
            Err(TryRecvError::Empty) => {}
            other => panic!("Unexpected result: {other:?}"),
        }
    }

    #[test]
    fn events_arrive_in_emission_order() {
        let bus = EventBus::<TestEvent>::new();
        let receiver = bus.subscribe();

        bus.emit(TestEvent(1));
        bus.emit(TestEvent(2));
        bus.emit(TestEvent(3));

        let received: Vec<_> = (0..3)
            .map(|_| receiver.recv_timeout(Duration::from_millis(50)).unwrap())
            .collect();
        assert_eq!(received, vec![TestEvent(1), TestEvent(2), TestEvent(3)]);
    }

    #[test]
    fn unobserved_emissions_accumulate_nothing() {
        let bus = EventBus::<TestEvent>::new();
        for i in 0..1000 {
            bus.emit(TestEvent(i));
        }

        // A subscriber registered afterwards sees none of them.
        let receiver = bus.subscribe();
        assert!(receiver.is_empty());

        bus.emit(TestEvent(1));
        assert_eq!(receiver.try_recv(), Ok(TestEvent(1)));
    }

    #[test]
    fn every_subscriber_receives_every_event() {
        let bus = EventBus::<TestEvent>::new();
        let first = bus.subscribe();
        let second = bus.subscribe();

        bus.emit(TestEvent(1));
        bus.emit(TestEvent(2));

        for receiver in [&first, &second] {
            assert_eq!(receiver.try_recv(), Ok(TestEvent(1)));
            assert_eq!(receiver.try_recv(), Ok(TestEvent(2)));
            assert!(receiver.is_empty());
        }
    }

    #[test]
    fn dropped_subscriber_is_pruned_on_emit() {
        let bus = EventBus::<TestEvent>::new();
        let kept = bus.subscribe();
        let dropped = bus.subscribe();
        drop(dropped);
        assert_eq!(bus.subscriber_count(), 2);

        bus.emit(TestEvent(9));

        assert_eq!(bus.subscriber_count(), 1);
        assert_eq!(kept.try_recv(), Ok(TestEvent(9)));
    }
}
