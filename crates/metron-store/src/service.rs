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

//! Service that sweeps metric sources into the usage store.

use std::sync::Arc;
use std::time::{Duration, Instant};

use metron_core::{Publisher, UsageKey, UsageResult, UsageUpdate};

use crate::registry::SourceRegistry;
use crate::store::ResourceUsageStore;

/// Collects readings from every registered source and upserts them into
/// the store.
///
/// The service is synchronous and owns no threads: an external scheduler
/// calls [`tick`](CollectorService::tick) (or
/// [`collect_now`](CollectorService::collect_now) directly) on whatever
/// cadence it likes. Committed updates are returned to the caller, who
/// decides whether to forward them to a [`Publisher`].
#[derive(Debug)]
pub struct CollectorService {
    registry: SourceRegistry,
    store: Arc<ResourceUsageStore>,
    last_run: Instant,
    interval: Duration,
}

impl CollectorService {
    /// Creates a collector over the given store, sweeping at most once per
    /// `interval`.
    pub fn new(store: Arc<ResourceUsageStore>, interval: Duration) -> Self {
        Self {
            registry: SourceRegistry::new(),
            store,
            last_run: Instant::now(),
            interval,
        }
    }

    /// Returns the source registry.
    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    /// Returns the store this collector writes into.
    pub fn store(&self) -> &Arc<ResourceUsageStore> {
        &self.store
    }

    /// Runs a sweep if the configured interval has elapsed.
    ///
    /// Returns the committed updates, or an empty vec when the interval has
    /// not passed yet. Intended for callers embedding the collector in a
    /// periodic loop.
    pub fn tick(&mut self) -> Vec<UsageUpdate> {
        if self.last_run.elapsed() >= self.interval {
            log::trace!("Sweeping all metric sources...");
            let updates = self.collect_now();
            self.last_run = Instant::now();
            updates
        } else {
            Vec::new()
        }
    }

    /// Sweeps every registered source immediately.
    ///
    /// Each reading value is upserted under the key
    /// `(source.object_type(), reading.label, source.metric_id(property))`.
    /// A failing source is logged and skipped; the sweep continues with the
    /// remaining sources.
    pub fn collect_now(&self) -> Vec<UsageUpdate> {
        let mut updates = Vec::new();

        for source in self.registry.all() {
            let readings = match source.collect() {
                Ok(readings) => readings,
                Err(e) => {
                    log::warn!(
                        "Metric source '{}' failed to collect: {e}",
                        source.metric_class()
                    );
                    continue;
                }
            };

            for reading in readings {
                for (property, value) in &reading.values {
                    let key = UsageKey::new(
                        source.object_type(),
                        reading.label.clone(),
                        source.metric_id(property),
                    );
                    match self.store.update_or_create(&key, *value) {
                        Ok(update) => updates.push(update),
                        Err(e) => log::error!("Failed to store {key}: {e}"),
                    }
                }
            }
        }

        updates
    }

    /// Sweeps immediately and forwards the committed updates to a
    /// publisher.
    pub fn collect_and_publish(&self, publisher: &dyn Publisher) -> UsageResult<Vec<UsageUpdate>> {
        let updates = self.collect_now();
        publisher.publish(&updates)?;
        Ok(updates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metron_core::{MetricSource, SourceReading, UsageError};
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    #[derive(Debug)]
    struct FixedSource;

    impl MetricSource for FixedSource {
        fn metric_class(&self) -> &str {
            "accounts"
        }

        fn object_type(&self) -> &str {
            "System"
        }

        fn collect(&self) -> UsageResult<Vec<SourceReading>> {
            let mut values = BTreeMap::new();
            values.insert("num".to_string(), 10);
            values.insert("num.active".to_string(), 7);
            Ok(vec![SourceReading::new("main", values)])
        }
    }

    #[derive(Debug)]
    struct BrokenSource;

    impl MetricSource for BrokenSource {
        fn metric_class(&self) -> &str {
            "broken"
        }

        fn object_type(&self) -> &str {
            "System"
        }

        fn collect(&self) -> UsageResult<Vec<SourceReading>> {
            Err(UsageError::Source("backend unreachable".to_string()))
        }
    }

    #[derive(Debug, Default)]
    struct CapturePublisher {
        batches: Mutex<Vec<Vec<UsageUpdate>>>,
    }

    impl Publisher for CapturePublisher {
        fn publish(&self, updates: &[UsageUpdate]) -> UsageResult<()> {
            self.batches.lock().unwrap().push(updates.to_vec());
            Ok(())
        }
    }

    fn collector() -> CollectorService {
        CollectorService::new(Arc::new(ResourceUsageStore::new()), Duration::ZERO)
    }

    #[test]
    fn sweep_upserts_fully_qualified_keys() {
        let service = collector();
        service.registry().register(Arc::new(FixedSource));

        let updates = service.collect_now();
        assert_eq!(updates.len(), 2);

        let key = UsageKey::new("System", "main", "accounts.num");
        let record = service.store().get(&key).unwrap().unwrap();
        assert_eq!(record.value, 10);

        let key = UsageKey::new("System", "main", "accounts.num.active");
        assert_eq!(service.store().get(&key).unwrap().unwrap().value, 7);
    }

    #[test]
    fn second_sweep_carries_old_values() {
        let service = collector();
        service.registry().register(Arc::new(FixedSource));

        service.collect_now();
        let updates = service.collect_now();

        assert_eq!(updates.len(), 2);
        for update in updates {
            assert_eq!(update.old_value, Some(update.value));
        }
    }

    #[test]
    fn failing_source_does_not_abort_sweep() {
        let service = collector();
        service.registry().register(Arc::new(BrokenSource));
        service.registry().register(Arc::new(FixedSource));

        let updates = service.collect_now();
        assert_eq!(updates.len(), 2);
    }

    #[test]
    fn tick_respects_interval() {
        let store = Arc::new(ResourceUsageStore::new());
        let mut service = CollectorService::new(store, Duration::from_secs(3600));
        service.registry().register(Arc::new(FixedSource));

        // Interval has not elapsed since construction.
        assert!(service.tick().is_empty());

        let mut immediate = CollectorService::new(Arc::new(ResourceUsageStore::new()), Duration::ZERO);
        immediate.registry().register(Arc::new(FixedSource));
        assert_eq!(immediate.tick().len(), 2);
    }

    #[test]
    fn publish_receives_committed_updates() {
        let service = collector();
        service.registry().register(Arc::new(FixedSource));
        let publisher = CapturePublisher::default();

        let updates = service.collect_and_publish(&publisher).unwrap();

        let batches = publisher.batches.lock().unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0], updates);
    }
}
