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

//! The resource-usage store: keyed point values with upsert-and-notify.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use metron_core::{EventBus, UsageError, UsageKey, UsageRecord, UsageResult, UsageUpdate};

use crate::storage::{InMemoryBackend, UsageBackend};

/// Keyed persistent store of single numeric values with change
/// notification.
///
/// At most one record exists per (object type, object id, metric) triple.
/// [`update_or_create`](ResourceUsageStore::update_or_create) is the primary
/// entry point: it behaves as an atomic read-modify-write per key, commits
/// before returning, and announces every committed write both on the
/// store's event bus and in its return value. Records are never deleted by
/// this subsystem.
#[derive(Debug)]
pub struct ResourceUsageStore {
    backend: Arc<dyn UsageBackend>,
    bus: EventBus<UsageUpdate>,
    // Transaction boundary: serializes the lookup-modify-write sequence of
    // update_or_create so concurrent writers to one key cannot interleave
    // between the lookup and the commit.
    write_gate: Mutex<()>,
}

impl ResourceUsageStore {
    /// Creates a store over the default in-memory backend.
    pub fn new() -> Self {
        Self::with_backend(Arc::new(InMemoryBackend::new()))
    }

    /// Creates a store over a custom backend.
    pub fn with_backend(backend: Arc<dyn UsageBackend>) -> Self {
        Self {
            backend,
            bus: EventBus::new(),
            write_gate: Mutex::new(()),
        }
    }

    /// Returns a receiver observing every update committed after this call.
    pub fn subscribe(&self) -> flume::Receiver<UsageUpdate> {
        self.bus.subscribe()
    }

    /// Direct access to the backend, for inspection.
    pub fn backend(&self) -> &Arc<dyn UsageBackend> {
        &self.backend
    }

    /// Looks up the unique record for a key triple.
    ///
    /// Returns `Ok(None)` when no record exists; callers branch on the
    /// option rather than catching an error.
    pub fn get(&self, key: &UsageKey) -> UsageResult<Option<UsageRecord>> {
        self.backend.find(key)
    }

    /// Inserts a new record unconditionally and persists it before
    /// returning.
    ///
    /// Does not check uniqueness itself: a duplicate key surfaces the
    /// backend's integrity-violation error untranslated. Normal operation
    /// goes through [`update_or_create`](Self::update_or_create) instead,
    /// which avoids this class of error entirely. Direct creates emit no
    /// notification.
    pub fn create(&self, key: &UsageKey, value: i64) -> UsageResult<UsageRecord> {
        self.backend.insert(key, value, Utc::now())
    }

    /// Updates the value for a key triple, creating the record on first
    /// observation.
    ///
    /// The returned [`UsageUpdate`] carries the committed value and the
    /// immediately prior value (`None` when the record was just created).
    /// The same update is emitted on the bus, synchronously, after the
    /// write is committed. Writing an unchanged value still refreshes
    /// `modified` and still notifies.
    pub fn update_or_create(&self, key: &UsageKey, value: i64) -> UsageResult<UsageUpdate> {
        let _gate = self
            .write_gate
            .lock()
            .map_err(|_| UsageError::Storage("Write gate poisoned".to_string()))?;

        let old_value = match self.backend.find(key)? {
            None => {
                self.backend.insert(key, value, Utc::now())?;
                None
            }
            Some(previous) => {
                self.backend.overwrite(key, value, Utc::now())?;
                Some(previous.value)
            }
        };

        let update = UsageUpdate {
            metric: key.metric.clone(),
            object_type: key.object_type.clone(),
            object_id: key.object_id.clone(),
            value,
            old_value,
        };
        self.bus.emit(update.clone());
        Ok(update)
    }
}

impl Default for ResourceUsageStore {
    fn default() -> Self {
        Self::new()
    }
}
