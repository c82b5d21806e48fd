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

use std::sync::RwLock;

use chrono::{DateTime, Utc};
use metron_core::{UsageError, UsageKey, UsageRecord, UsageResult};

use super::backend::UsageBackend;
use super::RecordTable;

/// In-memory usage backend using `RwLock<HashMap>`.
///
/// Thread-safe with concurrent reads and O(1) average lookup. Nothing
/// survives the process; use [`super::JsonFileBackend`] when records must
/// outlive it.
#[derive(Debug)]
pub struct InMemoryBackend {
    table: RwLock<RecordTable>,
}

impl InMemoryBackend {
    /// Creates a new, empty in-memory backend.
    pub fn new() -> Self {
        Self {
            table: RwLock::new(RecordTable::new()),
        }
    }

    /// Returns all records for a given object type.
    pub fn records_by_object_type(&self, object_type: &str) -> Vec<UsageRecord> {
        if let Ok(table) = self.table.read() {
            table
                .records
                .values()
                .filter(|r| r.object_type == object_type)
                .cloned()
                .collect()
        } else {
            Vec::new()
        }
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl UsageBackend for InMemoryBackend {
    fn find(&self, key: &UsageKey) -> UsageResult<Option<UsageRecord>> {
        let table = self
            .table
            .read()
            .map_err(|_| UsageError::Storage("Failed to acquire read lock".to_string()))?;
        Ok(table.records.get(key).cloned())
    }

    fn insert(
        &self,
        key: &UsageKey,
        value: i64,
        modified: DateTime<Utc>,
    ) -> UsageResult<UsageRecord> {
        let mut table = self
            .table
            .write()
            .map_err(|_| UsageError::Storage("Failed to acquire write lock".to_string()))?;

        if table.records.contains_key(key) {
            return Err(UsageError::IntegrityViolation(key.clone()));
        }

        let record = UsageRecord {
            id: table.next_id,
            object_type: key.object_type.clone(),
            object_id: key.object_id.clone(),
            metric: key.metric.clone(),
            value,
            modified,
        };
        table.next_id += 1;
        table.records.insert(key.clone(), record.clone());
        Ok(record)
    }

    fn overwrite(
        &self,
        key: &UsageKey,
        value: i64,
        modified: DateTime<Utc>,
    ) -> UsageResult<UsageRecord> {
        let mut table = self
            .table
            .write()
            .map_err(|_| UsageError::Storage("Failed to acquire write lock".to_string()))?;

        let record = table
            .records
            .get_mut(key)
            .ok_or_else(|| UsageError::NotFound(key.clone()))?;
        record.value = value;
        record.modified = modified;
        Ok(record.clone())
    }

    fn list_all(&self) -> Vec<UsageRecord> {
        if let Ok(table) = self.table.read() {
            table.sorted_records()
        } else {
            Vec::new()
        }
    }

    fn record_count(&self) -> usize {
        if let Ok(table) = self.table.read() {
            table.records.len()
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> UsageKey {
        UsageKey::new("System", "main", "accounts.num")
    }

    #[test]
    fn insert_and_find() {
        let backend = InMemoryBackend::new();
        let record = backend.insert(&key(), 42, Utc::now()).unwrap();
        assert_eq!(record.id, 1);
        assert_eq!(record.value, 42);

        let found = backend.find(&key()).unwrap().unwrap();
        assert_eq!(found, record);
        assert_eq!(backend.record_count(), 1);
    }

    #[test]
    fn find_missing_is_none_not_error() {
        let backend = InMemoryBackend::new();
        assert_eq!(backend.find(&key()).unwrap(), None);
    }

    #[test]
    fn duplicate_insert_is_integrity_violation() {
        let backend = InMemoryBackend::new();
        backend.insert(&key(), 1, Utc::now()).unwrap();

        let err = backend.insert(&key(), 2, Utc::now()).unwrap_err();
        assert_eq!(err, UsageError::IntegrityViolation(key()));
        // The stored value is untouched by the failed insert.
        assert_eq!(backend.find(&key()).unwrap().unwrap().value, 1);
    }

    #[test]
    fn overwrite_keeps_id_and_refreshes_timestamp() {
        let backend = InMemoryBackend::new();
        let created = backend.insert(&key(), 5, Utc::now()).unwrap();

        let later = Utc::now();
        let updated = backend.overwrite(&key(), 9, later).unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.value, 9);
        assert_eq!(updated.modified, later);
        assert_eq!(backend.record_count(), 1);
    }

    #[test]
    fn overwrite_missing_is_not_found() {
        let backend = InMemoryBackend::new();
        let err = backend.overwrite(&key(), 1, Utc::now()).unwrap_err();
        assert_eq!(err, UsageError::NotFound(key()));
    }

    #[test]
    fn ids_are_sequential_across_keys() {
        let backend = InMemoryBackend::new();
        let a = backend
            .insert(&UsageKey::new("System", "a", "m"), 1, Utc::now())
            .unwrap();
        let b = backend
            .insert(&UsageKey::new("System", "b", "m"), 2, Utc::now())
            .unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);

        let all = backend.list_all();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, 1);
        assert_eq!(all[1].id, 2);
    }

    #[test]
    fn filter_by_object_type() {
        let backend = InMemoryBackend::new();
        backend
            .insert(&UsageKey::new("System", "a", "m"), 1, Utc::now())
            .unwrap();
        backend
            .insert(&UsageKey::new("Volume", "b", "m"), 2, Utc::now())
            .unwrap();

        let systems = backend.records_by_object_type("System");
        assert_eq!(systems.len(), 1);
        assert_eq!(systems[0].object_id, "a");
    }
}
