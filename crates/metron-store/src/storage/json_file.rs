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

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use metron_core::{UsageError, UsageKey, UsageRecord, UsageResult};

use super::backend::UsageBackend;
use super::RecordTable;

/// Durable usage backend snapshotting to a JSON file.
///
/// Every committed mutation rewrites the full record set (a JSON array
/// sorted by id) to a temporary file and renames it into place before the
/// call returns, so a record handed back to the caller is already on disk.
/// A failed write rolls the in-memory table back, keeping memory and disk
/// consistent.
#[derive(Debug)]
pub struct JsonFileBackend {
    path: PathBuf,
    table: RwLock<RecordTable>,
}

impl JsonFileBackend {
    /// Opens a backend at the given path, loading any existing snapshot.
    pub fn open(path: impl Into<PathBuf>) -> UsageResult<Self> {
        let path = path.into();
        let table = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .map_err(|e| UsageError::Storage(format!("Failed to read {path:?}: {e}")))?;
            let records: Vec<UsageRecord> = serde_json::from_str(&content)
                .map_err(|e| UsageError::Storage(format!("Corrupt snapshot {path:?}: {e}")))?;
            log::info!("Loaded {} usage records from {:?}", records.len(), path);
            RecordTable::from_records(records)
        } else {
            RecordTable::new()
        };

        Ok(Self {
            path,
            table: RwLock::new(table),
        })
    }

    /// Returns the snapshot path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, table: &RecordTable) -> UsageResult<()> {
        let json = serde_json::to_string_pretty(&table.sorted_records())
            .map_err(|e| UsageError::Storage(format!("Failed to serialize snapshot: {e}")))?;

        // Temp-file-then-rename so readers never observe a half-written
        // snapshot.
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, json)
            .map_err(|e| UsageError::Storage(format!("Failed to write {tmp:?}: {e}")))?;
        std::fs::rename(&tmp, &self.path)
            .map_err(|e| UsageError::Storage(format!("Failed to commit {:?}: {e}", self.path)))?;
        Ok(())
    }
}

impl UsageBackend for JsonFileBackend {
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

        if let Err(e) = self.persist(&table) {
            table.records.remove(key);
            table.next_id -= 1;
            return Err(e);
        }
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

        let previous = table
            .records
            .get(key)
            .cloned()
            .ok_or_else(|| UsageError::NotFound(key.clone()))?;

        let mut record = previous.clone();
        record.value = value;
        record.modified = modified;
        table.records.insert(key.clone(), record.clone());

        if let Err(e) = self.persist(&table) {
            table.records.insert(key.clone(), previous);
            return Err(e);
        }
        Ok(record)
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
