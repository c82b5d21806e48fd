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

//! Storage backends for usage records.

pub mod backend;
pub mod json_file;
pub mod memory;

pub use backend::UsageBackend;
pub use json_file::JsonFileBackend;
pub use memory::InMemoryBackend;

use std::collections::HashMap;

use metron_core::{UsageKey, UsageRecord};

/// Keyed record table shared by the backend implementations.
///
/// Uniqueness of the key triple is structural: the map can hold at most one
/// record per key, which is how the backends uphold the unique-constraint
/// invariant of the storage schema.
#[derive(Debug)]
pub(crate) struct RecordTable {
    pub(crate) records: HashMap<UsageKey, UsageRecord>,
    pub(crate) next_id: u64,
}

impl RecordTable {
    pub(crate) fn new() -> Self {
        Self {
            records: HashMap::new(),
            next_id: 1,
        }
    }

    /// Rebuilds a table from previously persisted records, resuming the id
    /// sequence after the highest id seen.
    pub(crate) fn from_records(records: Vec<UsageRecord>) -> Self {
        let next_id = records.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        let records = records.into_iter().map(|r| (r.key(), r)).collect();
        Self { records, next_id }
    }

    /// Returns all records sorted by id, the snapshot serialization order.
    pub(crate) fn sorted_records(&self) -> Vec<UsageRecord> {
        let mut records: Vec<_> = self.records.values().cloned().collect();
        records.sort_by_key(|r| r.id);
        records
    }
}
