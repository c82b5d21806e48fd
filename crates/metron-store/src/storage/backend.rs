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

use std::fmt::Debug;

use chrono::{DateTime, Utc};
use metron_core::{UsageKey, UsageRecord, UsageResult};

/// Trait defining the interface for usage-record storage backends.
///
/// A backend persists at most one record per key triple and must have the
/// effect of each mutation committed before the call returns; the store
/// layers its transaction boundary and change notification on top.
pub trait UsageBackend: Send + Sync + Debug + 'static {
    /// Looks up the record for a key triple. Absence is `Ok(None)`, never
    /// an error.
    fn find(&self, key: &UsageKey) -> UsageResult<Option<UsageRecord>>;

    /// Inserts a new record unconditionally, assigning the next id.
    ///
    /// Fails with [`metron_core::UsageError::IntegrityViolation`] if the
    /// key is already stored.
    fn insert(
        &self,
        key: &UsageKey,
        value: i64,
        modified: DateTime<Utc>,
    ) -> UsageResult<UsageRecord>;

    /// Overwrites the value and `modified` timestamp of an existing record
    /// in place, preserving its id.
    ///
    /// Fails with [`metron_core::UsageError::NotFound`] if the key is
    /// absent.
    fn overwrite(
        &self,
        key: &UsageKey,
        value: i64,
        modified: DateTime<Utc>,
    ) -> UsageResult<UsageRecord>;

    /// Returns all stored records (potentially expensive).
    fn list_all(&self) -> Vec<UsageRecord>;

    /// Returns the number of records stored.
    fn record_count(&self) -> usize;
}
