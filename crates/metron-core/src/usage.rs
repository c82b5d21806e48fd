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

//! Core data types for persisted usage records.
//!
//! A usage record holds the *latest* known value of one named metric for one
//! real-world object. The model keeps no history: every new observation of a
//! key triple overwrites the previous value in place.

use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum length of the `object_type` column.
pub const OBJECT_TYPE_MAX_LEN: usize = 40;

/// Maximum length of the `object_id` column.
pub const OBJECT_ID_MAX_LEN: usize = 250;

/// Maximum length of the `metric` column.
pub const METRIC_MAX_LEN: usize = 40;

/// A unique, structured identifier for a usage record.
///
/// The triple (object type, object id, metric name) identifies at most one
/// live record. The combined length of the three components must stay under
/// ~333 characters due to a storage-engine limitation on the unique index;
/// this is a documented constraint, not enforced here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UsageKey {
    /// Classifies what kind of entity the metric is about (e.g. "System").
    pub object_type: String,
    /// Identifies the concrete object instance within its type.
    pub object_id: String,
    /// The fully qualified metric name (e.g. "accounts.num").
    pub metric: String,
}

impl UsageKey {
    /// Creates a new key triple.
    pub fn new(
        object_type: impl Into<String>,
        object_id: impl Into<String>,
        metric: impl Into<String>,
    ) -> Self {
        Self {
            object_type: object_type.into(),
            object_id: object_id.into(),
            metric: metric.into(),
        }
    }
}

impl Display for UsageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}:{}", self.object_type, self.object_id, self.metric)
    }
}

/// The latest known value of a single named metric for a single object.
///
/// Column layout mirrors the storage schema: an auto-incremented `id`, the
/// three key columns, a signed 64-bit `value` defaulting to 0, and a
/// `modified` timestamp set on creation and refreshed on every write.
///
/// Not suitable for metrics with high granularity: only the latest value
/// per key survives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    /// Auto-incremented record id, assigned by the storage backend.
    pub id: u64,
    /// Generic relationship to an object type (≤ 40 chars).
    pub object_type: String,
    /// Generic relationship to an object (≤ 250 chars).
    pub object_id: String,
    /// Metric name (≤ 40 chars).
    pub metric: String,
    /// Latest observed value.
    pub value: i64,
    /// Modification timestamp, refreshed on every write.
    pub modified: DateTime<Utc>,
}

impl UsageRecord {
    /// Returns the key triple identifying this record.
    pub fn key(&self) -> UsageKey {
        UsageKey::new(
            self.object_type.clone(),
            self.object_id.clone(),
            self.metric.clone(),
        )
    }
}

/// Change notification emitted after every committed create or update.
#[derive(Debug, Clone, PartialEq)]
pub struct UsageUpdate {
    /// Metric name of the record that changed.
    pub metric: String,
    /// Object type of the record that changed.
    pub object_type: String,
    /// Object id of the record that changed.
    pub object_id: String,
    /// The value just committed.
    pub value: i64,
    /// The value the key held immediately before this write, or `None` if
    /// the record was created by this write.
    pub old_value: Option<i64>,
}

impl UsageUpdate {
    /// Returns the key triple of the record this update refers to.
    pub fn key(&self) -> UsageKey {
        UsageKey::new(
            self.object_type.clone(),
            self.object_id.clone(),
            self.metric.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_display_formatting() {
        let key = UsageKey::new("System", "Invenio", "accounts.num");
        assert_eq!(key.to_string(), "System/Invenio:accounts.num");
    }

    #[test]
    fn record_key_round_trip() {
        let record = UsageRecord {
            id: 1,
            object_type: "System".to_string(),
            object_id: "main".to_string(),
            metric: "accounts.num".to_string(),
            value: 42,
            modified: Utc::now(),
        };
        let key = record.key();
        assert_eq!(key, UsageKey::new("System", "main", "accounts.num"));
    }

    #[test]
    fn record_serde_round_trip() {
        let record = UsageRecord {
            id: 7,
            object_type: "System".to_string(),
            object_id: "main".to_string(),
            metric: "accounts.num".to_string(),
            value: -3,
            modified: Utc::now(),
        };
        let json = serde_json::to_string(&record).unwrap();
        let back: UsageRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn update_key_matches_fields() {
        let update = UsageUpdate {
            metric: "accounts.num".to_string(),
            object_type: "System".to_string(),
            object_id: "main".to_string(),
            value: 10,
            old_value: None,
        };
        assert_eq!(update.key(), UsageKey::new("System", "main", "accounts.num"));
    }
}
