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

//! The capability trait implemented by concrete metric families.
//!
//! A metric source knows *what* to measure: it computes named numeric values
//! for every entity it observes. How those values are stored is the concern
//! of the store crate, which keeps the two sides decoupled — new metric
//! families can be added without touching the storage layer.

use std::collections::BTreeMap;
use std::fmt::Debug;

use crate::error::UsageResult;

/// One scope's worth of computed values from a metric source.
///
/// The label identifies the grouping the values belong to (e.g. a system
/// name drawn from configuration); the map carries metric property name to
/// value, one entry per property the family measures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceReading {
    /// Grouping/scope label, used as the object id when stored.
    pub label: String,
    /// Property name to observed value, in stable iteration order.
    pub values: BTreeMap<String, i64>,
}

impl SourceReading {
    /// Creates a reading for the given label.
    pub fn new(label: impl Into<String>, values: BTreeMap<String, i64>) -> Self {
        Self {
            label: label.into(),
            values,
        }
    }
}

/// The core trait for a metric family.
///
/// Implementations are stateless with respect to storage: `collect` must be
/// read-only against its data source and safe to call repeatedly and
/// concurrently. The store crate holds a registry of these sources and
/// periodically collects and upserts their readings.
pub trait MetricSource: Send + Sync + Debug + 'static {
    /// Identifier of this family of metrics (e.g. "accounts").
    fn metric_class(&self) -> &str;

    /// Classifies what kind of entity this family observes (e.g. "System").
    fn object_type(&self) -> &str;

    /// Returns the fully qualified metric name for a property of this
    /// family, joining the class and the property with a dot
    /// (`"accounts" + "num"` -> `"accounts.num"`). Pure, no side effects.
    fn metric_id(&self, property: &str) -> String {
        format!("{}.{}", self.metric_class(), property)
    }

    /// Computes the current values for every entity this family observes.
    fn collect(&self) -> UsageResult<Vec<SourceReading>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct AccountsLike;

    impl MetricSource for AccountsLike {
        fn metric_class(&self) -> &str {
            "accounts"
        }

        fn object_type(&self) -> &str {
            "System"
        }

        fn collect(&self) -> UsageResult<Vec<SourceReading>> {
            let mut values = BTreeMap::new();
            values.insert("num".to_string(), 10);
            Ok(vec![SourceReading::new("main", values)])
        }
    }

    #[test]
    fn metric_id_joins_class_and_property() {
        let source = AccountsLike;
        assert_eq!(source.metric_id("num"), "accounts.num");
        assert_eq!(source.metric_id("num.blocked"), "accounts.num.blocked");
    }

    #[test]
    fn collect_returns_labelled_readings() {
        let source = AccountsLike;
        let readings = source.collect().unwrap();
        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].label, "main");
        assert_eq!(readings[0].values.get("num"), Some(&10));
    }
}
