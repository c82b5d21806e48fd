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

//! Registry for concrete metric sources.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use metron_core::MetricSource;

/// A thread-safe lookup table of metric sources keyed by metric class.
///
/// Metric families are explicit registrations, not a discovered class
/// hierarchy: the collector sweeps whatever is registered here, in stable
/// (alphabetical) class order.
#[derive(Debug, Clone)]
pub struct SourceRegistry {
    sources: Arc<Mutex<HashMap<String, Arc<dyn MetricSource>>>>,
}

impl SourceRegistry {
    /// Creates a new, empty registry.
    pub fn new() -> Self {
        Self {
            sources: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Registers a metric source under its metric class.
    ///
    /// Registering a second source with the same class replaces the first.
    pub fn register(&self, source: Arc<dyn MetricSource>) {
        let class = source.metric_class().to_string();
        let mut sources_guard = self.sources.lock().unwrap();
        if sources_guard.insert(class.clone(), source).is_some() {
            log::warn!("Replaced metric source for class: {class}");
        } else {
            log::info!("Registered metric source: {class}");
        }
    }

    /// Looks up the source registered for a metric class.
    pub fn get(&self, metric_class: &str) -> Option<Arc<dyn MetricSource>> {
        self.sources.lock().unwrap().get(metric_class).cloned()
    }

    /// Returns all registered sources, ordered by metric class.
    pub fn all(&self) -> Vec<Arc<dyn MetricSource>> {
        let sources_guard = self.sources.lock().unwrap();
        let mut all: Vec<_> = sources_guard.values().cloned().collect();
        all.sort_by(|a, b| a.metric_class().cmp(b.metric_class()));
        all
    }

    /// Returns the number of registered sources.
    pub fn len(&self) -> usize {
        self.sources.lock().unwrap().len()
    }

    /// Whether the registry has no sources.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metron_core::{SourceReading, UsageResult};
    use std::collections::BTreeMap;

    #[derive(Debug)]
    struct NamedSource(&'static str);

    impl MetricSource for NamedSource {
        fn metric_class(&self) -> &str {
            self.0
        }

        fn object_type(&self) -> &str {
            "System"
        }

        fn collect(&self) -> UsageResult<Vec<SourceReading>> {
            Ok(vec![SourceReading::new("main", BTreeMap::new())])
        }
    }

    #[test]
    fn register_and_lookup() {
        let registry = SourceRegistry::new();
        assert!(registry.is_empty());

        registry.register(Arc::new(NamedSource("accounts")));
        assert_eq!(registry.len(), 1);

        let source = registry.get("accounts").unwrap();
        assert_eq!(source.object_type(), "System");
        assert!(registry.get("volumes").is_none());
    }

    #[test]
    fn duplicate_class_replaces() {
        let registry = SourceRegistry::new();
        registry.register(Arc::new(NamedSource("accounts")));
        registry.register(Arc::new(NamedSource("accounts")));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn all_is_ordered_by_class() {
        let registry = SourceRegistry::new();
        registry.register(Arc::new(NamedSource("volumes")));
        registry.register(Arc::new(NamedSource("accounts")));

        let classes: Vec<_> = registry
            .all()
            .iter()
            .map(|s| s.metric_class().to_string())
            .collect();
        assert_eq!(classes, vec!["accounts", "volumes"]);
    }
}
