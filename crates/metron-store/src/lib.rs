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

//! # Metron Store
//!
//! The keyed resource-usage store and the collector service that feeds it.
//!
//! The store keeps a single numeric value per (object type, object id,
//! metric) triple with upsert semantics: every committed write emits a
//! change notification carrying the old and new value. Storage is pluggable
//! behind [`storage::UsageBackend`], with an in-memory backend and a durable
//! JSON-file backend provided.

pub mod registry;
pub mod service;
pub mod storage;
pub mod store;

pub use registry::SourceRegistry;
pub use service::CollectorService;
pub use store::ResourceUsageStore;
