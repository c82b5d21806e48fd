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

//! # Metron Core
//!
//! Foundational crate containing traits, core types, and interface contracts
//! for the usage-metrics framework.
//!
//! This crate defines the "common language" of the system: the shape of a
//! persisted usage record, the capability trait a concrete metric family
//! implements, the publisher contract for forwarding committed updates, and
//! the error taxonomy. `metron-store` provides the keyed store built on
//! these contracts, and `metron-sources` provides concrete metric families.

#![warn(missing_docs)]

pub mod error;
pub mod event;
pub mod publisher;
pub mod source;
pub mod usage;

pub use error::{UsageError, UsageResult};
pub use event::EventBus;
pub use publisher::Publisher;
pub use source::{MetricSource, SourceReading};
pub use usage::{UsageKey, UsageRecord, UsageUpdate};
