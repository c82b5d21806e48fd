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

//! # Metron Sources
//!
//! Concrete metric families implementing the `metron-core` source contract,
//! together with the configuration surface they consume and the clock
//! abstraction their time-window filters use.

pub mod accounts;
pub mod clock;
pub mod config;
pub mod volumes;

pub use accounts::{AccountDirectory, AccountInfo, AccountsSource};
pub use clock::Clock;
pub use config::SourcesConfig;
pub use volumes::{AfsVolumesSource, VolumeCatalog, VolumeInfo};
