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

//! Contract for forwarding committed updates to an external system.

use std::fmt::Debug;

use crate::error::UsageResult;
use crate::usage::UsageUpdate;

/// A sink for committed usage updates, typically backed by an external
/// monitoring service.
///
/// This crate ships no concrete implementation; it only defines the shape a
/// forwarding adapter must have. The collector hands a batch of updates to
/// `publish` after every sweep, and the caller decides which publisher, if
/// any, receives them.
pub trait Publisher: Send + Sync + Debug {
    /// Sends a batch of committed updates to the external service.
    fn publish(&self, updates: &[UsageUpdate]) -> UsageResult<()>;
}
