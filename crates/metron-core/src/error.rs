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

//! Error taxonomy shared across the usage-metrics crates.

use std::fmt::Display;

use crate::usage::UsageKey;

/// A specialized `Result` type for usage-metrics operations.
pub type UsageResult<T> = Result<T, UsageError>;

/// An error that can occur within the usage-metrics system.
///
/// Absence of a record on lookup is *not* an error; lookups return
/// `Ok(None)` and callers branch on the option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsageError {
    /// The uniqueness invariant on a key triple was challenged, e.g. an
    /// unconditional insert hit an already-stored key.
    IntegrityViolation(UsageKey),
    /// An operation that requires an existing record found none.
    NotFound(UsageKey),
    /// An error originating from the backend storage layer.
    Storage(String),
    /// A concrete metric source failed to compute its readings.
    Source(String),
}

impl Display for UsageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UsageError::IntegrityViolation(key) => {
                write!(f, "Uniqueness violation for key: {key}")
            }
            UsageError::NotFound(key) => write!(f, "No record for key: {key}"),
            UsageError::Storage(msg) => write!(f, "Storage error: {msg}"),
            UsageError::Source(msg) => write!(f, "Source error: {msg}"),
        }
    }
}

impl std::error::Error for UsageError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_includes_key() {
        let key = UsageKey::new("System", "Invenio", "accounts.num");
        let err = UsageError::IntegrityViolation(key);
        let msg = err.to_string();
        assert!(msg.contains("accounts.num"));
        assert!(msg.contains("Uniqueness"));
    }

    #[test]
    fn storage_error_display() {
        let err = UsageError::Storage("disk full".to_string());
        assert_eq!(err.to_string(), "Storage error: disk full");
    }
}
