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

//! Injectable wall-clock for time-window filters.

use std::fmt::Debug;
use std::sync::Arc;

use chrono::{DateTime, Utc};

/// A cheap, cloneable handle to a reference clock.
///
/// Sources that filter on recency (e.g. "logged in within the last 6
/// hours") read their notion of "now" through this handle, so tests can
/// pin time with [`Clock::fixed`].
#[derive(Clone)]
pub struct Clock {
    now: Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>,
}

impl Clock {
    /// The system wall clock.
    pub fn system() -> Self {
        Self {
            now: Arc::new(Utc::now),
        }
    }

    /// A clock frozen at the given instant.
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(move || at),
        }
    }

    /// Returns the current time according to this clock.
    pub fn now(&self) -> DateTime<Utc> {
        (self.now)()
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::system()
    }
}

impl Debug for Clock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Clock").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_is_frozen() {
        let at = Utc::now();
        let clock = Clock::fixed(at);
        assert_eq!(clock.now(), at);
        assert_eq!(clock.now(), at);
    }

    #[test]
    fn system_clock_advances() {
        let clock = Clock::system();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
