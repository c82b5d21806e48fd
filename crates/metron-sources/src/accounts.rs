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

//! Aggregated account-count metrics.

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use metron_core::{MetricSource, SourceReading, UsageResult};

use crate::clock::Clock;
use crate::config::SourcesConfig;

/// Recent-login window for the `logins6h` property.
pub const LOGIN_WINDOW_HOURS: i64 = 6;

/// Snapshot of one account as seen by the directory.
#[derive(Debug, Clone, Default)]
pub struct AccountInfo {
    /// Whether the account is active (inactive accounts count as blocked).
    pub active: bool,
    /// When the account confirmed its address, if it ever did.
    pub confirmed_at: Option<DateTime<Utc>>,
    /// The account's most recent login, if any.
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Read-only provider of account snapshots.
///
/// Implemented by whatever owns the account data (an ORM layer, a cached
/// export, a test fixture). Must not mutate anything when queried.
pub trait AccountDirectory: Send + Sync + Debug + 'static {
    /// Returns a snapshot of every account.
    fn accounts(&self) -> UsageResult<Vec<AccountInfo>>;
}

/// Metric family counting accounts by state.
///
/// Produces a single reading labelled with the configured system name,
/// carrying totals for all accounts, blocked (inactive), active,
/// unconfirmed, and accounts that logged in within the last
/// [`LOGIN_WINDOW_HOURS`] hours of the reference clock.
#[derive(Debug)]
pub struct AccountsSource {
    directory: Arc<dyn AccountDirectory>,
    system_name: String,
    clock: Clock,
}

impl AccountsSource {
    /// Creates the source over a directory, labelling readings per the
    /// given configuration.
    pub fn new(directory: Arc<dyn AccountDirectory>, config: &SourcesConfig) -> Self {
        Self {
            directory,
            system_name: config.system_name().to_string(),
            clock: Clock::system(),
        }
    }

    /// Replaces the reference clock, for tests and replays.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }
}

impl MetricSource for AccountsSource {
    fn metric_class(&self) -> &str {
        "accounts"
    }

    fn object_type(&self) -> &str {
        "System"
    }

    fn collect(&self) -> UsageResult<Vec<SourceReading>> {
        let cutoff = self.clock.now() - Duration::hours(LOGIN_WINDOW_HOURS);
        let accounts = self.directory.accounts()?;
        log::trace!(
            "Computing account metrics for '{}' over {} accounts",
            self.system_name,
            accounts.len()
        );

        let num = accounts.len() as i64;
        let blocked = accounts.iter().filter(|a| !a.active).count() as i64;
        let unconfirmed = accounts.iter().filter(|a| a.confirmed_at.is_none()).count() as i64;
        let recent_logins = accounts
            .iter()
            .filter(|a| a.last_login_at.is_some_and(|at| at >= cutoff))
            .count() as i64;

        let mut values = BTreeMap::new();
        values.insert("num".to_string(), num);
        values.insert("num.blocked".to_string(), blocked);
        values.insert("num.active".to_string(), num - blocked);
        values.insert("num.unconfirmed".to_string(), unconfirmed);
        values.insert("logins6h".to_string(), recent_logins);

        Ok(vec![SourceReading::new(self.system_name.clone(), values)])
    }
}
