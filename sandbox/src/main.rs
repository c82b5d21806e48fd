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

//! Demo wiring: fake account directory -> accounts source -> collector ->
//! JSON-file store -> log publisher.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use anyhow::Context;
use chrono::{Duration, Utc};
use metron_core::{Publisher, UsageResult, UsageUpdate};
use metron_sources::{AccountDirectory, AccountInfo, AccountsSource, SourcesConfig};
use metron_store::storage::JsonFileBackend;
use metron_store::{CollectorService, ResourceUsageStore};

#[derive(Debug)]
struct FakeDirectory;

impl AccountDirectory for FakeDirectory {
    fn accounts(&self) -> UsageResult<Vec<AccountInfo>> {
        let now = Utc::now();
        let mut accounts = vec![
            AccountInfo {
                active: false,
                confirmed_at: Some(now - Duration::days(90)),
                last_login_at: None,
            },
            AccountInfo {
                active: true,
                confirmed_at: None,
                last_login_at: Some(now - Duration::hours(1)),
            },
        ];
        for i in 0..6 {
            accounts.push(AccountInfo {
                active: true,
                confirmed_at: Some(now - Duration::days(i)),
                last_login_at: Some(now - Duration::days(i + 1)),
            });
        }
        Ok(accounts)
    }
}

#[derive(Debug)]
struct LogPublisher;

impl Publisher for LogPublisher {
    fn publish(&self, updates: &[UsageUpdate]) -> UsageResult<()> {
        for update in updates {
            log::info!(
                "{} {}/{} = {} (was {:?})",
                update.metric,
                update.object_type,
                update.object_id,
                update.value,
                update.old_value
            );
        }
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let snapshot = std::env::temp_dir().join("metron-usage.json");
    let backend = JsonFileBackend::open(&snapshot)
        .with_context(|| format!("opening usage snapshot at {snapshot:?}"))?;
    let store = Arc::new(ResourceUsageStore::with_backend(Arc::new(backend)));

    let service = CollectorService::new(Arc::clone(&store), StdDuration::from_secs(60));
    let source = AccountsSource::new(Arc::new(FakeDirectory), &SourcesConfig::default());
    service.registry().register(Arc::new(source));

    let updates = service
        .collect_and_publish(&LogPublisher)
        .context("collecting account metrics")?;

    println!("Committed {} updates; snapshot at {:?}", updates.len(), snapshot);
    for record in store.backend().list_all() {
        println!(
            "  #{} {}/{} {} = {} @ {}",
            record.id, record.object_type, record.object_id, record.metric, record.value,
            record.modified
        );
    }

    Ok(())
}
