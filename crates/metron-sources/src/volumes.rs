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

//! AFS volume quota metrics.

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Arc;

use metron_core::{MetricSource, SourceReading, UsageError, UsageResult};

/// Quota snapshot of one AFS volume, in 1K blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeInfo {
    /// Volume name (e.g. "p.archive.tmp-shared").
    pub name: String,
    /// Quota assigned to the volume.
    pub quota_blocks: i64,
    /// Blocks currently in use.
    pub used_blocks: i64,
}

/// Read-only provider of volume quota snapshots.
///
/// Implemented by whatever owns the volume listing — typically a wrapper
/// invoking the AFS `vos` tooling and feeding its output through
/// [`parse_listquota`], or a test fixture.
pub trait VolumeCatalog: Send + Sync + Debug + 'static {
    /// Returns a snapshot of every volume.
    fn volumes(&self) -> UsageResult<Vec<VolumeInfo>>;
}

/// Parses `vos listquota`-style output into volume snapshots.
///
/// The first line is a column header and is skipped; every following
/// non-empty line carries at least volume name, quota, and used blocks in
/// whitespace-separated columns (trailing percentage columns are ignored).
pub fn parse_listquota(output: &str) -> UsageResult<Vec<VolumeInfo>> {
    let mut volumes = Vec::new();

    for line in output.lines().skip(1) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 3 {
            return Err(UsageError::Source(format!(
                "Malformed volume listing line: '{line}'"
            )));
        }
        let quota_blocks = fields[1].parse().map_err(|_| {
            UsageError::Source(format!("Invalid quota '{}' for volume {}", fields[1], fields[0]))
        })?;
        let used_blocks = fields[2].parse().map_err(|_| {
            UsageError::Source(format!("Invalid usage '{}' for volume {}", fields[2], fields[0]))
        })?;

        volumes.push(VolumeInfo {
            name: fields[0].to_string(),
            quota_blocks,
            used_blocks,
        });
    }

    Ok(volumes)
}

/// Metric family reporting quota and usage per AFS volume.
///
/// Produces one reading per volume, labelled with the volume name, carrying
/// the assigned quota and the blocks in use.
#[derive(Debug)]
pub struct AfsVolumesSource {
    catalog: Arc<dyn VolumeCatalog>,
}

impl AfsVolumesSource {
    /// Creates the source over a volume catalog.
    pub fn new(catalog: Arc<dyn VolumeCatalog>) -> Self {
        Self { catalog }
    }
}

impl MetricSource for AfsVolumesSource {
    fn metric_class(&self) -> &str {
        "afs"
    }

    fn object_type(&self) -> &str {
        "Volume"
    }

    fn collect(&self) -> UsageResult<Vec<SourceReading>> {
        let volumes = self.catalog.volumes()?;
        log::trace!("Computing quota metrics for {} volumes", volumes.len());

        Ok(volumes
            .into_iter()
            .map(|volume| {
                let mut values = BTreeMap::new();
                values.insert("quota".to_string(), volume.quota_blocks);
                values.insert("used".to_string(), volume.used_blocks);
                SourceReading::new(volume.name, values)
            })
            .collect())
    }
}
