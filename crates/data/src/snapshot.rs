// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2025 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! Offline pool snapshots used as a tick source.

use std::path::Path;

use ahash::{AHashMap, AHashSet};
use async_trait::async_trait;
use depthbook_model::defi::{PoolState, PoolTick, TickRead};
use serde::{Deserialize, Serialize};

use crate::source::TickDataSource;

/// A pool state with its initialized ticks, as stored in a JSON snapshot file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSnapshot {
    /// Pool address the snapshot was taken from, when known.
    #[serde(default)]
    pub address: Option<String>,
    pub pool: PoolState,
    pub ticks: Vec<PoolTick>,
    /// Tick indices whose reads are reported as failed.
    #[serde(default)]
    pub failed: Vec<i32>,
}

impl PoolSnapshot {
    /// Parses a snapshot from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not describe a snapshot.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a snapshot file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub async fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to read snapshot {}: {e}", path.display()))?;
        let snapshot = Self::from_json(&json)?;
        tracing::debug!(
            path = %path.display(),
            ticks = snapshot.ticks.len(),
            failed = snapshot.failed.len(),
            "Loaded pool snapshot"
        );
        Ok(snapshot)
    }
}

/// Serves reads from a [`PoolSnapshot`].
///
/// Ticks missing from the snapshot read as uninitialized, ticks listed in `failed` read as
/// failures.
#[derive(Debug, Clone)]
pub struct SnapshotSource {
    address: Option<String>,
    pool: PoolState,
    ticks: AHashMap<i32, PoolTick>,
    failed: AHashSet<i32>,
}

impl SnapshotSource {
    /// Creates a new [`SnapshotSource`] from a snapshot.
    #[must_use]
    pub fn new(snapshot: PoolSnapshot) -> Self {
        Self {
            address: snapshot.address,
            pool: snapshot.pool,
            ticks: snapshot
                .ticks
                .into_iter()
                .map(|t| {
                    let tick = PoolTick {
                        initialized: t.is_initialized(),
                        ..t
                    };
                    (tick.value, tick)
                })
                .collect(),
            failed: snapshot.failed.into_iter().collect(),
        }
    }

    /// Returns the pool state of the snapshot.
    #[must_use]
    pub const fn pool(&self) -> &PoolState {
        &self.pool
    }

    fn check_pool(&self, pool: &str) -> anyhow::Result<()> {
        match &self.address {
            Some(address) if !address.eq_ignore_ascii_case(pool) => {
                anyhow::bail!("Snapshot holds pool {address}, not {pool}")
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl TickDataSource for SnapshotSource {
    async fn read_pool_state(&self, pool: &str) -> anyhow::Result<PoolState> {
        self.check_pool(pool)?;
        Ok(self.pool)
    }

    async fn read_ticks(&self, pool: &str, ticks: &[i32]) -> anyhow::Result<Vec<TickRead>> {
        self.check_pool(pool)?;
        Ok(ticks
            .iter()
            .map(|&tick| {
                if self.failed.contains(&tick) {
                    TickRead::Failure {
                        tick,
                        reason: "marked failed in snapshot".to_string(),
                    }
                } else {
                    TickRead::Success(
                        self.ticks
                            .get(&tick)
                            .copied()
                            .unwrap_or_else(|| PoolTick::from_tick(tick)),
                    )
                }
            })
            .collect())
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use std::io::Write;

    use rstest::{fixture, rstest};

    use super::*;

    const SNAPSHOT: &str = r#"{
        "address": "0xAbC",
        "pool": {
            "current_tick": 10,
            "current_liquidity": 1000,
            "tick_spacing": 60,
            "fee_pips": 3000,
            "token0_decimals": 18,
            "token1_decimals": 6
        },
        "ticks": [
            { "value": -60, "liquidity_gross": 500, "liquidity_net": 500 },
            { "value": 60, "liquidity_gross": 200, "liquidity_net": -200 }
        ],
        "failed": [120]
    }"#;

    #[fixture]
    fn source() -> SnapshotSource {
        SnapshotSource::new(PoolSnapshot::from_json(SNAPSHOT).unwrap())
    }

    #[rstest]
    #[tokio::test]
    async fn test_read_pool_state(source: SnapshotSource) {
        let pool = source.read_pool_state("0xabc").await.unwrap();
        assert_eq!(pool, PoolState::new(10, 1000, 60, 3000, 18, 6));
    }

    #[rstest]
    #[tokio::test]
    async fn test_read_ticks(source: SnapshotSource) {
        let reads = source.read_ticks("0xABC", &[-60, 0, 60, 120]).await.unwrap();

        assert_eq!(reads[0], TickRead::Success(PoolTick::new(-60, 500, 500)));
        assert_eq!(reads[1], TickRead::Success(PoolTick::from_tick(0)));
        assert_eq!(reads[2], TickRead::Success(PoolTick::new(60, 200, -200)));
        assert!(matches!(reads[3], TickRead::Failure { tick: 120, .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn test_wrong_pool_is_rejected(source: SnapshotSource) {
        assert!(source.read_pool_state("0xdef").await.is_err());
        assert!(source.read_ticks("0xdef", &[0]).await.is_err());
    }

    #[rstest]
    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SNAPSHOT.as_bytes()).unwrap();

        let snapshot = PoolSnapshot::load(file.path()).await.unwrap();

        assert_eq!(snapshot.address.as_deref(), Some("0xAbC"));
        assert_eq!(snapshot.ticks.len(), 2);
        assert_eq!(snapshot.failed, vec![120]);
    }

    #[rstest]
    #[tokio::test]
    async fn test_load_missing_file() {
        assert!(PoolSnapshot::load("/nonexistent/snapshot.json").await.is_err());
    }
}
