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

//! The seam between the depth engine and wherever raw pool data comes from.

use async_trait::async_trait;
use depthbook_model::defi::{PoolState, TickRead};

/// Reads pool state and raw ticks for a pool identified by `pool`.
///
/// Implementations may fail per tick, which is reported through [`TickRead::Failure`] rather
/// than as an error of the whole read.
#[async_trait]
pub trait TickDataSource: Send + Sync {
    /// Reads the current global state of the pool.
    async fn read_pool_state(&self, pool: &str) -> anyhow::Result<PoolState>;

    /// Reads the given tick indices, returning one [`TickRead`] per index in input order.
    async fn read_ticks(&self, pool: &str, ticks: &[i32]) -> anyhow::Result<Vec<TickRead>>;
}
