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

//! End-to-end depth reconstruction from a pool state and raw tick reads.

use depthbook_model::defi::{PoolData, PoolState, TickRead};
use serde::{Deserialize, Serialize};

use crate::{
    active_liquidity::ActiveLiquidityProcessor,
    aggregation::{DepthAggregator, DepthOutput},
    config::DepthConfig,
    error::{DepthError, DepthWarning},
    locked::LockedAmountEstimator,
    range::{tick_range, validate_range},
};

/// A pool state and the tick interval to reconstruct depth over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DepthRequest {
    /// The pool state to anchor the walk on.
    pub pool: PoolState,
    /// Lower bound of the tick interval, inclusive.
    pub min_tick: i32,
    /// Upper bound of the tick interval, inclusive.
    pub max_tick: i32,
}

impl DepthRequest {
    /// Creates a new [`DepthRequest`] instance.
    #[must_use]
    pub const fn new(pool: PoolState, min_tick: i32, max_tick: i32) -> Self {
        Self {
            pool,
            min_tick,
            max_tick,
        }
    }

    /// Returns the tick indices to read for this request.
    #[must_use]
    pub fn range(&self) -> Vec<i32> {
        tick_range(self.min_tick, self.max_tick, self.pool.tick_spacing)
    }
}

/// Locked ticks for a request with the warnings raised while computing them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepthReport {
    pub pool_data: PoolData,
    pub warnings: Vec<DepthWarning>,
}

impl DepthReport {
    fn rejected(pool: PoolState, reason: String) -> Self {
        tracing::warn!(%reason, "Depth request rejected");
        Self {
            pool_data: PoolData::empty(pool),
            warnings: vec![DepthWarning::InvalidConfig { reason }],
        }
    }

    /// Returns true if the report carries any warning.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Runs the range, active liquidity, locked amount and aggregation stages.
///
/// Every stage is a pure function of its inputs, so equal requests and reads always produce
/// equal reports.
#[derive(Debug, Clone, Copy, Default)]
pub struct DepthPipeline {
    aggregator: DepthAggregator,
}

impl DepthPipeline {
    /// Creates a new [`DepthPipeline`] instance.
    #[must_use]
    pub const fn new(config: DepthConfig) -> Self {
        Self {
            aggregator: DepthAggregator::new(config),
        }
    }

    /// Returns the aggregator producing the views.
    #[must_use]
    pub const fn aggregator(&self) -> &DepthAggregator {
        &self.aggregator
    }

    /// Computes locked ticks for `request` from `reads`.
    ///
    /// Configuration problems produce an empty report with a [`DepthWarning::InvalidConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if the tick data drives the active liquidity negative or beyond
    /// 128 bits.
    pub fn compute(
        &self,
        request: &DepthRequest,
        reads: &[TickRead],
    ) -> Result<DepthReport, DepthError> {
        let pool = request.pool;
        let checks = self
            .aggregator
            .config()
            .validate()
            .and_then(|()| validate_range(request.min_tick, request.max_tick, pool.tick_spacing))
            .and_then(|()| pool.validate().map_err(|e| DepthError::InvalidConfig(e.to_string())));
        if let Err(e) = checks {
            return Ok(DepthReport::rejected(pool, e.to_string()));
        }

        let range = request.range();
        if range.is_empty() {
            return Ok(DepthReport::rejected(
                pool,
                format!(
                    "no tick in [{}, {}] is a multiple of {}",
                    request.min_tick, request.max_tick, pool.tick_spacing
                ),
            ));
        }

        let active = match ActiveLiquidityProcessor::new(pool).process(&range, reads) {
            Ok(active) => active,
            Err(DepthError::InvalidConfig(reason)) => {
                return Ok(DepthReport::rejected(pool, reason));
            }
            Err(e) => {
                tracing::error!(error = %e, "Active liquidity reconstruction failed");
                return Err(e);
            }
        };

        let (ticks, simulation_warnings) = LockedAmountEstimator::new(pool).lock(&active.ticks);
        let mut warnings = active.warnings;
        warnings.extend(simulation_warnings);

        tracing::debug!(ticks = ticks.len(), warnings = warnings.len(), "Computed depth");
        Ok(DepthReport {
            pool_data: PoolData::new(pool, ticks),
            warnings,
        })
    }

    /// Computes locked ticks and builds the configured view from them.
    ///
    /// # Errors
    ///
    /// Returns an error under the same conditions as [`DepthPipeline::compute`].
    pub fn compute_view(
        &self,
        request: &DepthRequest,
        reads: &[TickRead],
    ) -> Result<(DepthReport, DepthOutput), DepthError> {
        let report = self.compute(request, reads)?;
        let output = self.aggregator.aggregate(&report.pool_data);
        Ok((report, output))
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
