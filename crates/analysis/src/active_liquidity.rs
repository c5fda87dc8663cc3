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

//! Reconstruction of the liquidity active at every tick of a range.
//!
//! Starting from the tick that holds the current price, where the active liquidity is known
//! exactly, the processor walks outward one spacing at a time and applies the net liquidity
//! recorded at each crossed tick:
//!
//! - moving up into tick `t` adds `net(t)`,
//! - moving down from tick `t` to `t - spacing` removes `net(t)`.
//!
//! Ticks that were not read are treated as uninitialized, so the walk carries the liquidity
//! across them unchanged.

use std::collections::BTreeMap;

use depthbook_model::defi::{
    PoolState, PriceConverter, ProcessedTick, TickRead,
    tick_map::liquidity_math::{liquidity_math_add, liquidity_math_sub},
};

use crate::error::{DepthError, DepthWarning};

/// Processed ticks in ascending order together with the warnings raised while building them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActiveLiquidity {
    /// One entry per tick of the requested range, ascending.
    pub ticks: Vec<ProcessedTick>,
    /// Degraded conditions met on the way.
    pub warnings: Vec<DepthWarning>,
}

impl ActiveLiquidity {
    /// Returns the tick flagged as current.
    #[must_use]
    pub fn current(&self) -> Option<&ProcessedTick> {
        self.ticks.iter().find(|tick| tick.is_current)
    }
}

/// Computes active liquidity across a tick range for one pool state.
#[derive(Debug, Clone, Copy)]
pub struct ActiveLiquidityProcessor {
    pool: PoolState,
    converter: PriceConverter,
}

impl ActiveLiquidityProcessor {
    /// Creates a new [`ActiveLiquidityProcessor`] for `pool`.
    #[must_use]
    pub const fn new(pool: PoolState) -> Self {
        Self {
            pool,
            converter: pool.price_converter(),
        }
    }

    /// Builds the processed ticks for `range` from the tick `reads`.
    ///
    /// `range` must be strictly ascending and aligned to the pool's tick spacing. Reads for
    /// ticks outside of it are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`DepthError::InvalidConfig`] if the pool state or the range is malformed,
    /// and [`DepthError::NegativeLiquidity`] or [`DepthError::LiquidityOverflow`] if the
    /// tick data drives the active liquidity out of range.
    pub fn process(
        &self,
        range: &[i32],
        reads: &[TickRead],
    ) -> Result<ActiveLiquidity, DepthError> {
        self.pool
            .validate()
            .map_err(|e| DepthError::InvalidConfig(e.to_string()))?;
        self.validate_range(range)?;

        let mut result = ActiveLiquidity::default();
        if range.is_empty() {
            return Ok(result);
        }

        let (nets, failed) = collect_reads(range, reads);
        if !failed.is_empty() {
            tracing::warn!(
                count = failed.len(),
                ticks = ?failed,
                "Tick reads failed, treating as uninitialized"
            );
            result.warnings.push(DepthWarning::PartialFetch { failed });
        }
        if nets.is_empty() {
            tracing::warn!(min = range[0], max = range[range.len() - 1], "No ticks read in range");
            result.warnings.push(DepthWarning::NoTicksFetched);
            return Ok(result);
        }

        let active = self
            .pool
            .active_tick()
            .ok_or_else(|| DepthError::InvalidConfig("cannot align current tick".to_string()))?;
        let reference = if nets.contains_key(&active) {
            active
        } else {
            let substitute = nearest_key(&nets, active)
                .ok_or_else(|| DepthError::InvalidConfig("no reference tick".to_string()))?;
            tracing::warn!(
                expected = active,
                substitute,
                "Active tick not read, substituting nearest read tick"
            );
            result.warnings.push(DepthWarning::ReferenceTickSubstituted {
                expected: active,
                substitute,
            });
            substitute
        };
        let reference_index = range.binary_search(&reference).map_err(|_| {
            DepthError::InvalidConfig(format!("reference tick {reference} outside range"))
        })?;

        let net = |tick: i32| nets.get(&tick).copied().unwrap_or(0);
        let mut liquidity = vec![0u128; range.len()];
        liquidity[reference_index] = self.pool.current_liquidity;

        for i in reference_index + 1..range.len() {
            let tick = range[i];
            liquidity[i] = liquidity_math_add(liquidity[i - 1], net(tick))
                .map_err(|e| DepthError::from_liquidity_math(tick, e))?;
        }
        for i in (0..reference_index).rev() {
            let crossed = range[i + 1];
            liquidity[i] = liquidity_math_sub(liquidity[i + 1], net(crossed))
                .map_err(|e| DepthError::from_liquidity_math(range[i], e))?;
        }

        result.ticks = range
            .iter()
            .zip(liquidity)
            .enumerate()
            .map(|(i, (&tick, liquidity_active))| ProcessedTick {
                tick,
                liquidity_active,
                liquidity_net: net(tick),
                price0: self.converter.price0(tick),
                price1: self.converter.price1(tick),
                is_current: i == reference_index,
            })
            .collect();

        tracing::debug!(
            ticks = result.ticks.len(),
            reference,
            liquidity = self.pool.current_liquidity,
            "Processed active liquidity"
        );
        Ok(result)
    }

    fn validate_range(&self, range: &[i32]) -> Result<(), DepthError> {
        let spacing = self.pool.tick_spacing;
        if let Some(tick) = range.iter().find(|tick| *tick % spacing != 0) {
            return Err(DepthError::InvalidConfig(format!(
                "tick {tick} is not a multiple of spacing {spacing}"
            )));
        }
        if range.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(DepthError::InvalidConfig(
                "tick range must be strictly ascending".to_string(),
            ));
        }
        Ok(())
    }
}

/// Splits reads into the net liquidity of every successfully read tick in `range` and the
/// sorted list of ticks whose read failed.
fn collect_reads(range: &[i32], reads: &[TickRead]) -> (BTreeMap<i32, i128>, Vec<i32>) {
    let mut nets = BTreeMap::new();
    let mut failed = Vec::new();
    for read in reads {
        if range.binary_search(&read.tick()).is_err() {
            continue;
        }
        match read {
            TickRead::Success(tick) => {
                let net = if tick.is_initialized() { tick.liquidity_net } else { 0 };
                nets.insert(tick.value, net);
            }
            TickRead::Failure { tick, .. } => failed.push(*tick),
        }
    }
    failed.sort_unstable();
    failed.dedup();
    failed.retain(|tick| !nets.contains_key(tick));
    (nets, failed)
}

/// Returns the key closest to `target`, preferring the lower one on ties.
fn nearest_key<V>(map: &BTreeMap<i32, V>, target: i32) -> Option<i32> {
    let below = map.range(..=target).next_back().map(|(k, _)| *k);
    let above = map.range(target..).next().map(|(k, _)| *k);
    match (below, above) {
        (Some(b), Some(a)) => {
            if i64::from(a) - i64::from(target) < i64::from(target) - i64::from(b) {
                Some(a)
            } else {
                Some(b)
            }
        }
        (below, above) => below.or(above),
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
