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

//! Estimation of the token amounts locked in each tick interval.

use alloy_primitives::U256;
use depthbook_model::defi::{
    LockedTick, PoolState, PriceConverter, ProcessedTick,
    tick_map::tick_math::get_sqrt_ratio_at_tick,
};

use crate::{error::DepthWarning, simulation::SyntheticPool};

/// Input amount used to drain a synthetic interval, large enough to cross any realistic range.
const MAX_SWAP_AMOUNT: U256 = U256::from_limbs([u64::MAX, u64::MAX, 0, 0]);

/// Estimates locked token amounts by draining a synthetic position spanning one tick interval.
#[derive(Debug, Clone, Copy)]
pub struct LockedAmountEstimator {
    pool: PoolState,
    converter: PriceConverter,
}

impl LockedAmountEstimator {
    /// Creates a new [`LockedAmountEstimator`] for `pool`.
    #[must_use]
    pub const fn new(pool: PoolState) -> Self {
        Self {
            pool,
            converter: pool.price_converter(),
        }
    }

    /// Returns `(token0, token1)` locked over `[tick, tick + spacing)` at the tick's active
    /// liquidity.
    ///
    /// The amount is the token1 received when swapping token0 into a position of that liquidity
    /// from the upper to the lower boundary. The token0 figure is the same amount valued at the
    /// tick's price.
    ///
    /// # Errors
    ///
    /// Returns an error if the interval leaves the valid tick range or the swap simulation fails.
    pub fn estimate(&self, tick: &ProcessedTick) -> anyhow::Result<(f64, f64)> {
        if tick.liquidity_active == 0 {
            return Ok((0.0, 0.0));
        }

        let tick_lower = tick.tick;
        let tick_upper = tick_lower
            .checked_add(self.pool.tick_spacing)
            .ok_or_else(|| anyhow::anyhow!("Interval above tick {tick_lower} overflows"))?;

        let mut pool = SyntheticPool::with_position(
            tick_lower,
            tick_upper,
            tick.liquidity_active,
            self.pool.fee_pips,
        )?;
        let limit = get_sqrt_ratio_at_tick(tick_lower)?;
        let outcome = pool.swap_exact0_for_1(MAX_SWAP_AMOUNT, Some(limit))?;

        let amount1 = self.converter.token1_amount(outcome.amount1.unsigned_abs());
        let amount0 = amount1 * tick.price1;
        Ok((amount0, amount1))
    }

    /// Attaches locked amounts to every tick.
    ///
    /// A tick whose estimate fails is reported with zero amounts and a
    /// [`DepthWarning::SimulationFailed`].
    #[must_use]
    pub fn lock(&self, ticks: &[ProcessedTick]) -> (Vec<LockedTick>, Vec<DepthWarning>) {
        let mut warnings = Vec::new();
        let locked = ticks
            .iter()
            .map(|tick| {
                let (amount0, amount1) = self.estimate(tick).unwrap_or_else(|e| {
                    tracing::warn!(tick = tick.tick, error = %e, "Locked amount simulation failed");
                    warnings.push(DepthWarning::SimulationFailed {
                        tick: tick.tick,
                        reason: e.to_string(),
                    });
                    (0.0, 0.0)
                });
                LockedTick::new(*tick, amount0, amount1)
            })
            .collect();
        (locked, warnings)
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use depthbook_model::defi::{
        PoolTick,
        tick_map::sqrt_price_math::get_amount1_delta,
    };
    use rstest::{fixture, rstest};

    use super::*;

    const ONE_ETHER: u128 = 1_000_000_000_000_000_000;

    #[fixture]
    fn pool() -> PoolState {
        PoolState::new(0, ONE_ETHER, 60, 3000, 18, 18)
    }

    fn processed(pool: &PoolState, tick: i32, liquidity_active: u128) -> ProcessedTick {
        let converter = pool.price_converter();
        ProcessedTick {
            tick,
            liquidity_active,
            liquidity_net: 0,
            price0: converter.price0(tick),
            price1: converter.price1(tick),
            is_current: false,
        }
    }

    #[rstest]
    fn test_locked_token1_matches_interval_amount(pool: PoolState) {
        let estimator = LockedAmountEstimator::new(pool);

        let (amount0, amount1) = estimator.estimate(&processed(&pool, 0, ONE_ETHER)).unwrap();

        let expected = get_amount1_delta(
            get_sqrt_ratio_at_tick(0).unwrap(),
            get_sqrt_ratio_at_tick(60).unwrap(),
            ONE_ETHER,
            false,
        )
        .unwrap();
        let expected = pool.price_converter().token1_amount(expected);
        assert!((amount1 - expected).abs() < 1e-12);
        // At tick 0 both tokens are priced at par
        assert!((amount0 - amount1).abs() < 1e-12);
        assert!(amount1 > 0.0029 && amount1 < 0.0031, "amount1 was {amount1}");
    }

    #[rstest]
    fn test_locked_amount_scales_with_liquidity(pool: PoolState) {
        let estimator = LockedAmountEstimator::new(pool);

        let (_, single) = estimator.estimate(&processed(&pool, 600, ONE_ETHER)).unwrap();
        let (_, double) = estimator.estimate(&processed(&pool, 600, 2 * ONE_ETHER)).unwrap();

        assert!((double / single - 2.0).abs() < 1e-9);
    }

    #[rstest]
    fn test_zero_liquidity_locks_nothing(pool: PoolState) {
        let estimator = LockedAmountEstimator::new(pool);
        assert_eq!(estimator.estimate(&processed(&pool, 0, 0)).unwrap(), (0.0, 0.0));
    }

    #[rstest]
    fn test_failures_default_to_zero() {
        let pool = PoolState::new(0, ONE_ETHER, 1, 3000, 18, 18);
        let estimator = LockedAmountEstimator::new(pool);
        let ticks = [
            processed(&pool, PoolTick::MIN_TICK, ONE_ETHER),
            processed(&pool, 0, ONE_ETHER),
            processed(&pool, PoolTick::MAX_TICK, ONE_ETHER),
        ];

        let (locked, warnings) = estimator.lock(&ticks);

        assert_eq!(locked.len(), 3);
        assert_eq!(locked[0].liquidity_locked_token0, 0.0);
        assert_eq!(locked[0].liquidity_locked_token1, 0.0);
        assert!(locked[1].liquidity_locked_token1 > 0.0);
        assert_eq!(locked[2].liquidity_locked_token1, 0.0);
        let failed: Vec<_> = warnings
            .iter()
            .map(|warning| match warning {
                DepthWarning::SimulationFailed { tick, .. } => *tick,
                other => panic!("unexpected warning {other:?}"),
            })
            .collect();
        assert_eq!(failed, vec![PoolTick::MIN_TICK, PoolTick::MAX_TICK]);
    }
}
