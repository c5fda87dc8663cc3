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

//! A minimal in-memory concentrated-liquidity pool able to simulate swaps.

use alloy_primitives::{I256, U160, U256};
use depthbook_model::defi::{
    PoolTick, TickMap,
    tick_map::{
        full_math::FullMath,
        liquidity_math::{liquidity_math_add, liquidity_math_sub},
        swap_math::compute_swap_step,
        tick_math::{MAX_SQRT_RATIO, MIN_SQRT_RATIO, get_sqrt_ratio_at_tick, get_tick_at_sqrt_ratio},
    },
};

/// Upper bound on swap steps, each step either exhausts the amount or crosses a tick.
const MAX_SWAP_STEPS: usize = 4_096;

/// Token deltas of a simulated swap from the pool's point of view.
///
/// Positive amounts flow into the pool, negative amounts flow out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapOutcome {
    /// Token0 delta.
    pub amount0: I256,
    /// Token1 delta.
    pub amount1: I256,
    /// Sqrt price after the swap.
    pub sqrt_price_x96: U160,
    /// Tick after the swap.
    pub tick: i32,
}

/// A pool holding a price, the active liquidity and a small set of initialized ticks.
#[derive(Debug, Clone)]
pub struct SyntheticPool {
    sqrt_price_x96: U160,
    tick_current: i32,
    liquidity: u128,
    fee_pips: u32,
    ticks: TickMap,
}

impl SyntheticPool {
    /// Creates a new [`SyntheticPool`] at `sqrt_price_x96` with `liquidity` active.
    ///
    /// # Errors
    ///
    /// Returns an error if the price is outside the valid sqrt ratio range.
    pub fn new(
        sqrt_price_x96: U160,
        liquidity: u128,
        fee_pips: u32,
        ticks: impl IntoIterator<Item = PoolTick>,
    ) -> anyhow::Result<Self> {
        let tick_current = get_tick_at_sqrt_ratio(sqrt_price_x96)?;
        Ok(Self {
            sqrt_price_x96,
            tick_current,
            liquidity,
            fee_pips,
            ticks: TickMap::from_ticks(ticks),
        })
    }

    /// Creates a pool holding a single position of `liquidity` over `[tick_lower, tick_upper)`,
    /// priced at the upper boundary so that the whole position sits in token1.
    ///
    /// # Errors
    ///
    /// Returns an error if the ticks are out of bounds or not strictly increasing.
    pub fn with_position(
        tick_lower: i32,
        tick_upper: i32,
        liquidity: u128,
        fee_pips: u32,
    ) -> anyhow::Result<Self> {
        anyhow::ensure!(
            tick_lower < tick_upper,
            "Tick lower {tick_lower} must be below tick upper {tick_upper}"
        );
        let liquidity_delta = i128::try_from(liquidity)
            .map_err(|_| anyhow::anyhow!("Liquidity {liquidity} exceeds the signed range"))?;

        let mut lower = PoolTick::from_tick(tick_lower);
        lower.update_liquidity(liquidity_delta, false)?;
        let mut upper = PoolTick::from_tick(tick_upper);
        upper.update_liquidity(liquidity_delta, true)?;

        Ok(Self {
            sqrt_price_x96: get_sqrt_ratio_at_tick(tick_upper)?,
            // Just below the upper boundary, the position is active
            tick_current: tick_upper - 1,
            liquidity,
            fee_pips,
            ticks: TickMap::from_ticks([lower, upper]),
        })
    }

    /// Returns the current sqrt price.
    #[must_use]
    pub const fn sqrt_price_x96(&self) -> U160 {
        self.sqrt_price_x96
    }

    /// Returns the current tick.
    #[must_use]
    pub const fn tick_current(&self) -> i32 {
        self.tick_current
    }

    /// Returns the active liquidity.
    #[must_use]
    pub const fn liquidity(&self) -> u128 {
        self.liquidity
    }

    /// Simulates a swap, moving the pool's price and crossing initialized ticks.
    ///
    /// A positive `amount_specified` is an exact input, a negative one an exact output. The swap
    /// stops once the amount is used up or the price reaches `sqrt_price_limit_x96`.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is zero, the price limit is on the wrong side of the current
    /// price or outside the valid range, or any step of the fixed point math fails.
    pub fn swap(
        &mut self,
        amount_specified: I256,
        zero_for_one: bool,
        sqrt_price_limit_x96: U160,
    ) -> anyhow::Result<SwapOutcome> {
        anyhow::ensure!(!amount_specified.is_zero(), "Swap amount must not be zero");
        if zero_for_one {
            anyhow::ensure!(
                sqrt_price_limit_x96 < self.sqrt_price_x96 && sqrt_price_limit_x96 > MIN_SQRT_RATIO,
                "Price limit {sqrt_price_limit_x96} invalid for a zero for one swap from {}",
                self.sqrt_price_x96
            );
        } else {
            anyhow::ensure!(
                sqrt_price_limit_x96 > self.sqrt_price_x96 && sqrt_price_limit_x96 < MAX_SQRT_RATIO,
                "Price limit {sqrt_price_limit_x96} invalid for a one for zero swap from {}",
                self.sqrt_price_x96
            );
        }

        let exact_input = amount_specified.is_positive();
        let mut amount_specified_remaining = amount_specified;
        let mut amount_calculated = I256::ZERO;
        let mut steps = 0;

        while amount_specified_remaining != I256::ZERO
            && sqrt_price_limit_x96 != self.sqrt_price_x96
        {
            steps += 1;
            anyhow::ensure!(steps <= MAX_SWAP_STEPS, "Swap exceeded {MAX_SWAP_STEPS} steps");

            let sqrt_price_start_x96 = self.sqrt_price_x96;
            let (tick_next, initialized) = self
                .ticks
                .next_initialized_tick(self.tick_current, zero_for_one);
            let tick_next = tick_next.clamp(PoolTick::MIN_TICK, PoolTick::MAX_TICK);
            let sqrt_price_next = get_sqrt_ratio_at_tick(tick_next)?;

            let sqrt_price_target = if (zero_for_one && sqrt_price_next < sqrt_price_limit_x96)
                || (!zero_for_one && sqrt_price_next > sqrt_price_limit_x96)
            {
                sqrt_price_limit_x96
            } else {
                sqrt_price_next
            };

            let step = compute_swap_step(
                self.sqrt_price_x96,
                sqrt_price_target,
                self.liquidity,
                amount_specified_remaining,
                self.fee_pips,
            )?;
            self.sqrt_price_x96 = step.sqrt_ratio_next_x96;

            if exact_input {
                amount_specified_remaining -=
                    FullMath::truncate_to_i256(step.amount_in + step.fee_amount);
                amount_calculated -= FullMath::truncate_to_i256(step.amount_out);
            } else {
                amount_specified_remaining += FullMath::truncate_to_i256(step.amount_out);
                amount_calculated += FullMath::truncate_to_i256(step.amount_in + step.fee_amount);
            }

            if step.sqrt_ratio_next_x96 == sqrt_price_next {
                if initialized {
                    let liquidity_net = self.ticks.liquidity_net(tick_next);
                    // Crossing down turns the tick's net liquidity off
                    self.liquidity = if zero_for_one {
                        liquidity_math_sub(self.liquidity, liquidity_net)?
                    } else {
                        liquidity_math_add(self.liquidity, liquidity_net)?
                    };
                }
                self.tick_current = if zero_for_one { tick_next - 1 } else { tick_next };
            } else if step.sqrt_ratio_next_x96 != sqrt_price_start_x96 {
                self.tick_current = get_tick_at_sqrt_ratio(self.sqrt_price_x96)?;
            }
        }

        let amount_used = amount_specified - amount_specified_remaining;
        let (amount0, amount1) = if zero_for_one == exact_input {
            (amount_used, amount_calculated)
        } else {
            (amount_calculated, amount_used)
        };

        Ok(SwapOutcome {
            amount0,
            amount1,
            sqrt_price_x96: self.sqrt_price_x96,
            tick: self.tick_current,
        })
    }

    /// Swaps an exact amount of token0 for token1, down to `sqrt_price_limit_x96` if given.
    ///
    /// # Errors
    ///
    /// Returns an error under the same conditions as [`SyntheticPool::swap`].
    pub fn swap_exact0_for_1(
        &mut self,
        amount0_in: U256,
        sqrt_price_limit_x96: Option<U160>,
    ) -> anyhow::Result<SwapOutcome> {
        let limit = sqrt_price_limit_x96.unwrap_or(MIN_SQRT_RATIO + U160::from(1));
        self.swap(FullMath::truncate_to_i256(amount0_in), true, limit)
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use depthbook_model::defi::tick_map::sqrt_price_math::{get_amount0_delta, get_amount1_delta};
    use rstest::rstest;

    use super::*;

    const ONE_ETHER: u128 = 1_000_000_000_000_000_000;

    #[rstest]
    fn test_with_position_state() {
        let pool = SyntheticPool::with_position(0, 60, ONE_ETHER, 3000).unwrap();
        assert_eq!(pool.sqrt_price_x96(), get_sqrt_ratio_at_tick(60).unwrap());
        assert_eq!(pool.tick_current(), 59);
        assert_eq!(pool.liquidity(), ONE_ETHER);
    }

    #[rstest]
    fn test_with_position_rejects_inverted_range() {
        assert!(SyntheticPool::with_position(60, 0, ONE_ETHER, 3000).is_err());
        assert!(SyntheticPool::with_position(0, 60, u128::MAX, 3000).is_err());
    }

    #[rstest]
    fn test_draining_position_returns_all_token1() {
        let mut pool = SyntheticPool::with_position(0, 60, ONE_ETHER, 3000).unwrap();
        let lower = get_sqrt_ratio_at_tick(0).unwrap();
        let upper = get_sqrt_ratio_at_tick(60).unwrap();

        let outcome = pool
            .swap_exact0_for_1(U256::from(u128::MAX), Some(lower))
            .unwrap();

        let expected_out = get_amount1_delta(lower, upper, ONE_ETHER, false).unwrap();
        assert_eq!(outcome.amount1, -FullMath::truncate_to_i256(expected_out));
        assert!(outcome.amount0.is_positive());
        assert_eq!(outcome.sqrt_price_x96, lower);
        assert_eq!(outcome.tick, -1);
        // Crossing the lower boundary switches the position off
        assert_eq!(pool.liquidity(), 0);
    }

    #[rstest]
    fn test_small_swap_stays_inside_interval() {
        let mut pool = SyntheticPool::with_position(-600, 600, ONE_ETHER, 500).unwrap();
        let start = pool.sqrt_price_x96();

        let outcome = pool.swap_exact0_for_1(U256::from(1_000_000u64), None).unwrap();

        assert_eq!(outcome.amount0, I256::try_from(1_000_000).unwrap());
        assert!(outcome.amount1.is_negative());
        assert!(outcome.sqrt_price_x96 < start);
        assert_eq!(pool.liquidity(), ONE_ETHER);
    }

    #[rstest]
    fn test_exact_output_one_for_zero() {
        let mut pool = SyntheticPool::new(
            get_sqrt_ratio_at_tick(0).unwrap(),
            ONE_ETHER,
            3000,
            Vec::<PoolTick>::new(),
        )
        .unwrap();
        let amount_out = I256::try_from(1_000_000_000_000u64).unwrap();

        let outcome = pool
            .swap(-amount_out, false, get_sqrt_ratio_at_tick(100).unwrap())
            .unwrap();

        assert_eq!(outcome.amount0, -amount_out);
        assert!(outcome.amount1.is_positive());
    }

    #[rstest]
    fn test_swap_up_crosses_into_position() {
        let mut pool = SyntheticPool::new(
            get_sqrt_ratio_at_tick(-120).unwrap(),
            0,
            3000,
            [
                PoolTick::new(-60, ONE_ETHER, ONE_ETHER as i128),
                PoolTick::new(60, ONE_ETHER, -(ONE_ETHER as i128)),
            ],
        )
        .unwrap();
        let limit = get_sqrt_ratio_at_tick(60).unwrap();

        let amount_in = FullMath::truncate_to_i256(U256::from(u128::MAX));
        let outcome = pool.swap(amount_in, false, limit).unwrap();

        let lower = get_sqrt_ratio_at_tick(-60).unwrap();
        let expected_out = get_amount0_delta(lower, limit, ONE_ETHER, false).unwrap();
        assert_eq!(outcome.amount0, -FullMath::truncate_to_i256(expected_out));
        // Reaching the limit at the upper boundary crosses it as well
        assert_eq!(pool.liquidity(), 0);
        assert_eq!(outcome.tick, 60);
    }

    #[rstest]
    fn test_invalid_limits_are_rejected() {
        let mut pool = SyntheticPool::with_position(0, 60, ONE_ETHER, 3000).unwrap();
        let above = get_sqrt_ratio_at_tick(120).unwrap();

        assert!(pool.swap(I256::ONE, true, above).is_err());
        assert!(pool.swap(I256::ONE, true, MIN_SQRT_RATIO).is_err());
        assert!(pool.swap(I256::ZERO, true, get_sqrt_ratio_at_tick(0).unwrap()).is_err());
    }
}
