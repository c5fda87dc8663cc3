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

//! Token amounts needed to move a position from one liquidity to another.

use alloy_primitives::{U160, U256};
use depthbook_model::defi::tick_map::{
    full_math::FullMath, sqrt_price_math::get_amounts_for_liquidity,
};
use serde::Serialize;

/// Resolution of the slippage tolerance, in parts of one percent.
const SLIPPAGE_SCALE: u64 = 1_000_000;

/// Token amounts for a liquidity change and their slippage-adjusted minimums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LiquidityDeltaAmounts {
    /// Absolute liquidity change.
    pub liquidity_delta: u128,
    /// Raw token0 amount, rounded up.
    pub amount0: U256,
    /// Raw token1 amount, rounded up.
    pub amount1: U256,
    /// Token0 amount after the slippage tolerance.
    pub min_amount0: U256,
    /// Token1 amount after the slippage tolerance.
    pub min_amount1: U256,
}

/// Computes the amounts moved when a position over `[tick_lower, tick_upper)` goes from
/// `liquidity_old` to `liquidity_new` at `sqrt_price_x96`.
///
/// `slippage_percent` (0 to 100) lowers the minimum amounts to `amount * (100 - slippage) / 100`.
///
/// # Errors
///
/// Returns an error if the slippage is out of range, a tick is out of bounds or the amounts
/// overflow.
pub fn amounts_for_liquidity_change(
    sqrt_price_x96: U160,
    tick_lower: i32,
    tick_upper: i32,
    liquidity_old: u128,
    liquidity_new: u128,
    slippage_percent: f64,
) -> anyhow::Result<LiquidityDeltaAmounts> {
    anyhow::ensure!(
        (0.0..=100.0).contains(&slippage_percent),
        "Slippage must be within [0, 100] percent, was {slippage_percent}"
    );
    anyhow::ensure!(
        tick_lower < tick_upper,
        "Tick lower {tick_lower} must be below tick upper {tick_upper}"
    );

    let liquidity_delta = liquidity_old.abs_diff(liquidity_new);
    let (amount0, amount1) =
        get_amounts_for_liquidity(sqrt_price_x96, tick_lower, tick_upper, liquidity_delta, true)?;

    // Bounded to [0, 100 * SLIPPAGE_SCALE] by the check above
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let kept = ((100.0 - slippage_percent) * SLIPPAGE_SCALE as f64).round() as u64;
    let denominator = U256::from(100 * SLIPPAGE_SCALE);

    Ok(LiquidityDeltaAmounts {
        liquidity_delta,
        amount0,
        amount1,
        min_amount0: FullMath::mul_div(amount0, U256::from(kept), denominator)?,
        min_amount1: FullMath::mul_div(amount1, U256::from(kept), denominator)?,
    })
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
