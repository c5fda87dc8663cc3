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

use alloy_primitives::{U160, U256};

use super::full_math::{FullMath, Q96, checked_u160};
use crate::defi::tick_map::tick_math::get_sqrt_ratio_at_tick;

/// Encodes the sqrt ratio of two token amounts as a Q64.96 fixed point number.
///
/// Calculates `sqrt(amount0 / amount1) * 2^96`.
///
/// # Errors
///
/// Returns an error if `amount1` is zero or the result overflows 160 bits.
#[cfg(test)]
pub(crate) fn encode_sqrt_ratio_x96(amount0: u128, amount1: u128) -> anyhow::Result<U160> {
    anyhow::ensure!(amount1 != 0, "encode_sqrt_ratio_x96: division by zero");
    if amount0 == 0 {
        return Ok(U160::ZERO);
    }

    // sqrt(amount0 / amount1) * 2^96 == sqrt(amount0 * 2^192 / amount1)
    let q192: U256 = U256::from(1u8) << 192;
    let ratio_q192 = FullMath::mul_div(U256::from(amount0), q192, U256::from(amount1))?;
    checked_u160(FullMath::sqrt(ratio_q192))
}

/// Calculates the next sqrt price after adding or removing token0, rounding up.
fn get_next_sqrt_price_from_amount0_rounding_up(
    sqrt_price_x96: U160,
    liquidity: u128,
    amount: U256,
    add: bool,
) -> anyhow::Result<U160> {
    if amount.is_zero() {
        return Ok(sqrt_price_x96);
    }
    let numerator: U256 = U256::from(liquidity) << 96;
    let sqrt_price_x96 = U256::from(sqrt_price_x96);
    let (product, product_overflowed) = amount.overflowing_mul(sqrt_price_x96);

    if add {
        if !product_overflowed {
            let (denominator, denominator_overflowed) = numerator.overflowing_add(product);
            if !denominator_overflowed {
                // Always fits 160 bits
                let result =
                    FullMath::mul_div_rounding_up(numerator, sqrt_price_x96, denominator)?;
                return checked_u160(result);
            }
        }

        let fallback_denominator = (numerator / sqrt_price_x96)
            .checked_add(amount)
            .ok_or_else(|| anyhow::anyhow!("Amount {amount} overflows the price denominator"))?;
        checked_u160(FullMath::div_rounding_up(numerator, fallback_denominator)?)
    } else {
        anyhow::ensure!(
            !product_overflowed && numerator > product,
            "Invalid conditions for amount0 removal: overflow or underflow detected"
        );
        let denominator = numerator - product;
        checked_u160(FullMath::mul_div_rounding_up(
            numerator,
            sqrt_price_x96,
            denominator,
        )?)
    }
}

/// Calculates the next sqrt price after adding or removing token1, rounding down.
fn get_next_sqrt_price_from_amount1_rounding_down(
    sqrt_price_x96: U160,
    liquidity: u128,
    amount: U256,
    add: bool,
) -> anyhow::Result<U160> {
    let liquidity = U256::from(liquidity);
    let sqrt_price_x96 = U256::from(sqrt_price_x96);

    // Avoid the mul_div for amounts that fit 160 bits
    if add {
        let quotient = if amount <= U256::from(U160::MAX) {
            (amount << 96) / liquidity
        } else {
            FullMath::mul_div(amount, Q96, liquidity)?
        };
        let next = sqrt_price_x96
            .checked_add(quotient)
            .ok_or_else(|| anyhow::anyhow!("Sqrt price overflow adding {quotient}"))?;
        checked_u160(next)
    } else {
        let quotient = if amount <= U256::from(U160::MAX) {
            FullMath::div_rounding_up(amount << 96, liquidity)?
        } else {
            FullMath::mul_div_rounding_up(amount, Q96, liquidity)?
        };
        anyhow::ensure!(
            sqrt_price_x96 > quotient,
            "sqrt_price_x96 must be greater than quotient"
        );
        checked_u160(sqrt_price_x96 - quotient)
    }
}

/// Calculates the next sqrt price given an input amount.
///
/// # Errors
///
/// Returns an error if `sqrt_price_x96` or `liquidity` is zero, or the price leaves its range.
pub fn get_next_sqrt_price_from_input(
    sqrt_price_x96: U160,
    liquidity: u128,
    amount_in: U256,
    zero_for_one: bool,
) -> anyhow::Result<U160> {
    anyhow::ensure!(
        sqrt_price_x96 > U160::ZERO,
        "sqrt_price_x96 must be greater than zero"
    );
    anyhow::ensure!(liquidity > 0, "Liquidity must be greater than zero");

    if zero_for_one {
        get_next_sqrt_price_from_amount0_rounding_up(sqrt_price_x96, liquidity, amount_in, true)
    } else {
        get_next_sqrt_price_from_amount1_rounding_down(sqrt_price_x96, liquidity, amount_in, true)
    }
}

/// Calculates the next sqrt price given an output amount.
///
/// # Errors
///
/// Returns an error if `sqrt_price_x96` or `liquidity` is zero, or the output exceeds the
/// virtual reserves.
pub fn get_next_sqrt_price_from_output(
    sqrt_price_x96: U160,
    liquidity: u128,
    amount_out: U256,
    zero_for_one: bool,
) -> anyhow::Result<U160> {
    anyhow::ensure!(
        sqrt_price_x96 > U160::ZERO,
        "sqrt_price_x96 must be greater than zero"
    );
    anyhow::ensure!(liquidity > 0, "Liquidity must be greater than zero");

    if zero_for_one {
        get_next_sqrt_price_from_amount1_rounding_down(sqrt_price_x96, liquidity, amount_out, false)
    } else {
        get_next_sqrt_price_from_amount0_rounding_up(sqrt_price_x96, liquidity, amount_out, false)
    }
}

/// Calculates the amount of token0 between two sqrt prices for a given liquidity.
///
/// # Errors
///
/// Returns an error if the lower price is zero or an intermediate result overflows.
pub fn get_amount0_delta(
    sqrt_ratio_ax96: U160,
    sqrt_ratio_bx96: U160,
    liquidity: u128,
    round_up: bool,
) -> anyhow::Result<U256> {
    let (sqrt_ratio_a, sqrt_ratio_b) = if sqrt_ratio_ax96 > sqrt_ratio_bx96 {
        (sqrt_ratio_bx96, sqrt_ratio_ax96)
    } else {
        (sqrt_ratio_ax96, sqrt_ratio_bx96)
    };
    anyhow::ensure!(
        sqrt_ratio_a > U160::ZERO,
        "get_amount0_delta: sqrt price must be greater than zero"
    );

    let numerator1: U256 = U256::from(liquidity) << 96;
    let numerator2 = U256::from(sqrt_ratio_b - sqrt_ratio_a);
    let sqrt_ratio_a = U256::from(sqrt_ratio_a);
    let sqrt_ratio_b = U256::from(sqrt_ratio_b);

    if round_up {
        let result = FullMath::mul_div_rounding_up(numerator1, numerator2, sqrt_ratio_b)?;
        FullMath::div_rounding_up(result, sqrt_ratio_a)
    } else {
        let result = FullMath::mul_div(numerator1, numerator2, sqrt_ratio_b)?;
        Ok(result / sqrt_ratio_a)
    }
}

/// Calculates the amount of token1 between two sqrt prices for a given liquidity.
///
/// # Errors
///
/// Returns an error if the result overflows 256 bits.
pub fn get_amount1_delta(
    sqrt_ratio_ax96: U160,
    sqrt_ratio_bx96: U160,
    liquidity: u128,
    round_up: bool,
) -> anyhow::Result<U256> {
    let (sqrt_ratio_a, sqrt_ratio_b) = if sqrt_ratio_ax96 > sqrt_ratio_bx96 {
        (sqrt_ratio_bx96, sqrt_ratio_ax96)
    } else {
        (sqrt_ratio_ax96, sqrt_ratio_bx96)
    };

    let liquidity = U256::from(liquidity);
    let sqrt_ratio_diff = U256::from(sqrt_ratio_b - sqrt_ratio_a);

    if round_up {
        FullMath::mul_div_rounding_up(liquidity, sqrt_ratio_diff, Q96)
    } else {
        FullMath::mul_div(liquidity, sqrt_ratio_diff, Q96)
    }
}

/// Calculates the token amounts represented by `liquidity` over `[tick_lower, tick_upper)`
/// at the given sqrt price.
///
/// # Errors
///
/// Returns an error if either tick is out of bounds or the amounts overflow.
pub fn get_amounts_for_liquidity(
    sqrt_ratio_x96: U160,
    tick_lower: i32,
    tick_upper: i32,
    liquidity: u128,
    round_up: bool,
) -> anyhow::Result<(U256, U256)> {
    let sqrt_ratio_lower_x96 = get_sqrt_ratio_at_tick(tick_lower)?;
    let sqrt_ratio_upper_x96 = get_sqrt_ratio_at_tick(tick_upper)?;

    let (sqrt_ratio_a, sqrt_ratio_b) = if sqrt_ratio_lower_x96 > sqrt_ratio_upper_x96 {
        (sqrt_ratio_upper_x96, sqrt_ratio_lower_x96)
    } else {
        (sqrt_ratio_lower_x96, sqrt_ratio_upper_x96)
    };

    let amount0 = if sqrt_ratio_x96 <= sqrt_ratio_a {
        // Price below the range, everything sits in token0
        get_amount0_delta(sqrt_ratio_a, sqrt_ratio_b, liquidity, round_up)?
    } else if sqrt_ratio_x96 < sqrt_ratio_b {
        get_amount0_delta(sqrt_ratio_x96, sqrt_ratio_b, liquidity, round_up)?
    } else {
        U256::ZERO
    };

    let amount1 = if sqrt_ratio_x96 < sqrt_ratio_a {
        U256::ZERO
    } else if sqrt_ratio_x96 < sqrt_ratio_b {
        get_amount1_delta(sqrt_ratio_a, sqrt_ratio_x96, liquidity, round_up)?
    } else {
        // Price above the range, everything sits in token1
        get_amount1_delta(sqrt_ratio_a, sqrt_ratio_b, liquidity, round_up)?
    };

    Ok((amount0, amount1))
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
