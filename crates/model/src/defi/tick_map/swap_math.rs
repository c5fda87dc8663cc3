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

use alloy_primitives::{I256, U160, U256};

use crate::defi::tick_map::{
    full_math::FullMath,
    sqrt_price_math::{
        get_amount0_delta, get_amount1_delta, get_next_sqrt_price_from_input,
        get_next_sqrt_price_from_output,
    },
};

/// Fee denominator, fees are expressed in hundredths of a basis point.
pub const FEE_PIPS_DENOMINATOR: u32 = 1_000_000;

/// Result of swapping within a single price interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapStepResult {
    /// The price after swapping the amount in/out, not to exceed the target price.
    pub sqrt_ratio_next_x96: U160,
    /// The amount to be swapped in, of either token0 or token1.
    pub amount_in: U256,
    /// The amount to be received, of either token0 or token1.
    pub amount_out: U256,
    /// The amount of input that will be taken as a fee.
    pub fee_amount: U256,
}

/// Computes the result of swapping some amount in, or out, given the parameters of the swap.
///
/// A positive `amount_remaining` is an exact input, a negative one an exact output.
/// The direction follows from the ordering of `sqrt_ratio_current_x96` and `sqrt_ratio_target_x96`.
///
/// # Errors
///
/// Returns an error if `fee_pips` is not below one million or any intermediate value overflows.
pub fn compute_swap_step(
    sqrt_ratio_current_x96: U160,
    sqrt_ratio_target_x96: U160,
    liquidity: u128,
    amount_remaining: I256,
    fee_pips: u32,
) -> anyhow::Result<SwapStepResult> {
    anyhow::ensure!(
        fee_pips < FEE_PIPS_DENOMINATOR,
        "Fee {fee_pips} must be below {FEE_PIPS_DENOMINATOR} pips"
    );

    let zero_for_one = sqrt_ratio_current_x96 >= sqrt_ratio_target_x96;
    let exact_in = !amount_remaining.is_negative();
    let amount_remaining_abs = amount_remaining.unsigned_abs();
    let fee_complement = U256::from(FEE_PIPS_DENOMINATOR - fee_pips);

    let mut amount_in = U256::ZERO;
    let mut amount_out = U256::ZERO;

    let sqrt_ratio_next_x96 = if exact_in {
        let amount_remaining_less_fee = FullMath::mul_div(
            amount_remaining_abs,
            fee_complement,
            U256::from(FEE_PIPS_DENOMINATOR),
        )?;
        amount_in = if zero_for_one {
            get_amount0_delta(sqrt_ratio_target_x96, sqrt_ratio_current_x96, liquidity, true)?
        } else {
            get_amount1_delta(sqrt_ratio_current_x96, sqrt_ratio_target_x96, liquidity, true)?
        };
        if amount_remaining_less_fee >= amount_in {
            sqrt_ratio_target_x96
        } else {
            get_next_sqrt_price_from_input(
                sqrt_ratio_current_x96,
                liquidity,
                amount_remaining_less_fee,
                zero_for_one,
            )?
        }
    } else {
        amount_out = if zero_for_one {
            get_amount1_delta(sqrt_ratio_target_x96, sqrt_ratio_current_x96, liquidity, false)?
        } else {
            get_amount0_delta(sqrt_ratio_current_x96, sqrt_ratio_target_x96, liquidity, false)?
        };
        if amount_remaining_abs >= amount_out {
            sqrt_ratio_target_x96
        } else {
            get_next_sqrt_price_from_output(
                sqrt_ratio_current_x96,
                liquidity,
                amount_remaining_abs,
                zero_for_one,
            )?
        }
    };

    let max = sqrt_ratio_target_x96 == sqrt_ratio_next_x96;

    // Recompute the side(s) that did not reach the target exactly
    if zero_for_one {
        if !(max && exact_in) {
            amount_in =
                get_amount0_delta(sqrt_ratio_next_x96, sqrt_ratio_current_x96, liquidity, true)?;
        }
        if !(max && !exact_in) {
            amount_out =
                get_amount1_delta(sqrt_ratio_next_x96, sqrt_ratio_current_x96, liquidity, false)?;
        }
    } else {
        if !(max && exact_in) {
            amount_in =
                get_amount1_delta(sqrt_ratio_current_x96, sqrt_ratio_next_x96, liquidity, true)?;
        }
        if !(max && !exact_in) {
            amount_out =
                get_amount0_delta(sqrt_ratio_current_x96, sqrt_ratio_next_x96, liquidity, false)?;
        }
    }

    // Cap the output amount to not exceed the remaining output amount
    if !exact_in && amount_out > amount_remaining_abs {
        amount_out = amount_remaining_abs;
    }

    let fee_amount = if exact_in && sqrt_ratio_next_x96 != sqrt_ratio_target_x96 {
        // Target not reached, the remainder of the input is taken as fee
        amount_remaining_abs.saturating_sub(amount_in)
    } else {
        FullMath::mul_div_rounding_up(amount_in, U256::from(fee_pips), fee_complement)?
    };

    Ok(SwapStepResult {
        sqrt_ratio_next_x96,
        amount_in,
        amount_out,
        fee_amount,
    })
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::defi::tick_map::{
        full_math::Q96_U160, sqrt_price_math::encode_sqrt_ratio_x96,
        tick_math::get_sqrt_ratio_at_tick,
    };

    const ONE_ETHER: u128 = 1_000_000_000_000_000_000;

    fn signed(value: u128) -> I256 {
        FullMath::truncate_to_i256(U256::from(value))
    }

    #[rstest]
    fn test_exact_in_capped_at_price_target_one_for_zero() {
        let price = Q96_U160;
        let price_target = encode_sqrt_ratio_x96(101, 100).unwrap();
        let liquidity = 2 * ONE_ETHER;
        let amount = signed(ONE_ETHER);

        let step = compute_swap_step(price, price_target, liquidity, amount, 600).unwrap();

        assert_eq!(step.sqrt_ratio_next_x96, price_target);
        assert_eq!(step.amount_in, U256::from(9_975_124_224_178_055_u128));
        assert_eq!(step.fee_amount, U256::from(5_988_667_735_148_u128));
        assert_eq!(step.amount_out, U256::from(9_925_619_580_021_728_u128));
        assert!(step.amount_in + step.fee_amount < U256::from(ONE_ETHER));
    }

    #[rstest]
    fn test_exact_in_fully_spent_one_for_zero() {
        let price = Q96_U160;
        let price_target = encode_sqrt_ratio_x96(1000, 100).unwrap();
        let liquidity = 2 * ONE_ETHER;
        let amount = signed(ONE_ETHER);

        let step = compute_swap_step(price, price_target, liquidity, amount, 600).unwrap();

        assert!(step.sqrt_ratio_next_x96 < price_target);
        assert_eq!(step.amount_in + step.fee_amount, U256::from(ONE_ETHER));
    }

    #[rstest]
    fn test_exact_out_capped_at_remaining() {
        let price = Q96_U160;
        let price_target = encode_sqrt_ratio_x96(10000, 100).unwrap();
        let liquidity = 2 * ONE_ETHER;
        let amount = -signed(ONE_ETHER);

        let step = compute_swap_step(price, price_target, liquidity, amount, 600).unwrap();

        assert!(step.sqrt_ratio_next_x96 < price_target);
        assert_eq!(step.amount_out, U256::from(ONE_ETHER));
    }

    #[rstest]
    fn test_zero_for_one_across_one_tick_interval_returns_token1() {
        let upper = get_sqrt_ratio_at_tick(60).unwrap();
        let lower = get_sqrt_ratio_at_tick(0).unwrap();
        let liquidity = ONE_ETHER;

        let step =
            compute_swap_step(upper, lower, liquidity, signed(u128::MAX >> 1), 3000).unwrap();
        let expected_out = get_amount1_delta(lower, upper, liquidity, false).unwrap();

        assert_eq!(step.sqrt_ratio_next_x96, lower);
        assert_eq!(step.amount_out, expected_out);
        assert!(step.amount_in > U256::ZERO);
        assert!(step.fee_amount > U256::ZERO);
    }

    #[rstest]
    fn test_zero_liquidity_moves_straight_to_target() {
        let upper = get_sqrt_ratio_at_tick(60).unwrap();
        let lower = get_sqrt_ratio_at_tick(0).unwrap();

        let step = compute_swap_step(upper, lower, 0, signed(ONE_ETHER), 3000).unwrap();

        assert_eq!(step.sqrt_ratio_next_x96, lower);
        assert_eq!(step.amount_in, U256::ZERO);
        assert_eq!(step.amount_out, U256::ZERO);
    }

    #[rstest]
    fn test_invalid_fee_is_rejected() {
        let result = compute_swap_step(
            Q96_U160,
            encode_sqrt_ratio_x96(101, 100).unwrap(),
            ONE_ETHER,
            signed(ONE_ETHER),
            FEE_PIPS_DENOMINATOR,
        );
        assert!(result.is_err());
    }
}
