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

//! Full precision multiply-divide helpers for Q64.96 fixed point arithmetic.

use alloy_primitives::{I256, U160, U256, U512};

/// 2^96 as a [`U256`], the resolution of Q64.96 numbers.
pub const Q96: U256 = U256::from_limbs([0, 1 << 32, 0, 0]);

/// 2^128 as a [`U256`].
pub const Q128: U256 = U256::from_limbs([0, 0, 1, 0]);

/// 2^96 as a [`U160`], the sqrt price of a 1:1 pool.
pub const Q96_U160: U160 = U160::from_limbs([0, 1 << 32, 0]);

/// Multiply-divide operations that keep a 512-bit intermediate product.
#[derive(Debug)]
pub struct FullMath;

impl FullMath {
    /// Calculates `floor(a * b / denominator)` without intermediate overflow.
    ///
    /// # Errors
    ///
    /// Returns an error if `denominator` is zero or the result does not fit in 256 bits.
    pub fn mul_div(a: U256, b: U256, denominator: U256) -> anyhow::Result<U256> {
        anyhow::ensure!(!denominator.is_zero(), "mul_div: division by zero");

        let product = U512::from(a) * U512::from(b);
        Self::narrow(product / U512::from(denominator))
    }

    /// Calculates `ceil(a * b / denominator)` without intermediate overflow.
    ///
    /// # Errors
    ///
    /// Returns an error if `denominator` is zero or the result does not fit in 256 bits.
    pub fn mul_div_rounding_up(a: U256, b: U256, denominator: U256) -> anyhow::Result<U256> {
        anyhow::ensure!(!denominator.is_zero(), "mul_div_rounding_up: division by zero");

        let product = U512::from(a) * U512::from(b);
        let denominator = U512::from(denominator);
        let mut quotient = product / denominator;
        if !(product % denominator).is_zero() {
            quotient += U512::from(1u8);
        }
        Self::narrow(quotient)
    }

    /// Calculates `ceil(a / b)`.
    ///
    /// # Errors
    ///
    /// Returns an error if `b` is zero.
    pub fn div_rounding_up(a: U256, b: U256) -> anyhow::Result<U256> {
        anyhow::ensure!(!b.is_zero(), "div_rounding_up: division by zero");

        let quotient = a / b;
        if (a % b).is_zero() {
            Ok(quotient)
        } else {
            Ok(quotient + U256::from(1u8))
        }
    }

    /// Integer square root, rounded down (Babylonian method).
    #[must_use]
    pub fn sqrt(x: U256) -> U256 {
        if x.is_zero() {
            return U256::ZERO;
        }

        let mut z = x;
        let mut y = (x >> 1) + U256::from(1u8);
        while y < z {
            z = y;
            y = (x / y + y) >> 1;
        }
        z
    }

    /// Reinterprets an unsigned amount as a signed one.
    ///
    /// Amounts produced by the swap math stay far below 2^255, so no bits are lost in practice.
    #[must_use]
    pub fn truncate_to_i256(value: U256) -> I256 {
        I256::from_raw(value)
    }

    fn narrow(value: U512) -> anyhow::Result<U256> {
        anyhow::ensure!(
            value <= U512::from(U256::MAX),
            "Result overflows uint256: {value}"
        );
        Ok(U256::from(value))
    }
}

/// Narrows a [`U256`] into a [`U160`].
///
/// # Errors
///
/// Returns an error if `value` does not fit in 160 bits.
pub fn checked_u160(value: U256) -> anyhow::Result<U160> {
    anyhow::ensure!(
        value <= U256::from(U160::MAX),
        "Value {value} overflows uint160"
    );
    Ok(U160::from(value))
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(10, 20, 5, 40)]
    #[case(1, 1, 2, 0)]
    #[case(3, 1, 2, 1)]
    #[case(5, 1, 3, 1)]
    fn test_mul_div_rounds_down(
        #[case] a: u64,
        #[case] b: u64,
        #[case] denominator: u64,
        #[case] expected: u64,
    ) {
        let result =
            FullMath::mul_div(U256::from(a), U256::from(b), U256::from(denominator)).unwrap();
        assert_eq!(result, U256::from(expected));
    }

    #[rstest]
    fn test_mul_div_keeps_full_precision() {
        // Q128 * Q128 overflows 256 bits before the division
        let result = FullMath::mul_div(Q128, Q128, Q128).unwrap();
        assert_eq!(result, Q128);

        let result = FullMath::mul_div(U256::MAX, U256::MAX, U256::MAX).unwrap();
        assert_eq!(result, U256::MAX);
    }

    #[rstest]
    fn test_mul_div_errors() {
        assert!(FullMath::mul_div(Q128, U256::from(5), U256::ZERO).is_err());
        // Q128 * Q128 / 1 needs 257 bits
        assert!(FullMath::mul_div(Q128, Q128, U256::from(1)).is_err());
    }

    #[rstest]
    fn test_mul_div_rounding_up() {
        assert_eq!(
            FullMath::mul_div_rounding_up(U256::from(1), U256::from(1), U256::from(2)).unwrap(),
            U256::from(1)
        );
        assert_eq!(
            FullMath::mul_div_rounding_up(U256::from(4), U256::from(1), U256::from(2)).unwrap(),
            U256::from(2)
        );
        assert!(
            FullMath::mul_div_rounding_up(U256::MAX, U256::MAX, U256::MAX - U256::from(1)).is_err()
        );
    }

    #[rstest]
    fn test_div_rounding_up() {
        assert_eq!(
            FullMath::div_rounding_up(U256::from(7), U256::from(2)).unwrap(),
            U256::from(4)
        );
        assert_eq!(
            FullMath::div_rounding_up(U256::from(8), U256::from(2)).unwrap(),
            U256::from(4)
        );
        assert_eq!(
            FullMath::div_rounding_up(U256::ZERO, U256::from(3)).unwrap(),
            U256::ZERO
        );
        assert!(FullMath::div_rounding_up(U256::from(1), U256::ZERO).is_err());
    }

    #[rstest]
    #[case(0, 0)]
    #[case(1, 1)]
    #[case(15, 3)]
    #[case(16, 4)]
    #[case(1_000_000, 1_000)]
    fn test_sqrt(#[case] value: u64, #[case] expected: u64) {
        assert_eq!(FullMath::sqrt(U256::from(value)), U256::from(expected));
    }

    #[rstest]
    fn test_sqrt_of_max() {
        let root = FullMath::sqrt(U256::MAX);
        assert_eq!(root, U256::from(u128::MAX));
    }

    #[rstest]
    fn test_checked_u160() {
        assert_eq!(checked_u160(Q96).unwrap(), Q96_U160);
        assert!(checked_u160(U256::from(U160::MAX) + U256::from(1)).is_err());
    }
}
