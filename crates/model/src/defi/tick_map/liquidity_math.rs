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

use thiserror::Error;

/// Errors raised when a signed liquidity delta cannot be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LiquidityMathError {
    #[error("Liquidity subtraction underflow: x={x}, y={y}")]
    Underflow { x: u128, y: i128 },
    #[error("Liquidity addition overflow: x={x}, y={y}")]
    Overflow { x: u128, y: i128 },
}

/// Adds a signed liquidity delta to liquidity.
///
/// # Errors
///
/// Returns [`LiquidityMathError::Underflow`] if the result would be negative and
/// [`LiquidityMathError::Overflow`] if it would exceed `u128::MAX`.
pub fn liquidity_math_add(x: u128, y: i128) -> Result<u128, LiquidityMathError> {
    match x.checked_add_signed(y) {
        Some(z) => Ok(z),
        None if y < 0 => Err(LiquidityMathError::Underflow { x, y }),
        None => Err(LiquidityMathError::Overflow { x, y }),
    }
}

/// Subtracts a signed liquidity delta from liquidity, i.e. `x - y`.
///
/// # Errors
///
/// Returns [`LiquidityMathError::Underflow`] if the result would be negative and
/// [`LiquidityMathError::Overflow`] if it would exceed `u128::MAX`.
pub fn liquidity_math_sub(x: u128, y: i128) -> Result<u128, LiquidityMathError> {
    if y >= 0 {
        x.checked_sub(y.unsigned_abs())
            .ok_or(LiquidityMathError::Underflow { x, y: -y })
    } else {
        x.checked_add(y.unsigned_abs())
            .ok_or(LiquidityMathError::Overflow { x, y: y.saturating_neg() })
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_add() {
        assert_eq!(liquidity_math_add(1, 0), Ok(1));
        assert_eq!(liquidity_math_add(1, 1), Ok(2));
    }

    #[rstest]
    fn test_subtract_one() {
        assert_eq!(liquidity_math_add(1, -1), Ok(0));
        assert_eq!(liquidity_math_add(3, -2), Ok(1));
    }

    #[rstest]
    fn test_addition_overflow() {
        let x = u128::MAX - 14;
        assert_eq!(
            liquidity_math_add(x, 15),
            Err(LiquidityMathError::Overflow { x, y: 15 })
        );
    }

    #[rstest]
    #[case(0, -1)]
    #[case(3, -4)]
    fn test_subtraction_underflow(#[case] x: u128, #[case] y: i128) {
        assert_eq!(
            liquidity_math_add(x, y),
            Err(LiquidityMathError::Underflow { x, y })
        );
    }

    #[rstest]
    fn test_sub_mirrors_add() {
        assert_eq!(liquidity_math_sub(1000, 500), Ok(500));
        assert_eq!(liquidity_math_sub(1000, -500), Ok(1500));
        assert_eq!(liquidity_math_sub(1000, 0), Ok(1000));
    }

    #[rstest]
    fn test_sub_errors() {
        assert_eq!(
            liquidity_math_sub(100, 101),
            Err(LiquidityMathError::Underflow { x: 100, y: -101 })
        );
        assert!(matches!(
            liquidity_math_sub(u128::MAX, -1),
            Err(LiquidityMathError::Overflow { .. })
        ));
        assert!(liquidity_math_sub(u128::MAX, i128::MIN).is_err());
    }
}
