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

use serde::{Deserialize, Serialize};

use crate::defi::{
    price::PriceConverter,
    tick_map::{swap_math::FEE_PIPS_DENOMINATOR, tick::PoolTick},
};

/// Global state of a concentrated-liquidity pool needed to rebuild its depth.
///
/// `PoolState` is a snapshot: the current price position, the liquidity active at that price
/// and the static parameters (tick spacing, fee and token decimals) of the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PoolState {
    /// Current tick position of the pool price.
    pub current_tick: i32,
    /// Liquidity active at the current price.
    pub current_liquidity: u128,
    /// Spacing between usable ticks.
    pub tick_spacing: i32,
    /// Swap fee in hundredths of a basis point (3000 = 0.3%).
    pub fee_pips: u32,
    /// Decimals of token0.
    pub token0_decimals: u8,
    /// Decimals of token1.
    pub token1_decimals: u8,
}

impl PoolState {
    /// Creates a new [`PoolState`] instance.
    #[must_use]
    pub const fn new(
        current_tick: i32,
        current_liquidity: u128,
        tick_spacing: i32,
        fee_pips: u32,
        token0_decimals: u8,
        token1_decimals: u8,
    ) -> Self {
        Self {
            current_tick,
            current_liquidity,
            tick_spacing,
            fee_pips,
            token0_decimals,
            token1_decimals,
        }
    }

    /// Checks that the pool parameters can be used to walk ticks and price them.
    ///
    /// # Errors
    ///
    /// Returns an error if the tick spacing is not positive, the current tick is out of
    /// bounds or the fee is not below 100%.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.tick_spacing > 0,
            "Tick spacing must be positive, was {}",
            self.tick_spacing
        );
        anyhow::ensure!(
            (PoolTick::MIN_TICK..=PoolTick::MAX_TICK).contains(&self.current_tick),
            "Current tick {} is outside [{}, {}]",
            self.current_tick,
            PoolTick::MIN_TICK,
            PoolTick::MAX_TICK
        );
        anyhow::ensure!(
            self.fee_pips < FEE_PIPS_DENOMINATOR,
            "Fee {} must be below {FEE_PIPS_DENOMINATOR} pips",
            self.fee_pips
        );
        Ok(())
    }

    /// Returns the current tick aligned down to the tick spacing.
    ///
    /// Returns `None` when the tick spacing is not positive.
    #[must_use]
    pub fn active_tick(&self) -> Option<i32> {
        if self.tick_spacing <= 0 {
            return None;
        }
        self.current_tick
            .checked_div_euclid(self.tick_spacing)?
            .checked_mul(self.tick_spacing)
    }

    /// Returns the price converter for this pool's token pair.
    #[must_use]
    pub const fn price_converter(&self) -> PriceConverter {
        PriceConverter::new(self.token0_decimals, self.token1_decimals)
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
