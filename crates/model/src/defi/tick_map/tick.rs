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

use crate::defi::tick_map::liquidity_math::{LiquidityMathError, liquidity_math_add};

/// A tick boundary of a concentrated-liquidity pool, as read from the pool contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PoolTick {
    /// The referenced tick.
    pub value: i32,
    /// Total liquidity referencing this tick.
    pub liquidity_gross: u128,
    /// Net liquidity change when crossing this tick upward.
    pub liquidity_net: i128,
    /// Whether any position references this tick.
    #[serde(default)]
    pub initialized: bool,
}

impl PoolTick {
    /// Minimum valid tick value for Uniswap V3 pools.
    pub const MIN_TICK: i32 = -887_272;
    /// Maximum valid tick value for Uniswap V3 pools.
    pub const MAX_TICK: i32 = -Self::MIN_TICK;

    /// Creates a new [`PoolTick`], deriving `initialized` from the gross liquidity.
    #[must_use]
    pub const fn new(value: i32, liquidity_gross: u128, liquidity_net: i128) -> Self {
        Self {
            value,
            liquidity_gross,
            liquidity_net,
            initialized: liquidity_gross > 0,
        }
    }

    /// Creates an uninitialized tick for a given tick value.
    #[must_use]
    pub const fn from_tick(tick: i32) -> Self {
        Self::new(tick, 0, 0)
    }

    /// Updates liquidity amounts when a position bounded by this tick is added or removed.
    ///
    /// Returns the gross liquidity before the update.
    ///
    /// # Errors
    ///
    /// Returns an error if the gross or net liquidity would leave its integer range.
    pub fn update_liquidity(
        &mut self,
        liquidity_delta: i128,
        upper: bool,
    ) -> Result<u128, LiquidityMathError> {
        let liquidity_gross_before = self.liquidity_gross;
        let liquidity_gross = liquidity_math_add(self.liquidity_gross, liquidity_delta)?;

        // liquidity_net tracks the net change when crossing this tick left to right
        let liquidity_net = if upper {
            self.liquidity_net.checked_sub(liquidity_delta)
        } else {
            self.liquidity_net.checked_add(liquidity_delta)
        }
        .ok_or(LiquidityMathError::Overflow {
            x: self.liquidity_gross,
            y: liquidity_delta,
        })?;

        self.liquidity_gross = liquidity_gross;
        self.liquidity_net = liquidity_net;
        self.initialized = liquidity_gross > 0;

        Ok(liquidity_gross_before)
    }

    /// Checks if any liquidity references this tick.
    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.initialized || self.liquidity_gross > 0
    }

    /// Gets maximum usable tick for given spacing.
    #[must_use]
    pub const fn get_max_tick(tick_spacing: i32) -> i32 {
        (Self::MAX_TICK / tick_spacing) * tick_spacing
    }

    /// Gets minimum usable tick for given spacing.
    #[must_use]
    pub const fn get_min_tick(tick_spacing: i32) -> i32 {
        (Self::MIN_TICK / tick_spacing) * tick_spacing
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
