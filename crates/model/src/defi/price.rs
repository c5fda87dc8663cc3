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

//! Human-readable prices for tick indices.
//!
//! A tick `t` carries the raw price `1.0001^t` of token0 in units of token1. Scaling by the
//! token decimals turns it into the price a person would quote.

use alloy_primitives::U256;

use crate::defi::tick_map::tick::PoolTick;

/// Converts between tick indices and decimal-adjusted prices for one token pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PriceConverter {
    token0_decimals: u8,
    token1_decimals: u8,
}

impl PriceConverter {
    /// Creates a new [`PriceConverter`] for the given token decimals.
    #[must_use]
    pub const fn new(token0_decimals: u8, token1_decimals: u8) -> Self {
        Self {
            token0_decimals,
            token1_decimals,
        }
    }

    /// Price of token0 denominated in token1 at `tick`.
    #[must_use]
    pub fn price0(&self, tick: i32) -> f64 {
        // exp(t * ln 1.0001) stays finite across the full tick range, unlike repeated powi
        (f64::from(tick) * ln_tick_base()).exp() * self.decimal_scale()
    }

    /// Price of token1 denominated in token0 at `tick`.
    #[must_use]
    pub fn price1(&self, tick: i32) -> f64 {
        (-f64::from(tick) * ln_tick_base()).exp() / self.decimal_scale()
    }

    /// Tick whose token0 price is closest to `price0`, clamped to the valid tick range.
    ///
    /// Returns `None` for non-positive or non-finite prices.
    #[must_use]
    pub fn tick_at_price0(&self, price0: f64) -> Option<i32> {
        if !(price0.is_finite() && price0 > 0.0) {
            return None;
        }
        let raw = (price0.ln() - self.decimal_scale().ln()) / ln_tick_base();
        if raw.is_nan() {
            return None;
        }
        let clamped = raw
            .round()
            .clamp(f64::from(PoolTick::MIN_TICK), f64::from(PoolTick::MAX_TICK));
        // Clamped into the i32 tick range above
        #[allow(clippy::cast_possible_truncation)]
        Some(clamped as i32)
    }

    /// Usable tick (a multiple of `tick_spacing`) whose token0 price is closest to `price0`.
    #[must_use]
    pub fn usable_tick_at_price0(&self, price0: f64, tick_spacing: i32) -> Option<i32> {
        let tick = self.tick_at_price0(price0)?;
        nearest_usable_tick(tick, tick_spacing)
    }

    /// Converts a raw token1 amount into token1 units.
    #[must_use]
    pub fn token1_amount(&self, raw: U256) -> f64 {
        u256_to_f64(raw) / 10f64.powi(i32::from(self.token1_decimals))
    }

    fn decimal_scale(&self) -> f64 {
        10f64.powi(i32::from(self.token0_decimals) - i32::from(self.token1_decimals))
    }
}

fn ln_tick_base() -> f64 {
    0.0001f64.ln_1p()
}

/// Rounds `tick` to the nearest multiple of `tick_spacing` that lies within the usable range.
///
/// Returns `None` when the tick spacing is not positive.
#[must_use]
pub fn nearest_usable_tick(tick: i32, tick_spacing: i32) -> Option<i32> {
    if tick_spacing <= 0 {
        return None;
    }
    let spacing = i64::from(tick_spacing);
    let tick = i64::from(tick);
    let floor = tick.div_euclid(spacing) * spacing;
    // Halfway ticks round up
    let rounded = if (tick - floor) * 2 >= spacing {
        floor + spacing
    } else {
        floor
    };
    let min = i64::from(PoolTick::get_min_tick(tick_spacing));
    let max = i64::from(PoolTick::get_max_tick(tick_spacing));
    i32::try_from(rounded.clamp(min, max)).ok()
}

/// Converts a 256-bit unsigned integer to the nearest `f64`.
#[must_use]
pub fn u256_to_f64(value: U256) -> f64 {
    value
        .as_limbs()
        .iter()
        .rev()
        .fold(0.0, |acc, limb| acc * 18_446_744_073_709_551_616.0 + (*limb as f64))
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
