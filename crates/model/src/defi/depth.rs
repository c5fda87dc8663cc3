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

//! Depth values derived from a pool's tick distribution.

use serde::{Deserialize, Serialize};

use crate::defi::{pool::PoolState, tick_map::tick::PoolTick};

/// Outcome of reading a single tick from a tick source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickRead {
    /// The tick was read; it may still be uninitialized.
    Success(PoolTick),
    /// The read failed and nothing is known about this tick.
    Failure { tick: i32, reason: String },
}

impl TickRead {
    /// Returns the tick index this read refers to.
    #[must_use]
    pub const fn tick(&self) -> i32 {
        match self {
            Self::Success(tick) => tick.value,
            Self::Failure { tick, .. } => *tick,
        }
    }

    /// Returns the read tick on success.
    #[must_use]
    pub const fn as_success(&self) -> Option<&PoolTick> {
        match self {
            Self::Success(tick) => Some(tick),
            Self::Failure { .. } => None,
        }
    }
}

/// A tick annotated with the liquidity active over `[tick, tick + spacing)` and its prices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProcessedTick {
    /// The tick index.
    pub tick: i32,
    /// Liquidity active over the interval starting at this tick.
    pub liquidity_active: u128,
    /// Net liquidity change when crossing this tick upward.
    pub liquidity_net: i128,
    /// Price of token0 in token1.
    pub price0: f64,
    /// Price of token1 in token0.
    pub price1: f64,
    /// Whether this tick holds the current price.
    pub is_current: bool,
}

/// A processed tick with the token amounts locked in its interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LockedTick {
    /// The processed tick.
    pub processed: ProcessedTick,
    /// Locked amount expressed in token0 units.
    pub liquidity_locked_token0: f64,
    /// Locked amount expressed in token1 units.
    pub liquidity_locked_token1: f64,
}

impl LockedTick {
    /// Creates a new [`LockedTick`].
    #[must_use]
    pub const fn new(
        processed: ProcessedTick,
        liquidity_locked_token0: f64,
        liquidity_locked_token1: f64,
    ) -> Self {
        Self {
            processed,
            liquidity_locked_token0,
            liquidity_locked_token1,
        }
    }

    /// Returns the tick index.
    #[must_use]
    pub const fn tick(&self) -> i32 {
        self.processed.tick
    }

    /// Returns true if this tick holds the current price.
    #[must_use]
    pub const fn is_current(&self) -> bool {
        self.processed.is_current
    }
}

/// The pool state together with its per-tick locked liquidity, ordered by tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolData {
    /// The pool state the ticks were computed from.
    pub pool: PoolState,
    /// Locked ticks in ascending tick order.
    pub ticks: Vec<LockedTick>,
}

impl PoolData {
    /// Creates a new [`PoolData`].
    #[must_use]
    pub const fn new(pool: PoolState, ticks: Vec<LockedTick>) -> Self {
        Self { pool, ticks }
    }

    /// Creates a [`PoolData`] without any ticks.
    #[must_use]
    pub const fn empty(pool: PoolState) -> Self {
        Self::new(pool, Vec::new())
    }

    /// Returns the tick flagged as current, if any.
    #[must_use]
    pub fn current_tick(&self) -> Option<&LockedTick> {
        self.ticks.iter().find(|t| t.is_current())
    }
}

/// A price level of a reconstructed order book.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderBookLevel {
    /// Level price, token0 in token1.
    pub price: f64,
    /// Size available at this level, in token0 units.
    pub size: f64,
    /// Running size from the best level up to and including this one.
    pub cumulative_size: f64,
}

/// Bids and asks derived from the tick distribution around the current price.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderBook {
    /// Bids, best (highest) price first.
    pub bids: Vec<OrderBookLevel>,
    /// Asks, best (lowest) price first.
    pub asks: Vec<OrderBookLevel>,
    /// Price of the current tick.
    pub last_price: Option<f64>,
    /// Distance between the best ask and best bid, or between the last price and the
    /// only populated side.
    pub spread: Option<f64>,
}

impl OrderBook {
    /// Returns the best bid level.
    #[must_use]
    pub fn best_bid(&self) -> Option<&OrderBookLevel> {
        self.bids.first()
    }

    /// Returns the best ask level.
    #[must_use]
    pub fn best_ask(&self) -> Option<&OrderBookLevel> {
        self.asks.first()
    }

    /// Returns true if neither side has a level.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }
}

/// A point on the depth curve accumulated outward from the current tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CumulativeTick {
    /// The tick index.
    pub tick: i32,
    /// Price of token0 in token1.
    pub price0: f64,
    /// Price of token1 in token0.
    pub price1: f64,
    /// Liquidity accumulated from the current tick up to and including this one.
    pub cumulative_liquidity: f64,
    /// Whether this tick holds the current price.
    pub is_current: bool,
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
