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

//! Consumer-facing depth views built from locked ticks.
//!
//! Three views are available, each a distinct operation on [`DepthAggregator`]:
//!
//! - [`DepthAggregator::full_curve`]: every tick as is, for charting.
//! - [`DepthAggregator::order_book`]: bids and asks split at the current tick, each side with
//!   its own running size.
//! - [`DepthAggregator::cumulative_from_current`]: one running sum growing outward from the
//!   current tick, answering how much liquidity sits between the current price and a price.

use depthbook_model::defi::{CumulativeTick, LockedTick, OrderBook, OrderBookLevel, PoolData};
use serde::Serialize;

use crate::config::{DepthConfig, DepthView};

/// The output of one depth view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DepthOutput {
    FullCurve(Vec<LockedTick>),
    OrderBook(OrderBook),
    Cumulative(Vec<CumulativeTick>),
}

impl DepthOutput {
    /// Returns the view that produced this output.
    #[must_use]
    pub const fn view(&self) -> DepthView {
        match self {
            Self::FullCurve(_) => DepthView::FullCurve,
            Self::OrderBook(_) => DepthView::OrderBook,
            Self::Cumulative(_) => DepthView::Cumulative,
        }
    }
}

/// Builds depth views from [`PoolData`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DepthAggregator {
    config: DepthConfig,
}

impl DepthAggregator {
    /// Creates a new [`DepthAggregator`] instance.
    #[must_use]
    pub const fn new(config: DepthConfig) -> Self {
        Self { config }
    }

    /// Returns the aggregator configuration.
    #[must_use]
    pub const fn config(&self) -> &DepthConfig {
        &self.config
    }

    /// Builds the configured view.
    #[must_use]
    pub fn aggregate(&self, data: &PoolData) -> DepthOutput {
        self.aggregate_as(self.config.view, data)
    }

    /// Builds the given view.
    #[must_use]
    pub fn aggregate_as(&self, view: DepthView, data: &PoolData) -> DepthOutput {
        match view {
            DepthView::FullCurve => DepthOutput::FullCurve(self.full_curve(data)),
            DepthView::OrderBook => DepthOutput::OrderBook(self.order_book(data)),
            DepthView::Cumulative => DepthOutput::Cumulative(self.cumulative_from_current(data)),
        }
    }

    /// Returns every locked tick in ascending order.
    #[must_use]
    pub fn full_curve(&self, data: &PoolData) -> Vec<LockedTick> {
        data.ticks.clone()
    }

    /// Splits the ticks at the current one into bids (below, best first) and asks (above,
    /// best first).
    ///
    /// Sizes are token0 amounts on both sides. Levels at or below the configured epsilon are
    /// dropped after the running size is taken.
    #[must_use]
    pub fn order_book(&self, data: &PoolData) -> OrderBook {
        let Some(current_index) = data.ticks.iter().position(LockedTick::is_current) else {
            return OrderBook::default();
        };
        let last_price = data.ticks[current_index].processed.price0;

        let mut book = OrderBook {
            bids: self.levels(data.ticks[..current_index].iter().rev()),
            asks: self.levels(data.ticks[current_index + 1..].iter()),
            last_price: Some(last_price),
            spread: None,
        };
        book.spread = match (book.best_bid(), book.best_ask()) {
            (Some(bid), Some(ask)) => Some(ask.price - bid.price),
            (Some(level), None) | (None, Some(level)) => Some((last_price - level.price).abs()),
            (None, None) => None,
        };
        book
    }

    /// Accumulates locked amounts outward from the current tick.
    ///
    /// Above the current tick the sum grows by each tick's token0 amount starting from the
    /// current tick's token0 amount, below it by token1 amounts starting from the current
    /// tick's token1 amount. The current tick reports both of its amounts together.
    #[must_use]
    pub fn cumulative_from_current(&self, data: &PoolData) -> Vec<CumulativeTick> {
        let Some(current_index) = data.ticks.iter().position(LockedTick::is_current) else {
            return Vec::new();
        };
        let current = &data.ticks[current_index];

        let mut running = current.liquidity_locked_token1;
        let mut below: Vec<_> = data.ticks[..current_index]
            .iter()
            .rev()
            .map(|tick| {
                running += tick.liquidity_locked_token1;
                cumulative(tick, running)
            })
            .collect();
        below.reverse();

        let mut running = current.liquidity_locked_token0;
        let above = data.ticks[current_index + 1..].iter().map(|tick| {
            running += tick.liquidity_locked_token0;
            cumulative(tick, running)
        });

        below
            .into_iter()
            .chain(std::iter::once(cumulative(
                current,
                current.liquidity_locked_token0 + current.liquidity_locked_token1,
            )))
            .chain(above)
            .collect()
    }

    fn levels<'a>(&self, ticks: impl Iterator<Item = &'a LockedTick>) -> Vec<OrderBookLevel> {
        let mut cumulative_size = 0.0;
        ticks
            .filter_map(|tick| {
                let size = tick.liquidity_locked_token0;
                cumulative_size += size;
                (size > self.config.order_book_epsilon).then_some(OrderBookLevel {
                    price: tick.processed.price0,
                    size,
                    cumulative_size,
                })
            })
            .collect()
    }
}

fn cumulative(tick: &LockedTick, cumulative_liquidity: f64) -> CumulativeTick {
    CumulativeTick {
        tick: tick.tick(),
        price0: tick.processed.price0,
        price1: tick.processed.price1,
        cumulative_liquidity,
        is_current: tick.is_current(),
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
