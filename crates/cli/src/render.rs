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

//! Table rendering of depth views.

use depthbook_analysis::{aggregation::DepthOutput, error::DepthWarning};
use depthbook_model::defi::{CumulativeTick, LockedTick, OrderBook, OrderBookLevel};
use tabled::{Table, Tabled, settings::Style};

#[derive(Tabled)]
struct LockedTickDisplay {
    tick: i32,
    price0: String,
    price1: String,
    liquidity: u128,
    locked0: String,
    locked1: String,
    current: &'static str,
}

#[derive(Tabled)]
struct BookLevelDisplay {
    bids: String,
    price: String,
    asks: String,
}

#[derive(Tabled)]
struct CumulativeTickDisplay {
    tick: i32,
    price0: String,
    price1: String,
    cumulative: String,
    current: &'static str,
}

const fn current_marker(is_current: bool) -> &'static str {
    if is_current { "*" } else { "" }
}

fn format_amount(value: f64) -> String {
    format!("{value:.6}")
}

fn format_price(value: f64) -> String {
    if value != 0.0 && !(1e-4..1e9).contains(&value.abs()) {
        format!("{value:.6e}")
    } else {
        format!("{value:.8}")
    }
}

/// Renders a depth view as a table, showing at most `num_levels` levels per book side.
#[must_use]
pub fn render_output(output: &DepthOutput, num_levels: usize) -> String {
    match output {
        DepthOutput::FullCurve(ticks) => render_full_curve(ticks),
        DepthOutput::OrderBook(book) => render_order_book(book, num_levels),
        DepthOutput::Cumulative(ticks) => render_cumulative(ticks),
    }
}

fn render_full_curve(ticks: &[LockedTick]) -> String {
    let data = ticks.iter().map(|t| LockedTickDisplay {
        tick: t.tick(),
        price0: format_price(t.processed.price0),
        price1: format_price(t.processed.price1),
        liquidity: t.processed.liquidity_active,
        locked0: format_amount(t.liquidity_locked_token0),
        locked1: format_amount(t.liquidity_locked_token1),
        current: current_marker(t.is_current()),
    });
    Table::new(data).with(Style::rounded()).to_string()
}

fn render_order_book(book: &OrderBook, num_levels: usize) -> String {
    let level = |level: &OrderBookLevel, is_bid: bool| {
        let size = format_amount(level.cumulative_size);
        BookLevelDisplay {
            bids: if is_bid { size.clone() } else { String::new() },
            price: format_price(level.price),
            asks: if is_bid { String::new() } else { size },
        }
    };
    // Asks on top, best levels meeting in the middle
    let data: Vec<BookLevelDisplay> = book
        .asks
        .iter()
        .take(num_levels)
        .rev()
        .map(|l| level(l, false))
        .chain(book.bids.iter().take(num_levels).map(|l| level(l, true)))
        .collect();

    let mut rendered = Table::new(data).with(Style::rounded()).to_string();
    if let Some(ask) = book.best_ask() {
        rendered.push_str(&format!("\nbest ask: {}", format_price(ask.price)));
    }
    if let Some(bid) = book.best_bid() {
        rendered.push_str(&format!("\nbest bid: {}", format_price(bid.price)));
    }
    if let Some(last_price) = book.last_price {
        rendered.push_str(&format!("\nlast price: {}", format_price(last_price)));
    }
    if let Some(spread) = book.spread {
        rendered.push_str(&format!("\nspread: {}", format_price(spread)));
    }
    rendered
}

fn render_cumulative(ticks: &[CumulativeTick]) -> String {
    let data = ticks.iter().map(|t| CumulativeTickDisplay {
        tick: t.tick,
        price0: format_price(t.price0),
        price1: format_price(t.price1),
        cumulative: format_amount(t.cumulative_liquidity),
        current: current_marker(t.is_current),
    });
    Table::new(data).with(Style::rounded()).to_string()
}

/// Renders warnings as one line each.
#[must_use]
pub fn render_warnings(warnings: &[DepthWarning]) -> String {
    warnings
        .iter()
        .map(|w| format!("warning: {w}"))
        .collect::<Vec<_>>()
        .join("\n")
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
