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

use std::path::PathBuf;

use clap::Parser;
use depthbook_analysis::config::{DepthConfig, DepthView};
use depthbook_data::service::TickWindow;

/// Ticks read on each side of the current tick when no bounds are given.
pub const DEFAULT_TICKS_AROUND: u32 = 100;

/// Main CLI structure for parsing command-line arguments and options.
///
/// Reconstructs liquidity depth and an order book for a concentrated-liquidity pool, from a
/// saved snapshot or a live node.
#[derive(Debug, Parser)]
#[clap(version, about, author)]
pub struct DepthbookCli {
    #[clap(subcommand)]
    pub command: Commands,
}

/// Available top-level commands.
#[derive(Parser, Debug)]
pub enum Commands {
    /// Renders depth from a JSON pool snapshot.
    Snapshot {
        /// Path to the snapshot file
        #[arg(long)]
        file: PathBuf,
        #[clap(flatten)]
        depth: DepthOpt,
    },
    /// Renders depth for a pool read over JSON-RPC.
    Rpc {
        /// The pool contract address
        #[arg(long)]
        pool: String,
        /// RPC HTTP URL for blockchain calls
        #[arg(long, env = "RPC_HTTP_URL")]
        rpc_url: Option<String>,
        /// TOML client configuration, command-line values take precedence
        #[arg(long)]
        config: Option<PathBuf>,
        /// Maximum number of RPC requests per second (optional, unthrottled by default)
        #[arg(long)]
        rpc_requests_per_second: Option<u32>,
        /// Maximum number of Multicall calls per RPC request (optional, defaults to 200)
        #[arg(long)]
        multicall_calls_per_rpc_request: Option<u32>,
        /// Block number to read at (optional, defaults to latest)
        #[arg(long)]
        block: Option<u64>,
        #[clap(flatten)]
        depth: DepthOpt,
    },
}

/// Options shared by every command that renders depth.
#[derive(Parser, Debug, Clone)]
pub struct DepthOpt {
    /// The view to render: full-curve, order-book or cumulative
    #[arg(long)]
    pub view: Option<DepthView>,
    /// Lower tick bound, inclusive
    #[arg(long, allow_negative_numbers = true, requires = "max_tick")]
    pub min_tick: Option<i32>,
    /// Upper tick bound, inclusive
    #[arg(long, allow_negative_numbers = true, requires = "min_tick")]
    pub max_tick: Option<i32>,
    /// Tick spacings to read on each side of the current tick (defaults to 100)
    #[arg(long, conflicts_with_all = ["min_tick", "max_tick"])]
    pub ticks_around: Option<u32>,
    /// Order book levels at or below this size are dropped
    #[arg(long)]
    pub epsilon: Option<f64>,
    /// Order book levels shown per side
    #[arg(long, default_value_t = 20)]
    pub levels: usize,
    /// Print the result as JSON instead of tables
    #[arg(long)]
    pub json: bool,
}

impl DepthOpt {
    /// Returns the tick window selected by the bounds or `--ticks-around`.
    #[must_use]
    pub fn window(&self) -> TickWindow {
        match (self.min_tick, self.max_tick) {
            (Some(min_tick), Some(max_tick)) => TickWindow::Bounds { min_tick, max_tick },
            _ => TickWindow::AroundCurrent {
                ticks_each_side: self.ticks_around.unwrap_or(DEFAULT_TICKS_AROUND),
            },
        }
    }

    /// Overrides `config` with the values given on the command line.
    #[must_use]
    pub fn apply(&self, config: DepthConfig) -> DepthConfig {
        DepthConfig {
            order_book_epsilon: self.epsilon.unwrap_or(config.order_book_epsilon),
            view: self.view.unwrap_or(config.view),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
