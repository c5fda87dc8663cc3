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

//! Depth and order book reconstruction for concentrated-liquidity pools.
//!
//! The `depthbook-analysis` crate turns sparse per-tick liquidity reads into consumer-facing
//! depth, in strictly forward stages:
//!
//! 1. [`range::tick_range`] enumerates the spacing-aligned ticks to read.
//! 2. [`active_liquidity::ActiveLiquidityProcessor`] rebuilds the liquidity active at every tick
//!    by walking outward from the current tick.
//! 3. [`locked::LockedAmountEstimator`] simulates a swap across each tick interval to estimate the
//!    token amounts locked in it.
//! 4. [`aggregation::DepthAggregator`] shapes the result into a full curve, an order book or a
//!    cumulative curve.
//!
//! [`pipeline::DepthPipeline`] chains the stages. All stages are synchronous and pure, degraded
//! conditions are returned as [`error::DepthWarning`] values next to the result.

#![warn(rustc::all)]
#![deny(unsafe_code)]
#![deny(nonstandard_style)]
#![deny(missing_debug_implementations)]
#![deny(clippy::missing_errors_doc)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod active_liquidity;
pub mod aggregation;
pub mod config;
pub mod error;
pub mod liquidity_delta;
pub mod locked;
pub mod pipeline;
pub mod range;
pub mod simulation;
