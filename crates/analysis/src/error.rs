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

//! Errors and non-fatal warnings raised while reconstructing depth.

use std::fmt::Display;

use depthbook_model::defi::tick_map::liquidity_math::LiquidityMathError;
use serde::{Deserialize, Serialize};

/// A failure that invalidates a single depth computation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DepthError {
    /// The pool parameters or the requested range cannot be processed.
    #[error("Invalid depth configuration: {0}")]
    InvalidConfig(String),
    /// Crossing a tick would drive active liquidity below zero, the tick data is malformed.
    #[error("Negative active liquidity at tick {tick}: {liquidity} crossed with net {net}")]
    NegativeLiquidity { tick: i32, liquidity: u128, net: i128 },
    /// Crossing a tick would push active liquidity beyond 128 bits.
    #[error("Active liquidity overflow at tick {tick}: {liquidity} crossed with net {net}")]
    LiquidityOverflow { tick: i32, liquidity: u128, net: i128 },
}

impl DepthError {
    pub(crate) fn from_liquidity_math(tick: i32, error: LiquidityMathError) -> Self {
        match error {
            LiquidityMathError::Underflow { x, y } => Self::NegativeLiquidity {
                tick,
                liquidity: x,
                net: y,
            },
            LiquidityMathError::Overflow { x, y } => Self::LiquidityOverflow {
                tick,
                liquidity: x,
                net: y,
            },
        }
    }
}

/// A degraded condition that still produced a usable result.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepthWarning {
    /// The configuration was rejected and an empty result returned.
    InvalidConfig { reason: String },
    /// Some tick reads failed and were treated as uninitialized.
    PartialFetch { failed: Vec<i32> },
    /// The active tick was not read, the nearest read tick anchors the walk instead.
    ReferenceTickSubstituted { expected: i32, substitute: i32 },
    /// Locked amounts for the tick defaulted to zero.
    SimulationFailed { tick: i32, reason: String },
    /// No tick in the requested range was read.
    NoTicksFetched,
}

impl Display for DepthWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidConfig { reason } => write!(f, "Invalid configuration: {reason}"),
            Self::PartialFetch { failed } => {
                write!(f, "{} tick read(s) failed: {failed:?}", failed.len())
            }
            Self::ReferenceTickSubstituted {
                expected,
                substitute,
            } => write!(
                f,
                "Active tick {expected} was not read, using tick {substitute} as reference"
            ),
            Self::SimulationFailed { tick, reason } => {
                write!(f, "Locked amount simulation failed at tick {tick}: {reason}")
            }
            Self::NoTicksFetched => write!(f, "No ticks were read in the requested range"),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
