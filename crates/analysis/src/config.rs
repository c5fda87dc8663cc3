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
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::error::DepthError;

/// Default size below which order book levels are dropped.
pub const DEFAULT_ORDER_BOOK_EPSILON: f64 = 1e-9;

/// The shape depth is presented in.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    AsRefStr,
    Display,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive, serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum DepthView {
    /// Every tick with its locked amounts.
    #[default]
    FullCurve,
    /// Bids below and asks above the current price with running sizes.
    OrderBook,
    /// A single running sum extending outward from the current tick.
    Cumulative,
}

/// Configuration for depth aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepthConfig {
    /// Order book levels with a size at or below this value are dropped.
    pub order_book_epsilon: f64,
    /// The view produced by default.
    pub view: DepthView,
}

impl DepthConfig {
    /// Creates a new [`DepthConfig`] instance.
    #[must_use]
    pub fn new(order_book_epsilon: Option<f64>, view: Option<DepthView>) -> Self {
        Self {
            order_book_epsilon: order_book_epsilon.unwrap_or(DEFAULT_ORDER_BOOK_EPSILON),
            view: view.unwrap_or_default(),
        }
    }

    /// Checks the configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`DepthError::InvalidConfig`] if the epsilon is negative or not finite.
    pub fn validate(&self) -> Result<(), DepthError> {
        if !(self.order_book_epsilon.is_finite() && self.order_book_epsilon >= 0.0) {
            return Err(DepthError::InvalidConfig(format!(
                "order book epsilon must be finite and non-negative, was {}",
                self.order_book_epsilon
            )));
        }
        Ok(())
    }
}

impl Default for DepthConfig {
    fn default() -> Self {
        Self::new(None, None)
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
