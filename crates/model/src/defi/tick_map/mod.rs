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

use std::collections::BTreeMap;

use crate::defi::tick_map::tick::PoolTick;

pub mod full_math;
pub mod liquidity_math;
pub mod sqrt_price_math;
pub mod swap_math;
pub mod tick;
pub mod tick_math;

/// An ordered map of initialized ticks.
///
/// Only ticks referenced by at least one position are stored, so a missing entry always means
/// "no liquidity change at this index".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickMap {
    ticks: BTreeMap<i32, PoolTick>,
}

impl TickMap {
    /// Creates a new empty [`TickMap`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a map from the initialized ticks of `ticks`, later entries win on duplicates.
    pub fn from_ticks(ticks: impl IntoIterator<Item = PoolTick>) -> Self {
        let mut map = Self::new();
        for tick in ticks {
            map.insert(tick);
        }
        map
    }

    /// Inserts a tick, ignoring it if it is not initialized.
    pub fn insert(&mut self, tick: PoolTick) {
        if tick.is_initialized() {
            self.ticks.insert(tick.value, tick);
        }
    }

    /// Returns the net liquidity at `tick`, zero when the tick is not initialized.
    #[must_use]
    pub fn liquidity_net(&self, tick: i32) -> i128 {
        self.ticks.get(&tick).map_or(0, |t| t.liquidity_net)
    }

    /// Finds the next initialized tick from `tick`.
    ///
    /// When `lte` is set the search includes `tick` and moves down, otherwise it starts
    /// strictly above `tick` and moves up. Without a match the pool bound in that direction
    /// is returned together with `false`.
    #[must_use]
    pub fn next_initialized_tick(&self, tick: i32, lte: bool) -> (i32, bool) {
        if lte {
            self.ticks
                .range(..=tick)
                .next_back()
                .map_or((PoolTick::MIN_TICK, false), |(value, _)| (*value, true))
        } else {
            match tick.checked_add(1) {
                Some(start) => self
                    .ticks
                    .range(start..)
                    .next()
                    .map_or((PoolTick::MAX_TICK, false), |(value, _)| (*value, true)),
                None => (PoolTick::MAX_TICK, false),
            }
        }
    }

    /// Iterates over the initialized ticks in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &PoolTick> {
        self.ticks.values()
    }

    /// Returns the number of initialized ticks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    /// Returns true if no tick is initialized.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
