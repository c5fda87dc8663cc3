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

//! Enumeration of the spacing-aligned tick indices to read for a price interval.

use depthbook_model::defi::tick_map::tick::PoolTick;

use crate::error::DepthError;

/// Checks that `[min_tick, max_tick]` with `tick_spacing` describes a readable range.
///
/// # Errors
///
/// Returns [`DepthError::InvalidConfig`] if the spacing is not positive or the bounds are
/// not strictly increasing.
pub fn validate_range(min_tick: i32, max_tick: i32, tick_spacing: i32) -> Result<(), DepthError> {
    if tick_spacing <= 0 {
        return Err(DepthError::InvalidConfig(format!(
            "tick spacing must be positive, was {tick_spacing}"
        )));
    }
    if min_tick >= max_tick {
        return Err(DepthError::InvalidConfig(format!(
            "min tick {min_tick} must be below max tick {max_tick}"
        )));
    }
    Ok(())
}

/// Returns every multiple of `tick_spacing` within `[min_tick, max_tick]`, ascending.
///
/// The lower bound is aligned up and the upper bound down to the spacing, and both are clipped
/// to the usable tick range. An invalid range yields an empty sequence.
#[must_use]
pub fn tick_range(min_tick: i32, max_tick: i32, tick_spacing: i32) -> Vec<i32> {
    if validate_range(min_tick, max_tick, tick_spacing).is_err() {
        return Vec::new();
    }

    let spacing = i64::from(tick_spacing);
    let lower = aligned_up(i64::from(min_tick), spacing)
        .max(i64::from(PoolTick::get_min_tick(tick_spacing)));
    let upper = aligned_down(i64::from(max_tick), spacing)
        .min(i64::from(PoolTick::get_max_tick(tick_spacing)));

    let mut ticks = Vec::new();
    let mut tick = lower;
    while tick <= upper {
        // Bounded by the usable tick range above
        if let Ok(value) = i32::try_from(tick) {
            ticks.push(value);
        }
        tick += spacing;
    }
    ticks
}

/// Returns the `(min_tick, max_tick)` bounds `ticks_each_side` spacings away from the tick
/// holding `current_tick`, clamped to the valid tick range.
///
/// Returns `None` when the tick spacing is not positive.
#[must_use]
pub fn bounds_around(
    current_tick: i32,
    ticks_each_side: u32,
    tick_spacing: i32,
) -> Option<(i32, i32)> {
    if tick_spacing <= 0 {
        return None;
    }
    let spacing = i64::from(tick_spacing);
    let active = aligned_down(i64::from(current_tick), spacing);
    let span = i64::from(ticks_each_side) * spacing;
    let clamp = |tick: i64| {
        i32::try_from(tick.clamp(i64::from(PoolTick::MIN_TICK), i64::from(PoolTick::MAX_TICK)))
            .unwrap_or(PoolTick::MAX_TICK)
    };
    Some((clamp(active - span), clamp(active + span)))
}

fn aligned_up(tick: i64, spacing: i64) -> i64 {
    let floor = aligned_down(tick, spacing);
    if floor == tick { floor } else { floor + spacing }
}

fn aligned_down(tick: i64, spacing: i64) -> i64 {
    tick.div_euclid(spacing) * spacing
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
