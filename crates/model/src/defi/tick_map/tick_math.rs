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

//! Conversions between tick indices and Q64.96 sqrt prices.

use alloy_primitives::{U160, U256};

use crate::defi::tick_map::{full_math::checked_u160, tick::PoolTick};

/// The sqrt price at [`PoolTick::MIN_TICK`].
pub const MIN_SQRT_RATIO: U160 = U160::from_limbs([4_295_128_739, 0, 0]);

/// The sqrt price at [`PoolTick::MAX_TICK`].
pub const MAX_SQRT_RATIO: U160 =
    U160::from_limbs([0x5d95_1d52_6398_8d26, 0xefd1_fc6a_5064_8849, 0xfffd_8963]);

/// sqrt(1.0001^-1) as Q128.128, used when bit 0 of the tick is set.
const RATIO_BIT_0: u128 = 0xfffc_b933_bd6f_ad37_aa2d_162d_1a59_4001;

/// sqrt(1.0001^-(2^i)) as Q128.128 for bits 1 through 19 of the absolute tick.
const RATIO_FACTORS: [u128; 19] = [
    0xfff9_7272_373d_4132_59a4_6990_580e_213a,
    0xfff2_e50f_5f65_6932_ef12_357c_f3c7_fdcc,
    0xffe5_caca_7e10_e4e6_1c36_24ea_a094_1cd0,
    0xffcb_9843_d60f_6159_c9db_5883_5c92_6644,
    0xff97_3b41_fa98_c081_472e_6896_dfb2_54c0,
    0xff2e_a164_66c9_6a38_43ec_78b3_26b5_2861,
    0xfe5d_ee04_6a99_a2a8_11c4_61f1_969c_3053,
    0xfcbe_86c7_900a_88ae_dcff_c83b_479a_a3a4,
    0xf987_a725_3ac4_1317_6f2b_074c_f781_5e54,
    0xf339_2b08_22b7_0005_940c_7a39_8e4b_70f3,
    0xe715_9475_a2c2_9b74_43b2_9c7f_a6e8_89d9,
    0xd097_f3bd_fd20_22b8_845a_d8f7_92aa_5825,
    0xa9f7_4646_2d87_0fdf_8a65_dc1f_90e0_61e5,
    0x70d8_69a1_56d2_a1b8_90bb_3df6_2baf_32f7,
    0x31be_135f_97d0_8fd9_8123_1505_542f_cfa6,
    0x09aa_508b_5b7a_84e1_c677_de54_f3e9_9bc9,
    0x005d_6af8_dedb_8119_6699_c329_225e_e604,
    0x0000_2216_e584_f5fa_1ea9_2604_1bed_fe98,
    0x0000_0000_048a_1703_91f7_dc42_444e_8fa2,
];

/// Calculates sqrt(1.0001^tick) * 2^96, rounded up.
///
/// # Errors
///
/// Returns an error if `tick` lies outside `[MIN_TICK, MAX_TICK]`.
pub fn get_sqrt_ratio_at_tick(tick: i32) -> anyhow::Result<U160> {
    let abs_tick = tick.unsigned_abs();
    anyhow::ensure!(
        abs_tick <= PoolTick::MAX_TICK.unsigned_abs(),
        "Tick {tick} is outside [{}, {}]",
        PoolTick::MIN_TICK,
        PoolTick::MAX_TICK
    );

    let mut ratio = if abs_tick & 0x1 == 0 {
        U256::from(1u8) << 128
    } else {
        U256::from(RATIO_BIT_0)
    };
    for (bit, factor) in RATIO_FACTORS.iter().enumerate() {
        if abs_tick & (0x2 << bit) != 0 {
            ratio = (ratio * U256::from(*factor)) >> 128;
        }
    }

    if tick > 0 {
        ratio = U256::MAX / ratio;
    }

    // Q128.128 to Q128.96, rounding up so the result never understates the price
    let round_up = !(ratio & U256::from(u32::MAX)).is_zero();
    let mut sqrt_price = ratio >> 32;
    if round_up {
        sqrt_price += U256::from(1u8);
    }
    checked_u160(sqrt_price)
}

/// Calculates the greatest tick whose sqrt ratio is less than or equal to `sqrt_price_x96`.
///
/// # Errors
///
/// Returns an error if the price lies outside `[MIN_SQRT_RATIO, MAX_SQRT_RATIO)`.
pub fn get_tick_at_sqrt_ratio(sqrt_price_x96: U160) -> anyhow::Result<i32> {
    anyhow::ensure!(
        sqrt_price_x96 >= MIN_SQRT_RATIO && sqrt_price_x96 < MAX_SQRT_RATIO,
        "Sqrt price {sqrt_price_x96} is outside [MIN_SQRT_RATIO, MAX_SQRT_RATIO)"
    );

    let mut low = PoolTick::MIN_TICK;
    let mut high = PoolTick::MAX_TICK;
    while low < high {
        let mid = low + (high - low + 1) / 2;
        if get_sqrt_ratio_at_tick(mid)? <= sqrt_price_x96 {
            low = mid;
        } else {
            high = mid - 1;
        }
    }
    Ok(low)
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
