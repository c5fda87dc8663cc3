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

use std::sync::Arc;

use alloy_primitives::{Address, U160, aliases::I24};
use alloy_sol_types::{SolCall, sol};
use depthbook_model::defi::{PoolTick, TickRead};
use thiserror::Error;

use super::base::{BaseContract, ContractCall, Multicall3};
use crate::rpc::{error::RpcClientError, http::BlockchainHttpRpcClient};

sol! {
    contract UniswapV3Pool {
        /// Packed struct containing core pool state
        struct Slot0Data {
            uint160 sqrtPriceX96;
            int24 tick;
            uint16 observationIndex;
            uint16 observationCardinality;
            uint16 observationCardinalityNext;
            uint8 feeProtocol;
            bool unlocked;
        }

        /// Tick information
        struct TickInfo {
            uint128 liquidityGross;
            int128 liquidityNet;
            uint256 feeGrowthOutside0X128;
            uint256 feeGrowthOutside1X128;
            int56 tickCumulativeOutside;
            uint160 secondsPerLiquidityOutsideX128;
            uint32 secondsOutside;
            bool initialized;
        }

        function slot0() external view returns (Slot0Data memory);
        function liquidity() external view returns (uint128);
        function fee() external view returns (uint24);
        function tickSpacing() external view returns (int24);
        function token0() external view returns (address);
        function token1() external view returns (address);
        function ticks(int24 tick) external view returns (TickInfo memory);
    }
}

/// Represents errors that can occur when interacting with a UniswapV3Pool contract.
#[derive(Debug, Error)]
pub enum PoolContractError {
    #[error("RPC error: {0}")]
    Rpc(#[from] RpcClientError),
    #[error("Failed to decode {field} for pool {pool}: {reason} (raw data: {raw_data})")]
    Decoding {
        field: String,
        pool: Address,
        reason: String,
        raw_data: String,
    },
    #[error("Call failed for {field} at pool {pool}: {reason}")]
    CallFailed {
        field: String,
        pool: Address,
        reason: String,
    },
}

/// Global pool state read from slot0 and the immutable pool parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolGlobalState {
    /// Current sqrt price in Q64.96.
    pub sqrt_price_x96: U160,
    /// Current tick.
    pub tick: i32,
    /// Liquidity active at the current price.
    pub liquidity: u128,
    /// Swap fee in pips.
    pub fee: u32,
    /// Spacing between usable ticks.
    pub tick_spacing: i32,
    /// Address of token0.
    pub token0: Address,
    /// Address of token1.
    pub token1: Address,
}

/// Interface for reading UniswapV3Pool contracts.
#[derive(Debug)]
pub struct UniswapV3PoolContract {
    /// The base contract providing common RPC execution functionality.
    base: BaseContract,
}

impl UniswapV3PoolContract {
    /// Creates a new UniswapV3Pool contract interface with the specified RPC client.
    #[must_use]
    pub fn new(client: Arc<BlockchainHttpRpcClient>) -> Self {
        Self {
            base: BaseContract::new(client),
        }
    }

    /// Gets the global pool state in a single multicall.
    ///
    /// # Errors
    ///
    /// Returns an error if the multicall fails, any call reverts or any decoding fails.
    pub async fn get_global_state(
        &self,
        pool: &Address,
        block: Option<u64>,
    ) -> Result<PoolGlobalState, PoolContractError> {
        let calls = vec![
            ContractCall::new(*pool, &UniswapV3Pool::slot0Call {}),
            ContractCall::new(*pool, &UniswapV3Pool::liquidityCall {}),
            ContractCall::new(*pool, &UniswapV3Pool::feeCall {}),
            ContractCall::new(*pool, &UniswapV3Pool::tickSpacingCall {}),
            ContractCall::new(*pool, &UniswapV3Pool::token0Call {}),
            ContractCall::new(*pool, &UniswapV3Pool::token1Call {}),
        ];
        let results = self.base.execute_multicall(calls, block).await?;
        decode_global_state(pool, &results)
    }

    /// Reads `ticks(int24)` for every index in a single multicall.
    ///
    /// Each index reports its own outcome, a reverted or undecodable call becomes a
    /// [`TickRead::Failure`].
    ///
    /// # Errors
    ///
    /// Returns an error if the multicall request itself fails.
    pub async fn batch_get_ticks(
        &self,
        pool: &Address,
        ticks: &[i32],
        block: Option<u64>,
    ) -> Result<Vec<TickRead>, PoolContractError> {
        let calls: Vec<ContractCall> = ticks
            .iter()
            .filter_map(|&tick| I24::try_from(tick).ok())
            .map(|tick| ContractCall::new(*pool, &UniswapV3Pool::ticksCall { tick }))
            .collect();
        let mut results = self.base.execute_multicall(calls, block).await?.into_iter();

        Ok(ticks
            .iter()
            .map(|&tick| {
                if I24::try_from(tick).is_err() {
                    return TickRead::Failure {
                        tick,
                        reason: format!("Tick {tick} out of range for int24"),
                    };
                }
                match results.next() {
                    Some(result) => decode_tick_result(tick, &result),
                    None => TickRead::Failure {
                        tick,
                        reason: "missing multicall result".to_string(),
                    },
                }
            })
            .collect())
    }
}

fn decode_result<C: SolCall>(
    pool: &Address,
    field: &str,
    result: &Multicall3::Result,
) -> Result<C::Return, PoolContractError> {
    if !result.success {
        return Err(PoolContractError::CallFailed {
            field: field.to_string(),
            pool: *pool,
            reason: "call reverted".to_string(),
        });
    }
    C::abi_decode_returns_validate(&result.returnData).map_err(|e| PoolContractError::Decoding {
        field: field.to_string(),
        pool: *pool,
        reason: e.to_string(),
        raw_data: hex::encode(&result.returnData),
    })
}

/// Decodes the results of the global state multicall.
///
/// # Errors
///
/// Returns an error if the result count is wrong or any result fails or cannot be decoded.
pub fn decode_global_state(
    pool: &Address,
    results: &[Multicall3::Result],
) -> Result<PoolGlobalState, PoolContractError> {
    let [slot0, liquidity, fee, tick_spacing, token0, token1] = results else {
        return Err(PoolContractError::CallFailed {
            field: "global_state_multicall".to_string(),
            pool: *pool,
            reason: format!("Expected 6 results, got {}", results.len()),
        });
    };

    let slot0 = decode_result::<UniswapV3Pool::slot0Call>(pool, "slot0", slot0)?;
    let fee = decode_result::<UniswapV3Pool::feeCall>(pool, "fee", fee)?;
    let tick_spacing =
        decode_result::<UniswapV3Pool::tickSpacingCall>(pool, "tickSpacing", tick_spacing)?;

    Ok(PoolGlobalState {
        sqrt_price_x96: slot0.sqrtPriceX96,
        tick: slot0.tick.as_i32(),
        liquidity: decode_result::<UniswapV3Pool::liquidityCall>(pool, "liquidity", liquidity)?,
        fee: fee.to::<u32>(),
        tick_spacing: tick_spacing.as_i32(),
        token0: decode_result::<UniswapV3Pool::token0Call>(pool, "token0", token0)?,
        token1: decode_result::<UniswapV3Pool::token1Call>(pool, "token1", token1)?,
    })
}

/// Turns one `ticks(int24)` multicall result into a [`TickRead`].
#[must_use]
pub fn decode_tick_result(tick: i32, result: &Multicall3::Result) -> TickRead {
    if !result.success {
        return TickRead::Failure {
            tick,
            reason: "ticks call reverted".to_string(),
        };
    }
    match UniswapV3Pool::ticksCall::abi_decode_returns_validate(&result.returnData) {
        Ok(info) => TickRead::Success(PoolTick {
            value: tick,
            liquidity_gross: info.liquidityGross,
            liquidity_net: info.liquidityNet,
            initialized: info.initialized,
        }),
        Err(e) => TickRead::Failure {
            tick,
            reason: format!("Failed to decode ticks({tick}): {e}"),
        },
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use alloy_primitives::{U256, aliases::U24};
    use rstest::rstest;

    use super::*;

    fn ok(data: Vec<u8>) -> Multicall3::Result {
        Multicall3::Result {
            success: true,
            returnData: data.into(),
        }
    }

    fn tick_info(gross: u128, net: i128) -> UniswapV3Pool::TickInfo {
        UniswapV3Pool::TickInfo {
            liquidityGross: gross,
            liquidityNet: net,
            feeGrowthOutside0X128: U256::ZERO,
            feeGrowthOutside1X128: U256::ZERO,
            tickCumulativeOutside: Default::default(),
            secondsPerLiquidityOutsideX128: U160::ZERO,
            secondsOutside: 0,
            initialized: gross > 0,
        }
    }

    #[rstest]
    fn test_decode_tick_result_success() {
        let result = ok(UniswapV3Pool::ticksCall::abi_encode_returns(&tick_info(500, -500)));

        let read = decode_tick_result(-60, &result);

        assert_eq!(read, TickRead::Success(PoolTick::new(-60, 500, -500)));
    }

    #[rstest]
    fn test_decode_tick_result_reverted() {
        let result = Multicall3::Result {
            success: false,
            returnData: Vec::new().into(),
        };
        assert!(matches!(decode_tick_result(60, &result), TickRead::Failure { tick: 60, .. }));
    }

    #[rstest]
    fn test_decode_tick_result_garbage() {
        assert!(matches!(
            decode_tick_result(60, &ok(vec![1, 2, 3])),
            TickRead::Failure { tick: 60, .. }
        ));
    }

    #[rstest]
    fn test_decode_tick_result_dirty_gross_word() {
        // liquidityGross is a uint128, so the high bytes of its word must be zero
        let mut data = UniswapV3Pool::ticksCall::abi_encode_returns(&tick_info(500, -500));
        data[0] = 0xff;

        assert!(matches!(
            decode_tick_result(60, &ok(data)),
            TickRead::Failure { tick: 60, .. }
        ));
    }

    #[rstest]
    fn test_decode_global_state() {
        let pool = Address::repeat_byte(0x01);
        let token0 = Address::repeat_byte(0xaa);
        let token1 = Address::repeat_byte(0xbb);
        let slot0 = UniswapV3Pool::Slot0Data {
            sqrtPriceX96: U160::from(1u128 << 96),
            tick: I24::try_from(-12).unwrap(),
            observationIndex: 0,
            observationCardinality: 1,
            observationCardinalityNext: 1,
            feeProtocol: 0,
            unlocked: true,
        };
        let results = vec![
            ok(UniswapV3Pool::slot0Call::abi_encode_returns(&slot0)),
            ok(UniswapV3Pool::liquidityCall::abi_encode_returns(&1_000_000u128)),
            ok(UniswapV3Pool::feeCall::abi_encode_returns(&U24::from(3000))),
            ok(UniswapV3Pool::tickSpacingCall::abi_encode_returns(
                &I24::try_from(60).unwrap(),
            )),
            ok(UniswapV3Pool::token0Call::abi_encode_returns(&token0)),
            ok(UniswapV3Pool::token1Call::abi_encode_returns(&token1)),
        ];

        let state = decode_global_state(&pool, &results).unwrap();

        assert_eq!(
            state,
            PoolGlobalState {
                sqrt_price_x96: U160::from(1u128 << 96),
                tick: -12,
                liquidity: 1_000_000,
                fee: 3000,
                tick_spacing: 60,
                token0,
                token1,
            }
        );
    }

    #[rstest]
    fn test_decode_global_state_wrong_count() {
        let pool = Address::repeat_byte(0x01);
        assert!(matches!(
            decode_global_state(&pool, &[]),
            Err(PoolContractError::CallFailed { .. })
        ));
    }

    #[rstest]
    fn test_decode_global_state_tick_spacing_out_of_range() {
        let pool = Address::repeat_byte(0x01);
        let mut results: Vec<_> = (0..6).map(|_| ok(Vec::new())).collect();
        let slot0 = UniswapV3Pool::Slot0Data {
            sqrtPriceX96: U160::from(1u128 << 96),
            tick: I24::ZERO,
            observationIndex: 0,
            observationCardinality: 1,
            observationCardinalityNext: 1,
            feeProtocol: 0,
            unlocked: true,
        };
        results[0] = ok(UniswapV3Pool::slot0Call::abi_encode_returns(&slot0));
        results[2] = ok(UniswapV3Pool::feeCall::abi_encode_returns(&U24::from(3000)));
        // 2^24 + 60 is not a sign-extended int24
        let mut spacing = vec![0u8; 32];
        spacing[28] = 1;
        spacing[31] = 60;
        results[3] = ok(spacing);

        assert!(matches!(
            decode_global_state(&pool, &results),
            Err(PoolContractError::Decoding { field, .. }) if field == "tickSpacing"
        ));
    }

    #[rstest]
    fn test_decode_global_state_reverted_call() {
        let pool = Address::repeat_byte(0x01);
        let mut results: Vec<_> = (0..6).map(|_| ok(Vec::new())).collect();
        results[0].success = false;
        assert!(matches!(
            decode_global_state(&pool, &results),
            Err(PoolContractError::CallFailed { field, .. }) if field == "slot0"
        ));
    }
}
