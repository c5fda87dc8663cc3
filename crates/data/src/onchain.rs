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

//! Tick source reading Uniswap V3 style pools over JSON-RPC.

use std::{str::FromStr, sync::Arc};

use alloy_primitives::Address;
use async_trait::async_trait;
use depthbook_model::defi::{PoolState, TickRead};

use crate::{
    config::DepthClientConfig,
    contracts::{erc20::Erc20Contract, uniswap_v3_pool::UniswapV3PoolContract},
    rpc::http::BlockchainHttpRpcClient,
    source::TickDataSource,
};

/// Reads pool state and ticks from a node, batching calls through Multicall3.
#[derive(Debug)]
pub struct RpcTickSource {
    pool_contract: UniswapV3PoolContract,
    erc20_contract: Erc20Contract,
    calls_per_request: usize,
    block: Option<u64>,
}

impl RpcTickSource {
    /// Creates a new [`RpcTickSource`] from the client configuration.
    #[must_use]
    pub fn new(config: &DepthClientConfig) -> Self {
        let client = Arc::new(BlockchainHttpRpcClient::new(
            config.http_rpc_url.clone(),
            config.rpc_requests_per_second,
        ));
        Self {
            pool_contract: UniswapV3PoolContract::new(client.clone()),
            erc20_contract: Erc20Contract::new(client),
            calls_per_request: config.multicall_calls_per_rpc_request.max(1) as usize,
            block: config.block,
        }
    }
}

/// Parses a pool identifier as a contract address.
///
/// # Errors
///
/// Returns an error if `pool` is not a hex encoded 20 byte address.
pub fn parse_pool_address(pool: &str) -> anyhow::Result<Address> {
    Address::from_str(pool.trim())
        .map_err(|e| anyhow::anyhow!("Invalid pool address '{pool}': {e}"))
}

fn failed_chunk(ticks: &[i32], reason: &str) -> Vec<TickRead> {
    ticks
        .iter()
        .map(|&tick| TickRead::Failure {
            tick,
            reason: reason.to_string(),
        })
        .collect()
}

#[async_trait]
impl TickDataSource for RpcTickSource {
    async fn read_pool_state(&self, pool: &str) -> anyhow::Result<PoolState> {
        let address = parse_pool_address(pool)?;
        let state = self.pool_contract.get_global_state(&address, self.block).await?;
        let decimals = self
            .erc20_contract
            .batch_fetch_decimals(&[state.token0, state.token1], self.block)
            .await?;
        let [token0_decimals, token1_decimals] = decimals[..] else {
            anyhow::bail!("Expected decimals for 2 tokens, got {}", decimals.len());
        };

        tracing::info!(
            pool = %address,
            tick = state.tick,
            liquidity = state.liquidity,
            tick_spacing = state.tick_spacing,
            fee = state.fee,
            "Read pool state"
        );
        Ok(PoolState::new(
            state.tick,
            state.liquidity,
            state.tick_spacing,
            state.fee,
            token0_decimals,
            token1_decimals,
        ))
    }

    async fn read_ticks(&self, pool: &str, ticks: &[i32]) -> anyhow::Result<Vec<TickRead>> {
        let address = parse_pool_address(pool)?;
        let mut reads = Vec::with_capacity(ticks.len());

        for chunk in ticks.chunks(self.calls_per_request) {
            match self.pool_contract.batch_get_ticks(&address, chunk, self.block).await {
                Ok(chunk_reads) => reads.extend(chunk_reads),
                Err(e) => {
                    tracing::warn!(
                        pool = %address,
                        from = ?chunk.first(),
                        to = ?chunk.last(),
                        error = %e,
                        "Tick batch failed"
                    );
                    reads.extend(failed_chunk(chunk, &e.to_string()));
                }
            }
        }

        tracing::debug!(pool = %address, requested = ticks.len(), "Read ticks");
        Ok(reads)
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
