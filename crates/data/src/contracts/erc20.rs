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

use alloy_primitives::Address;
use alloy_sol_types::{SolCall, sol};

use super::base::{BaseContract, ContractCall, Multicall3};
use crate::rpc::{error::RpcClientError, http::BlockchainHttpRpcClient};

sol! {
    contract ERC20 {
        function decimals() external view returns (uint8);
    }
}

/// Represents errors that can occur when reading ERC20 token metadata.
#[derive(Debug, thiserror::Error)]
pub enum Erc20ContractError {
    #[error("RPC error: {0}")]
    Rpc(#[from] RpcClientError),
    #[error("Call to decimals() failed for token {0}")]
    CallFailed(Address),
    #[error("Failed to decode decimals() for token {token}: {reason}")]
    Decoding { token: Address, reason: String },
}

/// Interface for reading ERC20 token contracts.
#[derive(Debug)]
pub struct Erc20Contract {
    base: BaseContract,
}

impl Erc20Contract {
    /// Creates a new ERC20 contract interface with the specified RPC client.
    #[must_use]
    pub fn new(client: Arc<BlockchainHttpRpcClient>) -> Self {
        Self {
            base: BaseContract::new(client),
        }
    }

    /// Fetches the decimals of several tokens in one multicall, in input order.
    ///
    /// # Errors
    ///
    /// Returns an error if the multicall fails or any token does not answer `decimals()`.
    pub async fn batch_fetch_decimals(
        &self,
        tokens: &[Address],
        block: Option<u64>,
    ) -> Result<Vec<u8>, Erc20ContractError> {
        let calls = tokens
            .iter()
            .map(|token| ContractCall::new(*token, &ERC20::decimalsCall {}))
            .collect();
        let results = self.base.execute_multicall(calls, block).await?;
        tokens
            .iter()
            .zip(&results)
            .map(|(token, result)| decode_decimals(token, result))
            .collect()
    }
}

/// Decodes a `decimals()` multicall result.
///
/// # Errors
///
/// Returns an error if the call reverted or returned something other than a `uint8`.
pub fn decode_decimals(
    token: &Address,
    result: &Multicall3::Result,
) -> Result<u8, Erc20ContractError> {
    if !result.success {
        return Err(Erc20ContractError::CallFailed(*token));
    }
    ERC20::decimalsCall::abi_decode_returns_validate(&result.returnData).map_err(|e| {
        Erc20ContractError::Decoding {
            token: *token,
            reason: e.to_string(),
        }
    })
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(6)]
    #[case(18)]
    fn test_decode_decimals(#[case] decimals: u8) {
        let result = Multicall3::Result {
            success: true,
            returnData: ERC20::decimalsCall::abi_encode_returns(&decimals).into(),
        };
        assert_eq!(decode_decimals(&Address::ZERO, &result).unwrap(), decimals);
    }

    #[rstest]
    fn test_decode_decimals_reverted() {
        let result = Multicall3::Result {
            success: false,
            returnData: Vec::new().into(),
        };
        assert!(matches!(
            decode_decimals(&Address::ZERO, &result),
            Err(Erc20ContractError::CallFailed(_))
        ));
    }

    #[rstest]
    fn test_decode_decimals_out_of_range() {
        // A uint256 of 300 does not fit uint8
        let mut data = vec![0u8; 32];
        data[30] = 1;
        data[31] = 44;
        let result = Multicall3::Result {
            success: true,
            returnData: data.into(),
        };
        assert!(matches!(
            decode_decimals(&Address::ZERO, &result),
            Err(Erc20ContractError::Decoding { .. })
        ));
    }
}
