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

use alloy_primitives::{Address, address};
use alloy_sol_types::{SolCall, sol};

use crate::rpc::{error::RpcClientError, http::BlockchainHttpRpcClient};

sol! {
    contract Multicall3 {
        struct Call {
            address target;
            bytes callData;
        }

        struct Result {
            bool success;
            bytes returnData;
        }

        function tryAggregate(bool requireSuccess, Call[] calldata calls)
            external
            payable
            returns (Result[] memory returnData);
    }
}

/// Standard Multicall3 address (same on all EVM chains).
pub const MULTICALL3_ADDRESS: Address = address!("0xcA11bde05977b3631167028862bE2a173976CA11");

/// Common call execution shared by the contract wrappers.
#[derive(Debug)]
pub struct BaseContract {
    /// The HTTP RPC client used to communicate with the node.
    client: Arc<BlockchainHttpRpcClient>,
    /// The Multicall3 contract address.
    multicall_address: Address,
}

/// Represents a single contract call for batching in a multicall.
#[derive(Debug, Clone)]
pub struct ContractCall {
    /// The target contract address.
    pub target: Address,
    /// The encoded call data.
    pub call_data: Vec<u8>,
}

impl ContractCall {
    /// Creates a new [`ContractCall`] encoding `call` for `target`.
    pub fn new(target: Address, call: &impl SolCall) -> Self {
        Self {
            target,
            call_data: call.abi_encode(),
        }
    }
}

impl BaseContract {
    /// Creates a new base contract interface with the specified RPC client.
    #[must_use]
    pub fn new(client: Arc<BlockchainHttpRpcClient>) -> Self {
        Self {
            client,
            multicall_address: MULTICALL3_ADDRESS,
        }
    }

    /// Gets a reference to the RPC client.
    #[must_use]
    pub const fn client(&self) -> &Arc<BlockchainHttpRpcClient> {
        &self.client
    }

    /// Executes a single contract call and returns the raw response bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the RPC call fails or response decoding fails.
    pub async fn execute_call(
        &self,
        contract_address: &Address,
        call_data: &[u8],
        block: Option<u64>,
    ) -> Result<Vec<u8>, RpcClientError> {
        let rpc_request = self
            .client
            .construct_eth_call(&contract_address.to_string(), call_data, block);
        let encoded_response = self.client.execute_eth_call::<String>(&rpc_request).await?;
        decode_hex_response(&encoded_response)
    }

    /// Executes calls through Multicall3 `tryAggregate(false, ...)`, so that every call reports
    /// its own success.
    ///
    /// # Errors
    ///
    /// Returns an error if the multicall itself fails or its result cannot be decoded.
    pub async fn execute_multicall(
        &self,
        calls: Vec<ContractCall>,
        block: Option<u64>,
    ) -> Result<Vec<Multicall3::Result>, RpcClientError> {
        let expected = calls.len();
        let multicall_data = encode_multicall(calls);
        let rpc_request = self.client.construct_eth_call(
            &self.multicall_address.to_string(),
            &multicall_data,
            block,
        );

        let encoded_response = self.client.execute_eth_call::<String>(&rpc_request).await?;
        let bytes = decode_hex_response(&encoded_response)?;
        let results = decode_multicall(&bytes)?;
        if results.len() != expected {
            return Err(RpcClientError::AbiDecoding(format!(
                "Expected {expected} multicall results, got {}",
                results.len()
            )));
        }
        Ok(results)
    }
}

/// Encodes `calls` as a non-reverting Multicall3 `tryAggregate` call.
#[must_use]
pub fn encode_multicall(calls: Vec<ContractCall>) -> Vec<u8> {
    let calls = calls
        .into_iter()
        .map(|call| Multicall3::Call {
            target: call.target,
            callData: call.call_data.into(),
        })
        .collect();
    Multicall3::tryAggregateCall {
        requireSuccess: false,
        calls,
    }
    .abi_encode()
}

/// Decodes the return data of a Multicall3 `tryAggregate` call.
///
/// # Errors
///
/// Returns [`RpcClientError::AbiDecoding`] if the data is not a valid result array.
pub fn decode_multicall(bytes: &[u8]) -> Result<Vec<Multicall3::Result>, RpcClientError> {
    Multicall3::tryAggregateCall::abi_decode_returns(bytes).map_err(|e| {
        RpcClientError::AbiDecoding(format!("Failed to decode multicall results: {e}"))
    })
}

/// Decodes a hexadecimal string response from an RPC call.
///
/// # Errors
///
/// Returns [`RpcClientError::AbiDecoding`] if the hex decoding fails.
pub fn decode_hex_response(encoded_response: &str) -> Result<Vec<u8>, RpcClientError> {
    let encoded_str = encoded_response
        .strip_prefix("0x")
        .unwrap_or(encoded_response);
    hex::decode(encoded_str)
        .map_err(|e| RpcClientError::AbiDecoding(format!("Error decoding hex response: {e}")))
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use alloy_sol_types::SolValue;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("0x0a0b", vec![10, 11])]
    #[case("ff", vec![255])]
    #[case("0x", vec![])]
    fn test_decode_hex_response(#[case] input: &str, #[case] expected: Vec<u8>) {
        assert_eq!(decode_hex_response(input).unwrap(), expected);
    }

    #[rstest]
    fn test_decode_hex_response_invalid() {
        assert!(matches!(
            decode_hex_response("0xzz"),
            Err(RpcClientError::AbiDecoding(_))
        ));
    }

    #[rstest]
    fn test_multicall_encoding_uses_try_aggregate() {
        let target = Address::repeat_byte(0x11);
        let data = encode_multicall(vec![ContractCall {
            target,
            call_data: vec![1, 2, 3],
        }]);

        assert_eq!(&data[..4], Multicall3::tryAggregateCall::SELECTOR.as_slice());
        let decoded = Multicall3::tryAggregateCall::abi_decode(&data).unwrap();
        assert!(!decoded.requireSuccess);
        assert_eq!(decoded.calls[0].target, target);
        assert_eq!(&decoded.calls[0].callData[..], &[1u8, 2, 3]);
    }

    #[rstest]
    fn test_decode_multicall_results() {
        let results = vec![
            Multicall3::Result {
                success: true,
                returnData: vec![0xaa].into(),
            },
            Multicall3::Result {
                success: false,
                returnData: Vec::new().into(),
            },
        ];
        let encoded = (results,).abi_encode_params();

        let decoded = decode_multicall(&encoded).unwrap();

        assert_eq!(decoded.len(), 2);
        assert!(decoded[0].success);
        assert!(!decoded[1].success);
    }
}
