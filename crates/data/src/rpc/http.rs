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

use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio::{sync::Mutex, time::Instant};

use crate::rpc::{error::RpcClientError, types::RpcNodeHttpResponse};

/// Largest slice of an unparsable response echoed back in errors.
const RESPONSE_PREVIEW_LEN: usize = 500;

/// Spaces requests evenly so that at most a fixed number start per second.
#[derive(Debug)]
pub struct RequestThrottle {
    interval: Duration,
    next_slot: Mutex<Instant>,
}

impl RequestThrottle {
    /// Creates a throttle admitting `requests_per_second` requests, or `None` when zero.
    #[must_use]
    pub fn per_second(requests_per_second: u32) -> Option<Self> {
        if requests_per_second == 0 {
            return None;
        }
        Some(Self {
            interval: Duration::from_secs(1) / requests_per_second,
            next_slot: Mutex::new(Instant::now()),
        })
    }

    /// Returns the spacing between two requests.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Waits until the next request slot is available.
    pub async fn acquire(&self) {
        let slot = {
            let mut next_slot = self.next_slot.lock().await;
            let slot = (*next_slot).max(Instant::now());
            *next_slot = slot + self.interval;
            slot
        };
        tokio::time::sleep_until(slot).await;
    }
}

/// Client for making HTTP-based JSON-RPC requests to EVM nodes.
#[derive(Debug)]
pub struct BlockchainHttpRpcClient {
    /// The HTTP URL for the node's RPC endpoint.
    http_rpc_url: String,
    /// The HTTP client for making RPC http-based requests.
    http_client: reqwest::Client,
    /// Optional request rate limit.
    throttle: Option<RequestThrottle>,
}

impl BlockchainHttpRpcClient {
    /// Creates a new HTTP RPC client with the given endpoint URL and optional rate limit.
    ///
    /// A rate limit of zero disables throttling.
    #[must_use]
    pub fn new(http_rpc_url: String, rpc_requests_per_second: Option<u32>) -> Self {
        Self {
            http_rpc_url,
            http_client: reqwest::Client::new(),
            throttle: rpc_requests_per_second.and_then(RequestThrottle::per_second),
        }
    }

    /// Returns the endpoint URL.
    #[must_use]
    pub fn http_rpc_url(&self) -> &str {
        &self.http_rpc_url
    }

    async fn send_rpc_request(
        &self,
        rpc_request: &serde_json::Value,
    ) -> Result<Vec<u8>, RpcClientError> {
        if let Some(throttle) = &self.throttle {
            throttle.acquire().await;
        }

        let response = self
            .http_client
            .post(&self.http_rpc_url)
            .json(rpc_request)
            .send()
            .await?;
        let body = response.bytes().await?;
        Ok(body.to_vec())
    }

    /// Executes an Ethereum JSON-RPC call and deserializes the result into `T`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the node returns an error object or the response
    /// cannot be parsed.
    pub async fn execute_eth_call<T: DeserializeOwned>(
        &self,
        rpc_request: &serde_json::Value,
    ) -> Result<T, RpcClientError> {
        let bytes = self.send_rpc_request(rpc_request).await?;
        parse_rpc_response(&bytes)
    }

    /// Creates an `eth_call` JSON-RPC request object targeting `to` with encoded call data.
    #[must_use]
    pub fn construct_eth_call(
        &self,
        to: &str,
        call_data: &[u8],
        block: Option<u64>,
    ) -> serde_json::Value {
        let encoded_data = format!("0x{}", hex::encode(call_data));
        let call = serde_json::json!({
            "to": to,
            "data": encoded_data
        });

        let block_param = if let Some(block_number) = block {
            serde_json::json!(format!("0x{block_number:x}"))
        } else {
            serde_json::json!("latest")
        };

        serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "eth_call",
            "params": [call, block_param]
        })
    }
}

/// Parses a raw JSON-RPC response body.
///
/// # Errors
///
/// Returns [`RpcClientError::Rpc`] for error responses and [`RpcClientError::MessageParsing`]
/// if the body is not a valid response.
pub fn parse_rpc_response<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, RpcClientError> {
    match serde_json::from_slice::<RpcNodeHttpResponse<T>>(bytes) {
        Ok(parsed) => {
            if let Some(error) = parsed.error {
                Err(RpcClientError::Rpc {
                    code: error.code,
                    message: error.message,
                })
            } else if let Some(result) = parsed.result {
                Ok(result)
            } else {
                Err(RpcClientError::MessageParsing(
                    "Response missing both result and error fields".to_string(),
                ))
            }
        }
        Err(e) => {
            let raw_response = String::from_utf8_lossy(bytes);
            let preview: String = raw_response.chars().take(RESPONSE_PREVIEW_LEN).collect();
            let preview = if preview.len() < raw_response.len() {
                format!("{preview}... (truncated, {} bytes total)", raw_response.len())
            } else {
                preview
            };
            Err(RpcClientError::MessageParsing(format!(
                "Failed to parse eth call response: {e}\nRaw response: {preview}"
            )))
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_construct_eth_call() {
        let client = BlockchainHttpRpcClient::new("http://localhost:8545".to_string(), None);

        let request = client.construct_eth_call("0xabc", &[0x3e, 0x59, 0x2b, 0x1c], Some(255));

        assert_eq!(
            request,
            serde_json::json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "eth_call",
                "params": [{"to": "0xabc", "data": "0x3e592b1c"}, "0xff"]
            })
        );
        let latest = client.construct_eth_call("0xabc", &[], None);
        assert_eq!(latest["params"][1], "latest");
    }

    #[rstest]
    fn test_parse_result() {
        let value: String =
            parse_rpc_response(br#"{"jsonrpc":"2.0","id":1,"result":"0x01"}"#).unwrap();
        assert_eq!(value, "0x01");
    }

    #[rstest]
    fn test_parse_error_object() {
        let error = parse_rpc_response::<String>(
            br#"{"jsonrpc":"2.0","id":1,"error":{"code":-32000,"message":"execution reverted"}}"#,
        )
        .unwrap_err();
        assert!(matches!(error, RpcClientError::Rpc { code: -32000, .. }));
        assert_eq!(error.to_string(), "RPC error -32000: execution reverted");
    }

    #[rstest]
    #[case(br#"{"jsonrpc":"2.0","id":1}"#.as_slice())]
    #[case(b"<html>bad gateway</html>".as_slice())]
    fn test_parse_invalid_response(#[case] body: &[u8]) {
        let error = parse_rpc_response::<String>(body).unwrap_err();
        assert!(matches!(error, RpcClientError::MessageParsing(_)));
    }

    #[derive(Debug, serde::Deserialize)]
    struct BlockHeader {
        number: u64,
    }

    #[rstest]
    fn test_parse_result_without_default() {
        let header: BlockHeader =
            parse_rpc_response(br#"{"jsonrpc":"2.0","id":1,"result":{"number":7}}"#).unwrap();
        assert_eq!(header.number, 7);

        let error = parse_rpc_response::<BlockHeader>(br#"{"jsonrpc":"2.0","id":1}"#).unwrap_err();
        assert!(matches!(error, RpcClientError::MessageParsing(_)));
    }

    #[rstest]
    fn test_throttle_interval() {
        assert!(RequestThrottle::per_second(0).is_none());
        let throttle = RequestThrottle::per_second(4).unwrap();
        assert_eq!(throttle.interval(), Duration::from_millis(250));
    }

    #[tokio::test]
    async fn test_throttle_spaces_requests() {
        let throttle = RequestThrottle::per_second(20).unwrap();
        let start = Instant::now();
        for _ in 0..3 {
            throttle.acquire().await;
        }
        assert!(start.elapsed() >= Duration::from_millis(100));
    }
}
