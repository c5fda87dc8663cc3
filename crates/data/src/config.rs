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

use std::path::Path;

use depthbook_analysis::config::DepthConfig;
use serde::{Deserialize, Serialize};

/// Default number of calls batched into one Multicall3 request.
pub const DEFAULT_MULTICALL_CALLS_PER_RPC_REQUEST: u32 = 200;

/// Configuration for depth clients reading pools over JSON-RPC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepthClientConfig {
    /// The HTTP URL for the blockchain RPC endpoint.
    pub http_rpc_url: String,
    /// The maximum number of RPC requests allowed per second.
    pub rpc_requests_per_second: Option<u32>,
    /// The maximum number of Multicall calls per one RPC request.
    pub multicall_calls_per_rpc_request: u32,
    /// Block to read at, latest when unset.
    pub block: Option<u64>,
    /// Depth computation settings.
    pub depth: DepthConfig,
}

impl DepthClientConfig {
    /// Creates a new [`DepthClientConfig`] instance.
    #[must_use]
    pub fn new(
        http_rpc_url: String,
        rpc_requests_per_second: Option<u32>,
        multicall_calls_per_rpc_request: Option<u32>,
        block: Option<u64>,
        depth: Option<DepthConfig>,
    ) -> Self {
        Self {
            http_rpc_url,
            rpc_requests_per_second,
            multicall_calls_per_rpc_request: multicall_calls_per_rpc_request
                .unwrap_or(DEFAULT_MULTICALL_CALLS_PER_RPC_REQUEST),
            block,
            depth: depth.unwrap_or_default(),
        }
    }

    /// Parses a configuration from TOML, missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or the result does not validate.
    pub fn from_toml_str(toml: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(toml)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_toml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let toml = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config {}: {e}", path.display()))?;
        Self::from_toml_str(&toml)
    }

    /// Checks the batching and depth settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the multicall batch size is zero or the depth settings are invalid.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.multicall_calls_per_rpc_request > 0,
            "multicall_calls_per_rpc_request must be positive"
        );
        self.depth.validate()?;
        Ok(())
    }
}

impl Default for DepthClientConfig {
    fn default() -> Self {
        Self::new(String::new(), None, None, None, None)
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use depthbook_analysis::config::{DEFAULT_ORDER_BOOK_EPSILON, DepthView};
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_defaults() {
        let config =
            DepthClientConfig::new("http://localhost:8545".to_string(), None, None, None, None);

        assert_eq!(config.multicall_calls_per_rpc_request, DEFAULT_MULTICALL_CALLS_PER_RPC_REQUEST);
        assert_eq!(config.rpc_requests_per_second, None);
        assert_eq!(config.depth.order_book_epsilon, DEFAULT_ORDER_BOOK_EPSILON);
        assert!(config.validate().is_ok());
    }

    #[rstest]
    fn test_from_toml_str() {
        let config = DepthClientConfig::from_toml_str(
            r#"
            http_rpc_url = "https://rpc.example.org"
            rpc_requests_per_second = 10
            block = 19000000

            [depth]
            view = "order-book"
            order_book_epsilon = 0.001
            "#,
        )
        .unwrap();

        assert_eq!(config.http_rpc_url, "https://rpc.example.org");
        assert_eq!(config.rpc_requests_per_second, Some(10));
        assert_eq!(config.multicall_calls_per_rpc_request, 200);
        assert_eq!(config.block, Some(19_000_000));
        assert_eq!(config.depth.view, DepthView::OrderBook);
        assert_eq!(config.depth.order_book_epsilon, 0.001);
    }

    #[rstest]
    #[case("multicall_calls_per_rpc_request = 0")]
    #[case("[depth]\norder_book_epsilon = -1.0")]
    #[case("http_rpc_url = 5")]
    fn test_from_toml_str_invalid(#[case] toml: &str) {
        assert!(DepthClientConfig::from_toml_str(toml).is_err());
    }
}
