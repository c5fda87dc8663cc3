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

use std::io::Write;

use clap::Parser;
use depthbook_cli::opt::DepthbookCli;
use rstest::{fixture, rstest};
use tempfile::NamedTempFile;

const SNAPSHOT: &str = r#"{
    "pool": {
        "current_tick": 10,
        "current_liquidity": 1000000000000000000,
        "tick_spacing": 60,
        "fee_pips": 3000,
        "token0_decimals": 18,
        "token1_decimals": 18
    },
    "ticks": [
        {
            "value": -120,
            "liquidity_gross": 400000000000000000,
            "liquidity_net": 400000000000000000
        },
        {
            "value": 120,
            "liquidity_gross": 400000000000000000,
            "liquidity_net": -400000000000000000
        }
    ],
    "failed": [-60]
}"#;

#[fixture]
fn snapshot_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(SNAPSHOT.as_bytes()).unwrap();
    file
}

fn cli(file: &NamedTempFile, extra: &[&str]) -> DepthbookCli {
    let path = file.path().to_str().unwrap().to_string();
    let mut args = vec!["depthbook", "snapshot", "--file", path.as_str()];
    args.extend_from_slice(extra);
    DepthbookCli::try_parse_from(args).unwrap()
}

#[rstest]
#[case(&["--view", "full-curve"])]
#[case(&["--view", "order-book", "--ticks-around", "4"])]
#[case(&["--view", "cumulative", "--min-tick", "-240", "--max-tick", "240", "--json"])]
#[tokio::test]
async fn test_snapshot_views(snapshot_file: NamedTempFile, #[case] extra: &[&str]) {
    depthbook_cli::run(cli(&snapshot_file, extra)).await.unwrap();
}

#[rstest]
#[tokio::test]
async fn test_invalid_range_degrades_instead_of_failing(snapshot_file: NamedTempFile) {
    let opt = cli(&snapshot_file, &["--min-tick", "600", "--max-tick", "-600"]);
    depthbook_cli::run(opt).await.unwrap();
}

#[rstest]
#[tokio::test]
async fn test_missing_snapshot_fails() {
    let opt = DepthbookCli::try_parse_from([
        "depthbook",
        "snapshot",
        "--file",
        "/nonexistent/pool.json",
    ])
    .unwrap();
    assert!(depthbook_cli::run(opt).await.is_err());
}

#[rstest]
#[tokio::test]
async fn test_rpc_without_url_fails() {
    let opt = DepthbookCli::try_parse_from([
        "depthbook",
        "rpc",
        "--pool",
        "0x88e6a0c2ddd26feeb64f039a2c41296fcb3f5640",
        "--rpc-url",
        "",
    ])
    .unwrap();
    assert!(depthbook_cli::run(opt).await.is_err());
}
