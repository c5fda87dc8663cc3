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

#![warn(rustc::all)]
#![deny(unsafe_code)]
#![deny(nonstandard_style)]
#![deny(missing_debug_implementations)]

pub mod opt;
pub mod render;

use std::{path::Path, sync::Arc};

use depthbook_analysis::config::DepthConfig;
use depthbook_data::{
    config::DepthClientConfig,
    onchain::RpcTickSource,
    service::{DepthService, DepthUpdate},
    snapshot::{PoolSnapshot, SnapshotSource},
    source::TickDataSource,
};

use crate::{
    opt::{Commands, DepthOpt, DepthbookCli},
    render::{render_output, render_warnings},
};

/// Runs the parsed command.
///
/// # Errors
///
/// Returns an error if the pool cannot be read, the configuration is invalid or the depth
/// computation fails.
pub async fn run(opt: DepthbookCli) -> anyhow::Result<()> {
    match opt.command {
        Commands::Snapshot { file, depth } => run_snapshot(&file, &depth).await,
        Commands::Rpc {
            pool,
            rpc_url,
            config,
            rpc_requests_per_second,
            multicall_calls_per_rpc_request,
            block,
            depth,
        } => {
            let mut client_config = match config {
                Some(path) => DepthClientConfig::from_toml_file(path)?,
                None => DepthClientConfig::default(),
            };
            if let Some(rpc_url) = rpc_url {
                client_config.http_rpc_url = rpc_url;
            }
            client_config.rpc_requests_per_second =
                rpc_requests_per_second.or(client_config.rpc_requests_per_second);
            client_config.multicall_calls_per_rpc_request = multicall_calls_per_rpc_request
                .unwrap_or(client_config.multicall_calls_per_rpc_request);
            client_config.block = block.or(client_config.block);
            client_config.depth = depth.apply(client_config.depth);
            client_config.validate()?;
            anyhow::ensure!(
                !client_config.http_rpc_url.is_empty(),
                "No RPC HTTP URL provided via --rpc-url, RPC_HTTP_URL or the config file"
            );

            tracing::info!(url = %client_config.http_rpc_url, %pool, "Reading pool over RPC");
            let source = RpcTickSource::new(&client_config);
            run_depth(source, &pool, client_config.depth, &depth).await
        }
    }
}

async fn run_snapshot(file: &Path, depth: &DepthOpt) -> anyhow::Result<()> {
    let snapshot = PoolSnapshot::load(file).await?;
    let pool = snapshot.address.clone().unwrap_or_default();
    let source = SnapshotSource::new(snapshot);
    run_depth(source, &pool, depth.apply(DepthConfig::default()), depth).await
}

async fn run_depth<S: TickDataSource>(
    source: S,
    pool: &str,
    config: DepthConfig,
    opt: &DepthOpt,
) -> anyhow::Result<()> {
    let service = DepthService::new(Arc::new(source), config);
    let update = service
        .request(pool, opt.window())
        .await?
        .ok_or_else(|| anyhow::anyhow!("Depth request for {pool} was superseded"))?;
    println!("{}", format_update(&update, opt)?);
    Ok(())
}

fn format_update(update: &DepthUpdate, opt: &DepthOpt) -> anyhow::Result<String> {
    if opt.json {
        return Ok(serde_json::to_string_pretty(update)?);
    }
    let mut rendered = render_output(&update.output, opt.levels);
    if update.report.is_degraded() {
        rendered.push('\n');
        rendered.push_str(&render_warnings(&update.report.warnings));
    }
    Ok(rendered)
}
