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

//! Versioned depth computation.
//!
//! Every call to [`DepthService::request`] takes the next generation number. A result is
//! published only while its generation is still the latest requested, so a slow computation
//! for an older request can never replace the result of a newer one.

use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use ahash::RandomState;
use depthbook_analysis::{
    aggregation::DepthOutput,
    config::DepthConfig,
    pipeline::{DepthPipeline, DepthReport, DepthRequest},
    range::bounds_around,
};
use depthbook_model::defi::{PoolState, TickRead};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, watch};

use crate::source::TickDataSource;

/// The tick interval to read, either fixed or relative to the current price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickWindow {
    /// Fixed inclusive bounds.
    Bounds { min_tick: i32, max_tick: i32 },
    /// A number of tick spacings on either side of the current tick.
    AroundCurrent { ticks_each_side: u32 },
}

impl TickWindow {
    /// Resolves the window to `(min_tick, max_tick)` for a pool state.
    #[must_use]
    pub fn resolve(&self, pool: &PoolState) -> (i32, i32) {
        match *self {
            Self::Bounds { min_tick, max_tick } => (min_tick, max_tick),
            Self::AroundCurrent { ticks_each_side } => {
                bounds_around(pool.current_tick, ticks_each_side, pool.tick_spacing)
                    // Degenerate bounds are rejected by the pipeline as a config error
                    .unwrap_or((pool.current_tick, pool.current_tick))
            }
        }
    }
}

/// A published depth result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepthUpdate {
    /// Generation of the request that produced this update.
    pub generation: u64,
    pub request: DepthRequest,
    pub report: Arc<DepthReport>,
    pub output: Arc<DepthOutput>,
}

#[derive(Debug)]
struct CachedDepth {
    input_hash: u64,
    request: DepthRequest,
    reads: Vec<TickRead>,
    report: Arc<DepthReport>,
    output: Arc<DepthOutput>,
}

impl CachedDepth {
    fn matches(&self, input_hash: u64, request: &DepthRequest, reads: &[TickRead]) -> bool {
        self.input_hash == input_hash && self.request == *request && self.reads == reads
    }
}

/// Reads pool data from a [`TickDataSource`] and publishes depth results in request order.
#[derive(Debug)]
pub struct DepthService<S> {
    source: Arc<S>,
    pipeline: DepthPipeline,
    generation: AtomicU64,
    sender: watch::Sender<Option<Arc<DepthUpdate>>>,
    cache: Mutex<Option<CachedDepth>>,
    hasher: RandomState,
}

impl<S: TickDataSource> DepthService<S> {
    /// Creates a new [`DepthService`] over `source`.
    #[must_use]
    pub fn new(source: Arc<S>, config: DepthConfig) -> Self {
        let (sender, _) = watch::channel(None);
        Self {
            source,
            pipeline: DepthPipeline::new(config),
            generation: AtomicU64::new(0),
            sender,
            cache: Mutex::new(None),
            hasher: RandomState::new(),
        }
    }

    /// Returns the tick source.
    #[must_use]
    pub const fn source(&self) -> &Arc<S> {
        &self.source
    }

    /// Returns the generation of the most recent request.
    #[must_use]
    pub fn latest_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Subscribes to published updates.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<DepthUpdate>>> {
        self.sender.subscribe()
    }

    /// Returns the most recently published update.
    #[must_use]
    pub fn latest(&self) -> Option<Arc<DepthUpdate>> {
        self.sender.borrow().clone()
    }

    fn is_stale(&self, generation: u64) -> bool {
        generation != self.latest_generation()
    }

    /// Reads the pool, computes depth for `window` and publishes the result.
    ///
    /// Returns `Ok(None)` when a newer request was made while this one was in flight; the
    /// result is then discarded.
    ///
    /// # Errors
    ///
    /// Returns an error if the source fails to read the pool state or ticks, or the tick data
    /// drives active liquidity negative.
    pub async fn request(
        &self,
        pool: &str,
        window: TickWindow,
    ) -> anyhow::Result<Option<Arc<DepthUpdate>>> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(generation, pool, ?window, "Depth requested");

        let state = self.source.read_pool_state(pool).await?;
        let (min_tick, max_tick) = window.resolve(&state);
        let request = DepthRequest::new(state, min_tick, max_tick);
        if self.is_stale(generation) {
            tracing::debug!(generation, "Discarding stale depth request after pool read");
            return Ok(None);
        }

        let reads = self.source.read_ticks(pool, &request.range()).await?;
        if self.is_stale(generation) {
            tracing::debug!(generation, "Discarding stale depth request after tick read");
            return Ok(None);
        }

        let (report, output) = self.compute(&request, reads).await?;
        let update = Arc::new(DepthUpdate {
            generation,
            request,
            report,
            output,
        });

        let published = self.sender.send_if_modified(|current| {
            let newer_published = current.as_ref().is_some_and(|c| c.generation > generation);
            if self.is_stale(generation) || newer_published {
                return false;
            }
            *current = Some(update.clone());
            true
        });

        if published {
            tracing::info!(
                generation,
                ticks = update.report.pool_data.ticks.len(),
                warnings = update.report.warnings.len(),
                "Published depth"
            );
            Ok(Some(update))
        } else {
            tracing::debug!(generation, "Discarding stale depth result");
            Ok(None)
        }
    }

    async fn compute(
        &self,
        request: &DepthRequest,
        reads: Vec<TickRead>,
    ) -> anyhow::Result<(Arc<DepthReport>, Arc<DepthOutput>)> {
        let input_hash = self.hasher.hash_one((request, &reads));

        let mut cache = self.cache.lock().await;
        if let Some(cached) = cache.as_ref().filter(|c| c.matches(input_hash, request, &reads)) {
            tracing::debug!(input_hash, "Reusing depth for unchanged input");
            return Ok((cached.report.clone(), cached.output.clone()));
        }

        let (report, output) = self.pipeline.compute_view(request, &reads)?;
        let report = Arc::new(report);
        let output = Arc::new(output);
        *cache = Some(CachedDepth {
            input_hash,
            request: *request,
            reads,
            report: report.clone(),
            output: output.clone(),
        });
        Ok((report, output))
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
