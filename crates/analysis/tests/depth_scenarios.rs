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

//! End-to-end depth reconstruction scenarios.

use depthbook_analysis::{
    aggregation::DepthAggregator,
    config::DepthConfig,
    error::DepthWarning,
    pipeline::{DepthPipeline, DepthRequest},
};
use depthbook_model::defi::{PoolState, PoolTick, TickRead};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

fn read(tick: i32, net: i128) -> TickRead {
    TickRead::Success(PoolTick::new(tick, net.unsigned_abs(), net))
}

fn failed(tick: i32) -> TickRead {
    TickRead::Failure {
        tick,
        reason: "rate limited".to_string(),
    }
}

fn active_liquidity(report: &depthbook_analysis::pipeline::DepthReport) -> Vec<(i32, u128)> {
    report
        .pool_data
        .ticks
        .iter()
        .map(|tick| (tick.tick(), tick.processed.liquidity_active))
        .collect()
}

#[rstest]
fn test_two_sided_crossings() {
    let pool = PoolState::new(0, 1000, 60, 3000, 0, 0);
    let request = DepthRequest::new(pool, -120, 120);
    let reads: Vec<_> = request
        .range()
        .into_iter()
        .map(|tick| match tick {
            -60 => read(-60, 500),
            60 => read(60, -200),
            tick => read(tick, 0),
        })
        .collect();

    let report = DepthPipeline::default().compute(&request, &reads).unwrap();

    assert!(report.warnings.is_empty());
    assert_eq!(
        active_liquidity(&report),
        vec![(-120, 500), (-60, 1000), (0, 1000), (60, 800), (120, 800)]
    );
    let current = report.pool_data.current_tick().unwrap();
    assert_eq!(current.tick(), 0);
    assert_eq!(current.processed.liquidity_active, 1000);
}

#[rstest]
fn test_zero_nets_keep_liquidity_constant() {
    let pool = PoolState::new(-250, 77_777, 10, 500, 6, 18);
    let request = DepthRequest::new(pool, -400, 0);
    let reads: Vec<_> = request.range().into_iter().map(|tick| read(tick, 0)).collect();

    let report = DepthPipeline::default().compute(&request, &reads).unwrap();

    assert_eq!(report.pool_data.ticks.len(), 41);
    assert!(
        report
            .pool_data
            .ticks
            .iter()
            .all(|tick| tick.processed.liquidity_active == 77_777)
    );
}

#[rstest]
fn test_no_liquidity_gives_empty_book() {
    let pool = PoolState::new(30, 0, 60, 3000, 18, 18);
    let request = DepthRequest::new(pool, -300, 300);
    let reads: Vec<_> = request.range().into_iter().map(|tick| read(tick, 0)).collect();

    let report = DepthPipeline::default().compute(&request, &reads).unwrap();
    let book = DepthAggregator::default().order_book(&report.pool_data);

    assert!(book.bids.is_empty());
    assert!(book.asks.is_empty());
    assert_eq!(book.last_price, Some(1.0));
    assert_eq!(book.spread, None);
}

#[rstest]
fn test_only_current_tick_initialized_gives_one_sided_book() {
    let liquidity = 1_000_000_000_000_000_000;
    let pool = PoolState::new(0, liquidity, 60, 3000, 18, 18);
    let request = DepthRequest::new(pool, -300, 300);
    let reads: Vec<_> = request
        .range()
        .into_iter()
        .map(|tick| match tick {
            0 => read(0, liquidity as i128),
            tick => TickRead::Success(PoolTick::from_tick(tick)),
        })
        .collect();

    let report = DepthPipeline::default().compute(&request, &reads).unwrap();
    let book = DepthAggregator::default().order_book(&report.pool_data);

    // Liquidity added at the current tick is absent below it
    for tick in &report.pool_data.ticks {
        let expected = if tick.tick() >= 0 { liquidity } else { 0 };
        assert_eq!(tick.processed.liquidity_active, expected, "tick {}", tick.tick());
    }
    assert!(book.bids.is_empty());
    assert_eq!(
        book.asks.iter().map(|level| level.price).collect::<Vec<_>>(),
        report
            .pool_data
            .ticks
            .iter()
            .filter(|tick| tick.tick() > 0)
            .map(|tick| tick.processed.price0)
            .collect::<Vec<_>>()
    );
    assert_eq!(book.asks.len(), 5);
    assert_eq!(book.last_price, Some(1.0));
}

#[rstest]
fn test_partial_failure_still_renders() {
    let pool = PoolState::new(0, 5_000_000, 60, 3000, 18, 18);
    let request = DepthRequest::new(pool, -240, 300);
    let range = request.range();
    assert_eq!(range.len(), 10);
    let reads: Vec<_> = range
        .iter()
        .map(|&tick| match tick {
            -180 | 240 => failed(tick),
            60 => read(60, -1_000_000),
            tick => read(tick, 0),
        })
        .collect();

    let report = DepthPipeline::default().compute(&request, &reads).unwrap();

    assert_eq!(report.warnings, vec![DepthWarning::PartialFetch { failed: vec![-180, 240] }]);
    assert_eq!(report.pool_data.ticks.len(), 10);
    let read_ok = report
        .pool_data
        .ticks
        .iter()
        .filter(|tick| ![-180, 240].contains(&tick.tick()))
        .count();
    assert_eq!(read_ok, 8);
    let current = report.pool_data.current_tick().unwrap();
    assert_eq!(current.processed.liquidity_active, 5_000_000);
    // Failed reads carry the liquidity unchanged
    let at_240 = report.pool_data.ticks.iter().find(|tick| tick.tick() == 240).unwrap();
    assert_eq!(at_240.processed.liquidity_active, 4_000_000);
}

#[rstest]
fn test_failed_current_tick_is_substituted() {
    let pool = PoolState::new(10, 1_000, 60, 3000, 18, 18);
    let request = DepthRequest::new(pool, -120, 120);
    let reads = vec![read(-120, 0), read(-60, 0), failed(0), read(60, 0), read(120, 0)];

    let report = DepthPipeline::default().compute(&request, &reads).unwrap();

    assert!(report.warnings.contains(&DepthWarning::ReferenceTickSubstituted {
        expected: 0,
        substitute: -60,
    }));
    assert_eq!(report.pool_data.current_tick().unwrap().tick(), -60);
}

#[rstest]
fn test_pipeline_is_idempotent() {
    let pool = PoolState::new(-45, 3_000_000_000_000, 15, 500, 18, 6);
    let request = DepthRequest::new(pool, -300, 300);
    let reads: Vec<_> = request
        .range()
        .into_iter()
        .enumerate()
        .map(|(i, tick)| match i % 4 {
            0 => read(tick, 1_000_000_000),
            1 => failed(tick),
            _ => read(tick, -500_000_000),
        })
        .collect();
    let pipeline = DepthPipeline::new(DepthConfig::default());

    let first = pipeline.compute(&request, &reads).unwrap();
    let second = pipeline.compute(&request, &reads).unwrap();

    assert_eq!(first, second);
}

fn scenario() -> impl Strategy<Value = (PoolState, Vec<TickRead>)> {
    (
        -600i32..600,
        1_000_000u128..1_000_000_000,
        prop::collection::vec(-1_000i128..1_000, 21),
        prop::collection::vec(any::<bool>(), 21),
    )
        .prop_map(|(current_tick, liquidity, nets, failures)| {
            let pool = PoolState::new(current_tick, liquidity, 60, 3000, 18, 18);
            let reads = (-600..=600)
                .step_by(60)
                .zip(nets.into_iter().zip(failures))
                .map(|(tick, (net, fail))| {
                    if fail && tick != pool.active_tick().unwrap_or_default() {
                        failed(tick)
                    } else {
                        read(tick, net)
                    }
                })
                .collect();
            (pool, reads)
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_crossings_and_book_monotonicity((pool, reads) in scenario()) {
        let request = DepthRequest::new(pool, -600, 600);
        let report = DepthPipeline::default().compute(&request, &reads).unwrap();
        let ticks = &report.pool_data.ticks;

        let current = report.pool_data.current_tick().unwrap();
        prop_assert_eq!(current.processed.liquidity_active, pool.current_liquidity);

        for pair in ticks.windows(2) {
            let lower = i128::try_from(pair[0].processed.liquidity_active).unwrap();
            let upper = i128::try_from(pair[1].processed.liquidity_active).unwrap();
            prop_assert_eq!(upper, lower + pair[1].processed.liquidity_net);
        }

        let book = DepthAggregator::default().order_book(&report.pool_data);
        for side in [&book.bids, &book.asks] {
            prop_assert!(
                side.windows(2).all(|pair| pair[1].cumulative_size >= pair[0].cumulative_size)
            );
        }
        prop_assert!(book.bids.windows(2).all(|pair| pair[1].price < pair[0].price));
        prop_assert!(book.asks.windows(2).all(|pair| pair[1].price > pair[0].price));

        let curve = DepthAggregator::default().cumulative_from_current(&report.pool_data);
        let index = curve.iter().position(|tick| tick.is_current).unwrap();
        let (below, above) = (&curve[..index], &curve[index + 1..]);
        prop_assert!(
            above
                .windows(2)
                .all(|pair| pair[1].cumulative_liquidity >= pair[0].cumulative_liquidity)
        );
        prop_assert!(
            below
                .windows(2)
                .all(|pair| pair[0].cumulative_liquidity >= pair[1].cumulative_liquidity)
        );
    }
}
