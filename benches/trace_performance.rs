use std::hint::black_box;
use std::sync::Arc;
use std::time::Duration;

use criterion::BenchmarkId;
use criterion::Criterion;
use criterion::Throughput;
use criterion::criterion_group;
use criterion::criterion_main;
use tokio::runtime::Runtime;

use athar::Tracer;
use athar::config::TracerConfig;
use athar::handler::TraceState;
use athar::model::TraceDirection;
use athar::model::TraceRequest;
use athar::pipeline::datasource::FetchOutcome;

#[path = "../tests/common/mod.rs"]
mod common;

use common::ScriptedSource;
use common::TOKEN;
use common::addr;
use common::transfer;

/// Merging one hop worth of transfers into the graph
fn bench_merge_hop(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge_hop");

    for transfers_per_address in [10u32, 50, 200].iter() {
        let frontier: Vec<_> = (0..20).map(|n| addr(10 + n)).collect();
        let results: Vec<_> = frontier
            .iter()
            .enumerate()
            .map(|(i, address)| {
                let transfers = (0..*transfers_per_address)
                    .map(|n| {
                        let counterparty = addr(100_000 + (i as u32 * 1_000) + n);
                        transfer(address, &counterparty, &format!("0x{:x}{:x}", i, n), n as i64)
                    })
                    .collect();
                (address.clone(), FetchOutcome::Transfers(transfers))
            })
            .collect();

        group.throughput(Throughput::Elements((20 * transfers_per_address) as u64));
        group.bench_with_input(
            BenchmarkId::new("transfers_per_address", transfers_per_address),
            &results,
            |b, results| {
                b.iter(|| {
                    let mut state = TraceState::new(addr(1), TraceDirection::Both);
                    let hop = results.iter().map(|(address, outcome)| (address.clone(), Ok(outcome.clone()))).collect();
                    black_box(state.merge_hop(hop))
                });
            },
        );
    }

    group.finish();
}

/// Whole traces against an in-memory explorer with a fixed per-request latency
fn bench_full_trace(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();

    let mut group = c.benchmark_group("full_trace");
    group.measurement_time(Duration::from_secs(10));

    let start = addr(1);
    let mut ledger = Vec::new();
    for n in 0..40u32 {
        let middle = addr(1_000 + n);
        ledger.push(transfer(&start, &middle, &format!("0xa{:x}", n), 2_000 + n as i64));
        for m in 0..5u32 {
            let leaf = addr(10_000 + n * 10 + m);
            ledger.push(transfer(&middle, &leaf, &format!("0xb{:x}{:x}", n, m), 1_000 + m as i64));
        }
    }

    for concurrency in [1usize, 4, 8, 16].iter() {
        let source = Arc::new(ScriptedSource::from_ledger(&ledger).with_delay(Duration::from_millis(1)));
        let tracer = Tracer::new(
            source,
            TracerConfig {
                max_concurrent_requests: *concurrency,
                ..Default::default()
            },
        );
        let request = TraceRequest::new(start.to_string(), TOKEN).with_max_hops(2).with_per_address_limit(200);

        group.bench_with_input(BenchmarkId::new("max_concurrent_requests", concurrency), concurrency, |b, _| {
            b.iter(|| rt.block_on(async { black_box(tracer.trace(&request).await.unwrap()) }));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_merge_hop, bench_full_trace);
criterion_main!(benches);
