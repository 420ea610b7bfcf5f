//! Client hot-path benchmark suite.
//!
//! Benchmarks the work done per call and per introspection:
//! - Request encoding at different parameter counts
//! - Registry construction from method lists of different sizes
//! - Full call round trip over an in-memory transport
//!
//! Run with: cargo bench --bench client_codec
//! Results saved to: target/criterion/

use std::hint::black_box;
use std::sync::Arc;

use async_trait::async_trait;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use serde_json::{Value, json};
use tokio::runtime::Runtime;
use torrent_webui_client::transport::HttpReply;
use torrent_webui_client::{CallArgs, MethodRegistry, Request, RequestId, RpcClient, Transport};

// ============================================================================
// Benchmark Parameters
// ============================================================================

const PARAM_COUNTS: &[usize] = &[0, 4, 32];
const METHOD_COUNTS: &[usize] = &[50, 500];

// ============================================================================
// In-Memory Transport
// ============================================================================

/// Answers every call with the same `web.update_ui`-sized body.
struct CannedTransport {
    body: String,
}

impl CannedTransport {
    fn new(torrents: usize) -> Self {
        let torrents: serde_json::Map<String, Value> = (0..torrents)
            .map(|i| {
                (
                    format!("{i:040x}"),
                    json!({ "name": format!("torrent-{i}"), "state": "Seeding", "progress": 100.0 }),
                )
            })
            .collect();

        Self {
            body: json!({
                "result": { "connected": true, "torrents": torrents, "stats": {} },
                "error": null,
                "id": 0
            })
            .to_string(),
        }
    }
}

#[async_trait]
impl Transport for CannedTransport {
    async fn post(&self, _body: String) -> torrent_webui_client::Result<HttpReply> {
        Ok(HttpReply {
            status: 200,
            status_text: "OK".to_string(),
            body: self.body.clone(),
        })
    }
}

// ============================================================================
// Benchmark: Request Encoding
// ============================================================================

fn bench_request_encoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("request_encoding");

    for &count in PARAM_COUNTS {
        let params: Vec<Value> = (0..count).map(|i| json!({ "key": i, "ids": [i, i + 1] })).collect();

        group.bench_with_input(BenchmarkId::new("params", count), &params, |b, params| {
            b.iter(|| {
                let request = Request::new(RequestId::new(7), "web.update_ui", params.clone());
                black_box(serde_json::to_string(&request))
            });
        });

        group.bench_with_input(BenchmarkId::new("call_args", count), &params, |b, params| {
            b.iter(|| {
                let mut args = params.clone();
                args.push(json!({ "success": "cb", "scope": "grid" }));
                black_box(CallArgs::parse(args))
            });
        });
    }

    group.finish();
}

// ============================================================================
// Benchmark: Registry Construction
// ============================================================================

fn bench_registry_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry_build");

    for &count in METHOD_COUNTS {
        let names: Vec<String> = (0..count)
            .map(|i| format!("ns{}.method_{i}", i % 12))
            .collect();

        group.bench_with_input(BenchmarkId::new("methods", count), &names, |b, names| {
            b.iter(|| black_box(MethodRegistry::from_names(names)));
        });
    }

    group.finish();
}

// ============================================================================
// Benchmark: Call Round Trip
// ============================================================================

fn bench_call_round_trip(c: &mut Criterion) {
    let rt = Runtime::new().expect("runtime");

    let mut group = c.benchmark_group("call_round_trip");

    for &torrents in &[10usize, 1000] {
        let client = RpcClient::with_transport(Arc::new(CannedTransport::new(torrents)));

        group.bench_with_input(BenchmarkId::new("torrents", torrents), &client, |b, client| {
            b.to_async(&rt).iter(|| async {
                let snapshot = client
                    .web()
                    .update_ui(&["name", "state", "progress"], &serde_json::Map::new())
                    .await;
                black_box(snapshot)
            });
        });
    }

    group.finish();
}

// ============================================================================
// Criterion Setup
// ============================================================================

criterion_group!(
    benches,
    bench_request_encoding,
    bench_registry_build,
    bench_call_round_trip
);
criterion_main!(benches);
