//! # Media Bridge Benchmarks
//!
//! | Area | Operation | Target |
//! |------|-----------|--------|
//! | Pending store | register + complete | < 10µs |
//! | Response router | route with N calls in flight | flat in N |
//! | Envelope | JSON encode / decode | < 10µs |
//! | Client | full round trip through an in-process extension | < 1ms |

use async_trait::async_trait;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use mb_01_bridge_client::{
    BridgeApi, BridgeClient, ClientConfig, ExtensionHandler, ExtensionHost, HandlerError,
    PendingRequestStore, ReplyOutcome, ResponseRouter,
};
use serde_json::{json, Value};
use shared_bus::{EventChannel, InMemoryEventBus};
use shared_types::{
    BridgeEnvelope, CorrelationId, EndpointName, EpisodesRequest, ExtensionRequest,
};
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// Pending store
// ============================================================================

fn bench_pending_store(c: &mut Criterion) {
    let mut group = c.benchmark_group("pending-store");

    let store = PendingRequestStore::new();
    group.bench_function("register_complete", |b| {
        b.iter(|| {
            let (id, rx) = store.register(EndpointName::GetEpisodes);
            store.complete(id, "get-episodes", ReplyOutcome::Data(Value::Null));
            black_box(rx)
        })
    });

    group.bench_function("register_complete_oldest", |b| {
        b.iter(|| {
            let (_, rx) = store.register(EndpointName::GetImages);
            store.complete_oldest(EndpointName::GetImages, ReplyOutcome::Data(Value::Null));
            black_box(rx)
        })
    });

    group.finish();
}

fn bench_router_under_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("response-router");
    group.measurement_time(Duration::from_secs(5));

    for in_flight in [0usize, 100, 1_000] {
        let bus = InMemoryEventBus::new();
        let store = Arc::new(PendingRequestStore::new());
        let router = ResponseRouter::new(bus.on_response(), Arc::clone(&store));

        // Background calls that never get answered
        let _backlog: Vec<_> = (0..in_flight)
            .map(|_| store.register(EndpointName::GetChapters))
            .collect();

        group.throughput(Throughput::Elements(1));
        group.bench_with_input(
            BenchmarkId::new("route_correlated", in_flight),
            &in_flight,
            |b, _| {
                b.iter(|| {
                    let (id, rx) = store.register(EndpointName::GetEpisodes);
                    let request = BridgeEnvelope::request(EndpointName::GetEpisodes, id, json!({}));
                    black_box(router.route(BridgeEnvelope::response_to(&request, json!([]))));
                    black_box(rx)
                })
            },
        );
    }

    group.finish();
}

// ============================================================================
// Envelope codec
// ============================================================================

fn bench_envelope_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("envelope");

    let episodes: Vec<Value> = (0..50)
        .map(|i| json!({"id": format!("ep-{}", i), "number": i, "extraData": {"slug": "abc"}}))
        .collect();
    let envelope = BridgeEnvelope::response_to(
        &BridgeEnvelope::request(EndpointName::GetEpisodes, CorrelationId::new(), json!({})),
        Value::Array(episodes),
    );
    let encoded = serde_json::to_string(&envelope).unwrap();

    group.throughput(Throughput::Bytes(encoded.len() as u64));
    group.bench_function("encode_50_episodes", |b| {
        b.iter(|| serde_json::to_string(black_box(&envelope)).unwrap())
    });
    group.bench_function("decode_50_episodes", |b| {
        b.iter(|| serde_json::from_str::<BridgeEnvelope>(black_box(&encoded)).unwrap())
    });

    group.finish();
}

// ============================================================================
// Client round trip
// ============================================================================

struct EchoEpisodes;

#[async_trait]
impl ExtensionHandler for EchoEpisodes {
    async fn handle(&self, request: ExtensionRequest) -> Result<Value, HandlerError> {
        match request {
            ExtensionRequest::GetEpisodes(req) => Ok(json!([{"id": req.anime_id, "number": 1}])),
            other => Err(HandlerError::Unsupported(other.endpoint())),
        }
    }
}

fn bench_client_round_trip(c: &mut Criterion) {
    let mut group = c.benchmark_group("bridge-client");
    let rt = tokio::runtime::Runtime::new().unwrap();

    let client = rt.block_on(async {
        let bus = Arc::new(InMemoryEventBus::new());
        let _host = ExtensionHost::spawn(bus.clone(), Arc::new(EchoEpisodes));
        BridgeClient::new(bus, ClientConfig::default()).unwrap()
    });

    group.bench_function("get_episodes", |b| {
        b.iter(|| {
            rt.block_on(async {
                client
                    .get_episodes(EpisodesRequest {
                        anime_id: "a-1".into(),
                        source_id: "src1".into(),
                        extra_data: None,
                    })
                    .await
                    .unwrap()
            })
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_pending_store,
    bench_router_under_load,
    bench_envelope_codec,
    bench_client_round_trip,
);
criterion_main!(benches);
