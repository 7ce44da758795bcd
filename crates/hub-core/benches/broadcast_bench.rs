//! Criterion benchmarks for broadcast fan-out.
//!
//! Measures the cost of one `broadcast` call (serialize once, state check and
//! enqueue per connection) as the number of registered connections grows.
//!
//! Run with:
//! ```bash
//! cargo bench --package hub-core --bench broadcast_bench
//! ```

use std::sync::Arc;

use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hub_core::{
    Accelerometer, BroadcastDispatcher, CommandKind, CommandMessage, Connection, ConnectionId,
    ConnectionRegistry, ReadyState, SendError, TelemetrySnapshot, WirePayload,
};

/// Accepts and discards every payload, so the benchmark measures dispatch
/// overhead rather than buffer growth.
struct NullConnection(ConnectionId);

impl Connection for NullConnection {
    fn id(&self) -> ConnectionId {
        self.0
    }

    fn ready_state(&self) -> ReadyState {
        ReadyState::Open
    }

    fn send(&self, payload: &WirePayload) -> Result<(), SendError> {
        black_box(payload.len());
        Ok(())
    }
}

fn dispatcher_with(connections: usize) -> BroadcastDispatcher {
    let registry = Arc::new(ConnectionRegistry::new());
    for _ in 0..connections {
        registry.register(Arc::new(NullConnection(ConnectionId::new())));
    }
    BroadcastDispatcher::new(registry)
}

fn bench_command_fan_out(c: &mut Criterion) {
    let mut group = c.benchmark_group("command_fan_out");
    let msg = CommandMessage::new(CommandKind::UxNext, 1_700_000_000);

    for connections in [0usize, 1, 16, 256, 1024] {
        let dispatcher = dispatcher_with(connections);
        group.bench_with_input(
            BenchmarkId::from_parameter(connections),
            &connections,
            |b, _| b.iter(|| dispatcher.broadcast(black_box(&msg))),
        );
    }

    group.finish();
}

fn bench_telemetry_fan_out(c: &mut Criterion) {
    let mut group = c.benchmark_group("telemetry_fan_out");
    let snapshot = TelemetrySnapshot {
        accelerometer: Accelerometer {
            x: 0.084,
            y: -0.054,
            z: 9.85,
        },
        temperature: 26.68,
        battery: 37,
        timestamp: Utc::now(),
    };

    for connections in [1usize, 256] {
        let dispatcher = dispatcher_with(connections);
        group.bench_with_input(
            BenchmarkId::from_parameter(connections),
            &connections,
            |b, _| b.iter(|| dispatcher.broadcast(black_box(&snapshot))),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_command_fan_out, bench_telemetry_fan_out);
criterion_main!(benches);
