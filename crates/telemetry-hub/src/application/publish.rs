//! Periodic telemetry broadcast.

use std::sync::Arc;
use std::time::Duration;

use hub_core::BroadcastDispatcher;
use hub_server::ScheduledTask;
use tracing::debug;

use crate::application::generate::{sample, TelemetryClock};

/// Starts broadcasting one snapshot every `period`.
///
/// Each tick's timestamp is derived from `clock`, so ticks are strictly
/// increasing in time.  The returned handle stops the broadcasts when
/// cancelled or dropped.
pub fn start_publishing(
    dispatcher: Arc<BroadcastDispatcher>,
    clock: TelemetryClock,
    period: Duration,
) -> ScheduledTask {
    ScheduledTask::every(period, move |at| {
        let snapshot = sample(clock.wall_time(at));
        debug!(?snapshot, "Sending telemetry data");
        dispatcher.broadcast(&snapshot);
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
