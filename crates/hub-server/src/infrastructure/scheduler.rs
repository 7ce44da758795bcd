//! Cancellable fixed-period task.
//!
//! [`ScheduledTask::every`] spawns a Tokio task that calls a closure once per
//! period.  The first call happens one full period after scheduling, not
//! immediately.  When the runtime falls behind, missed ticks are skipped
//! rather than fired in a burst.
//!
//! Dropping the handle cancels the task; [`ScheduledTask::cancel`] does the
//! same but also waits for the task to finish, so no tick can fire after it
//! returns.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, warn};

/// Handle to a running periodic task.
#[derive(Debug)]
pub struct ScheduledTask {
    guard: DropGuard,
    handle: JoinHandle<u64>,
}

impl ScheduledTask {
    /// Calls `tick` every `period`, passing the scheduled instant of the tick.
    ///
    /// Must be called from inside a Tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if `period` is zero (as [`tokio::time::interval_at`] does).
    /// Callers validate the period at configuration time.
    pub fn every<F>(period: Duration, mut tick: F) -> Self
    where
        F: FnMut(Instant) + Send + 'static,
    {
        let token = CancellationToken::new();
        let cancelled = token.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut fired = 0u64;
            loop {
                tokio::select! {
                    biased;
                    _ = cancelled.cancelled() => break,
                    at = ticker.tick() => {
                        tick(at);
                        fired += 1;
                    }
                }
            }
            debug!(ticks = fired, "scheduled task stopped");
            fired
        });

        Self {
            guard: token.drop_guard(),
            handle,
        }
    }

    /// Stops the task and waits for it to finish.  Returns how many ticks
    /// fired.
    pub async fn cancel(self) -> u64 {
        let Self { guard, handle } = self;
        drop(guard);
        match handle.await {
            Ok(fired) => fired,
            Err(e) => {
                warn!(error = %e, "scheduled task ended abnormally");
                0
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recorder() -> (Arc<Mutex<Vec<Instant>>>, impl FnMut(Instant) + Send + 'static) {
        let ticks = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&ticks);
        (ticks, move |at| sink.lock().expect("lock poisoned").push(at))
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_tick_waits_one_period() {
        // Arrange
        let (ticks, tick) = recorder();
        let task = ScheduledTask::every(Duration::from_millis(1000), tick);

        // Act
        tokio::time::sleep(Duration::from_millis(999)).await;

        // Assert
        assert!(ticks.lock().expect("lock poisoned").is_empty());
        task.cancel().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_once_per_period() {
        // Arrange
        let (ticks, tick) = recorder();
        let start = Instant::now();
        let task = ScheduledTask::every(Duration::from_millis(1000), tick);

        // Act
        tokio::time::sleep(Duration::from_millis(2500)).await;
        let fired = task.cancel().await;

        // Assert
        assert_eq!(fired, 2);
        let ticks = ticks.lock().expect("lock poisoned");
        assert_eq!(
            *ticks,
            vec![
                start + Duration::from_millis(1000),
                start + Duration::from_millis(2000)
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_tick_after_cancel() {
        // Arrange
        let (ticks, tick) = recorder();
        let task = ScheduledTask::every(Duration::from_millis(100), tick);
        tokio::time::sleep(Duration::from_millis(150)).await;

        // Act
        let fired = task.cancel().await;
        tokio::time::sleep(Duration::from_millis(1000)).await;

        // Assert
        assert_eq!(fired, 1);
        assert_eq!(ticks.lock().expect("lock poisoned").len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_handle_stops_task() {
        let (ticks, tick) = recorder();
        let task = ScheduledTask::every(Duration::from_millis(100), tick);

        drop(task);
        tokio::time::sleep(Duration::from_millis(1000)).await;

        assert!(ticks.lock().expect("lock poisoned").is_empty());
    }
}
