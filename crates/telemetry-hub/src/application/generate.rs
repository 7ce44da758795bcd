//! Synthetic telemetry generation.
//!
//! With `t` the sample time in epoch milliseconds:
//!
//! | Field            | Value                              |
//! |------------------|------------------------------------|
//! | `accelerometer.x`| `sin(t·0.001) · 0.1`               |
//! | `accelerometer.y`| `cos(t·0.001) · 0.1`               |
//! | `accelerometer.z`| `9.81 + sin(t·0.002) · 0.05`       |
//! | `temperature`    | `25 + sin(t·0.001) · 2`            |
//! | `battery`        | `100 − (⌊t / 1000⌋ mod 100)`       |
//!
//! Battery therefore counts down once per second and wraps every 100 s.

use chrono::{DateTime, Utc};
use hub_core::{Accelerometer, TelemetrySnapshot};
use tokio::time::Instant;

/// Builds the snapshot for wall-clock time `at`.
pub fn sample(at: DateTime<Utc>) -> TelemetrySnapshot {
    let millis = at.timestamp_millis();
    let t = millis as f64;
    TelemetrySnapshot {
        accelerometer: Accelerometer {
            x: (t * 0.001).sin() * 0.1,
            y: (t * 0.001).cos() * 0.1,
            z: 9.81 + (t * 0.002).sin() * 0.05,
        },
        temperature: 25.0 + (t * 0.001).sin() * 2.0,
        battery: battery_at(millis),
        timestamp: at,
    }
}

fn battery_at(epoch_millis: i64) -> u8 {
    let drained = epoch_millis.div_euclid(1000).rem_euclid(100);
    // `drained` is in 0..100, so the result is in 1..=100.
    (100 - drained) as u8
}

/// Maps monotonic tick instants onto wall-clock time.
///
/// The wall clock is read once, at construction.  Every later timestamp is
/// that origin plus the monotonic time elapsed since, so consecutive ticks
/// carry strictly increasing timestamps even if the system clock is stepped.
#[derive(Debug, Clone, Copy)]
pub struct TelemetryClock {
    wall_origin: DateTime<Utc>,
    mono_origin: Instant,
}

impl TelemetryClock {
    /// Anchors the clock at the current wall and monotonic time.
    pub fn start() -> Self {
        Self::anchored(Utc::now(), Instant::now())
    }

    /// Anchors the clock at an explicit pair of origins.
    pub fn anchored(wall_origin: DateTime<Utc>, mono_origin: Instant) -> Self {
        Self {
            wall_origin,
            mono_origin,
        }
    }

    /// Wall-clock time corresponding to the monotonic instant `at`.
    /// Instants before the origin map to the origin.
    pub fn wall_time(&self, at: Instant) -> DateTime<Utc> {
        let elapsed = at.saturating_duration_since(self.mono_origin);
        let elapsed =
            chrono::Duration::from_std(elapsed).unwrap_or_else(|_| chrono::Duration::zero());
        self.wall_origin + elapsed
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn at_millis(millis: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(millis).expect("valid timestamp")
    }

    #[test]
    fn test_sample_at_epoch() {
        // Act
        let snapshot = sample(at_millis(0));

        // Assert
        assert_eq!(snapshot.accelerometer.x, 0.0);
        assert!((snapshot.accelerometer.y - 0.1).abs() < 1e-12);
        assert!((snapshot.accelerometer.z - 9.81).abs() < 1e-12);
        assert_eq!(snapshot.temperature, 25.0);
        assert_eq!(snapshot.battery, 100);
    }

    #[test]
    fn test_sample_wire_format_at_epoch() {
        let json = serde_json::to_string(&sample(at_millis(0))).expect("serializes");
        assert_eq!(
            json,
            r#"{"accelerometer":{"x":"0.000","y":"0.100","z":"9.810"},"temperature":"25.00","battery":100,"timestamp":"1970-01-01T00:00:00.000Z"}"#
        );
    }

    #[test]
    fn test_values_stay_in_range() {
        // Sweep a few minutes at an odd step so many phases are covered.
        for step in 0..2_000i64 {
            let snapshot = sample(at_millis(1_700_000_000_000 + step * 137));
            assert!(snapshot.accelerometer.x.abs() <= 0.1);
            assert!(snapshot.accelerometer.y.abs() <= 0.1);
            assert!((9.75..=9.87).contains(&snapshot.accelerometer.z));
            assert!((22.99..=27.01).contains(&snapshot.temperature));
            assert!((1..=100).contains(&snapshot.battery));
        }
    }

    #[test]
    fn test_battery_counts_down_per_second() {
        assert_eq!(battery_at(1_700_000_000_000), 100);
        assert_eq!(battery_at(1_700_000_000_999), 100);
        assert_eq!(battery_at(1_700_000_001_000), 99);
        assert_eq!(battery_at(1_700_000_037_500), 63);
        assert_eq!(battery_at(1_700_000_099_000), 1);
        assert_eq!(battery_at(1_700_000_100_000), 100);
    }

    #[test]
    fn test_sample_keeps_timestamp() {
        let at = at_millis(1_700_000_000_123);
        assert_eq!(sample(at).timestamp, at);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clock_adds_monotonic_elapsed_to_wall_origin() {
        // Arrange
        let origin = at_millis(1_700_000_000_000);
        let clock = TelemetryClock::anchored(origin, Instant::now());

        // Act
        tokio::time::advance(Duration::from_millis(1500)).await;
        let wall = clock.wall_time(Instant::now());

        // Assert
        assert_eq!(wall, at_millis(1_700_000_001_500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_clock_clamps_instants_before_origin() {
        let now = Instant::now();
        let origin = at_millis(1_000);
        let clock = TelemetryClock::anchored(origin, now + Duration::from_secs(5));

        assert_eq!(clock.wall_time(now), origin);
    }
}
