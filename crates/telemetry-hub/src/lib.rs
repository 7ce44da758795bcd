//! telemetry-hub library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does telemetry-hub do? (for beginners)
//!
//! It pretends to be a small sensor board.  Once per interval it computes a
//! [`hub_core::TelemetrySnapshot`] (accelerometer, temperature, battery) from
//! the current time and pushes it to every connected WebSocket client.  The
//! values are smooth functions of time, so a dashboard connected to it shows
//! gently moving graphs without any real hardware.

/// Application layer: snapshot generation, publishing, and settings.
pub mod application;
