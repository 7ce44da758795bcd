//! Application layer use cases for the telemetry hub.
//!
//! # Sub-modules
//!
//! - **`generate`** – Pure functions from a wall-clock instant to a
//!   [`hub_core::TelemetrySnapshot`], plus the clock that anchors tick
//!   instants to wall time.
//!
//! - **`publish`** – Schedules the periodic generate-and-broadcast task.
//!
//! - **`settings`** – Resolves the broadcast interval from the command line
//!   and configuration file.

pub mod generate;
pub mod publish;
pub mod settings;
