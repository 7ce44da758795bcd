//! Message types broadcast to clients.
//!
//! Every message is a JSON object.  The two shapes the hubs produce are:
//!
//! ```json
//! {"command":"ux_next","timestamp":1700000000}
//! {"accelerometer":{"x":"0.084","y":"-0.054","z":"9.850"},"temperature":"26.68","battery":37,"timestamp":"2026-10-17T12:00:00.000Z"}
//! ```
//!
//! Field order in the structs below is the field order on the wire; serde
//! emits struct fields in declaration order.
//!
//! # Why are the telemetry numbers strings?
//!
//! Dashboard clients that consume the telemetry stream were written against a
//! feed that renders readings with a fixed number of decimals.  The snapshot
//! keeps its values as `f64` in memory and only formats them when serialized.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};

/// A message that can be handed to the broadcast dispatcher.
pub trait HubMessage: Serialize {
    /// Short discriminator used in log lines (e.g. `"ux_next"`, `"telemetry"`).
    fn kind(&self) -> &str;
}

// ── Command messages ──────────────────────────────────────────────────────────

/// The UX commands an operator can trigger.
///
/// Serialized in `snake_case`, so `CommandKind::UxCaptureImage` becomes
/// `"ux_capture_image"` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    /// Capture an image on the client device.
    UxCaptureImage,
    /// Go to the previous item.
    UxPrevious,
    /// Go to the next item.
    UxNext,
    /// Open the menu.
    UxMenu,
    /// Flag damage on the current item.
    UxDamage,
}

impl CommandKind {
    /// Every command kind, in operator-banner order.
    pub const ALL: [CommandKind; 5] = [
        CommandKind::UxCaptureImage,
        CommandKind::UxPrevious,
        CommandKind::UxNext,
        CommandKind::UxDamage,
        CommandKind::UxMenu,
    ];

    /// Wire name of the command.
    pub fn as_str(self) -> &'static str {
        match self {
            CommandKind::UxCaptureImage => "ux_capture_image",
            CommandKind::UxPrevious => "ux_previous",
            CommandKind::UxNext => "ux_next",
            CommandKind::UxMenu => "ux_menu",
            CommandKind::UxDamage => "ux_damage",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A discrete operator command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandMessage {
    /// Which command was triggered.
    pub command: CommandKind,
    /// Seconds since the Unix epoch at the moment the command was triggered.
    pub timestamp: i64,
}

impl CommandMessage {
    /// Creates a command stamped with an explicit epoch-seconds timestamp.
    pub fn new(command: CommandKind, timestamp: i64) -> Self {
        Self { command, timestamp }
    }

    /// Creates a command stamped with the current wall-clock time.
    pub fn now(command: CommandKind) -> Self {
        Self::new(command, Utc::now().timestamp())
    }
}

impl HubMessage for CommandMessage {
    fn kind(&self) -> &str {
        self.command.as_str()
    }
}

// ── Telemetry messages ────────────────────────────────────────────────────────

/// Three-axis accelerometer reading in m/s².
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Accelerometer {
    /// Lateral axis.  Sent with three decimals.
    #[serde(serialize_with = "fixed_3")]
    pub x: f64,
    /// Longitudinal axis.  Sent with three decimals.
    #[serde(serialize_with = "fixed_3")]
    pub y: f64,
    /// Vertical axis, gravity included.  Sent with three decimals.
    #[serde(serialize_with = "fixed_3")]
    pub z: f64,
}

/// One synthetic telemetry sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetrySnapshot {
    /// Acceleration on all three axes.
    pub accelerometer: Accelerometer,
    /// Degrees Celsius, rendered with two decimals.
    #[serde(serialize_with = "fixed_2")]
    pub temperature: f64,
    /// Battery charge, 0..=100 percent.
    pub battery: u8,
    /// Sample time, rendered as ISO-8601 UTC with millisecond precision.
    #[serde(serialize_with = "iso_8601_millis")]
    pub timestamp: DateTime<Utc>,
}

impl HubMessage for TelemetrySnapshot {
    fn kind(&self) -> &str {
        "telemetry"
    }
}

fn fixed_3<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&format_args!("{value:.3}"))
}

fn fixed_2<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&format_args!("{value:.2}"))
}

fn iso_8601_millis<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_command_message_serializes_command_then_timestamp() {
        // Arrange
        let msg = CommandMessage::new(CommandKind::UxNext, 1_700_000_000);

        // Act
        let json = serde_json::to_string(&msg).unwrap();

        // Assert
        assert_eq!(json, r#"{"command":"ux_next","timestamp":1700000000}"#);
    }

    #[test]
    fn test_command_kind_wire_names_match_as_str() {
        for kind in CommandKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn test_command_message_parses_from_wire() {
        let msg: CommandMessage =
            serde_json::from_str(r#"{"command":"ux_capture_image","timestamp":42}"#).unwrap();
        assert_eq!(msg, CommandMessage::new(CommandKind::UxCaptureImage, 42));
    }

    #[test]
    fn test_command_message_now_uses_current_epoch_seconds() {
        let before = Utc::now().timestamp();
        let msg = CommandMessage::now(CommandKind::UxMenu);
        let after = Utc::now().timestamp();
        assert!(msg.timestamp >= before && msg.timestamp <= after);
    }

    #[test]
    fn test_command_kind_is_hub_message_kind() {
        let msg = CommandMessage::new(CommandKind::UxDamage, 0);
        assert_eq!(msg.kind(), "ux_damage");
    }

    #[test]
    fn test_telemetry_snapshot_wire_format() {
        // Arrange
        let snapshot = TelemetrySnapshot {
            accelerometer: Accelerometer {
                x: 0.08414,
                y: -0.05403,
                z: 9.85,
            },
            temperature: 26.6829,
            battery: 37,
            timestamp: Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap(),
        };

        // Act
        let json = serde_json::to_string(&snapshot).unwrap();

        // Assert
        assert_eq!(
            json,
            r#"{"accelerometer":{"x":"0.084","y":"-0.054","z":"9.850"},"temperature":"26.68","battery":37,"timestamp":"2026-10-17T12:00:00.000Z"}"#
        );
        assert_eq!(snapshot.kind(), "telemetry");
    }
}
