//! Hub configuration types.
//!
//! [`HubConfig`] is the single source of truth for the listener settings of
//! one hub process.  It is built from CLI arguments, environment variables,
//! and an optional TOML file (see [`crate::cli::HubArgs`]), or constructed
//! directly in tests.
//!
//! # Design rationale
//!
//! Keeping configuration as a plain struct (no global state, no environment
//! variable reads inside the domain) lets several isolated hubs run in one
//! process, which the integration tests rely on.

use std::path::PathBuf;

use hub_core::WireFormat;

/// Host the listener binds to when none is configured.
pub const DEFAULT_HOST: &str = "localhost";

/// Whether the listener speaks plain WebSocket or WebSocket over TLS.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TransportSecurity {
    /// `ws://`, no encryption.
    #[default]
    Plain,
    /// `wss://`: TLS with the PEM certificate chain and private key at the
    /// given paths.  The files are read once, at startup.
    Tls {
        /// PEM file holding the certificate chain, leaf first.
        cert_path: PathBuf,
        /// PEM file holding the private key (PKCS#8, PKCS#1, or SEC1).
        key_path: PathBuf,
    },
}

impl TransportSecurity {
    /// Returns `true` for [`TransportSecurity::Tls`].
    pub fn is_encrypted(&self) -> bool {
        matches!(self, TransportSecurity::Tls { .. })
    }

    /// URL scheme clients use to connect: `"ws"` or `"wss"`.
    pub fn scheme(&self) -> &'static str {
        if self.is_encrypted() {
            "wss"
        } else {
            "ws"
        }
    }
}

/// Listener and wire settings for one hub.
///
/// # Example
///
/// ```rust
/// use hub_server::HubConfig;
///
/// let cfg = HubConfig::new(8765);
/// assert_eq!(cfg.host, "localhost");
/// assert_eq!(cfg.bind_target(), "localhost:8765");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubConfig {
    /// Host name or IP literal to bind.  `localhost` accepts only local
    /// clients; `0.0.0.0` accepts clients on every interface.
    pub host: String,

    /// TCP port to bind.  `0` asks the OS for a free port (used by tests).
    pub port: u16,

    /// Plain or TLS.
    pub security: TransportSecurity,

    /// JSON layout of broadcast frames.
    pub wire_format: WireFormat,
}

impl HubConfig {
    /// Plain, compact-JSON hub on `localhost:port`.
    pub fn new(port: u16) -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port,
            security: TransportSecurity::Plain,
            wire_format: WireFormat::Compact,
        }
    }

    /// `host:port` string suitable for log lines.
    pub fn bind_target(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
