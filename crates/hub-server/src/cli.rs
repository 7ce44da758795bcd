//! Command-line arguments shared by every hub binary.
//!
//! Each binary flattens [`HubArgs`] into its own `clap` parser and adds the
//! options only it needs (the telemetry hub adds `--interval-ms`).
//!
//! # Precedence
//!
//! `clap` already merges the command line over the `HUB_*` environment
//! variables.  [`HubArgs::resolve`] then fills whatever is still unset from
//! the optional TOML file, and finally from built-in defaults:
//!
//! ```text
//! --flag  >  HUB_* env var  >  config file  >  default
//! ```

use std::path::PathBuf;

use clap::Args;
use hub_core::WireFormat;

use crate::domain::config::{HubConfig, TransportSecurity, DEFAULT_HOST};
use crate::infrastructure::config_file::{load_config_file, ConfigError, FileConfig};

/// Listener options common to the command hub and the telemetry hub.
#[derive(Debug, Clone, Default, PartialEq, Eq, Args)]
pub struct HubArgs {
    /// Host name or IP address to bind (default: localhost)
    #[arg(long, env = "HUB_HOST")]
    pub host: Option<String>,

    /// TCP port to listen on
    #[arg(long, env = "HUB_PORT")]
    pub port: Option<u16>,

    /// PEM certificate chain; enables wss:// together with --tls-key
    #[arg(long, env = "HUB_TLS_CERT")]
    pub tls_cert: Option<PathBuf>,

    /// PEM private key; enables wss:// together with --tls-cert
    #[arg(long, env = "HUB_TLS_KEY")]
    pub tls_key: Option<PathBuf>,

    /// Send indented JSON instead of single-line JSON; `--pretty=false`
    /// forces single-line JSON over the configuration file
    #[arg(
        long,
        env = "HUB_PRETTY",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub pretty: Option<bool>,

    /// Optional TOML configuration file
    #[arg(long, env = "HUB_CONFIG")]
    pub config: Option<PathBuf>,
}

impl HubArgs {
    /// Loads the configuration file named by `--config`, or returns an empty
    /// [`FileConfig`] when none was given.
    pub fn load_file(&self) -> Result<FileConfig, ConfigError> {
        match &self.config {
            Some(path) => load_config_file(path),
            None => Ok(FileConfig::default()),
        }
    }

    /// Merges these arguments over `file` and the built-in defaults.
    ///
    /// # Errors
    ///
    /// [`ConfigError::IncompleteTls`] when exactly one of the certificate and
    /// key paths ends up set.
    pub fn resolve(&self, file: &FileConfig, default_port: u16) -> Result<HubConfig, ConfigError> {
        let host = self
            .host
            .clone()
            .or_else(|| file.host.clone())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = self.port.or(file.port).unwrap_or(default_port);

        let file_tls = file.tls.clone().unwrap_or_default();
        let cert = self.tls_cert.clone().or(file_tls.cert);
        let key = self.tls_key.clone().or(file_tls.key);
        let security = match (cert, key) {
            (Some(cert_path), Some(key_path)) => TransportSecurity::Tls {
                cert_path,
                key_path,
            },
            (None, None) => TransportSecurity::Plain,
            (Some(_), None) => return Err(ConfigError::IncompleteTls {
                missing: "private key",
            }),
            (None, Some(_)) => return Err(ConfigError::IncompleteTls {
                missing: "certificate",
            }),
        };

        let wire_format = if self.pretty.or(file.pretty).unwrap_or(false) {
            WireFormat::Pretty
        } else {
            WireFormat::Compact
        };

        Ok(HubConfig {
            host,
            port,
            security,
            wire_format,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
