//! Optional TOML configuration file.
//!
//! Every field is optional: the file only supplies values the command line
//! and environment left unset.  Unknown keys are rejected so a typo such as
//! `prot = 9000` fails loudly at startup instead of being silently ignored.
//!
//! # Example file
//!
//! ```toml
//! host = "0.0.0.0"
//! port = 8766
//! interval_ms = 500
//! pretty = true
//!
//! [tls]
//! cert = "/etc/hub/cert.pem"
//! key = "/etc/hub/key.pem"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Errors raised while assembling the hub configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML, or has unknown keys.
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Only one half of the TLS certificate/key pair was supplied.
    #[error("TLS requires both a certificate and a private key; the {missing} is missing")]
    IncompleteTls { missing: &'static str },

    /// A value is syntactically valid but unusable.
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Contents of the optional configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    /// Only read by the telemetry hub.
    pub interval_ms: Option<u64>,
    pub pretty: Option<bool>,
    pub tls: Option<TlsFileConfig>,
}

/// `[tls]` table of the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TlsFileConfig {
    pub cert: Option<PathBuf>,
    pub key: Option<PathBuf>,
}

/// Reads and parses the configuration file at `path`.
///
/// # Errors
///
/// [`ConfigError::Io`] if the file cannot be read, [`ConfigError::Parse`] if
/// its contents are not a valid [`FileConfig`].
pub fn load_config_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&text)
}

/// Parses configuration text.  Split out from [`load_config_file`] for tests.
pub fn parse_config(text: &str) -> Result<FileConfig, ConfigError> {
    Ok(toml::from_str(text)?)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
