//! Broadcast interval resolution.

use std::time::Duration;

use hub_server::{ConfigError, FileConfig};

/// Interval used when neither the command line nor the file sets one.
pub const DEFAULT_INTERVAL_MS: u64 = 1000;

/// Picks the broadcast interval: command line (or `HUB_INTERVAL_MS`), then
/// the configuration file, then [`DEFAULT_INTERVAL_MS`].
///
/// # Errors
///
/// [`ConfigError::InvalidValue`] if the chosen interval is zero.
pub fn resolve_interval(cli: Option<u64>, file: &FileConfig) -> Result<Duration, ConfigError> {
    let millis = cli.or(file.interval_ms).unwrap_or(DEFAULT_INTERVAL_MS);
    if millis == 0 {
        return Err(ConfigError::InvalidValue {
            field: "interval_ms",
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(Duration::from_millis(millis))
}
