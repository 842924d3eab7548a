//! Logging setup
//!
//! Logs go to stderr so that stdout carries only the readiness line.

use anyhow::anyhow;
use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggingConfig};

/// Build the filter: `RUST_LOG` when set, otherwise the configured level.
///
/// # Errors
/// Returns an error if the configured level is not a valid filter directive.
pub fn build_filter(cfg: &LoggingConfig) -> anyhow::Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&cfg.level)
        .map_err(|e| anyhow!("invalid log level '{}': {e}", cfg.level))
}

/// Install the global tracing subscriber.
///
/// # Errors
/// Returns an error if the level is invalid or a subscriber is already installed.
pub fn init_logging(cfg: &LoggingConfig) -> anyhow::Result<()> {
    let filter = build_filter(cfg)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = match cfg.format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_level_is_rejected() {
        // Only meaningful when RUST_LOG is not overriding the configured level.
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let cfg = LoggingConfig {
            level: "remote_math=loud".to_owned(),
            format: LogFormat::Text,
        };
        assert!(build_filter(&cfg).is_err());
    }

    #[test]
    fn test_module_directives_are_accepted() {
        let cfg = LoggingConfig {
            level: "warn,remote_math=debug".to_owned(),
            format: LogFormat::Json,
        };
        assert!(build_filter(&cfg).is_ok());
    }
}
