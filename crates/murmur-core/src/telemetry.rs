//! Tracing subscriber setup shared by the binaries.

use serde::{Deserialize, Serialize};

#[cfg(feature = "telemetry")]
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Output format for log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

/// Builds the default filter directive for a base level.
///
/// `RUST_LOG` still takes precedence when set.
#[must_use]
pub fn default_directive(level: &str) -> String {
    format!("{level},murmur=debug,tower_http=debug,sqlx=warn")
}

/// Installs the global tracing subscriber.
///
/// Returns an error if a subscriber was already installed.
#[cfg(feature = "telemetry")]
pub fn init_tracing(level: &str, format: LogFormat) -> crate::MurmurResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(level)));

    let registry = tracing_subscriber::registry().with(filter);
    let result = match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .try_init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init(),
    };

    result.map_err(|e| crate::MurmurError::Configuration(format!("Failed to init tracing: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(
            default_directive("info"),
            "info,murmur=debug,tower_http=debug,sqlx=warn"
        );
    }

    #[test]
    fn test_log_format_deserializes_lowercase() {
        let format: LogFormat = serde_json::from_str("\"json\"").unwrap();
        assert_eq!(format, LogFormat::Json);
        assert_eq!(LogFormat::default(), LogFormat::Pretty);
    }
}
