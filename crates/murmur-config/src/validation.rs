//! Configuration validation.
//!
//! Every section is checked and all violations are reported together, so a
//! misconfigured deployment fails once at startup with the full list.

use crate::AppConfig;
use std::fmt;
use url::Url;

/// Configuration validation error variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    /// JWT secret is too short (minimum 32 characters).
    JwtSecretTooShort { actual: usize, minimum: usize },
    /// Port number is invalid (must be 1-65535).
    InvalidPort { name: String, value: u16 },
    /// Pool size configuration is invalid (min must be <= max).
    InvalidPoolSize { min: u32, max: u32 },
    /// Pool size is zero or exceeds the maximum allowed.
    PoolSizeOutOfRange { name: String, value: u32, maximum: u32 },
    /// URL format is invalid.
    InvalidUrl { url_type: String, message: String },
    /// Timeout or TTL must be positive.
    NonPositiveDuration { name: String },
    /// Password hash cost is out of bounds.
    InvalidHashCost { value: u32, minimum: u32, maximum: u32 },
    /// Log level is invalid.
    InvalidLogLevel { value: String },
    /// Metrics path must start with `/`.
    InvalidMetricsPath { value: String },
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::JwtSecretTooShort { actual, minimum } => write!(
                f,
                "JWT secret too short: {} characters (minimum {})",
                actual, minimum
            ),
            Self::InvalidPort { name, value } => {
                write!(f, "Invalid port for {}: {} (must be 1-65535)", name, value)
            }
            Self::InvalidPoolSize { min, max } => write!(
                f,
                "Invalid pool size: min ({}) cannot be greater than max ({})",
                min, max
            ),
            Self::PoolSizeOutOfRange { name, value, maximum } => write!(
                f,
                "Pool size {} = {} is out of range (1-{})",
                name, value, maximum
            ),
            Self::InvalidUrl { url_type, message } => {
                write!(f, "Invalid {} URL: {}", url_type, message)
            }
            Self::NonPositiveDuration { name } => write!(f, "'{}' must be positive", name),
            Self::InvalidHashCost { value, minimum, maximum } => write!(
                f,
                "Invalid password hash cost: {} (must be between {} and {})",
                value, minimum, maximum
            ),
            Self::InvalidLogLevel { value } => write!(
                f,
                "Invalid log level: '{}' (valid: trace, debug, info, warn, error)",
                value
            ),
            Self::InvalidMetricsPath { value } => {
                write!(f, "Metrics path '{}' must start with '/'", value)
            }
        }
    }
}

impl std::error::Error for ConfigValidationError {}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    const MIN_JWT_SECRET_LENGTH: usize = 32;
    const MAX_POOL_SIZE: u32 = 1000;
    const MIN_HASH_COST: u32 = 1;
    const MAX_HASH_COST: u32 = 10;
    const VALID_LOG_LEVELS: &'static [&'static str] = &["trace", "debug", "info", "warn", "error"];

    /// Validates the entire application configuration.
    ///
    /// Returns Ok(()) if valid, or Err with every violation found.
    pub fn validate(config: &AppConfig) -> Result<(), Vec<ConfigValidationError>> {
        let mut errors = Vec::new();

        Self::validate_security(&config.security, &mut errors);
        Self::validate_server(&config.server, &mut errors);
        Self::validate_database(&config.database, &mut errors);
        Self::validate_redis(&config.redis, &mut errors);
        Self::validate_cache(&config.cache, &mut errors);
        Self::validate_observability(&config.observability, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_security(config: &crate::SecurityConfig, errors: &mut Vec<ConfigValidationError>) {
        if config.jwt_secret.len() < Self::MIN_JWT_SECRET_LENGTH {
            errors.push(ConfigValidationError::JwtSecretTooShort {
                actual: config.jwt_secret.len(),
                minimum: Self::MIN_JWT_SECRET_LENGTH,
            });
        }

        if !(Self::MIN_HASH_COST..=Self::MAX_HASH_COST).contains(&config.password_hash_cost) {
            errors.push(ConfigValidationError::InvalidHashCost {
                value: config.password_hash_cost,
                minimum: Self::MIN_HASH_COST,
                maximum: Self::MAX_HASH_COST,
            });
        }

        if config.jwt_expiration_secs == 0 {
            errors.push(ConfigValidationError::NonPositiveDuration {
                name: "security.jwt_expiration_secs".to_string(),
            });
        }
    }

    fn validate_server(config: &crate::ServerConfig, errors: &mut Vec<ConfigValidationError>) {
        if config.port == 0 {
            errors.push(ConfigValidationError::InvalidPort {
                name: "server.port".to_string(),
                value: config.port,
            });
        }

        if config.request_timeout_secs == 0 {
            errors.push(ConfigValidationError::NonPositiveDuration {
                name: "server.request_timeout_secs".to_string(),
            });
        }
    }

    fn validate_database(config: &crate::DatabaseConfig, errors: &mut Vec<ConfigValidationError>) {
        match Url::parse(&config.url) {
            Ok(url) if matches!(url.scheme(), "postgres" | "postgresql") => {}
            Ok(url) => errors.push(ConfigValidationError::InvalidUrl {
                url_type: "database".to_string(),
                message: format!("unsupported scheme '{}', expected postgres://", url.scheme()),
            }),
            Err(e) => errors.push(ConfigValidationError::InvalidUrl {
                url_type: "database".to_string(),
                message: e.to_string(),
            }),
        }

        if config.min_connections > config.max_connections {
            errors.push(ConfigValidationError::InvalidPoolSize {
                min: config.min_connections,
                max: config.max_connections,
            });
        }
        if config.max_connections == 0 || config.max_connections > Self::MAX_POOL_SIZE {
            errors.push(ConfigValidationError::PoolSizeOutOfRange {
                name: "database.max_connections".to_string(),
                value: config.max_connections,
                maximum: Self::MAX_POOL_SIZE,
            });
        }

        if config.connect_timeout_secs == 0 {
            errors.push(ConfigValidationError::NonPositiveDuration {
                name: "database.connect_timeout_secs".to_string(),
            });
        }
        if config.idle_timeout_secs == 0 {
            errors.push(ConfigValidationError::NonPositiveDuration {
                name: "database.idle_timeout_secs".to_string(),
            });
        }
    }

    fn validate_redis(config: &crate::RedisConfig, errors: &mut Vec<ConfigValidationError>) {
        if !config.enabled {
            return;
        }

        match Url::parse(&config.url) {
            Ok(url) if matches!(url.scheme(), "redis" | "rediss") => {}
            _ => errors.push(ConfigValidationError::InvalidUrl {
                url_type: "redis".to_string(),
                message: "URL must start with redis:// or rediss://".to_string(),
            }),
        }

        if config.pool_size == 0 || config.pool_size > Self::MAX_POOL_SIZE {
            errors.push(ConfigValidationError::PoolSizeOutOfRange {
                name: "redis.pool_size".to_string(),
                value: config.pool_size,
                maximum: Self::MAX_POOL_SIZE,
            });
        }
    }

    fn validate_cache(config: &crate::CacheConfig, errors: &mut Vec<ConfigValidationError>) {
        if config.entity_ttl_secs == 0 {
            errors.push(ConfigValidationError::NonPositiveDuration {
                name: "cache.entity_ttl_secs".to_string(),
            });
        }
    }

    fn validate_observability(config: &crate::ObservabilityConfig, errors: &mut Vec<ConfigValidationError>) {
        let level = config.log_level.to_lowercase();
        if !Self::VALID_LOG_LEVELS.contains(&level.as_str()) {
            errors.push(ConfigValidationError::InvalidLogLevel {
                value: config.log_level.clone(),
            });
        }

        if config.metrics_enabled && !config.metrics_path.starts_with('/') {
            errors.push(ConfigValidationError::InvalidMetricsPath {
                value: config.metrics_path.clone(),
            });
        }
    }
}

/// Formats validation errors for display.
#[must_use]
pub fn format_validation_errors(errors: &[ConfigValidationError]) -> String {
    let mut output = String::from("Configuration validation failed:\n");
    for (i, error) in errors.iter().enumerate() {
        output.push_str(&format!("  {}. {}\n", i + 1, error));
    }
    output
}
