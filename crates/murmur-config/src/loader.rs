//! Configuration loader with layered sources.

use crate::{format_validation_errors, AppConfig, ConfigValidator};
use config::{Config, ConfigError, Environment, File};
use murmur_core::MurmurError;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable selecting the environment-specific config file.
pub const ENVIRONMENT_VAR: &str = "MURMUR_ENVIRONMENT";

/// Loads [`AppConfig`] from layered sources.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_dir: PathBuf,
    environment: String,
}

impl ConfigLoader {
    /// Creates a loader reading from `config_dir`.
    ///
    /// The environment name comes from `MURMUR_ENVIRONMENT` and defaults to
    /// `development`.
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        let environment = std::env::var(ENVIRONMENT_VAR).unwrap_or_else(|_| "development".to_string());
        Self {
            config_dir: config_dir.into(),
            environment,
        }
    }

    /// Creates a loader for the default location (`./config`).
    #[must_use]
    pub fn from_default_location() -> Self {
        Self::new("./config")
    }

    /// Overrides the environment name.
    #[must_use]
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    /// Loads, merges, and validates the configuration.
    ///
    /// Sources, later ones winning:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml`
    /// 3. `config/local.toml` (not committed)
    /// 4. `MURMUR__SECTION__KEY` environment variables, after loading `.env`
    pub fn load(&self) -> Result<AppConfig, MurmurError> {
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file loaded: {}", e);
        }

        info!(environment = %self.environment, "Loading configuration");

        let mut builder = Config::builder();
        for name in ["default", self.environment.as_str(), "local"] {
            let path = self.config_dir.join(format!("{name}.toml"));
            if Path::new(&path).exists() {
                debug!("Loading config from: {}", path.display());
                builder = builder.add_source(File::from(path).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("MURMUR")
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("server.cors_origins")
                .try_parsing(true),
        );

        let mut app_config: AppConfig = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(config_error_to_murmur_error)?;

        app_config.app.environment.clone_from(&self.environment);

        if app_config.app.environment == "production"
            && app_config.security.jwt_secret == crate::SecurityConfig::default().jwt_secret
        {
            warn!("Using the default JWT secret in production");
        }

        ConfigValidator::validate(&app_config)
            .map_err(|errors| MurmurError::Configuration(format_validation_errors(&errors)))?;

        Ok(app_config)
    }
}

fn config_error_to_murmur_error(err: ConfigError) -> MurmurError {
    MurmurError::Configuration(err.to_string())
}
