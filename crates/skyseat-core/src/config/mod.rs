//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod allocation;
pub mod app;
pub mod database;
pub mod logging;

use serde::{Deserialize, Serialize};

pub use self::allocation::AllocationConfig;
pub use self::app::{CorsConfig, ServerConfig};
pub use self::database::DatabaseConfig;
pub use self::logging::LoggingConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database connection settings.
    pub database: DatabaseConfig,
    /// Allocation engine tuning.
    #[serde(default)]
    pub allocation: AllocationConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration for the given environment.
    ///
    /// Merges `config/default.toml`, the `config/{env}.toml` overlay, and
    /// environment variables prefixed with `SKYSEAT__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false));
        Self::finish(builder)
    }

    /// Load configuration from an explicit file, still honouring
    /// `SKYSEAT__` environment overrides.
    pub fn from_file(path: &str) -> Result<Self, AppError> {
        let builder =
            config::Config::builder().add_source(config::File::with_name(path).required(true));
        Self::finish(builder)
    }

    fn finish(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, AppError> {
        let config = builder
            .add_source(
                config::Environment::with_prefix("SKYSEAT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.allocation.validate()?;
        Ok(config)
    }
}
