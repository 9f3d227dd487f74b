//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod app;
pub mod auth;
pub mod cache;
pub mod database;
pub mod logging;
pub mod session;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::auth::AuthConfig;
pub use self::cache::{CacheConfig, MemoryCacheConfig, RedisCacheConfig};
pub use self::database::DatabaseConfig;
pub use self::logging::LoggingConfig;
pub use self::session::SessionConfig;

use crate::error::AppError;

/// Longest token or session record lifetime accepted, one year.
pub const MAX_TTL_HOURS: u64 = 24 * 366;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Cache provider settings.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Authentication settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Session store settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `BOOKSHELF__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("BOOKSHELF")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }

    /// Check settings that must be present before the server starts.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.auth.jwt_secret.trim().is_empty() {
            return Err(AppError::configuration(
                "auth.jwt_secret must be set (BOOKSHELF__AUTH__JWT_SECRET)",
            ));
        }
        check_ttl("auth.token_ttl_hours", self.auth.token_ttl_hours)?;
        check_ttl("session.record_ttl_hours", self.session.record_ttl_hours)?;
        if self.session.store_timeout_ms == 0 {
            return Err(AppError::configuration(
                "session.store_timeout_ms must be greater than zero",
            ));
        }
        match self.cache.provider.as_str() {
            "memory" | "redis" => {}
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown cache provider: {other}"
                )));
            }
        }
        match self.database.provider.as_str() {
            "memory" | "postgres" => {}
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown database provider: {other}"
                )));
            }
        }
        Ok(())
    }
}

fn check_ttl(name: &str, hours: u64) -> Result<(), AppError> {
    if hours == 0 || hours > MAX_TTL_HOURS {
        return Err(AppError::configuration(format!(
            "{name} must be between 1 and {MAX_TTL_HOURS}, got {hours}"
        )));
    }
    Ok(())
}
