//! Application configuration.

use serde::Deserialize;
use std::path::Path;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Admission engine configuration.
    #[serde(default)]
    pub admissions: AdmissionsConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Admission engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AdmissionsConfig {
    /// Retry budget for unique identifier generation (references, PINs,
    /// index numbers). Exceeding it fails the request with
    /// `GENERATION_EXHAUSTED`.
    #[serde(default = "default_max_generation_attempts")]
    pub max_generation_attempts: u32,
    /// Length of generated temporary passwords.
    #[serde(default = "default_temp_password_length")]
    pub temp_password_length: usize,
}

impl Default for AdmissionsConfig {
    fn default() -> Self {
        Self {
            max_generation_attempts: default_max_generation_attempts(),
            temp_password_length: default_temp_password_length(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

const fn default_max_connections() -> u32 {
    100
}

const fn default_min_connections() -> u32 {
    5
}

const fn default_max_generation_attempts() -> u32 {
    5
}

const fn default_temp_password_length() -> usize {
    8
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `SHULE_ENV`)
    /// 3. Environment variables with `SHULE_` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let env = std::env::var("SHULE_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("SHULE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("SHULE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
