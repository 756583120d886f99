use crate::error::ConfigError;
use loader::{ConfigSource, read_raw};
use model::records::precision::Precision;
use std::{fmt, path::PathBuf, time::Duration};
use template::QueryTemplate;
use tracing::info;
use validator::SettingsValidator;

pub mod env;
pub mod loader;
pub mod raw;
pub mod template;
pub mod validator;

pub use env::EnvManager;

/// Everything one sync run needs, validated and immutable.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub influxdb: InfluxSettings,
    pub postgresql: PostgresSettings,
}

/// Destination time-series store.
#[derive(Clone, PartialEq)]
pub struct InfluxSettings {
    pub addr: String,
    pub username: String,
    pub password: String,
    pub database: String,
    pub measurement: String,
    pub precision: Precision,
    pub timeout: Option<Duration>,
}

/// Source relational database.
#[derive(Clone, PartialEq)]
pub struct PostgresSettings {
    pub driver: String,
    pub source: String,
    pub query: QueryTemplate,
}

impl SyncConfig {
    /// Reads, overrides from the process environment, and validates.
    pub fn load(source: &ConfigSource) -> Result<(Self, PathBuf), ConfigError> {
        Self::load_with_env(source, &EnvManager::new())
    }

    pub fn load_with_env(
        source: &ConfigSource,
        env: &EnvManager,
    ) -> Result<(Self, PathBuf), ConfigError> {
        let path = source.resolve()?;
        let mut raw = read_raw(&path)?;

        let overridden = env.apply(&mut raw)?;
        if !overridden.is_empty() {
            info!(variables = ?overridden, "Applied environment overrides");
        }

        let config = SettingsValidator::validate(raw)?;
        Ok((config, path))
    }
}

impl fmt::Debug for InfluxSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InfluxSettings")
            .field("addr", &self.addr)
            .field("username", &self.username)
            .field("password", &redact(&self.password))
            .field("database", &self.database)
            .field("measurement", &self.measurement)
            .field("precision", &self.precision)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl fmt::Debug for PostgresSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresSettings")
            .field("driver", &self.driver)
            .field("source", &redact(&self.source))
            .field("query", &self.query)
            .finish()
    }
}

fn redact(value: &str) -> &'static str {
    if value.is_empty() { "" } else { "***" }
}
