use crate::{
    error::ConfigError,
    settings::{
        InfluxSettings, PostgresSettings, SyncConfig,
        raw::{RawConfig, RawInfluxSection, RawPostgresSection},
        template::QueryTemplate,
    },
};
use model::records::precision::Precision;
use std::time::Duration;
use tracing::warn;

/// Turns raw settings into a `SyncConfig`, collecting every problem before
/// failing so a single run reports all of them.
pub struct SettingsValidator {
    errors: Vec<String>,
}

impl SettingsValidator {
    pub fn validate(raw: RawConfig) -> Result<SyncConfig, ConfigError> {
        let mut validator = SettingsValidator { errors: Vec::new() };

        let influxdb = validator.validate_influx(raw.influxdb);
        let postgresql = validator.validate_postgres(raw.postgresql);

        match (influxdb, postgresql) {
            (Some(influxdb), Some(postgresql)) if validator.errors.is_empty() => Ok(SyncConfig {
                influxdb,
                postgresql,
            }),
            _ => Err(ConfigError::ValidationFailed(validator.errors)),
        }
    }

    fn validate_influx(&mut self, raw: RawInfluxSection) -> Option<InfluxSettings> {
        let addr = self.required("influxdb.addr", raw.addr);
        let database = self.required("influxdb.database", raw.database);
        let measurement = self.required("influxdb.measurement", raw.measurement);

        let precision = match raw.precision.as_deref().unwrap_or_default().parse::<Precision>() {
            Ok(precision) => Some(precision),
            Err(err) => {
                self.errors.push(format!("influxdb.precision: {err}"));
                None
            }
        };

        let timeout = match raw.timeout_secs {
            Some(0) => {
                warn!("influxdb.timeout_secs is 0, requests will not time out");
                None
            }
            Some(secs) => Some(Duration::from_secs(secs)),
            None => None,
        };

        let username = raw.username.unwrap_or_default();
        let password = raw.password.unwrap_or_default();
        if username.is_empty() && !password.is_empty() {
            warn!("influxdb.password is set without influxdb.username and will be ignored");
        }

        Some(InfluxSettings {
            addr: addr?,
            username,
            password,
            database: database?,
            measurement: measurement?,
            precision: precision?,
            timeout,
        })
    }

    fn validate_postgres(&mut self, raw: RawPostgresSection) -> Option<PostgresSettings> {
        let driver = self.required("postgresql.driver", raw.driver);
        let source = self.required("postgresql.source", raw.source);
        let query = self
            .required("postgresql.query", raw.query)
            .and_then(|raw| match QueryTemplate::parse(&raw) {
                Ok(template) => Some(template),
                Err(err) => {
                    self.errors.push(format!("postgresql.query: {err}"));
                    None
                }
            });

        Some(PostgresSettings {
            driver: driver?,
            source: source?,
            query: query?,
        })
    }

    fn required(&mut self, key: &str, value: Option<String>) -> Option<String> {
        match value {
            Some(value) if !value.trim().is_empty() => Some(value),
            _ => {
                self.errors.push(format!("{key} is required"));
                None
            }
        }
    }
}
