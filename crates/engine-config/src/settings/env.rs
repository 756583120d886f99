use crate::{error::ConfigError, settings::raw::RawConfig};
use std::collections::HashMap;

/// Prefix of environment variables that override file settings.
pub const ENV_PREFIX: &str = "PG2INFLUX";

/// Environment overrides, e.g. `PG2INFLUX_INFLUXDB_PASSWORD`.
#[derive(Debug, Clone, Default)]
pub struct EnvManager {
    vars: HashMap<String, String>,
}

impl EnvManager {
    /// Captures the process environment.
    pub fn new() -> Self {
        Self::from_vars(std::env::vars())
    }

    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let prefix = format!("{ENV_PREFIX}_");
        let vars = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(k, _)| k.starts_with(&prefix))
            .collect();
        EnvManager { vars }
    }

    pub fn var_name(section: &str, key: &str) -> String {
        format!(
            "{ENV_PREFIX}_{}_{}",
            section.to_uppercase(),
            key.to_uppercase()
        )
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.vars
            .get(&Self::var_name(section, key))
            .map(String::as_str)
    }

    /// Applies every override present and returns the variable names used.
    pub fn apply(&self, raw: &mut RawConfig) -> Result<Vec<String>, ConfigError> {
        let mut applied = Vec::new();

        {
            let influx = &mut raw.influxdb;
            let string_keys: [(&str, &mut Option<String>); 6] = [
                ("addr", &mut influx.addr),
                ("username", &mut influx.username),
                ("password", &mut influx.password),
                ("database", &mut influx.database),
                ("measurement", &mut influx.measurement),
                ("precision", &mut influx.precision),
            ];
            for (key, slot) in string_keys {
                if let Some(value) = self.get("influxdb", key) {
                    *slot = Some(value.to_string());
                    applied.push(Self::var_name("influxdb", key));
                }
            }

            if let Some(value) = self.get("influxdb", "timeout_secs") {
                let var = Self::var_name("influxdb", "timeout_secs");
                let secs = value.trim().parse::<u64>().map_err(|e| ConfigError::InvalidEnv {
                    var: var.clone(),
                    reason: e.to_string(),
                })?;
                influx.timeout_secs = Some(secs);
                applied.push(var);
            }
        }

        let postgres = &mut raw.postgresql;
        let string_keys: [(&str, &mut Option<String>); 3] = [
            ("driver", &mut postgres.driver),
            ("source", &mut postgres.source),
            ("query", &mut postgres.query),
        ];
        for (key, slot) in string_keys {
            if let Some(value) = self.get("postgresql", key) {
                *slot = Some(value.to_string());
                applied.push(Self::var_name("postgresql", key));
            }
        }

        Ok(applied)
    }
}
