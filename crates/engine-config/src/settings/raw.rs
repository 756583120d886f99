use serde::Deserialize;

/// Configuration exactly as read from disk, before validation.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct RawConfig {
    #[serde(default)]
    pub influxdb: RawInfluxSection,
    #[serde(default)]
    pub postgresql: RawPostgresSection,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct RawInfluxSection {
    pub addr: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub database: Option<String>,
    pub measurement: Option<String>,
    pub precision: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct RawPostgresSection {
    pub driver: Option<String>,
    pub source: Option<String>,
    pub query: Option<String>,
}
