use crate::{
    connectors::{destination::connect_destination, source::connect_source},
    error::SyncError,
};
use engine_config::settings::SyncConfig;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthReport {
    pub influx_version: Option<String>,
}

/// Pings both systems without reading or writing any data.
pub async fn check(config: &SyncConfig) -> Result<HealthReport, SyncError> {
    let destination = connect_destination(&config.influxdb)?;
    let influx_version = destination
        .ping()
        .await
        .map_err(SyncError::DestinationConnect)?;
    info!(version = ?influx_version, "InfluxDB is reachable");

    let source = connect_source(&config.postgresql).await?;
    source.ping().await.map_err(SyncError::SourceQuery)?;
    info!("Source database is reachable");

    Ok(HealthReport { influx_version })
}
