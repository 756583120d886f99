use crate::error::SyncError;
use async_trait::async_trait;
use connectors::influx::{
    client::{HttpConfig, InfluxClient},
    error::InfluxError,
    query::{Query, Response},
};
use engine_config::settings::InfluxSettings;
use model::records::batch::BatchPoints;
use tracing::info;

/// The time-series store points are written to.
#[async_trait]
pub trait PointStore: Send + Sync {
    async fn query(&self, query: &Query) -> Result<Response, InfluxError>;

    /// Writes the batch in one call; it is either accepted whole or rejected.
    async fn write(&self, batch: &BatchPoints) -> Result<(), InfluxError>;
}

#[async_trait]
impl PointStore for InfluxClient {
    async fn query(&self, query: &Query) -> Result<Response, InfluxError> {
        InfluxClient::query(self, query).await
    }

    async fn write(&self, batch: &BatchPoints) -> Result<(), InfluxError> {
        InfluxClient::write(self, batch).await
    }
}

pub fn connect_destination(settings: &InfluxSettings) -> Result<InfluxClient, SyncError> {
    info!(addr = %settings.addr, database = %settings.database, "Connecting to InfluxDB");

    InfluxClient::new(HttpConfig {
        addr: settings.addr.clone(),
        username: settings.username.clone(),
        password: settings.password.clone(),
        user_agent: None,
        timeout: settings.timeout,
    })
    .map_err(SyncError::DestinationConnect)
}
