use crate::error::SyncError;
use async_trait::async_trait;
use connectors::sql::{
    base::{driver::DriverKind, error::DbError},
    postgres::source::PgSource,
};
use engine_config::settings::PostgresSettings;
use model::records::row::RowData;
use tracing::info;

/// Where new rows come from.
#[async_trait]
pub trait RowSource: Send + Sync {
    /// Runs a rendered query and returns its rows in cursor order.
    async fn fetch_rows(&self, sql: &str) -> Result<Vec<RowData>, DbError>;
}

#[async_trait]
impl RowSource for PgSource {
    async fn fetch_rows(&self, sql: &str) -> Result<Vec<RowData>, DbError> {
        self.query_rows(sql).await
    }
}

/// Opens the source named by `postgresql.driver`.
pub async fn connect_source(settings: &PostgresSettings) -> Result<PgSource, SyncError> {
    let driver: DriverKind = settings.driver.parse()?;
    info!(%driver, "Connecting to source database");

    match driver {
        DriverKind::Postgres => Ok(PgSource::connect(&settings.source).await?),
    }
}
