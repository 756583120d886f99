//! One synchronization pass: watermark from the store, new rows from the
//! database, one batched write back to the store.

use crate::{
    connectors::{
        destination::{PointStore, connect_destination},
        source::{RowSource, connect_source},
    },
    convert::PointConverter,
    error::{SyncError, WatermarkError},
    watermark::{Watermark, latest_point_query},
};
use connectors::influx::query::Query;
use engine_config::settings::{InfluxSettings, SyncConfig};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOptions {
    /// Build the batch but skip the write.
    pub dry_run: bool,
}

/// What a finished pass did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub watermark: Watermark,
    pub query: String,
    pub rows_read: usize,
    pub points_written: usize,
    pub dry_run: bool,
}

/// Runs a full pass against the configured systems. Both connections are
/// dropped when this returns, whatever the outcome.
pub async fn run(config: &SyncConfig, options: SyncOptions) -> Result<SyncReport, SyncError> {
    let destination = connect_destination(&config.influxdb)?;
    let watermark = resolve_watermark(&destination, &config.influxdb).await?;
    let source = connect_source(&config.postgresql).await?;

    transfer(&destination, &source, config, watermark, options).await
}

/// Asks the store for its latest point in the measurement.
pub async fn resolve_watermark<D>(
    destination: &D,
    settings: &InfluxSettings,
) -> Result<Watermark, SyncError>
where
    D: PointStore + ?Sized,
{
    let query = Query::new(latest_point_query(&settings.measurement), &settings.database);
    let response = destination
        .query(&query)
        .await
        .map_err(WatermarkError::Query)?;

    let watermark = Watermark::from_response(&response)?;
    match watermark.latest() {
        Some(latest) => info!(
            measurement = %settings.measurement,
            watermark = %watermark,
            latest = %latest.to_rfc3339(),
            "Resolved watermark from latest point"
        ),
        None => info!(
            measurement = %settings.measurement,
            watermark = %watermark,
            "Measurement is empty, starting from sentinel watermark"
        ),
    }
    Ok(watermark)
}

/// Pulls rows newer than `watermark` and writes them as one batch.
pub async fn transfer<D, R>(
    destination: &D,
    source: &R,
    config: &SyncConfig,
    watermark: Watermark,
    options: SyncOptions,
) -> Result<SyncReport, SyncError>
where
    D: PointStore + ?Sized,
    R: RowSource + ?Sized,
{
    let query = config.postgresql.query.render(watermark.as_str());
    debug!(%query, "Rendered source query");

    let rows = source
        .fetch_rows(&query)
        .await
        .map_err(SyncError::SourceQuery)?;
    info!(rows = rows.len(), "Fetched source rows");

    let batch = PointConverter::new(&config.influxdb).build_batch(&rows)?;

    let points_written = if batch.is_empty() {
        info!("No new rows, nothing to write");
        0
    } else if options.dry_run {
        info!(points = batch.len(), "Dry run, skipping write");
        0
    } else {
        destination.write(&batch).await.map_err(SyncError::Write)?;
        info!(
            points = batch.len(),
            database = batch.database(),
            "Wrote batch to InfluxDB"
        );
        batch.len()
    };

    Ok(SyncReport {
        watermark,
        query,
        rows_read: rows.len(),
        points_written,
        dry_run: options.dry_run,
    })
}
