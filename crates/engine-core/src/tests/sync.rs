use super::mocks::{MockSource, MockStore, config, reading, utc};
use crate::{
    error::{RowShapeError, SyncError, WatermarkError},
    sync::{SyncOptions, resolve_watermark, transfer},
    watermark::{SENTINEL_WATERMARK, Watermark},
};
use connectors::influx::error::InfluxError;
use model::{
    core::{
        data_type::DataType,
        value::{FieldValue, Value},
    },
    records::row::RowData,
};
use tracing_test::traced_test;

async fn sync_once(
    store: &MockStore,
    source: &MockSource,
    options: SyncOptions,
) -> Result<crate::sync::SyncReport, SyncError> {
    let config = config();
    let watermark = resolve_watermark(store, &config.influxdb).await?;
    transfer(store, source, &config, watermark, options).await
}

#[tokio::test]
async fn latest_point_drives_the_watermark() {
    let store = MockStore::with_latest("2023-01-01T00:00:00Z");
    let source = MockSource::with_rows(vec![reading(utc(2023, 1, 2), 42)]);

    let report = sync_once(&store, &source, SyncOptions::default())
        .await
        .unwrap();

    assert_eq!(report.watermark.as_str(), "20230101000000");
    assert_eq!(
        source.last_query().as_deref(),
        Some("SELECT * FROM t WHERE time > '20230101000000'")
    );

    let queries = store.queries.lock().unwrap();
    assert_eq!(
        queries[0].command,
        "SELECT * FROM \"sensor\" ORDER BY time DESC LIMIT 1"
    );
    assert_eq!(queries[0].database, "metrics");
}

#[tokio::test]
#[traced_test]
async fn resolved_watermark_logs_latest_point_time() {
    let store = MockStore::with_latest("2023-01-01T00:00:00Z");

    let watermark = resolve_watermark(&store, &config().influxdb).await.unwrap();

    assert_eq!(
        watermark.latest().map(|t| t.to_rfc3339()).as_deref(),
        Some("2023-01-01T00:00:00+00:00")
    );
    assert!(logs_contain("latest=2023-01-01T00:00:00+00:00"));
}

#[tokio::test]
async fn single_row_becomes_single_point() {
    let store = MockStore::with_latest("2023-01-01T00:00:00Z");
    let source = MockSource::with_rows(vec![reading(utc(2023, 1, 2), 42)]);

    let report = sync_once(&store, &source, SyncOptions::default())
        .await
        .unwrap();
    assert_eq!(report.rows_read, 1);
    assert_eq!(report.points_written, 1);

    let writes = store.writes.lock().unwrap();
    assert_eq!(writes.len(), 1);
    let batch = &writes[0];
    assert_eq!(batch.len(), 1);

    let point = &batch.points()[0];
    assert_eq!(point.measurement(), "sensor");
    assert_eq!(point.tags().get("sensor").map(String::as_str), Some("sensor"));
    assert_eq!(point.field("value"), Some(&Value::Int(42)));
    assert_eq!(point.field("time"), Some(&Value::Timestamp(utc(2023, 1, 2))));
    assert_eq!(point.time(), utc(2023, 1, 2));
    assert_eq!(
        batch.to_line_protocol().unwrap(),
        "sensor,sensor=sensor time=\"2023-01-02T00:00:00Z\",value=42i 1672617600"
    );
}

#[tokio::test]
async fn empty_destination_backfills_from_sentinel() {
    let store = MockStore::default();
    let source = MockSource::with_rows(vec![reading(utc(2001, 6, 1), 1)]);

    let report = sync_once(&store, &source, SyncOptions::default())
        .await
        .unwrap();

    assert_eq!(report.watermark, Watermark::sentinel());
    assert_eq!(
        source.last_query().as_deref(),
        Some(format!("SELECT * FROM t WHERE time > '{SENTINEL_WATERMARK}'").as_str())
    );
    assert_eq!(store.write_count(), 1);
}

#[tokio::test]
async fn batch_matches_row_count() {
    let rows: Vec<RowData> = (1..=5)
        .map(|day| reading(utc(2023, 2, day), i64::from(day)))
        .collect();
    let store = MockStore::with_latest("2023-01-31T00:00:00Z");
    let source = MockSource::with_rows(rows);

    let report = sync_once(&store, &source, SyncOptions::default())
        .await
        .unwrap();

    assert_eq!(report.rows_read, 5);
    assert_eq!(report.points_written, 5);
    let writes = store.writes.lock().unwrap();
    let values: Vec<_> = writes[0]
        .points()
        .iter()
        .map(|p| p.field("value").cloned())
        .collect();
    assert_eq!(values, (1..=5).map(|v| Some(Value::Int(v))).collect::<Vec<_>>());
}

#[tokio::test]
async fn no_new_rows_means_no_write() {
    let store = MockStore::with_latest("2023-01-02T00:00:00Z");
    let source = MockSource::default();

    let report = sync_once(&store, &source, SyncOptions::default())
        .await
        .unwrap();

    assert_eq!(report.rows_read, 0);
    assert_eq!(report.points_written, 0);
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn dry_run_builds_but_does_not_write() {
    let store = MockStore::with_latest("2023-01-01T00:00:00Z");
    let source = MockSource::with_rows(vec![reading(utc(2023, 1, 2), 42)]);

    let report = sync_once(&store, &source, SyncOptions { dry_run: true })
        .await
        .unwrap();

    assert!(report.dry_run);
    assert_eq!(report.rows_read, 1);
    assert_eq!(report.points_written, 0);
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
#[traced_test]
async fn rejected_write_fails_once_without_retry() {
    let store = MockStore {
        reject_writes: true,
        ..MockStore::with_latest("2023-01-01T00:00:00Z")
    };
    let source = MockSource::with_rows(vec![reading(utc(2023, 1, 2), 42)]);

    let err = sync_once(&store, &source, SyncOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SyncError::Write(InfluxError::WriteRejected { status: 503, .. })
    ));
    assert_eq!(store.write_count(), 1);
    assert!(!logs_contain("Wrote batch to InfluxDB"));
}

#[tokio::test]
async fn watermark_query_failure_stops_before_source() {
    let store = MockStore {
        query_error: Some("database not found: metrics".to_string()),
        ..Default::default()
    };
    let source = MockSource::default();

    let err = sync_once(&store, &source, SyncOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SyncError::Watermark(WatermarkError::Query(InfluxError::Query(_)))
    ));
    assert!(source.last_query().is_none());
}

#[tokio::test]
async fn unparseable_latest_time_is_fatal() {
    let store = MockStore::with_latest("01/01/2023");
    let source = MockSource::default();

    let err = sync_once(&store, &source, SyncOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SyncError::Watermark(WatermarkError::Parse { .. })
    ));
    assert!(source.last_query().is_none());
}

#[tokio::test]
async fn source_query_failure_is_reported() {
    let store = MockStore::default();
    let source = MockSource {
        fail: true,
        ..Default::default()
    };

    let err = sync_once(&store, &source, SyncOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::SourceQuery(_)));
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn one_bad_row_aborts_the_whole_batch() {
    let bad = RowData::new(vec![FieldValue::new(
        "created_at",
        Value::Timestamp(utc(2023, 1, 3)),
        DataType::TimestampTz,
    )]);
    let store = MockStore::with_latest("2023-01-01T00:00:00Z");
    let source = MockSource::with_rows(vec![reading(utc(2023, 1, 2), 1), bad]);

    let err = sync_once(&store, &source, SyncOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SyncError::RowShape(RowShapeError::MissingTime { row: 1 })
    ));
    assert_eq!(store.write_count(), 0);
}
