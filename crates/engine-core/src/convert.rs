use crate::error::{RowShapeError, SyncError};
use chrono::{DateTime, Utc};
use engine_config::settings::InfluxSettings;
use model::{
    core::value::Value,
    records::{batch::BatchPoints, error::PointError, point::Point, row::RowData},
};
use std::collections::BTreeMap;

/// Column every source row must carry; it becomes the point timestamp.
pub const TIME_COLUMN: &str = "time";

/// Maps source rows onto points of one measurement.
///
/// Each point is tagged `{measurement: measurement}` and carries every
/// column of the row as a field, `time` included.
pub struct PointConverter<'a> {
    settings: &'a InfluxSettings,
    tags: BTreeMap<String, String>,
}

impl<'a> PointConverter<'a> {
    pub fn new(settings: &'a InfluxSettings) -> Self {
        let measurement = settings.measurement.clone();
        PointConverter {
            settings,
            tags: BTreeMap::from([(measurement.clone(), measurement)]),
        }
    }

    pub fn convert(&self, index: usize, row: &RowData) -> Result<Point, SyncError> {
        let time = row_time(index, row)?;

        if self.settings.precision.timestamp(&time).is_none() {
            return Err(SyncError::Point {
                row: index,
                source: PointError::TimestampOutOfRange(time.to_rfc3339()),
            });
        }

        let fields = row
            .field_values
            .iter()
            .map(|field| (field.name.clone(), field.value.clone()))
            .collect();

        Point::new(&self.settings.measurement, self.tags.clone(), fields, time)
            .map_err(|source| SyncError::Point { row: index, source })
    }

    /// Converts every row, in order, into one batch.
    pub fn build_batch(&self, rows: &[RowData]) -> Result<BatchPoints, SyncError> {
        let mut batch = BatchPoints::new(&self.settings.database, self.settings.precision);
        for (index, row) in rows.iter().enumerate() {
            batch.add_point(self.convert(index, row)?);
        }
        Ok(batch)
    }
}

fn row_time(index: usize, row: &RowData) -> Result<DateTime<Utc>, RowShapeError> {
    let field = row
        .get(TIME_COLUMN)
        .ok_or(RowShapeError::MissingTime { row: index })?;

    match &field.value {
        Value::Timestamp(ts) => Ok(*ts),
        Value::Null if field.data_type.is_timestamp() => Err(RowShapeError::NullTime { row: index }),
        _ => Err(RowShapeError::TimeNotTimestamp {
            row: index,
            found: field.data_type.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use model::{
        core::{data_type::DataType, value::FieldValue},
        records::precision::Precision,
    };

    fn settings() -> InfluxSettings {
        InfluxSettings {
            addr: "http://localhost:8086".to_string(),
            username: String::new(),
            password: String::new(),
            database: "metrics".to_string(),
            measurement: "sensor".to_string(),
            precision: Precision::Seconds,
            timeout: None,
        }
    }

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 1, 2, 0, 0, 0).unwrap()
    }

    #[test]
    fn row_becomes_self_tagged_point() {
        let row = RowData::new(vec![
            FieldValue::new("time", Value::Timestamp(ts()), DataType::TimestampTz),
            FieldValue::new("value", Value::Int(42), DataType::Int),
        ]);
        let settings = settings();
        let point = PointConverter::new(&settings).convert(0, &row).unwrap();

        assert_eq!(point.measurement(), "sensor");
        assert_eq!(
            point.tags(),
            &BTreeMap::from([("sensor".to_string(), "sensor".to_string())])
        );
        assert_eq!(point.field("value"), Some(&Value::Int(42)));
        assert_eq!(point.field("time"), Some(&Value::Timestamp(ts())));
        assert_eq!(point.time(), ts());
    }

    #[test]
    fn missing_time_column_is_a_shape_error() {
        let row = RowData::new(vec![FieldValue::new("value", Value::Int(1), DataType::Int)]);
        let settings = settings();
        let err = PointConverter::new(&settings).convert(3, &row).unwrap_err();
        assert!(matches!(
            err,
            SyncError::RowShape(RowShapeError::MissingTime { row: 3 })
        ));
    }

    #[test]
    fn textual_time_column_is_rejected() {
        let row = RowData::new(vec![FieldValue::new(
            "time",
            Value::String("2023-01-02T00:00:00Z".to_string()),
            DataType::String,
        )]);
        let settings = settings();
        let err = PointConverter::new(&settings).convert(0, &row).unwrap_err();
        assert!(matches!(
            err,
            SyncError::RowShape(RowShapeError::TimeNotTimestamp {
                row: 0,
                found: DataType::String
            })
        ));
    }

    #[test]
    fn null_time_is_reported_as_such() {
        let row = RowData::new(vec![
            FieldValue::new("time", Value::Null, DataType::Timestamp),
            FieldValue::new("value", Value::Int(1), DataType::Int),
        ]);
        let settings = settings();
        let err = PointConverter::new(&settings).convert(1, &row).unwrap_err();
        assert!(matches!(
            err,
            SyncError::RowShape(RowShapeError::NullTime { row: 1 })
        ));
    }

    #[test]
    fn nanosecond_overflow_fails_at_conversion() {
        let far = Utc.with_ymd_and_hms(2300, 1, 1, 0, 0, 0).unwrap();
        let row = RowData::new(vec![FieldValue::new(
            "time",
            Value::Timestamp(far),
            DataType::TimestampTz,
        )]);
        let mut settings = settings();
        settings.precision = Precision::Nanoseconds;

        let err = PointConverter::new(&settings).convert(0, &row).unwrap_err();
        assert!(matches!(
            err,
            SyncError::Point {
                row: 0,
                source: PointError::TimestampOutOfRange(_)
            }
        ));
    }

    #[test]
    fn batch_preserves_row_count_and_order() {
        let rows: Vec<RowData> = (0..3)
            .map(|i| {
                RowData::new(vec![
                    FieldValue::new(
                        "time",
                        Value::Timestamp(ts() + chrono::Duration::seconds(i)),
                        DataType::TimestampTz,
                    ),
                    FieldValue::new("value", Value::Int(i), DataType::Long),
                ])
            })
            .collect();
        let settings = settings();

        let batch = PointConverter::new(&settings).build_batch(&rows).unwrap();
        assert_eq!(batch.len(), 3);
        assert_eq!(batch.database(), "metrics");
        let values: Vec<_> = batch.points().iter().map(|p| p.field("value").cloned()).collect();
        assert_eq!(
            values,
            vec![Some(Value::Int(0)), Some(Value::Int(1)), Some(Value::Int(2))]
        );
    }
}
