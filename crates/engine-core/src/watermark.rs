use crate::error::WatermarkError;
use chrono::{DateTime, FixedOffset};
use connectors::influx::query::Response;
use std::fmt;

/// Watermark used when the measurement holds no points yet
/// (`2001-01-01 01:01:01`), so the first run backfills everything.
pub const SENTINEL_WATERMARK: &str = "20010101010101";

/// Compact form the source query template expects.
pub const WATERMARK_FORMAT: &str = "%Y%m%d%H%M%S";

const TIME_COLUMN: &str = "time";

/// Cutoff separating already-ingested rows from new ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Watermark {
    value: String,
    latest: Option<DateTime<FixedOffset>>,
}

impl Watermark {
    pub fn sentinel() -> Self {
        Watermark {
            value: SENTINEL_WATERMARK.to_string(),
            latest: None,
        }
    }

    /// Parses an RFC 3339 timestamp as reported by the store. The compact
    /// form keeps the offset the timestamp was reported in.
    pub fn from_rfc3339(value: &str) -> Result<Self, WatermarkError> {
        let latest =
            DateTime::parse_from_rfc3339(value).map_err(|source| WatermarkError::Parse {
                value: value.to_string(),
                source,
            })?;

        Ok(Watermark {
            value: latest.format(WATERMARK_FORMAT).to_string(),
            latest: Some(latest),
        })
    }

    /// Derives the watermark from the answer to [`latest_point_query`].
    pub fn from_response(response: &Response) -> Result<Self, WatermarkError> {
        let Some(series) = response
            .results
            .first()
            .and_then(|result| result.series.first())
        else {
            return Ok(Self::sentinel());
        };

        let Some(row) = series.values.first() else {
            return Ok(Self::sentinel());
        };

        let idx = series.column_index(TIME_COLUMN).unwrap_or(0);
        match row.get(idx) {
            Some(serde_json::Value::String(value)) => Self::from_rfc3339(value),
            Some(serde_json::Value::Null) | None => Err(WatermarkError::MissingTime),
            Some(other) => Err(WatermarkError::NotAString(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Timestamp of the latest stored point, `None` for the sentinel.
    pub fn latest(&self) -> Option<DateTime<FixedOffset>> {
        self.latest
    }
}

impl fmt::Display for Watermark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// InfluxQL selecting the single most recent point of `measurement`.
pub fn latest_point_query(measurement: &str) -> String {
    format!(
        "SELECT * FROM {} ORDER BY time DESC LIMIT 1",
        quote_identifier(measurement)
    )
}

fn quote_identifier(name: &str) -> String {
    let escaped = name.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(body: serde_json::Value) -> Response {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn formats_latest_point_time() {
        let response = response(json!({"results": [{"statement_id": 0, "series": [{
            "name": "sensor",
            "columns": ["time", "sensor", "value"],
            "values": [["2023-01-01T00:00:00Z", "sensor", 42]]
        }]}]}));

        let watermark = Watermark::from_response(&response).unwrap();
        assert_eq!(watermark.as_str(), "20230101000000");
        assert_eq!(
            watermark.latest().map(|t| t.to_rfc3339()).as_deref(),
            Some("2023-01-01T00:00:00+00:00")
        );
    }

    #[test]
    fn empty_measurement_uses_sentinel() {
        let empty = response(json!({"results": [{"statement_id": 0}]}));
        assert_eq!(Watermark::from_response(&empty).unwrap().as_str(), SENTINEL_WATERMARK);

        let no_results = response(json!({"results": []}));
        assert_eq!(Watermark::from_response(&no_results).unwrap(), Watermark::sentinel());

        let no_values = response(json!({"results": [{"series": [{
            "name": "sensor", "columns": ["time"], "values": []
        }]}]}));
        assert!(Watermark::from_response(&no_values).unwrap().latest().is_none());
    }

    #[test]
    fn keeps_reported_offset_and_drops_fraction() {
        let watermark = Watermark::from_rfc3339("2023-06-30T23:59:59.123456789+02:00").unwrap();
        assert_eq!(watermark.as_str(), "20230630235959");
    }

    #[test]
    fn rejects_unparseable_time() {
        let response = response(json!({"results": [{"series": [{
            "columns": ["time"], "values": [["yesterday"]]
        }]}]}));
        let err = Watermark::from_response(&response).unwrap_err();
        assert!(matches!(err, WatermarkError::Parse { value, .. } if value == "yesterday"));
    }

    #[test]
    fn rejects_epoch_encoded_time() {
        let response = response(json!({"results": [{"series": [{
            "columns": ["time"], "values": [[1672531200]]
        }]}]}));
        let err = Watermark::from_response(&response).unwrap_err();
        assert!(matches!(err, WatermarkError::NotAString(_)));
    }

    #[test]
    fn quotes_measurement_in_query() {
        assert_eq!(
            latest_point_query("sensor"),
            "SELECT * FROM \"sensor\" ORDER BY time DESC LIMIT 1"
        );
        assert_eq!(
            latest_point_query("my \"odd\" one"),
            "SELECT * FROM \"my \\\"odd\\\" one\" ORDER BY time DESC LIMIT 1"
        );
    }
}
