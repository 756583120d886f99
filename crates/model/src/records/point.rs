use crate::{
    core::{
        utils::{escape_key, escape_measurement, quote_string_field},
        value::Value,
    },
    records::{error::PointError, precision::Precision},
};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// A single timestamped record for the time-series store.
///
/// Tags and fields are kept sorted by key, which is the order the store
/// prefers on the wire. `Null` fields are dropped at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    measurement: String,
    tags: BTreeMap<String, String>,
    fields: BTreeMap<String, Value>,
    time: DateTime<Utc>,
}

impl Point {
    pub fn new(
        measurement: &str,
        tags: BTreeMap<String, String>,
        fields: BTreeMap<String, Value>,
        time: DateTime<Utc>,
    ) -> Result<Self, PointError> {
        if measurement.is_empty() {
            return Err(PointError::EmptyMeasurement);
        }

        if let Some((key, _)) = tags.iter().find(|(k, v)| k.is_empty() || v.is_empty()) {
            return Err(PointError::EmptyTag(key.clone()));
        }

        let fields: BTreeMap<String, Value> = fields
            .into_iter()
            .filter(|(_, value)| !value.is_null())
            .collect();

        if fields.is_empty() {
            return Err(PointError::NoFields);
        }

        if let Some((key, _)) = fields
            .iter()
            .find(|(_, value)| matches!(value, Value::Float(f) if !f.is_finite()))
        {
            return Err(PointError::NonFiniteField(key.clone()));
        }

        Ok(Point {
            measurement: measurement.to_string(),
            tags,
            fields,
            time,
        })
    }

    pub fn measurement(&self) -> &str {
        &self.measurement
    }

    pub fn tags(&self) -> &BTreeMap<String, String> {
        &self.tags
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn time(&self) -> DateTime<Utc> {
        self.time
    }

    /// Encodes the point as one line of line protocol.
    pub fn to_line(&self, precision: Precision) -> Result<String, PointError> {
        let timestamp = precision
            .timestamp(&self.time)
            .ok_or_else(|| PointError::TimestampOutOfRange(self.time.to_rfc3339()))?;

        let mut line = escape_measurement(&self.measurement);
        for (key, value) in &self.tags {
            line.push(',');
            line.push_str(&escape_key(key));
            line.push('=');
            line.push_str(&escape_key(value));
        }

        line.push(' ');
        let fields = self
            .fields
            .iter()
            .map(|(key, value)| format!("{}={}", escape_key(key), encode_field_value(value)))
            .collect::<Vec<_>>()
            .join(",");
        line.push_str(&fields);

        line.push(' ');
        line.push_str(&timestamp.to_string());
        Ok(line)
    }
}

fn encode_field_value(value: &Value) -> String {
    match value {
        Value::Int(v) => format!("{v}i"),
        Value::Float(v) => v.to_string(),
        Value::Boolean(v) => v.to_string(),
        other => quote_string_field(&other.to_string()),
    }
}
