use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An InfluxQL command bound to a database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub command: String,
    pub database: String,
}

impl Query {
    pub fn new(command: impl Into<String>, database: impl Into<String>) -> Self {
        Query {
            command: command.into(),
            database: database.into(),
        }
    }
}

/// Body of a `/query` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Response {
    #[serde(default)]
    pub results: Vec<QueryResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct QueryResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statement_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub series: Vec<Series>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Series {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub tags: HashMap<String, String>,
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub values: Vec<Vec<serde_json::Value>>,
}

impl Response {
    /// First error reported anywhere in the response.
    pub fn error(&self) -> Option<&str> {
        self.error
            .as_deref()
            .or_else(|| self.results.iter().find_map(|r| r.error.as_deref()))
    }
}

impl Series {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

/// Body of a failed `/write` or `/query` call.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_series_response() {
        let body = r#"{"results":[{"statement_id":0,"series":[{"name":"cpu",
            "columns":["time","value"],"values":[["2023-01-01T00:00:00Z",42]]}]}]}"#;
        let response: Response = serde_json::from_str(body).unwrap();

        let series = &response.results[0].series[0];
        assert_eq!(series.name, "cpu");
        assert_eq!(series.column_index("time"), Some(0));
        assert_eq!(series.values[0][1], json!(42));
        assert!(response.error().is_none());
    }

    #[test]
    fn missing_series_decodes_as_empty() {
        let response: Response = serde_json::from_str(r#"{"results":[{"statement_id":0}]}"#).unwrap();
        assert!(response.results[0].series.is_empty());
    }

    #[test]
    fn surfaces_statement_errors() {
        let body = r#"{"results":[{"statement_id":0,"error":"database not found: nope"}]}"#;
        let response: Response = serde_json::from_str(body).unwrap();
        assert_eq!(response.error(), Some("database not found: nope"));
    }
}
