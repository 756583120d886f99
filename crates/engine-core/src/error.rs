use connectors::{
    influx::error::InfluxError,
    sql::base::error::{ConnectorError, DbError},
};
use model::{core::data_type::DataType, records::error::PointError};
use thiserror::Error;

/// Every way a sync run can fail. None of them are retried.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Failed to set up InfluxDB client: {0}")]
    DestinationConnect(#[source] InfluxError),

    #[error("Failed to determine watermark: {0}")]
    Watermark(#[from] WatermarkError),

    #[error("Failed to connect to source database: {0}")]
    SourceConnect(#[from] ConnectorError),

    #[error("Source query failed: {0}")]
    SourceQuery(#[source] DbError),

    #[error("Invalid source row: {0}")]
    RowShape(#[from] RowShapeError),

    #[error("Failed to build point from row {row}: {source}")]
    Point {
        row: usize,
        #[source]
        source: PointError,
    },

    #[error("Failed to write batch to InfluxDB: {0}")]
    Write(#[source] InfluxError),
}

#[derive(Debug, Error)]
pub enum WatermarkError {
    #[error("latest point query failed: {0}")]
    Query(#[source] InfluxError),

    #[error("latest point has no time value")]
    MissingTime,

    #[error("latest point time is not a string: {0}")]
    NotAString(String),

    #[error("cannot parse latest point time '{value}': {source}")]
    Parse {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// The source row does not carry a usable `time` column.
#[derive(Debug, Error, PartialEq)]
pub enum RowShapeError {
    #[error("row {row} has no 'time' column")]
    MissingTime { row: usize },

    #[error("row {row} has a NULL 'time' value")]
    NullTime { row: usize },

    #[error("row {row}: 'time' column must be a timestamp, found {found}")]
    TimeNotTimestamp { row: usize, found: DataType },
}
