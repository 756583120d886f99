use thiserror::Error;

/// Errors raised while building or encoding a point.
#[derive(Debug, Error, PartialEq)]
pub enum PointError {
    #[error("Point measurement must not be empty")]
    EmptyMeasurement,

    #[error("Tag keys and values must not be empty (key: '{0}')")]
    EmptyTag(String),

    #[error("Point must have at least one non-null field")]
    NoFields,

    #[error("Field '{0}' is not a finite number")]
    NonFiniteField(String),

    #[error("Timestamp {0} cannot be represented at the requested precision")]
    TimestampOutOfRange(String),
}

#[derive(Debug, Error, PartialEq)]
#[error("Unknown write precision '{0}' (expected one of ns, u, ms, s, m, h)")]
pub struct ParsePrecisionError(pub String);
