use crate::records::error::ParsePrecisionError;
use chrono::{DateTime, Utc};
use std::{fmt, str::FromStr};

/// Unit of the integer timestamp written with each point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Precision {
    #[default]
    Nanoseconds,
    Microseconds,
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
}

impl Precision {
    /// Value sent as the `precision` parameter of the write endpoint.
    pub fn as_str(&self) -> &'static str {
        match self {
            Precision::Nanoseconds => "ns",
            Precision::Microseconds => "u",
            Precision::Milliseconds => "ms",
            Precision::Seconds => "s",
            Precision::Minutes => "m",
            Precision::Hours => "h",
        }
    }

    /// Number of whole units since the Unix epoch, or `None` when the
    /// timestamp does not fit in an `i64` at this precision.
    pub fn timestamp(&self, ts: &DateTime<Utc>) -> Option<i64> {
        match self {
            Precision::Nanoseconds => ts.timestamp_nanos_opt(),
            Precision::Microseconds => Some(ts.timestamp_micros()),
            Precision::Milliseconds => Some(ts.timestamp_millis()),
            Precision::Seconds => Some(ts.timestamp()),
            Precision::Minutes => Some(ts.timestamp().div_euclid(60)),
            Precision::Hours => Some(ts.timestamp().div_euclid(3600)),
        }
    }
}

impl FromStr for Precision {
    type Err = ParsePrecisionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "n" | "ns" => Ok(Precision::Nanoseconds),
            "u" | "us" | "µ" | "µs" => Ok(Precision::Microseconds),
            "ms" => Ok(Precision::Milliseconds),
            "s" => Ok(Precision::Seconds),
            "m" => Ok(Precision::Minutes),
            "h" => Ok(Precision::Hours),
            other => Err(ParsePrecisionError(other.to_string())),
        }
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
