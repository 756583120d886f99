use crate::sql::base::error::ConnectorError;
use std::{fmt, str::FromStr};

/// Source drivers the sync can open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverKind {
    Postgres,
}

impl FromStr for DriverKind {
    type Err = ConnectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pg" | "postgres" | "postgresql" => Ok(DriverKind::Postgres),
            other => Err(ConnectorError::UnsupportedDriver(other.to_string())),
        }
    }
}

impl fmt::Display for DriverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverKind::Postgres => f.write_str("postgres"),
        }
    }
}
