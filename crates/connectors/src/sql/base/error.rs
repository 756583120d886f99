use thiserror::Error;

/// All errors coming from the database/query layer.
#[derive(Debug, Error)]
pub enum DbError {
    /// Any driver error while running a statement.
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    /// A column of a known type could not be decoded.
    #[error("Failed to decode column '{column}': {source}")]
    Decode {
        column: String,
        #[source]
        source: tokio_postgres::Error,
    },

    #[error("Unexpected result: {0}")]
    Unexpected(String),
}

/// Errors happening during adapter or connection setup.
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// The configured driver identifier is not one we can open.
    #[error("Unsupported driver: {0}")]
    UnsupportedDriver(String),

    /// The connection string could not be parsed.
    #[error("Invalid connection string: {0}")]
    InvalidUrl(String),

    /// Building the TLS connector failed.
    #[error("TLS error: {0}")]
    Tls(#[from] native_tls::Error),

    /// The driver failed to establish the connection.
    #[error("PostgreSQL connection failed: {0}")]
    Postgres(#[from] tokio_postgres::Error),
}
