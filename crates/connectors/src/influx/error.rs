use model::records::error::PointError;
use thiserror::Error;

/// Errors raised by the InfluxDB HTTP client.
#[derive(Debug, Error)]
pub enum InfluxError {
    /// The configured address is not a usable HTTP(S) URL.
    #[error("Invalid InfluxDB address '{addr}': {reason}")]
    InvalidAddress { addr: String, reason: String },

    /// Transport-level failure (DNS, connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered the query with an error message.
    #[error("Query error: {0}")]
    Query(String),

    /// The server answered with a non-success status and no decodable error.
    #[error("Received status code {status} from server: {body}")]
    Status { status: u16, body: String },

    /// The response body was not the JSON the query API returns.
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The server refused the batch.
    #[error("Write rejected with status {status}: {message}")]
    WriteRejected { status: u16, message: String },

    /// A point in the batch could not be encoded.
    #[error("Point encoding error: {0}")]
    Point(#[from] PointError),
}
