use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while locating, reading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No configuration file named '{name}.{{toml,yaml,yml,json}}' found in {}", .dir.display())]
    NotFound { name: String, dir: PathBuf },

    #[error("Failed to read configuration file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported configuration format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("Failed to parse configuration file {}: {reason}", .path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("Invalid value in environment variable {var}: {reason}")]
    InvalidEnv { var: String, reason: String },

    #[error("Invalid configuration: {}", .0.join("; "))]
    ValidationFailed(Vec<String>),
}

/// Problems with the source query template.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("query template has no %s placeholder for the watermark")]
    NoPlaceholder,

    #[error("query template has {0} %s placeholders, expected exactly one")]
    TooManyPlaceholders(usize),

    #[error("query template has unsupported verb '%{verb}' at byte {position}")]
    UnsupportedVerb { verb: char, position: usize },

    #[error("query template ends with a lone '%'")]
    TrailingPercent,
}
