use engine_config::error::ConfigError;
use engine_core::error::SyncError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to load the configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Sync failed: {0}")]
    Sync(#[from] SyncError),
}
