use crate::{error::ConfigError, settings::raw::RawConfig};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Base name of the configuration file.
pub const CONFIG_NAME: &str = "app";

/// Extensions tried during discovery, in order.
pub const CONFIG_EXTENSIONS: [&str; 4] = ["toml", "yaml", "yml", "json"];

/// Where configuration comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Look for `app.<ext>` inside this directory.
    Directory(PathBuf),
    /// Read exactly this file.
    File(PathBuf),
}

impl Default for ConfigSource {
    fn default() -> Self {
        ConfigSource::Directory(PathBuf::from("."))
    }
}

impl ConfigSource {
    pub fn resolve(&self) -> Result<PathBuf, ConfigError> {
        match self {
            ConfigSource::Directory(dir) => discover(dir),
            ConfigSource::File(path) => Ok(path.clone()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
    Json,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "toml" => Some(ConfigFormat::Toml),
            "yaml" | "yml" => Some(ConfigFormat::Yaml),
            "json" => Some(ConfigFormat::Json),
            _ => None,
        }
    }
}

/// Finds the first `app.<ext>` present in `dir`.
pub fn discover(dir: &Path) -> Result<PathBuf, ConfigError> {
    CONFIG_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{CONFIG_NAME}.{ext}")))
        .find(|candidate| candidate.is_file())
        .ok_or_else(|| ConfigError::NotFound {
            name: CONFIG_NAME.to_string(),
            dir: dir.to_path_buf(),
        })
}

pub fn read_raw(path: &Path) -> Result<RawConfig, ConfigError> {
    let format = ConfigFormat::from_path(path)
        .ok_or_else(|| ConfigError::UnsupportedFormat(path.to_path_buf()))?;
    debug!(path = %path.display(), ?format, "Reading configuration");

    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    parse_raw(&contents, format).map_err(|reason| ConfigError::Parse {
        path: path.to_path_buf(),
        reason,
    })
}

pub fn parse_raw(contents: &str, format: ConfigFormat) -> Result<RawConfig, String> {
    match format {
        ConfigFormat::Toml => toml::from_str(contents).map_err(|e| e.to_string()),
        ConfigFormat::Yaml => serde_yaml::from_str(contents).map_err(|e| e.to_string()),
        ConfigFormat::Json => serde_json::from_str(contents).map_err(|e| e.to_string()),
    }
}
