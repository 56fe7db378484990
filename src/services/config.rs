use crate::domain::constants::DEFAULT_CONFIG_PATH;
use crate::domain::models::ScanParams;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    Missing(String),
    #[error("cannot read config {path}: {source}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Invalid {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug)]
pub struct LoadedConfig {
    /// The file the values came from, if any.
    pub path: Option<PathBuf>,
    pub params: ScanParams,
}

/// Loads scan parameters. An explicitly named file must exist; the default
/// location is optional and falls back to built-in defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
    let (path, required) = match explicit {
        Some(p) => (p.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_PATH), false),
    };
    let shown = path.display().to_string();

    if !path.exists() {
        if required {
            return Err(ConfigError::Missing(shown));
        }
        info!(file = %shown, "no config file, using defaults");
        return Ok(LoadedConfig {
            path: None,
            params: ScanParams::default(),
        });
    }

    let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::Unreadable {
        path: shown.clone(),
        source,
    })?;
    let params = parse_config(&raw).map_err(|source| ConfigError::Invalid {
        path: shown.clone(),
        source,
    })?;
    info!(file = %shown, "using config file");
    Ok(LoadedConfig {
        path: Some(path),
        params,
    })
}

pub fn parse_config(raw: &str) -> Result<ScanParams, toml::de::Error> {
    toml::from_str(raw)
}
