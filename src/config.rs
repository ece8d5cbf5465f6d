// src/config.rs

use crate::{
    constants::{APP_DIR_NAME, CONFIG_FILENAME, DEFAULT_PROMPT},
    core::dispatcher::DispatchOptions,
};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Failures while locating, reading or parsing `config.toml`.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The platform has no user config directory.
    #[error("Could not find system config directory.")]
    ConfigDirNotFound,
    /// The file could not be read.
    #[error("Could not read config file '{path}': {source}")]
    Io {
        /// The file that failed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The content is not valid TOML, or has unknown keys.
    #[error("Failed to parse TOML file at '{path}': {source}")]
    TomlParse {
        /// The file that failed to parse.
        path: PathBuf,
        /// The underlying parsing error from the `toml` crate.
        #[source]
        source: toml::de::Error,
    },
}

/// Settings for the interactive shell, read from `config.toml`.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ShellConfig {
    /// Printed before each interactive line.
    pub prompt: String,
    /// The `[dispatch]` table.
    pub dispatch: DispatchOptions,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            dispatch: DispatchOptions::default(),
        }
    }
}

/// Returns `<config_dir>/verbline/config.toml`. The file may not exist.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    Ok(dirs::config_dir()
        .ok_or(ConfigError::ConfigDirNotFound)?
        .join(APP_DIR_NAME)
        .join(CONFIG_FILENAME))
}

/// Loads the shell configuration.
///
/// An explicit path must exist. Without one, the default location is tried
/// and a missing file (or a system without a config dir) yields the defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<ShellConfig, ConfigError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Ok(path) if path.is_file() => path,
            Ok(path) => {
                log::debug!("No config at '{}', using defaults.", path.display());
                return Ok(ShellConfig::default());
            }
            Err(e) => {
                log::debug!("{}; using defaults.", e);
                return Ok(ShellConfig::default());
            }
        },
    };

    log::debug!("Loading config from '{}'", path.display());
    let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    parse_config(&content, &path)
}

/// Parses config text; `path` is only used for error reporting.
pub fn parse_config(content: &str, path: &Path) -> Result<ShellConfig, ConfigError> {
    toml::from_str(content).map_err(|source| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source,
    })
}

// MARK: --- UNIT TESTS ---
