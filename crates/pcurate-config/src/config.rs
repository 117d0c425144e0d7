use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::{ConfigError, Result},
    path::{resolve_path, xdg_config_home},
};

pub const APP_DIR: &str = "pcurate";
pub const DB_FILE: &str = "pcurate.db";
pub const FILTER_FILE: &str = "filter.txt";
pub const CONFIG_FILE: &str = "config.toml";
pub const DEFAULT_PACMAN: &str = "pacman";

/// Application's configuration
///
/// Every field is optional; unset fields fall back to files inside
/// [`config_dir`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Path of the annotation store.
    /// Default: $XDG_CONFIG_HOME/pcurate/pcurate.db
    pub db_path: Option<String>,

    /// Path of the optional filter file listing packages and groups to hide
    /// from the regular package views.
    /// Default: $XDG_CONFIG_HOME/pcurate/filter.txt
    pub filter_path: Option<String>,

    /// Package manager executable used to query installed packages.
    /// Default: pacman
    pub pacman: Option<String>,
}

/// Returns the pcurate configuration directory.
pub fn config_dir() -> Result<PathBuf> {
    Ok(xdg_config_home()?.join(APP_DIR))
}

/// Returns the configuration file location, honouring `PCURATE_CONFIG`.
pub fn config_file_path() -> Result<PathBuf> {
    match std::env::var("PCURATE_CONFIG") {
        Ok(path) => Ok(resolve_path(&path)?),
        Err(_) => Ok(config_dir()?.join(CONFIG_FILE)),
    }
}

impl Config {
    /// Loads the configuration from `path`, or from [`config_file_path`].
    ///
    /// A missing file yields the default configuration.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => config_file_path()?,
        };

        let config = match fs::read_to_string(&path) {
            Ok(content) => {
                debug!(path = %path.display(), "loading configuration");
                toml::from_str(&content)?
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "configuration file not found, using defaults");
                Self::default()
            }
            Err(err) => {
                return Err(ConfigError::ReadError {
                    path,
                    source: err,
                })
            }
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.pacman.as_deref().is_some_and(|p| p.trim().is_empty()) {
            return Err(ConfigError::EmptyPacmanCommand);
        }
        Ok(())
    }

    pub fn get_db_path(&self) -> Result<PathBuf> {
        if let Ok(env_path) = std::env::var("PCURATE_DB") {
            return Ok(resolve_path(&env_path)?);
        }
        if let Some(db_path) = &self.db_path {
            return Ok(resolve_path(db_path)?);
        }
        Ok(config_dir()?.join(DB_FILE))
    }

    pub fn get_filter_path(&self) -> Result<PathBuf> {
        if let Ok(env_path) = std::env::var("PCURATE_FILTER") {
            return Ok(resolve_path(&env_path)?);
        }
        if let Some(filter_path) = &self.filter_path {
            return Ok(resolve_path(filter_path)?);
        }
        Ok(config_dir()?.join(FILTER_FILE))
    }

    pub fn pacman(&self) -> &str {
        self.pacman.as_deref().unwrap_or(DEFAULT_PACMAN)
    }

    /// Creates the directory holding the annotation store.
    pub fn ensure_dirs(&self) -> Result<()> {
        let db_path = self.get_db_path()?;
        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                ConfigError::CreateDirError {
                    path: parent.to_path_buf(),
                    source: err,
                }
            })?;
        }
        Ok(())
    }
}
