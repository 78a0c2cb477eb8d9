//! src/config.rs
//! ============================================================================
//! # Config: Application Configuration Loader and Saver
//!
//! Loads and saves settings as TOML from the platform config path using the
//! [`directories`](https://docs.rs/directories) crate. A missing file is not an
//! error: defaults are written back so the user has something to edit.
//!
//! ## Example
//! ```rust,ignore
//! let config = Config::load().await?;
//! let root = config.resolve_root_dir()?;
//! ```

use directories::{BaseDirs, ProjectDirs, UserDirs};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs as TokioFs;
use tracing::info;

use crate::error::AppError;

/// Which hidden entries the enumerator skips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HiddenPolicy {
    /// Hidden files and hidden directories are both left out.
    #[default]
    SkipAll,

    /// Only hidden directories are pruned; hidden files are still listed.
    DirectoriesOnly,
}

/// Logging output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default filter directive, overridable through `RUST_LOG`.
    pub level: String,

    /// Directory holding the rolling log files.
    pub dir: PathBuf,

    pub file_prefix: String,

    /// Mirror log lines to stderr.
    pub stderr: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: PathBuf::from("logs"),
            file_prefix: "jetfiles".to_string(),
            stderr: false,
        }
    }
}

/// Main configuration struct for the application.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Directory to list. `None` means the user's downloads directory.
    pub root_dir: Option<PathBuf>,

    pub hidden: HiddenPolicy,

    pub follow_links: bool,

    pub log: LogConfig,
}

impl Config {
    /// Parses a config from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, AppError> {
        Ok(toml::from_str(text)?)
    }

    /// Loads config from the TOML file in the app config dir, or returns defaults.
    ///
    /// The config is expected at `$XDG_CONFIG_HOME/jetfiles/config.toml`
    /// (Linux), or equivalent on Windows/macOS.
    pub async fn load() -> Result<Self, AppError> {
        let path = Self::config_path()?;
        if path.exists() {
            info!("Loading config from {}", path.display());
            let text = TokioFs::read_to_string(&path)
                .await
                .map_err(|source| AppError::ConfigIo {
                    path: path.clone(),
                    source,
                })?;

            Self::from_toml_str(&text)
        } else {
            info!(
                "No config file found at {}, using default configuration. Creating it now.",
                path.display()
            );

            let default_config = Self::default();
            default_config.save().await?;

            Ok(default_config)
        }
    }

    /// Saves config to the TOML file in the app config dir.
    pub async fn save(&self) -> Result<(), AppError> {
        let path = Self::config_path()?;

        info!("Saving config to {}", path.display());

        if let Some(parent) = path.parent() {
            TokioFs::create_dir_all(parent)
                .await
                .map_err(|source| AppError::ConfigIo {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        let toml_str = toml::to_string_pretty(self)?;
        TokioFs::write(&path, toml_str)
            .await
            .map_err(|source| AppError::ConfigIo { path, source })?;

        Ok(())
    }

    /// Returns the canonical config file path using `directories::ProjectDirs`.
    pub fn config_path() -> Result<PathBuf, AppError> {
        let proj_dirs = ProjectDirs::from("com", "wajahat", "jetfiles")
            .ok_or_else(|| AppError::Other("Could not determine config directory.".into()))?;
        Ok(proj_dirs.config_dir().join("config.toml"))
    }

    /// The directory to list: the configured one, else downloads, else home.
    pub fn resolve_root_dir(&self) -> Result<PathBuf, AppError> {
        if let Some(dir) = &self.root_dir {
            return Ok(dir.clone());
        }

        if let Some(downloads) = UserDirs::new().and_then(|u| u.download_dir().map(PathBuf::from))
        {
            return Ok(downloads);
        }

        BaseDirs::new()
            .map(|b| b.home_dir().to_path_buf())
            .ok_or_else(|| AppError::Other("Could not determine a directory to list.".into()))
    }
}
