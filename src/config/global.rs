//! Global configuration for bfclient.
//!
//! The configuration file is TOML, stored per user:
//!
//! - **Unix/macOS**: `~/.bfclient/config.toml`
//! - **Windows**: `%LOCALAPPDATA%\bfclient\config.toml`
//!
//! `BFCLIENT_CONFIG_PATH` overrides the location. A missing file means defaults.
//!
//! ```toml
//! [updater]
//! feed_url = "https://github.com/AridityTeam/BetaFortressClient-Releases"
//! surface_errors = false
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::constants::CONFIG_PATH_ENV;
use crate::updater::config::UpdaterConfig;

/// User-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
pub struct GlobalConfig {
    /// Update checker settings.
    #[serde(default)]
    pub updater: UpdaterConfig,
}

impl GlobalConfig {
    /// Load from `path` when given, otherwise from the default location.
    /// A missing file yields defaults.
    ///
    /// # Errors
    ///
    /// Fails when the file exists but cannot be read or parsed.
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => Self::default_path()?,
        };

        if path.exists() {
            Self::load_from(&path).await
        } else {
            debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load from a specific file.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&content).with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Location of the configuration file.
    pub fn default_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        let config_dir = if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine local data directory"))?
                .join("bfclient")
        } else {
            dirs::home_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?
                .join(".bfclient")
        };

        Ok(config_dir.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_partial_file_keeps_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        tokio::fs::write(&path, "[updater]\nsurface_errors = true\nfeed_timeout_secs = 10\n").await.unwrap();

        let mut expected = GlobalConfig::default();
        expected.updater.surface_errors = true;
        expected.updater.feed_timeout_secs = Some(10);

        let loaded = GlobalConfig::load_with_optional(Some(path)).await.unwrap();
        assert_eq!(loaded, expected);
    }

    #[tokio::test]
    async fn test_missing_file_is_default() {
        let temp = TempDir::new().unwrap();
        let config = GlobalConfig::load_with_optional(Some(temp.path().join("absent.toml"))).await.unwrap();
        assert_eq!(config, GlobalConfig::default());
    }

    #[tokio::test]
    async fn test_invalid_toml_is_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        tokio::fs::write(&path, "[updater\nenabled = ").await.unwrap();

        let err = GlobalConfig::load_from(&path).await.unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[tokio::test]
    #[serial]
    async fn test_env_override_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("custom.toml");
        tokio::fs::write(&path, "[updater]\nenabled = false\n").await.unwrap();

        unsafe {
            std::env::set_var(CONFIG_PATH_ENV, &path);
        }
        let default_path = GlobalConfig::default_path().unwrap();
        let config = GlobalConfig::load_with_optional(None).await.unwrap();
        unsafe {
            std::env::remove_var(CONFIG_PATH_ENV);
        }

        assert_eq!(default_path, path);
        assert!(!config.updater.enabled);
    }
}
