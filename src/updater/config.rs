//! Configuration for the update checker.
//!
//! Lives under the `[updater]` table of the global configuration file:
//!
//! ```toml
//! [updater]
//! enabled = true
//! feed_url = "https://github.com/AridityTeam/BetaFortressClient-Releases"
//! diagnostic_log = "bfclient.updater.exception.log"
//! surface_errors = false
//! feed_timeout_secs = 30
//! ```

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{DEFAULT_BIN_NAME, DEFAULT_DIAGNOSTIC_LOG, DEFAULT_FEED_URL};

/// Settings controlling how update checks run and how their failures are handled.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdaterConfig {
    /// Run update checks at all. When `false` the check is skipped without
    /// touching the network.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// GitHub repository URL hosting the releases.
    #[serde(default = "default_feed_url")]
    pub feed_url: String,

    /// Binary name inside release assets.
    #[serde(default = "default_bin_name")]
    pub bin_name: String,

    /// Where the diagnostic report is written when a check fails.
    #[serde(default = "default_diagnostic_log")]
    pub diagnostic_log: PathBuf,

    /// Return failures to the caller instead of writing a diagnostic report.
    #[serde(default)]
    pub surface_errors: bool,

    /// Upper bound on the feed query. Unset means wait indefinitely.
    #[serde(default)]
    pub feed_timeout_secs: Option<u64>,
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            feed_url: default_feed_url(),
            bin_name: default_bin_name(),
            diagnostic_log: default_diagnostic_log(),
            surface_errors: false,
            feed_timeout_secs: None,
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_feed_url() -> String {
    DEFAULT_FEED_URL.to_string()
}

fn default_bin_name() -> String {
    DEFAULT_BIN_NAME.to_string()
}

fn default_diagnostic_log() -> PathBuf {
    PathBuf::from(DEFAULT_DIAGNOSTIC_LOG)
}

impl UpdaterConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// The failure policy these settings select.
    #[must_use]
    pub fn failure_policy(&self) -> FailurePolicy {
        if self.surface_errors {
            FailurePolicy::Surface
        } else {
            FailurePolicy::Report
        }
    }

    /// Feed timeout as a [`Duration`], if one is configured.
    #[must_use]
    pub fn feed_timeout(&self) -> Option<Duration> {
        self.feed_timeout_secs.map(Duration::from_secs)
    }
}

/// What happens to a failure caught at the checker's outer boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Developer context: return the failure wrapped with context.
    Surface,
    /// Release context: log it, write a diagnostic report, show a generic dialog.
    Report,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = UpdaterConfig::default();
        assert!(config.enabled);
        assert_eq!(config.feed_url, DEFAULT_FEED_URL);
        assert_eq!(config.diagnostic_log, PathBuf::from("bfclient.updater.exception.log"));
        assert_eq!(config.failure_policy(), FailurePolicy::Report);
        assert!(config.feed_timeout().is_none());
    }

    #[test]
    fn test_partial_table_fills_defaults() {
        let config: UpdaterConfig = toml::from_str("surface_errors = true\nfeed_timeout_secs = 15").unwrap();
        assert!(config.enabled);
        assert_eq!(config.failure_policy(), FailurePolicy::Surface);
        assert_eq!(config.feed_timeout(), Some(Duration::from_secs(15)));
        assert_eq!(config.bin_name, "bfclient");
    }
}
