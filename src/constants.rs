//! Global constants used throughout the bfclient codebase.
//!
//! Dialog text, default locations, and environment variable names live here so
//! the updater, the CLI, and the tests agree on them.

/// Human-readable application name, used as every dialog title.
pub const APP_NAME: &str = "Beta Fortress Client";

/// Release repository queried by the update checker unless configured otherwise.
pub const DEFAULT_FEED_URL: &str = "https://github.com/AridityTeam/BetaFortressClient-Releases";

/// Binary name looked up inside release assets.
pub const DEFAULT_BIN_NAME: &str = "bfclient";

/// Diagnostic report written when an update check fails, relative to the working directory.
pub const DEFAULT_DIAGNOSTIC_LOG: &str = "bfclient.updater.exception.log";

/// Environment variable overriding the global configuration file location.
pub const CONFIG_PATH_ENV: &str = "BFCLIENT_CONFIG_PATH";

/// Second confirmation shown before the update is downloaded and applied.
pub const ELEVATION_PROMPT: &str =
    "To update your client's version\nBeta Fortress Client needs elevated/admin privileges. Continue?";

/// Shown once the update has been applied.
pub const RESTART_PROMPT: &str = "Download complete!\nDo you want to restart now?";

/// Generic failure dialog shown to end users. Carries no technical detail.
pub const FAILURE_MESSAGE: &str =
    "An error occurred while checking for updates!\nPlease contact the developers!";
