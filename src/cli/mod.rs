//! Command-line interface for bfclient.
//!
//! # Commands
//!
//! - `check` - Check the release feed and walk through installing an update
//! - `about` - Show the build identity and version
//!
//! # Global Options
//!
//! - `--verbose` - Enable debug logging
//! - `--quiet` - Disable logging
//! - `--config` - Path to a custom config file
//!
//! ```bash
//! bfclient check
//! bfclient check --yes --feed-url https://github.com/owner/releases
//! bfclient --verbose about
//! ```

mod about;
mod check;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::GlobalConfig;

/// Settings derived from global CLI flags.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log level, `None` when logging is disabled.
    pub log_level: Option<String>,
    /// Config file given with `--config`.
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    /// Install the global tracing subscriber.
    ///
    /// `RUST_LOG` takes precedence over the level chosen by flags.
    pub fn init_logging(&self) {
        let Some(level) = &self.log_level else {
            return;
        };

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

#[derive(Parser)]
#[command(
    name = "bfclient",
    about = "Beta Fortress Client - update checker and build information",
    version,
    author
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress log output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Path to a custom config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check for updates and offer to install them
    Check(check::CheckCommand),

    /// Show build identity and version
    About(about::AboutCommand),
}

impl Cli {
    /// Set up logging, load configuration, and run the selected command.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        config.init_logging();
        self.execute_with_config(config).await
    }

    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            None
        } else {
            Some("info".to_string())
        };

        CliConfig {
            log_level,
            config_path: self.config.clone(),
        }
    }

    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        match self.command {
            Commands::Check(cmd) => {
                let global = GlobalConfig::load_with_optional(config.config_path).await?;
                cmd.execute(global).await
            }
            Commands::About(cmd) => cmd.execute(),
        }
    }
}
