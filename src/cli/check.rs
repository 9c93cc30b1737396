//! Check for and install application updates.
//!
//! ```bash
//! bfclient check                    # Prompt before downloading and restarting
//! bfclient check --yes              # Accept every prompt
//! bfclient check --surface-errors   # Return failures instead of writing a report
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use crate::config::GlobalConfig;
use crate::constants::APP_NAME;
use crate::ui::{BuildIdentity, TerminalDialogs};
use crate::updater::{
    DeclinedAt, GithubFeed, Resolution, SystemProcess, UpdateCheckOutcome, UpdateChecker,
};

/// Arguments for `bfclient check`.
#[derive(Args, Debug)]
pub struct CheckCommand {
    /// Answer yes to every prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Return failures as errors instead of writing a diagnostic report
    #[arg(long)]
    pub surface_errors: bool,

    /// Release repository to query instead of the configured one
    #[arg(long, value_name = "URL")]
    pub feed_url: Option<String>,
}

impl CheckCommand {
    pub async fn execute(self, global: GlobalConfig) -> Result<()> {
        let mut config = global.updater;
        if let Some(url) = self.feed_url {
            config.feed_url = url;
        }
        if self.surface_errors {
            config.surface_errors = true;
        }

        let identity = BuildIdentity::current();
        let feed = GithubFeed::new(&config.feed_url, &config.bin_name, identity.version)
            .with_timeout(config.feed_timeout());
        let dialogs = TerminalDialogs::stdio().assume_yes(self.yes);

        let mut checker = UpdateChecker::new(feed, dialogs, SystemProcess).with_config(&config);
        let outcome = checker.check_for_updates().await?;

        println!("{}", describe(&outcome, identity.version));
        Ok(())
    }
}

/// One-line summary printed after a check.
fn describe(outcome: &UpdateCheckOutcome, current: &str) -> String {
    match &outcome.resolution {
        Resolution::Skipped => "Update checks are disabled".yellow().to_string(),
        Resolution::NoUpdate => format!("You are on the latest version ({current})").green().to_string(),
        Resolution::Declined(DeclinedAt::Update) => "Update postponed".yellow().to_string(),
        Resolution::Declined(DeclinedAt::Elevation) => {
            "Update cancelled: elevated privileges were not granted".yellow().to_string()
        }
        Resolution::Later => format!(
            "Updated to {}. Restart {APP_NAME} to use it",
            outcome.installed_version.as_deref().unwrap_or("the latest version")
        )
        .green()
        .to_string(),
        Resolution::Restarting => "Restarting...".cyan().to_string(),
        Resolution::Failed {
            report: Some(path),
        } => format!("Update check failed. Details were written to {}", path.display())
            .red()
            .to_string(),
        Resolution::Failed {
            report: None,
        } => "Update check failed".red().to_string(),
    }
}
