use std::path::PathBuf;

use crate::constants::APP_NAME;
use crate::updater::flow::{DeclinedAt, UpdateState};

/// How an update check ended.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Resolution {
    /// Checks are disabled; the feed was never contacted.
    #[default]
    Skipped,
    /// The running build is current.
    NoUpdate,
    /// The user declined one of the confirmations.
    Declined(DeclinedAt),
    /// The update was applied; it takes effect on the next manual restart.
    Later,
    /// The update was applied and a restart was requested.
    Restarting,
    /// The check failed and the failure was absorbed. `report` is the diagnostic
    /// file, when it could be written.
    Failed {
        report: Option<PathBuf>,
    },
}

impl Resolution {
    /// Map a terminal flow state onto a resolution.
    ///
    /// `Failed` is not mapped here; the failure handler builds it with the report path.
    pub(crate) fn from_terminal(state: UpdateState) -> Option<Self> {
        match state {
            UpdateState::NoUpdate => Some(Self::NoUpdate),
            UpdateState::Declined(at) => Some(Self::Declined(at)),
            UpdateState::Later => Some(Self::Later),
            UpdateState::Restart => Some(Self::Restarting),
            _ => None,
        }
    }
}

/// Result of one update check, returned to the caller.
///
/// `has_updates` stays `true` once pending releases were found, even when the
/// user then declines. Use [`resolution`](Self::resolution) to learn what the
/// user chose.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UpdateCheckOutcome {
    pub has_updates: bool,
    pub pending_release_count: usize,
    /// Summary shown in the first confirmation.
    pub message: Option<String>,
    pub resolution: Resolution,
    /// Version reported by the update library after applying.
    pub installed_version: Option<String>,
}

impl UpdateCheckOutcome {
    /// Record the pending releases found on the feed.
    pub(crate) fn record_pending(&mut self, count: usize) {
        self.pending_release_count = count;
        self.has_updates = count > 0;
        self.message = (count > 0).then(|| summary_message(count));
    }
}

/// Build the summary shown when the running build is `count` releases behind.
#[must_use]
pub fn summary_message(count: usize) -> String {
    let version_word = if count > 1 { "versions" } else { "version" };
    format!(
        "{APP_NAME} is {count} {version_word} behind.\n\
         If you choose to update, changes won't take effect until {APP_NAME} is restarted.\n\
         Would you like to download and install them?\n"
    )
}
