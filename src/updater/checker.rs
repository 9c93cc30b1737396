use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use crate::constants::{APP_NAME, DEFAULT_DIAGNOSTIC_LOG, ELEVATION_PROMPT, FAILURE_MESSAGE, RESTART_PROMPT};
use crate::core::UpdateError;
use crate::ui::Dialogs;
use crate::updater::config::{FailurePolicy, UpdaterConfig};
use crate::updater::feed::{FeedSession, ReleaseFeed};
use crate::updater::flow::{FlowEvent, UpdateState};
use crate::updater::outcome::{Resolution, UpdateCheckOutcome};
use crate::updater::process::ProcessControl;
use crate::updater::report::DiagnosticReport;

/// Runs update checks: query the feed, confirm with the user, apply, restart.
///
/// The checker is generic over its collaborators so each can be replaced:
/// the release feed, the dialog surface, and process control.
///
/// ```rust,no_run
/// use bfclient::ui::TerminalDialogs;
/// use bfclient::updater::{GithubFeed, SystemProcess, UpdateChecker};
///
/// # async fn example() -> Result<(), bfclient::core::UpdateError> {
/// let feed = GithubFeed::new(
///     "https://github.com/AridityTeam/BetaFortressClient-Releases",
///     "bfclient",
///     env!("CARGO_PKG_VERSION"),
/// );
/// let mut checker = UpdateChecker::new(feed, TerminalDialogs::stdio(), SystemProcess);
/// let outcome = checker.check_for_updates().await?;
/// println!("{} pending release(s)", outcome.pending_release_count);
/// # Ok(())
/// # }
/// ```
pub struct UpdateChecker<F, D, P> {
    feed: F,
    dialogs: D,
    process: P,
    enabled: bool,
    policy: FailurePolicy,
    diagnostic_log: PathBuf,
}

impl<F, D, P> UpdateChecker<F, D, P>
where
    F: ReleaseFeed,
    D: Dialogs,
    P: ProcessControl,
{
    /// Create a checker that reports failures to the default diagnostic log.
    pub fn new(feed: F, dialogs: D, process: P) -> Self {
        Self {
            feed,
            dialogs,
            process,
            enabled: true,
            policy: FailurePolicy::Report,
            diagnostic_log: PathBuf::from(DEFAULT_DIAGNOSTIC_LOG),
        }
    }

    /// Apply the enable flag, failure policy, and log location from `config`.
    pub fn with_config(mut self, config: &UpdaterConfig) -> Self {
        self.enabled = config.enabled;
        self.policy = config.failure_policy();
        self.diagnostic_log = config.diagnostic_log.clone();
        self
    }

    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn diagnostic_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.diagnostic_log = path.into();
        self
    }

    pub fn feed(&self) -> &F {
        &self.feed
    }

    pub fn dialogs(&self) -> &D {
        &self.dialogs
    }

    pub fn process(&self) -> &P {
        &self.process
    }

    pub fn diagnostic_log_path(&self) -> &Path {
        &self.diagnostic_log
    }

    /// Check the release feed and walk the user through updating.
    ///
    /// Only one check should be in flight at a time; nothing here guards
    /// against concurrent calls.
    ///
    /// # Errors
    ///
    /// With [`FailurePolicy::Surface`] any failure is returned as
    /// [`UpdateError::CheckFailed`]. With [`FailurePolicy::Report`] failures are
    /// absorbed: the outcome's resolution is [`Resolution::Failed`] and this
    /// returns `Ok`.
    pub async fn check_for_updates(&mut self) -> Result<UpdateCheckOutcome, UpdateError> {
        let mut outcome = UpdateCheckOutcome::default();

        if !self.enabled {
            info!("Skipping update check: updates are disabled");
            return Ok(outcome);
        }

        let mut state = UpdateState::Idle;
        match self.run(&mut outcome, &mut state).await {
            Ok(resolution) => {
                outcome.resolution = resolution;
                Ok(outcome)
            }
            Err(error) => {
                if let Ok(failed) = state.next(FlowEvent::Fail) {
                    debug!("Update flow {:?} -> {:?}", state, failed);
                }
                self.handle_failure(error, outcome).await
            }
        }
    }

    async fn run(
        &mut self,
        outcome: &mut UpdateCheckOutcome,
        state: &mut UpdateState,
    ) -> Result<Resolution, UpdateError> {
        // Dropped on every path out of this function.
        let session = self.feed.connect().await?;

        while !state.is_terminal() {
            let event = match *state {
                UpdateState::Idle => FlowEvent::Begin,
                UpdateState::Checking => {
                    let pending = session.pending_releases().await?;
                    outcome.record_pending(pending.len());
                    FlowEvent::FeedChecked {
                        pending: pending.len(),
                    }
                }
                UpdateState::OfferUpdate {
                    ..
                } => {
                    let message = outcome.message.clone().unwrap_or_default();
                    FlowEvent::Answer(self.ask("update", &message).await?)
                }
                UpdateState::Elevate => FlowEvent::Answer(self.ask("elevation", ELEVATION_PROMPT).await?),
                UpdateState::Applying => {
                    outcome.installed_version = Some(session.apply_update().await?);
                    FlowEvent::Applied
                }
                UpdateState::Done => FlowEvent::Answer(self.ask("restart", RESTART_PROMPT).await?),
                UpdateState::NoUpdate
                | UpdateState::Declined(_)
                | UpdateState::Later
                | UpdateState::Restart
                | UpdateState::Failed => break,
            };

            let next = state.next(event)?;
            debug!("Update flow {:?} -> {:?}", state, next);
            *state = next;
        }

        drop(session);

        if *state == UpdateState::Restart {
            self.process.restart()?;
            // The old instance must not linger if the restart request did not end it.
            self.process.exit(0);
        }

        Resolution::from_terminal(*state).ok_or(UpdateError::InvalidTransition {
            from: *state,
            event: FlowEvent::Fail,
        })
    }

    async fn ask(&mut self, dialog: &'static str, message: &str) -> Result<bool, UpdateError> {
        self.dialogs.confirm(APP_NAME, message).await.map_err(|source| UpdateError::Dialog {
            dialog,
            source,
        })
    }

    async fn handle_failure(
        &mut self,
        failure: UpdateError,
        mut outcome: UpdateCheckOutcome,
    ) -> Result<UpdateCheckOutcome, UpdateError> {
        if self.policy == FailurePolicy::Surface {
            return Err(failure.into_check_failed());
        }

        let detail = failure.chain_report();
        error!(kind = %failure.kind(), "Update check failed: {}", detail);

        let report = DiagnosticReport::capture(format!("[{}] {}", failure.kind(), detail));
        let written = match report.write_to(&self.diagnostic_log).await {
            Ok(()) => {
                info!("Wrote diagnostic report to {}", self.diagnostic_log.display());
                Some(self.diagnostic_log.clone())
            }
            Err(e) => {
                error!("Could not write diagnostic report: {:#}", e);
                None
            }
        };

        if let Err(e) = self.dialogs.show_error(APP_NAME, FAILURE_MESSAGE).await {
            warn!("Failed to show failure dialog: {}", e);
        }

        outcome.resolution = Resolution::Failed {
            report: written,
        };
        Ok(outcome)
    }
}
