//! Self-update checking for the Beta Fortress Client.
//!
//! One check is a short sequential flow over a GitHub release feed:
//!
//! ```text
//! 1. Open a feed session (released on every exit path)
//! 2. Count releases newer than the running build
//! 3. If behind:
//!    ├── confirm the update
//!    ├── confirm elevated privileges
//!    ├── download and apply via `self_update`
//!    └── confirm restart → relaunch and exit
//! 4. On failure:
//!    ├── surface policy: return the error with context
//!    └── report policy: log, write a diagnostic report, show a generic dialog
//! ```
//!
//! The flow's states and transitions live in [`flow`]; [`UpdateChecker`] drives
//! them and performs the side effects. Results come back as an
//! [`UpdateCheckOutcome`] instead of shared flags.

/// Update checker driving the flow.
pub mod checker;
/// `[updater]` configuration table.
pub mod config;
/// Release feed sessions and the GitHub-backed feed.
pub mod feed;
/// Pure state machine for a check.
pub mod flow;
/// Check results.
pub mod outcome;
/// Restart and exit.
pub mod process;
/// Diagnostic report written on absorbed failures.
pub mod report;


pub use checker::UpdateChecker;
pub use config::{FailurePolicy, UpdaterConfig};
pub use feed::{FeedSession, GithubFeed, PendingRelease, ReleaseFeed};
pub use flow::{DeclinedAt, FlowEvent, UpdateState};
pub use outcome::{Resolution, UpdateCheckOutcome, summary_message};
pub use process::{ProcessControl, SystemProcess};
pub use report::{DiagnosticReport, OsDetails};
