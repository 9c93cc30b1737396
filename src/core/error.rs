//! Error handling for bfclient.
//!
//! The updater reports failures through [`UpdateError`], a `thiserror` enum whose
//! variants map onto the two failure categories users can hit (feed access and
//! applying an update) plus the interaction failures around them. The CLI layer
//! works with [`anyhow::Error`] and turns whatever reaches `main` into an
//! [`ErrorContext`] via [`user_friendly_error`].

use colored::Colorize;
use std::fmt;
use thiserror::Error;

use crate::updater::flow::{FlowEvent, UpdateState};

/// Boxed error type used for failures coming out of the update library.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failures raised while checking for, downloading, or applying an update.
///
/// Every variant is caught once at the checker's outer boundary. Depending on
/// the configured failure policy it is either returned wrapped in
/// [`UpdateError::CheckFailed`] or absorbed into a diagnostic report.
#[derive(Error, Debug)]
pub enum UpdateError {
    /// The configured feed URL does not name a GitHub repository.
    #[error("Release feed URL is not a GitHub repository: {url}")]
    InvalidFeedUrl {
        /// The rejected URL.
        url: String,
    },

    /// The release feed could not be reached or returned something unusable.
    #[error("Failed to query release feed at {url}")]
    Feed {
        /// Feed the query was sent to.
        url: String,
        /// Underlying library error.
        #[source]
        source: BoxError,
    },

    /// The feed query exceeded the configured timeout.
    #[error("Release feed at {url} did not respond within {seconds}s")]
    FeedTimeout {
        /// Feed the query was sent to.
        url: String,
        /// Configured timeout.
        seconds: u64,
    },

    /// The running build's version is not valid semver.
    #[error("Invalid version '{version}'")]
    InvalidVersion {
        /// The unparseable version string.
        version: String,
        /// Parse failure.
        #[source]
        source: semver::Error,
    },

    /// Downloading or installing the new release failed.
    #[error("Failed to download and apply update")]
    Apply {
        /// Underlying library error.
        #[source]
        source: BoxError,
    },

    /// A dialog could not be shown or answered.
    #[error("Failed to show {dialog} dialog")]
    Dialog {
        /// Which dialog failed.
        dialog: &'static str,
        /// I/O failure from the dialog surface.
        #[source]
        source: std::io::Error,
    },

    /// Relaunching the application failed.
    #[error("Failed to restart the application")]
    Restart {
        /// Spawn failure.
        #[source]
        source: std::io::Error,
    },

    /// A blocking update task panicked or was cancelled.
    #[error("Update task did not complete")]
    TaskJoin(#[from] tokio::task::JoinError),

    /// The update flow was driven through a transition it does not define.
    #[error("Invalid update flow transition from {from:?} on {event:?}")]
    InvalidTransition {
        /// State the flow was in.
        from: UpdateState,
        /// Event that has no transition from `from`.
        event: FlowEvent,
    },

    /// Outer wrapper returned when failures are surfaced to a developer.
    #[error("An error occurred while checking for updates")]
    CheckFailed {
        /// The failure that aborted the check.
        #[source]
        source: Box<UpdateError>,
    },
}

/// Coarse failure category, used for logging only.
///
/// Users always see the same generic dialog regardless of kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Feed unreachable, malformed, timed out, or unparseable versions.
    NetworkOrFeed,
    /// Download or install of the new release failed.
    Apply,
    /// Dialogs, restart, or internal flow errors.
    Interaction,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NetworkOrFeed => "network/feed",
            Self::Apply => "apply",
            Self::Interaction => "interaction",
        };
        f.write_str(label)
    }
}

impl UpdateError {
    /// Classify the failure.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::InvalidFeedUrl {
                ..
            }
            | Self::Feed {
                ..
            }
            | Self::FeedTimeout {
                ..
            }
            | Self::InvalidVersion {
                ..
            } => FailureKind::NetworkOrFeed,
            Self::Apply {
                ..
            } => FailureKind::Apply,
            Self::CheckFailed {
                source,
            } => source.kind(),
            Self::Dialog {
                ..
            }
            | Self::Restart {
                ..
            }
            | Self::TaskJoin(_)
            | Self::InvalidTransition {
                ..
            } => FailureKind::Interaction,
        }
    }

    /// Wrap this error the way a surfaced failure is returned to the caller.
    #[must_use]
    pub fn into_check_failed(self) -> Self {
        Self::CheckFailed {
            source: Box::new(self),
        }
    }

    /// Render the error followed by its full cause chain, one cause per line.
    #[must_use]
    pub fn chain_report(&self) -> String {
        let mut report = self.to_string();
        let mut current = std::error::Error::source(self);
        while let Some(cause) = current {
            report.push_str("\n  caused by: ");
            report.push_str(&cause.to_string());
            current = cause.source();
        }
        report
    }
}

/// User-facing error presentation for the CLI.
///
/// Holds the main message plus optional details and an actionable suggestion.
/// [`display`](Self::display) prints it to stderr in color.
#[derive(Debug)]
pub struct ErrorContext {
    /// Main error message.
    pub message: String,
    /// Optional suggestion for resolving the error.
    pub suggestion: Option<String>,
    /// Optional additional details about the error.
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a context with only a main message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr with colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.message);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error reaching `main` into a user-friendly [`ErrorContext`].
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(update_error) = error.downcast_ref::<UpdateError>() {
        let context = ErrorContext::new(update_error.to_string())
            .with_details(update_error.chain_report());
        return match update_error.kind() {
            FailureKind::NetworkOrFeed => context.with_suggestion(
                "Check your network connection and the updater.feed_url setting",
            ),
            FailureKind::Apply => context.with_suggestion(
                "Make sure the install directory is writable, then run the check again",
            ),
            FailureKind::Interaction => context,
        };
    }

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return ErrorContext::new(error.to_string())
            .with_details(toml_error.to_string())
            .with_suggestion("Check the TOML syntax in your config.toml file");
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>()
        && io_error.kind() == std::io::ErrorKind::PermissionDenied
    {
        return ErrorContext::new(error.to_string())
            .with_suggestion("Try running with elevated permissions (sudo/Administrator)");
    }

    let mut context = ErrorContext::new(error.to_string());
    let causes: Vec<String> = error.chain().skip(1).map(ToString::to_string).collect();
    if !causes.is_empty() {
        context = context.with_details(causes.join(": "));
    }
    context
}
