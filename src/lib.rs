//! bfclient - About display and self-update checker for the Beta Fortress Client.
//!
//! # Modules
//!
//! - [`updater`]: checks the GitHub release feed, confirms with the user,
//!   applies the update through `self_update`, and restarts
//! - [`ui`]: the About display and the dialog surface used by the updater
//! - [`config`]: user-wide TOML configuration
//! - [`core`]: error types
//! - [`cli`]: command-line entry points
//!
//! # Example
//!
//! ```rust,no_run
//! use bfclient::ui::{AboutWindow, BuildIdentity};
//!
//! let mut about = AboutWindow::new();
//! about.initialize(&BuildIdentity::current());
//! println!("{}", about.render());
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod ui;
pub mod updater;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
