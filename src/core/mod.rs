//! Core types shared across bfclient.
//!
//! Currently this is the error layer: [`UpdateError`] for the updater and
//! [`ErrorContext`] for presenting failures on the command line.

pub mod error;

pub use error::{BoxError, ErrorContext, FailureKind, UpdateError, user_friendly_error};
