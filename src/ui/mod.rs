//! User-facing surfaces: the About display and the dialogs shown during an
//! update check.

pub mod about;
pub mod dialogs;

pub use about::{AboutWindow, BuildIdentity};
pub use dialogs::{Dialogs, TerminalDialogs};
