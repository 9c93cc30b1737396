//! Restarting and exiting the running application.

use std::ffi::OsString;
use std::process::Command;
use tracing::info;

use crate::core::UpdateError;

/// Process-level operations the update checker needs after an update is applied.
pub trait ProcessControl {
    /// Launch a fresh instance of the application.
    fn restart(&self) -> Result<(), UpdateError>;

    /// Terminate the current process. The system implementation never returns.
    fn exit(&self, code: i32);
}

/// Arguments for relaunching after an update.
///
/// The `check` subcommand becomes `about`, so the new build reports its
/// version instead of starting another check. Global options are kept and
/// check-only options are dropped.
pub fn relaunch_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut args = args.into_iter();
    let mut relaunch = Vec::new();
    let mut in_check = false;

    while let Some(arg) = args.next() {
        match arg.to_str() {
            Some("-c" | "--config") => {
                relaunch.push(arg);
                relaunch.extend(args.next());
            }
            Some("check") if !in_check => {
                in_check = true;
                relaunch.push(OsString::from("about"));
            }
            Some("-y" | "--yes" | "--surface-errors") if in_check => {}
            Some("--feed-url") if in_check => {
                args.next();
            }
            Some(flag) if in_check && flag.starts_with("--feed-url=") => {}
            _ => relaunch.push(arg),
        }
    }
    relaunch
}

/// [`ProcessControl`] for the real process: re-spawns the current executable
/// with [`relaunch_args`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProcess;

impl ProcessControl for SystemProcess {
    fn restart(&self) -> Result<(), UpdateError> {
        let exe = std::env::current_exe().map_err(|source| UpdateError::Restart {
            source,
        })?;

        info!("Restarting {}", exe.display());
        Command::new(&exe).args(relaunch_args(std::env::args_os().skip(1))).spawn().map_err(|source| {
            UpdateError::Restart {
                source,
            }
        })?;
        Ok(())
    }

    fn exit(&self, code: i32) {
        std::process::exit(code);
    }
}
