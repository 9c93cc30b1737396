//! bfclient command-line entry point.

use anyhow::Result;
use bfclient::cli;
use bfclient::core::user_friendly_error;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
    let result = runtime.block_on(cli.execute());

    // A timed-out feed query leaves its blocking fetch running; don't wait on it.
    runtime.shutdown_background();

    match result {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
