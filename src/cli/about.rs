use anyhow::Result;
use clap::Args;

use crate::ui::{AboutWindow, BuildIdentity};

/// Show the About display for the running build.
#[derive(Args, Debug)]
pub struct AboutCommand {}

impl AboutCommand {
    pub fn execute(self) -> Result<()> {
        let mut window = AboutWindow::new();
        window.initialize(&BuildIdentity::current());
        println!("{}", window.render());
        window.close();
        Ok(())
    }
}
