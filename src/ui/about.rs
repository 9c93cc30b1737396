//! The "About" display.
//!
//! Shows the identity and version of the running build. Both come from
//! metadata compiled into the executable, so there is nothing that can fail.

use colored::Colorize;

/// Identity of the running build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildIdentity {
    pub name: &'static str,
    pub version: &'static str,
    /// `"<name>, Version=<version>"`.
    pub full_name: String,
}

impl BuildIdentity {
    /// Identity of this executable, from its crate metadata.
    pub fn current() -> Self {
        Self::new(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    }

    pub fn new(name: &'static str, version: &'static str) -> Self {
        Self {
            name,
            version,
            full_name: format!("{name}, Version={version}"),
        }
    }
}

/// Window showing the application identity and version.
#[derive(Debug, Clone)]
pub struct AboutWindow {
    title: String,
    version_label: String,
    open: bool,
}

impl Default for AboutWindow {
    fn default() -> Self {
        Self {
            title: "About".to_string(),
            version_label: "Version:".to_string(),
            open: true,
        }
    }
}

impl AboutWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the build identity to the title and the version to the version label.
    pub fn initialize(&mut self, identity: &BuildIdentity) {
        self.title.push(' ');
        self.title.push_str(&identity.full_name);
        self.version_label.push(' ');
        self.version_label.push_str(identity.version);
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn version_label(&self) -> &str {
        &self.version_label
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// The OK action.
    pub fn close(&mut self) {
        self.open = false;
    }

    /// Text shown for the window.
    pub fn render(&self) -> String {
        format!("{}\n{}", self.title.bold(), self.version_label)
    }
}
