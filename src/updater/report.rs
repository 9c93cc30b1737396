//! Diagnostic report written when an update check fails in release context.
//!
//! The report is a plain text file: a timestamp, the operating system details,
//! and the full failure with its cause chain. Each run overwrites the previous
//! report.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::fmt::Write as _;
use std::path::Path;
use sysinfo::System;
use tokio::fs;

const OS_HEADER: &str =
    "=================================== OS VERSION DETAILS ===================================";
const OS_FOOTER: &str =
    "==========================================================================================";
const FAILURE_HEADER: &str =
    "==================================== EXCEPTION DETAILS ====================================";
const FAILURE_FOOTER: &str =
    "===========================================================================================";

/// Operating system details included in a report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OsDetails {
    /// Dotted OS version, e.g. `10.0.19045`.
    pub version: String,
    pub major: u64,
    pub minor: u64,
    pub build: u64,
    pub revision: u64,
    /// OS family and name, e.g. `windows (Windows)`.
    pub platform: String,
    /// Service pack, empty when none.
    pub service_pack: String,
    pub version_string: String,
}

impl OsDetails {
    /// Collect details about the host operating system.
    pub fn detect() -> Self {
        let version = System::os_version().unwrap_or_default();
        let name = System::name().unwrap_or_else(|| "unknown".to_string());
        Self::from_parts(
            version,
            format!("{} ({})", std::env::consts::OS, name),
            System::long_os_version().unwrap_or_default(),
        )
    }

    /// Build details from a dotted version string, filling the numeric fields
    /// from its components. Missing or non-numeric components are zero.
    pub fn from_parts(version: String, platform: String, version_string: String) -> Self {
        let mut numbers = version.split(['.', ' ']).map(|part| part.parse::<u64>().unwrap_or(0));
        let mut next = || numbers.next().unwrap_or(0);
        let (major, minor, build, revision) = (next(), next(), next(), next());

        Self {
            version,
            major,
            minor,
            build,
            revision,
            platform,
            service_pack: String::new(),
            version_string,
        }
    }

    /// High 16 bits of the revision component.
    pub fn major_revision(&self) -> u64 {
        (self.revision >> 16) & 0xFFFF
    }

    /// Low 16 bits of the revision component.
    pub fn minor_revision(&self) -> u64 {
        self.revision & 0xFFFF
    }
}

/// A rendered diagnostic report.
#[derive(Debug, Clone)]
pub struct DiagnosticReport {
    pub timestamp: DateTime<Local>,
    pub os: OsDetails,
    /// Failure text including its cause chain.
    pub failure: String,
}

impl DiagnosticReport {
    /// Capture a report for `failure` on the current host.
    pub fn capture(failure: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            os: OsDetails::detect(),
            failure: failure.into(),
        }
    }

    /// Render the report text.
    pub fn render(&self) -> String {
        let os = &self.os;
        let mut out = String::new();
        // Writing to a String cannot fail.
        let _ = writeln!(out, "EXCEPTIONS OCCURRED AS OF {}", self.timestamp.format("%Y-%m-%d %H:%M:%S %:z"));
        let _ = writeln!(out, "{OS_HEADER}");
        let _ = writeln!(out, "Version: {}", os.version);
        let _ = writeln!(out, "  Major version: {}", os.major);
        let _ = writeln!(out, "  Major revision: {}", os.major_revision());
        let _ = writeln!(out, "  Minor version: {}", os.minor);
        let _ = writeln!(out, "  Minor revision: {}", os.minor_revision());
        let _ = writeln!(out, "  Build: {}", os.build);
        let _ = writeln!(out, "  Revision: {}", os.revision);
        let _ = writeln!(out, "Platform: {}", os.platform);
        let _ = writeln!(out, "SP: {}", os.service_pack);
        let _ = writeln!(out, "Version String: {}", os.version_string);
        let _ = writeln!(out, "{OS_FOOTER}");
        let _ = writeln!(out, "{FAILURE_HEADER}");
        let _ = writeln!(out, "{}", self.failure);
        let _ = writeln!(out, "{FAILURE_FOOTER}");
        out
    }

    /// Write the report to `path`, replacing any previous report.
    pub async fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        fs::write(path, self.render())
            .await
            .with_context(|| format!("Failed to write diagnostic report to {}", path.display()))
    }
}
