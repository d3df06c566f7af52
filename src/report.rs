//! Report rendering.
//!
//! Everything the tool prints to stdout is assembled here: the opening
//! environment dump, the cluster version line, and the GPU library block.
//! Logging goes to stderr, so stdout carries exactly this report.

use std::fmt;

use crate::cluster::ClusterVersionOutcome;

/// Sentinel printed for a probe that produced no version.
pub const NOT_FOUND: &str = "Not found";

/// Snapshot of the process environment, in environ order.
pub fn environment_snapshot() -> Vec<(String, String)> {
    std::env::vars().collect()
}

/// Render the `NAME=VALUE` block that opens the report.
///
/// Ends with a blank line separating it from the rest of the report.
pub fn environment_block(vars: &[(String, String)]) -> String {
    let mut block = String::from("--- Environment Variables ---\n");
    for (key, value) in vars {
        block.push_str(key);
        block.push('=');
        block.push_str(value);
        block.push('\n');
    }
    block.push_str("---------------------------\n\n");
    block
}

/// Notice printed when a library search path override is in effect.
pub fn ld_override_notice(path: &str) -> String {
    format!("Setting LD_LIBRARY_PATH={} for subprocesses.", path)
}

/// One line summarizing the control-plane probe.
pub fn cluster_line(outcome: &ClusterVersionOutcome) -> String {
    match outcome.git_version() {
        Some(version) => format!("Detected Kubernetes version: {}", version),
        None => "Failed to detect Kubernetes version.".to_string(),
    }
}

/// Ordered library label to probe result mapping for the GPU block.
#[derive(Debug, Default)]
pub struct VersionReport {
    entries: Vec<(String, Option<String>)>,
}

impl VersionReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one probe result under `label`.
    pub fn record(&mut self, label: &str, version: Option<String>) {
        self.entries.push((label.to_string(), version));
    }
}

impl fmt::Display for VersionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GPU Library Versions:")?;
        for (label, version) in &self.entries {
            write!(f, "\n- {}: {}", label, version.as_deref().unwrap_or(NOT_FOUND))?;
        }
        Ok(())
    }
}
