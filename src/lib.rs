//! Preflight - in-pod cluster and GPU stack diagnostics.
//!
//! Preflight runs inside a cluster-hosted pod before a larger job starts
//! and reports what that workload can actually see: the control-plane
//! version, and the NVIDIA driver, CUDA toolkit, and NCCL versions. Every
//! lookup is best effort; whatever cannot be detected prints as
//! "Not found" instead of failing the run.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`cluster`] - In-cluster credentials and the control-plane version query
//! - [`error`] - Error types and result aliases
//! - [`probes`] - GPU stack version probes
//! - [`report`] - Report rendering
//! - [`shell`] - Bounded shell command execution
//!
//! # Example
//!
//! ```
//! use preflight::report::VersionReport;
//!
//! let mut report = VersionReport::new();
//! report.record("NVIDIA Driver", Some("535.129.03".to_string()));
//! report.record("NCCL", None);
//! assert!(report.to_string().contains("- NCCL: Not found"));
//! ```

pub mod cli;
pub mod cluster;
pub mod error;
pub mod probes;
pub mod report;
pub mod shell;

pub use error::{PreflightError, Result};
