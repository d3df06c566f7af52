//! Control-plane access: in-cluster credentials and the version query.

pub mod config;
pub mod version;

pub use config::ClusterConfig;
pub use version::{fetch_version, ClusterVersionOutcome, VersionInfo};
