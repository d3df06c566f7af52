//! CLI argument definitions.
//!
//! This module defines the CLI arguments using clap's derive macros.
//! The entry point is the [`Cli`] struct. The binary takes no positional
//! arguments, so clap rejects any extraneous ones with a usage error
//! before any probing starts.

use clap::Parser;

/// Preflight - in-pod cluster and GPU stack diagnostics.
#[derive(Debug, Parser)]
#[command(name = "preflight")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// LD_LIBRARY_PATH to apply to spawned probe commands
    #[arg(long, value_name = "PATH")]
    pub subprocess_ld_path: Option<String>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}
