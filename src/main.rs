//! Preflight CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use preflight::cli::Cli;
use preflight::cluster;
use preflight::probes::{cuda, driver, nccl};
use preflight::report::{self, VersionReport};
use preflight::shell::CommandRunner;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
///
/// Logs go to stderr; stdout carries only the report.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("preflight=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("preflight=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("Preflight starting with args: {:?}", cli);

    print!(
        "{}",
        report::environment_block(&report::environment_snapshot())
    );

    let mut runner = CommandRunner::new();
    if let Some(path) = &cli.subprocess_ld_path {
        println!("{}", report::ld_override_notice(path));
        runner = runner.ld_library_path(path);
    }

    let outcome = cluster::version::detect();
    println!("{}", report::cluster_line(&outcome));

    let mut versions = VersionReport::new();
    versions.record("NVIDIA Driver", driver::detect(&runner));
    versions.record("CUDA", cuda::detect(&runner));
    versions.record("NCCL", nccl::detect());

    println!();
    println!("{}", versions);

    ExitCode::SUCCESS
}
