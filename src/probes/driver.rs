//! NVIDIA driver version detection.

use std::fs;
use std::path::Path;

use crate::probes::{first_detected, version_after};
use crate::shell::CommandRunner;

/// Vendor query asking for the bare driver version, one value per GPU.
const DRIVER_QUERY: &str = "nvidia-smi --query-gpu=driver_version --format=csv,noheader";

/// Kernel module status pseudo-file, readable even when `nvidia-smi` is
/// missing from the image.
const KERNEL_STATUS_FILE: &str = "/proc/driver/nvidia/version";

const KERNEL_MODULE_MARKER: &str = "Kernel Module";

/// Detect the installed NVIDIA driver version.
pub fn detect(runner: &CommandRunner) -> Option<String> {
    detect_with(runner, Path::new(KERNEL_STATUS_FILE))
}

/// Detection against an explicit kernel status file path.
pub fn detect_with(runner: &CommandRunner, status_file: &Path) -> Option<String> {
    first_detected(&[&|| query_tool(runner), &|| kernel_status(status_file)])
}

/// Ask `nvidia-smi` directly; a non-empty answer is used verbatim.
fn query_tool(runner: &CommandRunner) -> Option<String> {
    runner
        .run(DRIVER_QUERY)
        .filter(|version| !version.is_empty())
}

/// Fall back to the version the loaded kernel module reports.
fn kernel_status(status_file: &Path) -> Option<String> {
    let contents = fs::read_to_string(status_file).ok()?;
    version_after(&contents, KERNEL_MODULE_MARKER)
}
