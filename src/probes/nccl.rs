//! NCCL version detection.
//!
//! NCCL ships as a library, not a tool, so there is nothing to invoke.
//! Detection checks the `NCCL_VERSION` environment variable first, then
//! parses the version defines out of an installed `nccl.h`.

use std::env::VarError;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable that short-circuits header detection.
const NCCL_ENV_VAR: &str = "NCCL_VERSION";

/// Header locations checked in order, first usable file wins.
const HEADER_CANDIDATES: &[&str] = &["/usr/include/nccl.h", "/usr/local/cuda/include/nccl.h"];

/// Detect the installed NCCL version.
pub fn detect() -> Option<String> {
    let headers: Vec<PathBuf> = HEADER_CANDIDATES.iter().map(PathBuf::from).collect();
    detect_with(|key| std::env::var(key), &headers)
}

/// Detection with an injectable environment lookup and header list.
pub fn detect_with<F>(env_fn: F, headers: &[PathBuf]) -> Option<String>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    if let Ok(version) = env_fn(NCCL_ENV_VAR) {
        if !version.is_empty() {
            return Some(version);
        }
    }
    headers.iter().find_map(|header| header_version(header))
}

/// Assemble a version from the `NCCL_MAJOR`/`NCCL_MINOR`/`NCCL_PATCH`
/// defines in `header`.
///
/// Headers that predate the patch define yield the two-component form,
/// `MAJOR.MINOR`. A file without at least major and minor is skipped so
/// the next candidate gets a chance.
fn header_version(header: &Path) -> Option<String> {
    let contents = fs::read_to_string(header).ok()?;
    let major = define_value(&contents, "NCCL_MAJOR")?;
    let minor = define_value(&contents, "NCCL_MINOR")?;
    match define_value(&contents, "NCCL_PATCH") {
        Some(patch) => Some(format!("{major}.{minor}.{patch}")),
        None => Some(format!("{major}.{minor}")),
    }
}

/// Value of a `#define <name> <integer>` line, if present.
fn define_value(contents: &str, name: &str) -> Option<u32> {
    contents.lines().find_map(|line| {
        let mut fields = line.split_whitespace();
        if fields.next() != Some("#define") || fields.next() != Some(name) {
            return None;
        }
        fields.next()?.parse().ok()
    })
}
