//! CUDA toolkit version detection.

use std::fs;
use std::path::Path;

use crate::probes::{first_detected, version_after};
use crate::shell::CommandRunner;

/// Version file installed at the toolkit root.
const TOOLKIT_VERSION_FILE: &str = "/usr/local/cuda/version.txt";

const TOOLKIT_VERSION_MARKER: &str = "CUDA Version";

/// Compiler banner fallback; newer toolkits dropped `version.txt`.
const COMPILER_QUERY: &str = "nvcc --version";

const COMPILER_RELEASE_MARKER: &str = "release";

/// Detect the installed CUDA toolkit version.
pub fn detect(runner: &CommandRunner) -> Option<String> {
    detect_with(runner, Path::new(TOOLKIT_VERSION_FILE))
}

/// Detection against an explicit toolkit version file path.
pub fn detect_with(runner: &CommandRunner, version_file: &Path) -> Option<String> {
    first_detected(&[
        &|| version_file_entry(version_file),
        &|| compiler_banner(runner),
    ])
}

fn version_file_entry(version_file: &Path) -> Option<String> {
    let contents = fs::read_to_string(version_file).ok()?;
    version_after(&contents, TOOLKIT_VERSION_MARKER)
}

/// Parse the `release` clause out of the `nvcc --version` banner.
fn compiler_banner(runner: &CommandRunner) -> Option<String> {
    let banner = runner.run(COMPILER_QUERY)?;
    version_after(&banner, COMPILER_RELEASE_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    /// Create a fake binary with the given script body.
    fn create_fake_binary(path: &Path, script: &str) {
        fs::write(path, format!("#!/bin/sh\n{script}\n")).unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
        }
    }

    /// Runner that resolves binaries only from `dir`.
    fn runner_with_path(dir: &Path) -> CommandRunner {
        CommandRunner::with_timeout(Duration::from_secs(5))
            .env("PATH", dir.to_str().unwrap())
    }

    // Printed line by line with echo; the shell resolves no external
    // binaries under the restricted test PATH.
    const NVCC_BANNER_SCRIPT: &str = "echo 'nvcc: NVIDIA (R) Cuda compiler driver'\n\
                                      echo 'Copyright (c) 2005-2023 NVIDIA Corporation'\n\
                                      echo 'Built on Tue_Aug_15_22:02:13_PDT_2023'\n\
                                      echo 'Cuda compilation tools, release 12.2, V12.2.140'\n\
                                      echo 'Build cuda_12.2.r12.2/compiler.33191640_0'";

    #[test]
    fn version_file_wins_over_compiler() {
        let temp = TempDir::new().unwrap();
        let version_file = temp.path().join("version.txt");
        fs::write(&version_file, "CUDA Version 11.0.228\n").unwrap();
        create_fake_binary(&temp.path().join("nvcc"), "echo 'release 99.9,'");

        let version = detect_with(&runner_with_path(temp.path()), &version_file);
        assert_eq!(version.as_deref(), Some("11.0.228"));
    }

    #[test]
    fn missing_version_file_falls_back_to_compiler() {
        let temp = TempDir::new().unwrap();
        create_fake_binary(&temp.path().join("nvcc"), NVCC_BANNER_SCRIPT);

        let version = detect_with(&runner_with_path(temp.path()), &temp.path().join("absent"));
        assert_eq!(version.as_deref(), Some("12.2"));
    }

    #[test]
    fn unrecognized_version_file_falls_back_to_compiler() {
        let temp = TempDir::new().unwrap();
        let version_file = temp.path().join("version.txt");
        fs::write(&version_file, "not a version file\n").unwrap();
        create_fake_binary(&temp.path().join("nvcc"), "echo 'release 12.4,'");

        let version = detect_with(&runner_with_path(temp.path()), &version_file);
        assert_eq!(version.as_deref(), Some("12.4"));
    }

    #[test]
    fn absent_everywhere_yields_none() {
        let temp = TempDir::new().unwrap();

        let version = detect_with(&runner_with_path(temp.path()), &temp.path().join("absent"));
        assert_eq!(version, None);
    }

    #[test]
    fn compiler_banner_without_release_yields_none() {
        let temp = TempDir::new().unwrap();
        create_fake_binary(&temp.path().join("nvcc"), "echo 'no version here'");

        let version = detect_with(&runner_with_path(temp.path()), &temp.path().join("absent"));
        assert_eq!(version, None);
    }
}
