//! Bounded shell command execution.
//!
//! Probe commands run through `/bin/sh -c` with the parent environment
//! plus any runner overrides, a wall-clock deadline, and both output
//! streams captured. Every failure mode collapses to `None` so callers
//! can fall through to their next detection strategy.

use std::collections::HashMap;
use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// Wall-clock limit applied to every probe command.
pub const COMMAND_TIMEOUT: Duration = Duration::from_secs(10);

/// Interval between child exit checks while waiting on the deadline.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Executes single shell command lines on behalf of the probes.
///
/// Spawned commands inherit the parent environment with the runner's
/// overrides applied on top. The `LD_LIBRARY_PATH` override requested on
/// the command line lives here, scoped to the children, rather than being
/// written into the parent process environment.
#[derive(Debug, Clone)]
pub struct CommandRunner {
    env_overrides: HashMap<String, String>,
    timeout: Duration,
}

impl Default for CommandRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner {
    /// Runner with the standard probe deadline.
    pub fn new() -> Self {
        Self {
            env_overrides: HashMap::new(),
            timeout: COMMAND_TIMEOUT,
        }
    }

    /// Runner with a custom deadline.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            env_overrides: HashMap::new(),
            timeout,
        }
    }

    /// Apply `path` as `LD_LIBRARY_PATH` for every spawned command.
    pub fn ld_library_path(self, path: &str) -> Self {
        self.env("LD_LIBRARY_PATH", path)
    }

    /// Override one environment variable for spawned commands.
    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.env_overrides
            .insert(key.to_string(), value.to_string());
        self
    }

    /// Execute `command` through the shell.
    ///
    /// Returns the trimmed stdout on a zero exit status. A nonzero exit,
    /// an overrun deadline, or a spawn failure is logged and yields `None`.
    pub fn run(&self, command: &str) -> Option<String> {
        tracing::debug!("Running probe command: {}", command);

        let mut cmd = Command::new("/bin/sh");
        cmd.arg("-c");
        cmd.arg(command);

        for (key, value) in &self.env_overrides {
            cmd.env(key, value);
        }

        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                tracing::error!("Failed to start `{}`: {}", command, e);
                return None;
            }
        };

        let mut stdout = child.stdout.take().unwrap();
        let mut stderr = child.stderr.take().unwrap();

        // Drain both pipes on reader threads so a chatty child can never
        // block on a full pipe while we wait for it to exit.
        let stdout_handle = thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = stdout.read_to_end(&mut buf);
            buf
        });
        let stderr_handle = thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = stderr.read_to_end(&mut buf);
            buf
        });

        let status = match wait_with_deadline(&mut child, self.timeout) {
            Ok(Some(status)) => status,
            Ok(None) => {
                tracing::error!(
                    "Command `{}` timed out after {}s and was killed",
                    command,
                    self.timeout.as_secs()
                );
                // A surviving grandchild can hold the pipes open, so the
                // reader threads are left to finish on their own.
                return None;
            }
            Err(e) => {
                tracing::error!("Failed waiting on `{}`: {}", command, e);
                return None;
            }
        };

        let stdout_buf = stdout_handle.join().unwrap_or_default();
        let stderr_buf = stderr_handle.join().unwrap_or_default();
        let stdout_text = String::from_utf8_lossy(&stdout_buf);

        if status.success() {
            return Some(stdout_text.trim().to_string());
        }

        tracing::error!(
            "Command `{}` exited with {}; stdout: {:?}; stderr: {:?}",
            command,
            status,
            stdout_text.trim(),
            String::from_utf8_lossy(&stderr_buf).trim()
        );
        None
    }
}

/// Wait for `child` to exit, killing it once `timeout` elapses.
///
/// Returns `Ok(None)` on timeout, after the child has been killed and
/// reaped so the pipes close and no zombie is left behind.
fn wait_with_deadline(child: &mut Child, timeout: Duration) -> std::io::Result<Option<ExitStatus>> {
    let deadline = Instant::now() + timeout;

    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}
