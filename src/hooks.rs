//! hooks
//!
//! Pre-push shell hook execution.
//!
//! # Design
//!
//! Hooks are arbitrary shell commands supplied on the command line, run in
//! the repository root after the release commit has been checked out and
//! before the candidate commit is made. Typical uses are stamping the
//! version into build metadata or regenerating artifacts. The release
//! version is exported as `RELEASE_VERSION`.
//!
//! Hooks run through the shell intentionally; this is an automation tool
//! operated by the release engineer, not a sandbox.

use std::path::Path;
use std::process::Command;

use thiserror::Error;

use crate::core::version::Version;

/// Environment variable carrying the release version into hooks.
pub const VERSION_ENV: &str = "RELEASE_VERSION";

/// Errors from hook execution.
#[derive(Debug, Error)]
pub enum HookError {
    /// The hook process exited with a non-zero status.
    #[error("hook '{command}' failed with {status}")]
    Failed {
        /// The hook command line
        command: String,
        /// Exit status description
        status: String,
        /// Captured standard output, shown as a troubleshooting tip
        stdout: String,
        /// Captured standard error
        stderr: String,
    },

    /// The hook process could not be spawned.
    #[error("failed to run hook '{command}': {source}")]
    Spawn {
        /// The hook command line
        command: String,
        #[source]
        source: std::io::Error,
    },
}

/// Run one hook command in `cwd` with the version exported.
///
/// Output is captured, not streamed; on failure it is carried in the error
/// so the CLI can show what the hook printed.
pub fn run_hook(command: &str, version: &Version, cwd: &Path) -> Result<(), HookError> {
    let output = shell_command(command)
        .current_dir(cwd)
        .env(VERSION_ENV, version.to_string())
        .output()
        .map_err(|source| HookError::Spawn {
            command: command.to_string(),
            source,
        })?;

    if !output.status.success() {
        return Err(HookError::Failed {
            command: command.to_string(),
            status: output.status.to_string(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    Ok(())
}

#[cfg(not(windows))]
fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}

#[cfg(windows)]
fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}

#[cfg(test)]
mod tests {
    use super::*;

    fn version() -> Version {
        Version::parse("1.2.3").unwrap()
    }

    #[test]
    fn successful_hook_runs() {
        let dir = tempfile::tempdir().unwrap();
        run_hook("true", &version(), dir.path()).unwrap();
    }

    #[test]
    fn version_is_exported() {
        let dir = tempfile::tempdir().unwrap();
        run_hook(
            "test \"$RELEASE_VERSION\" = \"1.2.3\"",
            &version(),
            dir.path(),
        )
        .unwrap();
    }

    #[test]
    fn hook_runs_in_given_directory() {
        let dir = tempfile::tempdir().unwrap();
        run_hook("touch marker", &version(), dir.path()).unwrap();
        assert!(dir.path().join("marker").is_file());
    }

    #[test]
    fn failing_hook_carries_output() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_hook("echo oops; exit 3", &version(), dir.path()).unwrap_err();

        match err {
            HookError::Failed { stdout, .. } => assert_eq!(stdout.trim(), "oops"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
