//! Error taxonomy for a launch.
//!
//! Every variant is fatal. The binary turns them into a diagnostic plus
//! [`LaunchError::exit_code`]; nothing is retried and nothing is rolled back.

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LaunchError>;

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("Failed to create new home directory: {source}")]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Home directory does not exist: {}", path.display())]
    DirectoryMissing { path: PathBuf },

    /// A value that cannot be placed in a child environment (e.g. contains NUL).
    #[error("Failed to set {key} environment variable: {reason}")]
    Environment { key: String, reason: String },

    #[error("Default shell not found")]
    DefaultShellNotFound,

    /// The child could not be started at all.
    #[error("Failed to execute {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    /// The child ran and exited unsuccessfully.
    #[error("Failed to execute {command}: {status}")]
    ChildFailed { command: String, status: ExitStatus },
}

impl LaunchError {
    /// Process exit code the launcher should terminate with.
    ///
    /// A failing child's own code is passed through; a child killed by a
    /// signal maps to `128 + signal` like a shell would report it. Spawn
    /// failures follow the shell convention of 127 (not found) and 126
    /// (not executable). Everything else is 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            LaunchError::ChildFailed { status, .. } => status_code(status),
            LaunchError::Spawn { source, .. } => match source.kind() {
                io::ErrorKind::NotFound => 127,
                io::ErrorKind::PermissionDenied => 126,
                _ => 1,
            },
            _ => 1,
        }
    }
}

#[cfg(unix)]
fn status_code(status: &ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    match (status.code(), status.signal()) {
        (Some(0), _) | (None, None) => 1,
        (Some(code), _) => code,
        (None, Some(sig)) => 128 + sig,
    }
}

#[cfg(not(unix))]
fn status_code(status: &ExitStatus) -> i32 {
    match status.code() {
        Some(0) | None => 1,
        Some(code) => code,
    }
}
