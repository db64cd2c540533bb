//! Target home directory checks and optional creation.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{LaunchError, Result};

/// Permission bits for a freshly created home: `rwxr-xr-x`.
pub const HOME_DIR_MODE: u32 = 0o755;

/// Outcome of [`prepare_home`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HomePreparation {
    /// True when this call created the directory.
    pub created: bool,
}

/// Make sure `path` exists, creating it first when `create_if_missing` is set.
///
/// Only the final component is created; a missing parent is a
/// [`LaunchError::DirectoryCreate`]. A directory created here is left in place
/// even if the launch fails later.
pub fn prepare_home(path: &Path, create_if_missing: bool) -> Result<HomePreparation> {
    let mut created = false;
    if create_if_missing && !exists(path) {
        tracing::debug!(path = %path.display(), "creating home directory");
        create_single_dir(path).map_err(|source| LaunchError::DirectoryCreate {
            path: path.to_path_buf(),
            source,
        })?;
        created = true;
    }

    if !exists(path) {
        return Err(LaunchError::DirectoryMissing {
            path: path.to_path_buf(),
        });
    }
    Ok(HomePreparation { created })
}

// Any stat failure counts as absent, not only ENOENT.
fn exists(path: &Path) -> bool {
    fs::metadata(path).is_ok()
}

#[cfg(unix)]
fn create_single_dir(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new()
        .recursive(false)
        .mode(HOME_DIR_MODE)
        .create(path)
}

#[cfg(not(unix))]
fn create_single_dir(path: &Path) -> io::Result<()> {
    fs::DirBuilder::new().recursive(false).create(path)
}
