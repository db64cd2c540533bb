//! Immutable environment snapshots.
//!
//! The child's environment is built from a snapshot taken once at startup and
//! passed explicitly to the spawn call; `std::env::set_var` is never used.

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::path::Path;

use crate::error::{LaunchError, Result};
use crate::{HOME_VAR, MARKER_VALUE, MARKER_VAR};

/// Ordered `name → value` view of an environment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    vars: BTreeMap<OsString, OsString>,
}

impl EnvSnapshot {
    /// Snapshot of the current process environment.
    pub fn capture() -> Self {
        Self::from_pairs(std::env::vars_os())
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<OsString>,
        V: Into<OsString>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, key: impl AsRef<OsStr>) -> Option<&OsStr> {
        self.vars.get(key.as_ref()).map(OsString::as_os_str)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&OsStr, &OsStr)> {
        self.vars.iter().map(|(k, v)| (k.as_os_str(), v.as_os_str()))
    }

    /// Copy of this snapshot with `HOME` pointing at `home` and the marker set.
    ///
    /// All other entries are carried over untouched.
    pub fn with_home_override(&self, home: &Path) -> Result<Self> {
        let home = home.as_os_str();
        if contains_nul(home) {
            return Err(LaunchError::Environment {
                key: HOME_VAR.to_string(),
                reason: "value contains a NUL byte".to_string(),
            });
        }
        let mut vars = self.vars.clone();
        vars.insert(HOME_VAR.into(), home.to_os_string());
        vars.insert(MARKER_VAR.into(), MARKER_VALUE.into());
        Ok(Self { vars })
    }
}

#[cfg(unix)]
fn contains_nul(value: &OsStr) -> bool {
    use std::os::unix::ffi::OsStrExt;
    value.as_bytes().contains(&0)
}

#[cfg(not(unix))]
fn contains_nul(value: &OsStr) -> bool {
    value.to_string_lossy().contains('\0')
}
