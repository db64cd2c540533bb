//! Run a shell or command with an overridden home directory.
//!
//! The launcher never touches the process-wide environment. It captures an
//! [`EnvSnapshot`] once, derives the child's environment from it, and hands
//! that environment to exactly one spawned child.
//!
//! Flow: `CreateDir? → VerifyDirExists → BuildEnv → ResolveCommand → Spawn → WaitChild`.
//! Every step either succeeds or ends the launch with a [`LaunchError`].

pub mod env;
pub mod error;
pub mod home;
pub mod launcher;
pub mod request;

/// Variable the child sees as its home directory.
pub const HOME_VAR: &str = "HOME";
/// Marker telling the child (and its descendants) that `HOME` was overridden.
pub const MARKER_VAR: &str = "EXPORT_HOME";
/// Value of [`MARKER_VAR`] in the child environment.
pub const MARKER_VALUE: &str = "1";
/// Variable naming the invoking user's interactive shell.
pub const SHELL_VAR: &str = "SHELL";

pub use env::EnvSnapshot;
pub use error::{LaunchError, Result};
pub use home::{prepare_home, HomePreparation};
pub use launcher::{LaunchReport, Launcher, PreparedLaunch};
pub use request::{CommandSource, LaunchRequest};
