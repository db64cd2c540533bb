//! Spawn one child with the overridden home and wait for it.

use std::process::{Command, ExitStatus, Stdio};

use crate::env::EnvSnapshot;
use crate::error::{LaunchError, Result};
use crate::home::prepare_home;
use crate::request::{CommandSource, LaunchRequest};

/// Runs launch requests against a fixed invoking environment.
#[derive(Clone, Debug)]
pub struct Launcher {
    env: EnvSnapshot,
}

/// What a successful launch did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LaunchReport {
    pub home_created: bool,
    pub command: CommandSource,
}

impl Launcher {
    pub fn new(env: EnvSnapshot) -> Self {
        Self { env }
    }

    /// Launcher over the current process environment.
    pub fn from_process() -> Self {
        Self::new(EnvSnapshot::capture())
    }

    /// Prepare the home directory, then run the requested command (or the
    /// default shell) to completion.
    pub fn launch(&self, request: &LaunchRequest) -> Result<LaunchReport> {
        self.prepare(request)?.run()
    }

    /// First half of a launch: create the home if asked to and check that
    /// it exists. Nothing is spawned yet.
    ///
    /// A directory created here is not removed when a later step fails.
    pub fn prepare<'a>(&'a self, request: &'a LaunchRequest) -> Result<PreparedLaunch<'a>> {
        let home = &request.target_home;
        let prep = prepare_home(home, request.create_if_missing)?;
        if prep.created {
            tracing::info!(home = %home.display(), "created home directory");
        }
        Ok(PreparedLaunch {
            launcher: self,
            request,
            home_created: prep.created,
        })
    }
}

/// A launch whose home directory is known to exist.
#[derive(Debug)]
pub struct PreparedLaunch<'a> {
    launcher: &'a Launcher,
    request: &'a LaunchRequest,
    home_created: bool,
}

impl PreparedLaunch<'_> {
    pub fn home_created(&self) -> bool {
        self.home_created
    }

    /// Build the child environment, resolve the command, spawn it and wait.
    pub fn run(self) -> Result<LaunchReport> {
        let home = &self.request.target_home;
        let child_env = self.launcher.env.with_home_override(home)?;
        tracing::debug!(home = %home.display(), vars = child_env.len(), "built child environment");

        let command = self.request.command_source(&self.launcher.env)?;
        run_to_completion(&command, &child_env)?;

        Ok(LaunchReport {
            home_created: self.home_created,
            command,
        })
    }
}

/// The single spawn path for both explicit commands and the default shell.
fn run_to_completion(command: &CommandSource, env: &EnvSnapshot) -> Result<ExitStatus> {
    let name = command.display_name();
    tracing::info!(command = %name, args = command.args().len(), "spawning");

    let mut child = Command::new(command.program())
        .args(command.args())
        .env_clear()
        .envs(env.iter())
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|source| LaunchError::Spawn {
            command: name.clone(),
            source,
        })?;

    let status = child.wait().map_err(|source| LaunchError::Spawn {
        command: name.clone(),
        source,
    })?;
    tracing::info!(command = %name, %status, "child exited");

    if !status.success() {
        return Err(LaunchError::ChildFailed {
            command: name,
            status,
        });
    }
    Ok(status)
}
