//! The launch request and the command it resolves to.

use std::ffi::OsString;
use std::path::PathBuf;

use crate::env::EnvSnapshot;
use crate::error::{LaunchError, Result};
use crate::SHELL_VAR;

/// Everything a launch needs, fixed once arguments are parsed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LaunchRequest {
    pub target_home: PathBuf,
    pub create_if_missing: bool,
    /// Program followed by its arguments. Empty means "run the default shell".
    pub command_line: Vec<OsString>,
}

/// What actually gets spawned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommandSource {
    Explicit { program: OsString, args: Vec<OsString> },
    /// `$SHELL`, started with no arguments.
    DefaultShell(PathBuf),
}

impl LaunchRequest {
    pub fn new(target_home: impl Into<PathBuf>) -> Self {
        Self {
            target_home: target_home.into(),
            create_if_missing: false,
            command_line: Vec::new(),
        }
    }

    pub fn create_if_missing(mut self, yes: bool) -> Self {
        self.create_if_missing = yes;
        self
    }

    pub fn command<I, S>(mut self, command_line: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.command_line = command_line.into_iter().map(Into::into).collect();
        self
    }

    /// Resolve the command to spawn. The shell is looked up in `env`, the
    /// invoking environment, not the overridden one.
    pub fn command_source(&self, env: &EnvSnapshot) -> Result<CommandSource> {
        match self.command_line.split_first() {
            Some((program, args)) => Ok(CommandSource::Explicit {
                program: program.clone(),
                args: args.to_vec(),
            }),
            None => match env.get(SHELL_VAR) {
                Some(shell) if !shell.is_empty() => {
                    Ok(CommandSource::DefaultShell(PathBuf::from(shell)))
                }
                _ => Err(LaunchError::DefaultShellNotFound),
            },
        }
    }
}

impl CommandSource {
    pub fn program(&self) -> &std::ffi::OsStr {
        match self {
            CommandSource::Explicit { program, .. } => program,
            CommandSource::DefaultShell(shell) => shell.as_os_str(),
        }
    }

    pub fn args(&self) -> &[OsString] {
        match self {
            CommandSource::Explicit { args, .. } => args,
            CommandSource::DefaultShell(_) => &[],
        }
    }

    /// Human-readable name used in diagnostics, e.g. `command 'ls'`.
    pub fn display_name(&self) -> String {
        match self {
            CommandSource::Explicit { program, .. } => {
                format!("command '{}'", program.to_string_lossy())
            }
            CommandSource::DefaultShell(shell) => {
                format!("default shell '{}'", shell.display())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_command_splits_program_and_args() {
        let req = LaunchRequest::new("/tmp").command(["echo", "hi", "--there"]);
        let src = req.command_source(&EnvSnapshot::default()).unwrap();
        assert_eq!(
            src,
            CommandSource::Explicit {
                program: "echo".into(),
                args: vec!["hi".into(), "--there".into()],
            }
        );
        assert_eq!(src.display_name(), "command 'echo'");
    }

    #[test]
    fn explicit_command_ignores_shell_var() {
        let env = EnvSnapshot::default();
        let req = LaunchRequest::new("/tmp").command(["true"]);
        assert!(req.command_source(&env).is_ok());
    }

    #[test]
    fn empty_command_uses_shell() {
        let env = EnvSnapshot::from_pairs([("SHELL", "/bin/zsh")]);
        let src = LaunchRequest::new("/tmp").command_source(&env).unwrap();
        assert_eq!(src, CommandSource::DefaultShell("/bin/zsh".into()));
        assert!(src.args().is_empty());
        assert_eq!(src.display_name(), "default shell '/bin/zsh'");
    }

    #[test]
    fn unset_or_empty_shell_is_an_error() {
        let req = LaunchRequest::new("/tmp");
        for env in [
            EnvSnapshot::default(),
            EnvSnapshot::from_pairs([("SHELL", "")]),
        ] {
            assert!(matches!(
                req.command_source(&env),
                Err(LaunchError::DefaultShellNotFound)
            ));
        }
    }
}
