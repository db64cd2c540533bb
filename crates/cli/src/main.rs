#[cfg(not(unix))]
compile_error!("chhome needs a Unix process model and a $SHELL variable");

use std::ffi::OsString;
use std::fmt::Display;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use chhome::{LaunchRequest, Launcher};
use clap::{ArgAction, CommandFactory, Parser};
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

const SUCCESS_MESSAGE: &str = "Commands executed successfully.";

#[derive(Parser, Debug)]
#[command(name = "chhome", version)]
#[command(about = "Run a shell or command with HOME pointed at another directory")]
#[command(override_usage = "chhome [-n] <new_home_directory> [<command> [arguments...]]")]
struct Cmd {
    /// Create the home directory if it doesn't exist (parents are not created)
    #[arg(short = 'n')]
    create: bool,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Target home directory, then the program and arguments to run instead
    /// of $SHELL. Flag parsing stops at the target directory.
    #[arg(
        value_name = "ARGS",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    args: Vec<OsString>,
}

impl Cmd {
    /// Split positional words into the target directory and the command.
    fn target(self) -> Option<(PathBuf, Vec<OsString>)> {
        let mut words = self.args.into_iter();
        let home = PathBuf::from(words.next()?);
        Some((home, words.collect()))
    }
}

fn main() -> ExitCode {
    let cmd = Cmd::parse();
    if let Err(err) = init_logging(cmd.verbose) {
        eprintln!("chhome: {err:#}");
        return ExitCode::FAILURE;
    }

    let create = cmd.create;
    // No target is informational, not a failure.
    let Some((home, command)) = cmd.target() else {
        say(Cmd::command().render_usage());
        return ExitCode::SUCCESS;
    };

    let request = LaunchRequest::new(home)
        .create_if_missing(create)
        .command(command);
    tracing::debug!(?request, "parsed arguments");

    match launch(&request) {
        Ok(()) => {
            say(SUCCESS_MESSAGE);
            ExitCode::SUCCESS
        }
        Err(err) => {
            let code = err.exit_code();
            tracing::debug!(error = ?err, code, "launch failed");
            eprintln!("chhome: {err}");
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

/// Print a status line. A closed stdout is not a launch failure.
fn say(line: impl Display) {
    let _ = writeln!(io::stdout().lock(), "{line}");
}

fn launch(request: &LaunchRequest) -> chhome::Result<()> {
    let launcher = Launcher::from_process();
    let prepared = launcher.prepare(request)?;
    if prepared.home_created() {
        say(format_args!(
            "Created new home directory: {}",
            request.target_home.display()
        ));
    }
    prepared.run()?;
    Ok(())
}

/// Logs go to stderr; stdout belongs to the child.
fn init_logging(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clap_definition_is_consistent() {
        Cmd::command().debug_assert();
    }

    #[test]
    fn no_arguments_leaves_home_unset() {
        let cmd = Cmd::try_parse_from(["chhome"]).unwrap();
        assert!(cmd.target().is_none());
        let cmd = Cmd::try_parse_from(["chhome", "-n"]).unwrap();
        assert!(cmd.create);
        assert!(cmd.target().is_none());
    }

    #[test]
    fn command_words_after_home_are_kept_verbatim() {
        let cmd = Cmd::try_parse_from(["chhome", "-n", "/tmp/h", "ls", "-la", "--color"]).unwrap();
        assert!(cmd.create);
        let (home, command) = cmd.target().unwrap();
        assert_eq!(home, PathBuf::from("/tmp/h"));
        assert_eq!(command, ["ls", "-la", "--color"]);
    }

    #[test]
    fn own_flags_after_home_belong_to_the_command() {
        let cmd = Cmd::try_parse_from(["chhome", "/tmp/h", "-n", "x"]).unwrap();
        assert!(!cmd.create);
        let (_, command) = cmd.target().unwrap();
        assert_eq!(command, ["-n", "x"]);

        let cmd = Cmd::try_parse_from(["chhome", "/tmp/h", "-v", "--help"]).unwrap();
        assert_eq!(cmd.verbose, 0);
        let (_, command) = cmd.target().unwrap();
        assert_eq!(command, ["-v", "--help"]);
    }

    #[test]
    fn flags_before_home_are_still_parsed() {
        let cmd = Cmd::try_parse_from(["chhome", "-n", "-vv", "/tmp/h"]).unwrap();
        assert!(cmd.create);
        assert_eq!(cmd.verbose, 2);
        let (home, command) = cmd.target().unwrap();
        assert_eq!(home, PathBuf::from("/tmp/h"));
        assert!(command.is_empty());
    }

    #[test]
    fn usage_line_matches_documented_form() {
        let usage = Cmd::command().render_usage().to_string();
        assert_eq!(
            usage,
            "Usage: chhome [-n] <new_home_directory> [<command> [arguments...]]"
        );
    }
}
