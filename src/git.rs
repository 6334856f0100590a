//! Git command wrappers.
//!
//! This module provides a thin wrapper around the git CLI, handling command
//! execution, dry-run suppression and error formatting. The [`Vcs`] trait
//! is the only thing the updater depends on, so the parsing of exit codes
//! and git output lives here and nowhere else.

use crate::config::Config;
use crate::constants::{ALREADY_UP_TO_DATE, GIT, GIT_LOCALE};
use crate::error::{Error, Result};
use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, Stdio};

/// Result of a pull.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullOutcome {
    Updated,
    AlreadyUpToDate,
    /// Not executed because of dry-run mode.
    DryRun,
}

/// Result of a clone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloneOutcome {
    Cloned,
    /// Not executed because of dry-run mode.
    DryRun,
}

/// Version-control operations the updater needs.
pub trait Vcs {
    /// Whether `path` is inside a repository. Never fails: any git error
    /// means "not a repository".
    fn is_repository(&self, path: &Path) -> bool;

    /// Whether the working tree has tracked changes, or untracked files
    /// unless `ignore_untracked` is set.
    fn has_local_changes(&self, path: &Path, ignore_untracked: bool) -> Result<bool>;

    /// Pulls with a rebase strategy.
    fn pull(&self, path: &Path) -> Result<PullOutcome>;

    /// Clones `url` into `path`.
    fn clone_repo(&self, url: &str, path: &Path) -> Result<CloneOutcome>;
}

/// Whether a command may run in dry-run mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Safety {
    /// Read-only: always executed.
    Safe,
    /// Changes a working copy: skipped in dry-run mode.
    Mutating,
}

/// [`Vcs`] backed by the `git` executable.
#[derive(Debug, Clone, Copy)]
pub struct GitCli {
    dry_run: bool,
    verbose: bool,
}

impl GitCli {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            dry_run: config.dry_run,
            verbose: config.is_verbose(),
        }
    }

    /// Runs `cmd` unless it is mutating and dry-run is active.
    /// Returns `None` when the command was skipped.
    fn execute(&self, cmd: Command, safety: Safety) -> Result<Option<String>> {
        if self.dry_run && safety == Safety::Mutating {
            log::info!("Dry run: not running {}", describe(&cmd));
            return Ok(None);
        }
        run(cmd, self.verbose).map(Some)
    }
}

impl Vcs for GitCli {
    fn is_repository(&self, path: &Path) -> bool {
        let mut cmd = git_in(path);
        cmd.arg("rev-parse");
        self.execute(cmd, Safety::Safe).is_ok()
    }

    fn has_local_changes(&self, path: &Path, ignore_untracked: bool) -> Result<bool> {
        let mut cmd = git_in(path);
        cmd.args(["status", "--porcelain"]);
        if ignore_untracked {
            cmd.arg("--untracked-files=no");
        }
        let output = self.execute(cmd, Safety::Safe)?;
        Ok(output.is_some_and(|status| !status.is_empty()))
    }

    fn pull(&self, path: &Path) -> Result<PullOutcome> {
        log::debug!("Updating {}", path.display());
        let mut cmd = git_in(path);
        cmd.args(["pull", "--rebase"]);
        Ok(match self.execute(cmd, Safety::Mutating)? {
            None => PullOutcome::DryRun,
            Some(output) => parse_pull_output(&output),
        })
    }

    fn clone_repo(&self, url: &str, path: &Path) -> Result<CloneOutcome> {
        let mut cmd = git_command();
        cmd.arg("clone").arg(url).arg(path);
        Ok(match self.execute(cmd, Safety::Mutating)? {
            None => CloneOutcome::DryRun,
            Some(_) => CloneOutcome::Cloned,
        })
    }
}

/// Classifies the trimmed output of `git pull`.
#[must_use]
pub fn parse_pull_output(output: &str) -> PullOutcome {
    if output == ALREADY_UP_TO_DATE {
        PullOutcome::AlreadyUpToDate
    } else {
        PullOutcome::Updated
    }
}

/// Runs `git -C <repo> <args>` and returns its trimmed stdout.
///
/// Always executes, regardless of dry-run mode; git's stderr is discarded.
pub fn run_git(repo: &Path, args: &[&str]) -> Result<String> {
    let mut cmd = git_in(repo);
    cmd.args(args);
    run(cmd, false)
}

fn git_command() -> Command {
    let mut cmd = Command::new(GIT);
    cmd.env("LANG", GIT_LOCALE).env("LC_ALL", GIT_LOCALE);
    cmd
}

fn git_in(repo: &Path) -> Command {
    let mut cmd = git_command();
    cmd.arg("-C").arg(repo);
    cmd
}

fn run(mut cmd: Command, verbose: bool) -> Result<String> {
    let command = describe(&cmd);
    log::debug!("Running {command}");

    let output = cmd
        .stdin(Stdio::null())
        .stderr(if verbose {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .output()
        .map_err(|source| Error::Spawn {
            command: command.clone(),
            source,
        })?;

    if verbose {
        for line in String::from_utf8_lossy(&output.stderr).lines() {
            log::debug!("{GIT}: {line}");
        }
    }

    if output.status.success() {
        let result = String::from_utf8_lossy(&output.stdout);
        Ok(result.as_ref().trim().to_string())
    } else {
        Err(Error::Git {
            command,
            code: output.status.code(),
        })
    }
}

/// Renders a command the way a shell user would type it, e.g.
/// `LANG=C LC_ALL=C git -C /repo pull --rebase`.
fn describe(cmd: &Command) -> String {
    let envs = cmd.get_envs().filter_map(|(key, value)| {
        value.map(|v| format!("{}={}", key.to_string_lossy(), v.to_string_lossy()))
    });
    let program = std::iter::once(cmd.get_program()).chain(cmd.get_args());
    envs.chain(program.map(|part: &OsStr| part.to_string_lossy().into_owned()))
        .collect::<Vec<_>>()
        .join(" ")
}
