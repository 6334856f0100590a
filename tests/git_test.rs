mod common;

use common::{TestRepo, configure_identity, make_dirty, make_untracked, test_config};
use git_updater::config::Config;
use git_updater::error::Error;
use git_updater::git::{self, CloneOutcome, GitCli, PullOutcome, Vcs};
use std::path::PathBuf;
use tempfile::TempDir;

fn git_cli() -> GitCli {
    GitCli::new(&test_config())
}

#[test]
fn test_is_repository() -> anyhow::Result<()> {
    let repo = TestRepo::new()?;
    let plain = TempDir::new()?;

    assert!(git_cli().is_repository(repo.path()));
    assert!(!git_cli().is_repository(plain.path()));
    assert!(!git_cli().is_repository(&PathBuf::from("/no/such/repo/for/test")));
    Ok(())
}

#[test]
fn test_clean_repo_has_no_local_changes() -> anyhow::Result<()> {
    let repo = TestRepo::new()?;
    assert!(!git_cli().has_local_changes(repo.path(), false)?);
    assert!(!git_cli().has_local_changes(repo.path(), true)?);
    Ok(())
}

#[test]
fn test_tracked_changes_always_count() -> anyhow::Result<()> {
    let repo = TestRepo::new()?;
    make_dirty(repo.path())?;
    assert!(git_cli().has_local_changes(repo.path(), false)?);
    assert!(git_cli().has_local_changes(repo.path(), true)?);
    Ok(())
}

#[test]
fn test_untracked_files_can_be_ignored() -> anyhow::Result<()> {
    let repo = TestRepo::new()?;
    make_untracked(repo.path())?;
    assert!(git_cli().has_local_changes(repo.path(), false)?);
    assert!(!git_cli().has_local_changes(repo.path(), true)?);
    Ok(())
}

#[test]
fn test_clone_then_pull_up_to_date() -> anyhow::Result<()> {
    let (_origin, remote) = TestRepo::with_remote()?;
    let work = TempDir::new()?;
    let target = work.path().join("clone");

    let cloned = git_cli().clone_repo(remote.path().to_str().unwrap(), &target)?;

    assert_eq!(cloned, CloneOutcome::Cloned);
    assert!(target.join("README.md").is_file());
    assert_eq!(git_cli().pull(&target)?, PullOutcome::AlreadyUpToDate);
    Ok(())
}

#[test]
fn test_pull_reports_update() -> anyhow::Result<()> {
    let (origin, remote) = TestRepo::with_remote()?;
    let work = TempDir::new()?;
    let target = work.path().join("clone");
    git_cli().clone_repo(remote.path().to_str().unwrap(), &target)?;
    configure_identity(&target)?;

    origin.push_commit("CHANGELOG.md", "v2\n")?;

    assert_eq!(git_cli().pull(&target)?, PullOutcome::Updated);
    assert!(target.join("CHANGELOG.md").is_file());
    Ok(())
}

#[test]
fn test_clone_failure_is_an_error() -> anyhow::Result<()> {
    let work = TempDir::new()?;
    let result = git_cli().clone_repo("/no/such/remote.git", &work.path().join("clone"));
    assert!(matches!(result, Err(Error::Git { .. })));
    Ok(())
}

#[test]
fn test_pull_without_upstream_is_an_error() -> anyhow::Result<()> {
    let repo = TestRepo::new()?;
    assert!(git_cli().pull(repo.path()).is_err());
    Ok(())
}

#[test]
fn test_dry_run_leaves_repository_untouched() -> anyhow::Result<()> {
    let (origin, remote) = TestRepo::with_remote()?;
    let work = TempDir::new()?;
    let target = work.path().join("clone");
    git_cli().clone_repo(remote.path().to_str().unwrap(), &target)?;
    origin.push_commit("CHANGELOG.md", "v2\n")?;

    let dry = GitCli::new(&Config {
        dry_run: true,
        ..Config::default()
    });
    let before = common::head(&target)?;

    assert_eq!(dry.pull(&target)?, PullOutcome::DryRun);
    assert_eq!(common::head(&target)?, before);
    assert!(dry.is_repository(&target));
    Ok(())
}

#[test]
fn test_run_git_reports_failure_for_unknown_ref() -> anyhow::Result<()> {
    let repo = TestRepo::new()?;
    let result = git::run_git(repo.path(), &["rev-parse", "does-not-exist"]);
    assert!(matches!(result, Err(Error::Git { code: Some(_), .. })));
    Ok(())
}

#[test]
fn test_run_git_trims_output() -> anyhow::Result<()> {
    let repo = TestRepo::new()?;
    let branch = git::run_git(repo.path(), &["rev-parse", "--abbrev-ref", "HEAD"])?;
    assert_eq!(branch, "master");
    Ok(())
}
