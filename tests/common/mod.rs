//! Test infrastructure for git-updater integration tests.

#![allow(dead_code)]

use anyhow::Result;
use git_updater::config::Config;
use git_updater::git::run_git;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary git repository for testing.
/// Automatically cleaned up when dropped.
pub struct TestRepo {
    _temp_dir: TempDir,
    path: PathBuf,
}

impl TestRepo {
    /// Creates a new test repository with an initial commit on the master branch.
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().to_path_buf();

        run_git(&path, &["init", "-b", "master"])?;
        configure_identity(&path)?;

        std::fs::write(path.join("README.md"), "# Test Repo\n")?;
        run_git(&path, &["add", "README.md"])?;
        run_git(&path, &["commit", "-m", "Initial commit"])?;

        Ok(Self {
            _temp_dir: temp_dir,
            path,
        })
    }

    /// Creates a test repository pushed to a bare remote.
    /// Returns the repo and the remote TempDir (must be kept alive).
    pub fn with_remote() -> Result<(Self, TempDir)> {
        let remote_dir = TempDir::new()?;
        run_git(remote_dir.path(), &["init", "--bare", "-b", "master"])?;

        let local = Self::new()?;

        run_git(
            &local.path,
            &["remote", "add", "origin", remote_dir.path().to_str().unwrap()],
        )?;
        run_git(&local.path, &["push", "-u", "origin", "master"])?;

        Ok((local, remote_dir))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Commits a file and pushes it to `origin`.
    pub fn push_commit(&self, file: &str, content: &str) -> Result<()> {
        std::fs::write(self.path.join(file), content)?;
        run_git(&self.path, &["add", file])?;
        run_git(&self.path, &["commit", "-m", &format!("Update {file}")])?;
        run_git(&self.path, &["push", "origin", "master"])?;
        Ok(())
    }
}

/// Modifies a tracked file without committing.
pub fn make_dirty(repo: &Path) -> Result<()> {
    std::fs::write(repo.join("README.md"), "# Modified\n")?;
    Ok(())
}

/// Adds a file git does not track.
pub fn make_untracked(repo: &Path) -> Result<()> {
    std::fs::write(repo.join("untracked.txt"), "scratch\n")?;
    Ok(())
}

pub fn head(repo: &Path) -> Result<String> {
    Ok(run_git(repo, &["rev-parse", "HEAD"])?)
}

pub fn configure_identity(repo: &Path) -> Result<()> {
    run_git(repo, &["config", "user.email", "test@example.com"])?;
    run_git(repo, &["config", "user.name", "Test User"])?;
    Ok(())
}

pub fn test_config() -> Config {
    Config::default()
}

/// Writes an INI config file into `dir` and returns its path.
pub fn write_config(dir: &Path, content: &str) -> Result<PathBuf> {
    let path = dir.join("gitupdater.ini");
    std::fs::write(&path, content)?;
    Ok(path)
}
