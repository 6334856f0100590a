// Per-repository decisions, the run loop, result types

use crate::config::Config;
use crate::constants::KEY_URL;
use crate::error::{Error, Result};
use crate::git::{CloneOutcome, PullOutcome, Vcs};
use crate::marker::{Gate, RunMarker, check_interval};
use crate::settings::{RepoSettings, Settings};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};

/// What happened to one configured repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Path missing or not a repository, and `--create` was not given.
    Missing,
    /// Local modifications; pull skipped.
    Dirty,
    /// Present and clean enough, but `auto_update` is off.
    AutoUpdateDisabled,
    Cloned,
    Updated,
    AlreadyCurrent,
    /// The clone or pull was suppressed by dry-run mode.
    DryRun,
}

impl UpdateOutcome {
    /// Whether the outcome needs operator attention.
    #[must_use]
    pub fn is_warning(self) -> bool {
        matches!(self, UpdateOutcome::Missing | UpdateOutcome::Dirty)
    }
}

#[derive(Debug, Clone)]
pub struct UpdateResult {
    pub name: String,
    pub path: PathBuf,
    pub outcome: UpdateOutcome,
    pub duration: Duration,
}

/// Result of a whole run.
#[derive(Debug)]
pub enum RunReport {
    /// The update interval has not elapsed; no repository was looked at.
    RateLimited { remaining: Duration },
    Completed(Vec<UpdateResult>),
}

/// Walks the configured repositories in order, cloning or pulling each.
pub struct Updater<V, M> {
    vcs: V,
    marker: M,
    config: Config,
}

impl<V: Vcs, M: RunMarker> Updater<V, M> {
    pub fn new(vcs: V, marker: M, config: Config) -> Self {
        Self {
            vcs,
            marker,
            config,
        }
    }

    pub fn run(&self, settings: &Settings) -> Result<RunReport> {
        self.run_at(settings, SystemTime::now())
    }

    /// Same as [`Updater::run`] with an explicit current time.
    pub fn run_at(&self, settings: &Settings, now: SystemTime) -> Result<RunReport> {
        let gate = check_interval(&self.marker, settings.update_interval, now, &self.config)?;
        if let Gate::TooSoon { remaining } = gate {
            log::debug!(
                "Last update was less than the update interval ago, next run possible in {}s",
                remaining.as_secs()
            );
            return Ok(RunReport::RateLimited { remaining });
        }

        let mut results = Vec::with_capacity(settings.repos.len());
        for repo in &settings.repos {
            let start = Instant::now();
            let outcome = self.update(repo)?;
            results.push(UpdateResult {
                name: repo.name.clone(),
                path: repo.path.clone(),
                outcome,
                duration: start.elapsed(),
            });
        }
        Ok(RunReport::Completed(results))
    }

    /// Decides and performs the action for one repository.
    pub fn update(&self, repo: &RepoSettings) -> Result<UpdateOutcome> {
        let path = repo.path.as_path();

        if !path.exists() {
            if !self.config.create {
                log::warn!(
                    "Path {} does not exist, run with --create to checkout (missing folders will be created)",
                    path.display()
                );
                return Ok(UpdateOutcome::Missing);
            }
            return self.checkout(repo);
        }

        if !self.vcs.is_repository(path) {
            if !self.config.create {
                log::warn!(
                    "Path {} is not a git repository, run with --create to checkout",
                    path.display()
                );
                return Ok(UpdateOutcome::Missing);
            }
            return self.checkout(repo);
        }

        if !repo.auto_update {
            log::debug!("[{}] auto_update disabled, leaving {} alone", repo.name, path.display());
            return Ok(UpdateOutcome::AutoUpdateDisabled);
        }

        if self.vcs.has_local_changes(path, repo.ignore_untracked_files)? {
            log::warn!("Path {} has uncommitted changes, skipping", path.display());
            return Ok(UpdateOutcome::Dirty);
        }

        Ok(match self.vcs.pull(path)? {
            PullOutcome::Updated => {
                log::info!("{} updated", path.display());
                UpdateOutcome::Updated
            }
            PullOutcome::AlreadyUpToDate => {
                log::debug!("{} already up to date", path.display());
                UpdateOutcome::AlreadyCurrent
            }
            PullOutcome::DryRun => UpdateOutcome::DryRun,
        })
    }

    fn checkout(&self, repo: &RepoSettings) -> Result<UpdateOutcome> {
        let path = repo.path.as_path();
        let url = repo.url.as_deref().ok_or_else(|| Error::MissingKey {
            section: repo.name.clone(),
            key: KEY_URL.to_string(),
        })?;

        self.create_parent(path)?;

        log::info!("Checking out {} into {}", url, path.display());
        Ok(match self.vcs.clone_repo(url, path)? {
            CloneOutcome::Cloned => UpdateOutcome::Cloned,
            CloneOutcome::DryRun => UpdateOutcome::DryRun,
        })
    }

    fn create_parent(&self, path: &Path) -> Result<()> {
        let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
            return Ok(());
        };
        if parent.is_dir() {
            return Ok(());
        }
        if self.config.dry_run {
            log::info!("Dry run: not creating path {}", parent.display());
            return Ok(());
        }
        log::debug!("Creating path {}", parent.display());
        std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))
    }
}
