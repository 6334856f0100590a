//! Last-run marker and the update-interval gate.
//!
//! Only the marker's modification time matters. Overlapping invocations
//! are not excluded from each other.

use crate::config::Config;
use crate::constants::{MARKER_DIR_NAME, MARKER_FILE_NAME};
use crate::error::{Error, Result};
use filetime::FileTime;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Storage for the time of the last update run.
pub trait RunMarker {
    /// Time of the last recorded run, `None` if there never was one.
    fn last_run(&self) -> Result<Option<SystemTime>>;

    /// Records that a run starts now.
    fn record_run_now(&self) -> Result<()>;
}

/// Marker stored as the modification time of a file.
#[derive(Debug, Clone)]
pub struct StampFile {
    path: PathBuf,
}

impl StampFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Marker at the well-known location under the user cache directory.
    pub fn default_location() -> Result<Self> {
        let cache = dirs::cache_dir().ok_or_else(|| Error::Config {
            message: "cannot determine cache directory for the last-run marker".to_string(),
        })?;
        Ok(Self::new(cache.join(MARKER_DIR_NAME).join(MARKER_FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RunMarker for StampFile {
    fn last_run(&self) -> Result<Option<SystemTime>> {
        match std::fs::metadata(&self.path) {
            Ok(meta) => meta
                .modified()
                .map(Some)
                .map_err(|e| Error::io(&self.path, e)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::io(&self.path, e)),
        }
    }

    fn record_run_now(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| Error::io(&self.path, e))?;
        filetime::set_file_mtime(&self.path, FileTime::now()).map_err(|e| Error::io(&self.path, e))
    }
}

/// Decision of the interval check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Proceed,
    /// The previous run is too recent; nothing should be processed.
    TooSoon { remaining: Duration },
}

/// Checks the update interval against the marker, refreshing the marker
/// when the run may proceed.
///
/// `--create` bypasses the interval. In dry-run mode the marker is left
/// untouched so the next real run is not delayed.
pub fn check_interval<M: RunMarker>(
    marker: &M,
    interval: Option<Duration>,
    now: SystemTime,
    config: &Config,
) -> Result<Gate> {
    if let (Some(interval), Some(last)) = (interval, marker.last_run()?) {
        // A timestamp in the future counts as "just ran".
        let elapsed = now.duration_since(last).unwrap_or(Duration::ZERO);
        if elapsed < interval {
            if !config.create {
                return Ok(Gate::TooSoon {
                    remaining: interval - elapsed,
                });
            }
            log::debug!("Update interval not elapsed, continuing because of --create");
        }
    }

    if config.dry_run {
        log::debug!("Dry run: not refreshing last-run marker");
    } else {
        marker.record_run_now()?;
    }
    Ok(Gate::Proceed)
}
