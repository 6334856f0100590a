//! Repository settings loaded from INI files.
//!
//! The configuration is a primary file plus every file in a companion
//! directory. Files are merged in order: later keys override earlier ones and
//! sections keep the position of their first appearance. The `DEFAULT`
//! section (and any keys before the first header) is inherited by every
//! repository section. Defaults are resolved once here, so the rest of the
//! crate only sees typed [`RepoSettings`] records.

use crate::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_SECTION, KEY_AUTO_UPDATE, KEY_IGNORE_UNTRACKED,
    KEY_PATH, KEY_UPDATE_INTERVAL, KEY_URL,
};
use crate::error::{Error, Result};
use ini::{Ini, ParseOption};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

type Keys = BTreeMap<String, String>;

/// One managed repository, with defaults already applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSettings {
    /// Section name, used in log lines.
    pub name: String,
    /// Local working copy, with `~` expanded.
    pub path: PathBuf,
    /// Remote to clone from. Only required when the working copy is missing.
    pub url: Option<String>,
    pub auto_update: bool,
    pub ignore_untracked_files: bool,
}

/// Fully resolved configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// Minimum time between two runs. `None` disables rate limiting.
    pub update_interval: Option<Duration>,
    /// Repositories in declaration order.
    pub repos: Vec<RepoSettings>,
}

impl Settings {
    /// Loads and merges the given files in order.
    pub fn load(paths: &[PathBuf]) -> Result<Self> {
        if paths.is_empty() {
            return Err(Error::Config {
                message: "no configuration file given".to_string(),
            });
        }

        log::debug!("Sourcing config file(s) {:?}", paths);

        let mut raw = RawConfig::default();
        for path in paths {
            let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
            raw.merge_str(&content, &path.display().to_string())?;
        }

        let settings = raw.resolve()?;
        settings.log_debug();
        Ok(settings)
    }

    /// Parses a single configuration document.
    pub fn parse_str(content: &str) -> Result<Self> {
        let mut raw = RawConfig::default();
        raw.merge_str(content, "<string>")?;
        raw.resolve()
    }

    fn log_debug(&self) {
        log::debug!("Configuration:");
        match self.update_interval {
            Some(interval) => log::debug!("update interval: {}s", interval.as_secs_f64()),
            None => log::debug!("update interval: none"),
        }
        for repo in &self.repos {
            log::debug!("[{}]\n{:?}", repo.name, repo);
        }
    }
}

/// Sections merged across files, before defaults are applied.
#[derive(Debug, Default)]
struct RawConfig {
    defaults: Keys,
    sections: Vec<(String, Keys)>,
}

impl RawConfig {
    fn merge_str(&mut self, content: &str, origin: &str) -> Result<()> {
        let option = ParseOption {
            enabled_quote: false,
            enabled_escape: false,
            ..ParseOption::default()
        };
        let ini = Ini::load_from_str_opt(content, option).map_err(|e| Error::Config {
            message: format!("{origin}: {e}"),
        })?;

        for (section, properties) in ini.iter() {
            let target = match section {
                None | Some(DEFAULT_SECTION) => &mut self.defaults,
                Some(name) => self.section_mut(name),
            };
            for (key, value) in properties.iter() {
                target.insert(key.trim().to_lowercase(), value.trim().to_string());
            }
        }
        Ok(())
    }

    fn section_mut(&mut self, name: &str) -> &mut Keys {
        let index = match self.sections.iter().position(|(n, _)| n == name) {
            Some(index) => index,
            None => {
                self.sections.push((name.to_string(), Keys::new()));
                self.sections.len() - 1
            }
        };
        &mut self.sections[index].1
    }

    fn resolve(self) -> Result<Settings> {
        let update_interval = self
            .defaults
            .get(KEY_UPDATE_INTERVAL)
            .map(|value| parse_interval(value))
            .transpose()?;

        let repos = self
            .sections
            .iter()
            .map(|(name, keys)| self.resolve_section(name, keys))
            .collect::<Result<Vec<_>>>()?;

        Ok(Settings {
            update_interval,
            repos,
        })
    }

    fn resolve_section(&self, name: &str, keys: &Keys) -> Result<RepoSettings> {
        let lookup = |key: &str| keys.get(key).or_else(|| self.defaults.get(key));
        let flag = |key: &str| -> Result<bool> {
            match lookup(key) {
                Some(value) => parse_bool(value).ok_or_else(|| Error::InvalidBool {
                    section: name.to_string(),
                    key: key.to_string(),
                    value: value.clone(),
                }),
                None => Ok(false),
            }
        };

        let raw_path = lookup(KEY_PATH).ok_or_else(|| Error::MissingKey {
            section: name.to_string(),
            key: KEY_PATH.to_string(),
        })?;

        Ok(RepoSettings {
            name: name.to_string(),
            path: expand_path(raw_path),
            url: lookup(KEY_URL).filter(|url| !url.is_empty()).cloned(),
            auto_update: flag(KEY_AUTO_UPDATE)?,
            ignore_untracked_files: flag(KEY_IGNORE_UNTRACKED)?,
        })
    }
}

/// Parses an interval such as `30s`, `5m`, `2h` or `1.5d`.
pub fn parse_interval(value: &str) -> Result<Duration> {
    let invalid = || Error::InvalidInterval {
        value: value.to_string(),
    };

    let trimmed = value.trim();
    let unit = trimmed.chars().last().ok_or_else(invalid)?;
    let multiplier = match unit {
        's' => 1.0,
        'm' => 60.0,
        'h' => 3600.0,
        'd' => 86400.0,
        _ => return Err(invalid()),
    };

    let number = &trimmed[..trimmed.len() - unit.len_utf8()];
    let amount: f64 = number.parse().map_err(|_| invalid())?;
    if !amount.is_finite() || amount < 0.0 {
        return Err(invalid());
    }

    Duration::try_from_secs_f64(amount * multiplier).map_err(|_| invalid())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "yes" | "true" | "on" => Some(true),
        "0" | "no" | "false" | "off" => Some(false),
        _ => None,
    }
}

fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).into_owned())
}

/// Default config files: `~/.config/gitupdater` and `~/.config/gitupdater.d/*`.
pub fn default_files() -> Result<Vec<PathBuf>> {
    let home = dirs::home_dir().ok_or_else(|| Error::Config {
        message: "cannot determine home directory".to_string(),
    })?;
    default_files_in(&home)
}

/// Same as [`default_files`] for an explicit home directory.
pub fn default_files_in(home: &Path) -> Result<Vec<PathBuf>> {
    let config_dir = home.join(".config");
    let mut files = Vec::new();

    let primary = config_dir.join(CONFIG_FILE_NAME);
    if primary.is_file() {
        files.push(primary);
    }

    let companion = config_dir.join(CONFIG_DIR_NAME);
    if companion.is_dir() {
        let mut extra: Vec<PathBuf> = std::fs::read_dir(&companion)
            .map_err(|e| Error::io(&companion, e))?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file())
            .collect();
        extra.sort();
        files.extend(extra);
    }

    if files.is_empty() {
        return Err(Error::Config {
            message: format!(
                "no configuration found at {} or in {}",
                config_dir.join(CONFIG_FILE_NAME).display(),
                companion.display()
            ),
        });
    }
    Ok(files)
}
