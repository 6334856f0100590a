//! Runtime options derived from CLI arguments.

use log::LevelFilter;

/// Runtime configuration derived from CLI arguments.
#[derive(Debug, Clone, Copy, Default)]
pub struct Config {
    /// Controls the verbosity level of log output and git diagnostics.
    pub verbosity: Verbosity,
    /// Skip every mutating command (clone, pull, directory creation).
    pub dry_run: bool,
    /// Clone missing repositories and ignore the update interval.
    pub create: bool,
}

impl Config {
    #[must_use]
    pub fn is_verbose(&self) -> bool {
        self.verbosity == Verbosity::Verbose
    }

    /// Returns the log level matching the verbosity setting.
    ///
    /// Verbose mode also surfaces git's stderr, which is logged at debug level.
    #[must_use]
    pub fn log_level(&self) -> LevelFilter {
        if self.is_verbose() {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}

/// Verbosity level for CLI output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    #[default]
    Normal,
    Verbose,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_verbose_flag() {
        let normal = Config::default();
        assert!(!normal.is_verbose());
        assert!(!normal.dry_run);
        assert!(!normal.create);

        let verbose = Config {
            verbosity: Verbosity::Verbose,
            ..Config::default()
        };
        assert!(verbose.is_verbose());
    }

    #[test]
    fn test_log_level_follows_verbosity() {
        let verbose = Config {
            verbosity: Verbosity::Verbose,
            ..Config::default()
        };
        assert_eq!(verbose.log_level(), LevelFilter::Debug);
        assert_eq!(Config::default().log_level(), LevelFilter::Info);
    }
}
