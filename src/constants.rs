//! Application-wide constants.
//!
//! Centralized configuration values to avoid magic strings throughout the codebase.

/// Name of the primary config file under the user's config directory.
pub const CONFIG_FILE_NAME: &str = "gitupdater";

/// Companion directory whose files are layered on top of the primary config.
pub const CONFIG_DIR_NAME: &str = "gitupdater.d";

/// Reserved section holding keys that apply to every repository section.
pub const DEFAULT_SECTION: &str = "DEFAULT";

/// Directory (under the user cache dir) and file name of the last-run marker.
pub const MARKER_DIR_NAME: &str = "gitupdater";
pub const MARKER_FILE_NAME: &str = "last-run";

/// Section keys.
pub const KEY_PATH: &str = "path";
pub const KEY_URL: &str = "url";
pub const KEY_AUTO_UPDATE: &str = "auto_update";
pub const KEY_IGNORE_UNTRACKED: &str = "ignore_untracked_files";
pub const KEY_UPDATE_INTERVAL: &str = "update_interval";

/// Git executable name.
pub const GIT: &str = "git";

/// Locale forced on every git invocation so its output stays parseable.
pub const GIT_LOCALE: &str = "C";

/// Exact output of `git pull` when there was nothing to fetch.
pub const ALREADY_UP_TO_DATE: &str = "Already up to date.";
