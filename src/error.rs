//! Error types for the updater.
//!
//! Configuration problems are fatal before any repository is touched.
//! Git failures are fatal for clone and pull; the repository probe turns
//! them into `false` instead (see [`crate::git::Vcs::is_repository`]).

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid update interval {value:?}: expected a number followed by one of s, m, h, d")]
    InvalidInterval { value: String },

    #[error("Invalid boolean {value:?} for key '{key}' in section [{section}]")]
    InvalidBool {
        section: String,
        key: String,
        value: String,
    },

    #[error("Missing required key '{key}' in section [{section}]")]
    MissingKey { section: String, key: String },

    #[error("{command} failed with {}", code.map(|c| format!("exit code {c}")).unwrap_or_else(|| "no exit code".to_string()))]
    Git { command: String, code: Option<i32> },

    #[error("Failed to spawn {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
