//! Git working-copy updater library.
//!
//! This crate keeps a set of local git checkouts in sync with their remotes:
//! - Loading repository settings from layered INI files
//! - Rate limiting runs through a last-run marker file
//! - Cloning missing repositories on request
//! - Pulling (with rebase) clean repositories that opt into auto update

pub mod config;
pub mod constants;
pub mod error;
pub mod git;
pub mod marker;
pub mod output;
pub mod repo;
pub mod settings;
