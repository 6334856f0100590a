use anyhow::Context;
use clap::Parser;
use git_updater::config::{Config, Verbosity};
use git_updater::git::GitCli;
use git_updater::marker::StampFile;
use git_updater::output;
use git_updater::repo::{RunReport, Updater};
use git_updater::settings::{self, Settings};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

/// Clone or update the git repositories listed in your gitupdater config.
#[derive(Parser, Debug)]
#[command(version, about, arg_required_else_help = true)]
struct Cli {
    /// Path to alternate config file; defaults to ~/.config/gitupdater and any file in ~/.config/gitupdater.d/
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Set verbosity to DEBUG and show git's own messages
    #[arg(short, long)]
    verbose: bool,

    /// Do not run any command that changes a repository
    #[arg(short, long)]
    dry_run: bool,

    /// Checkout new repos if needed, ignoring the update interval
    #[arg(long)]
    create: bool,
}

impl Cli {
    fn runtime_config(&self) -> Config {
        Config {
            verbosity: if self.verbose {
                Verbosity::Verbose
            } else {
                Verbosity::Normal
            },
            dry_run: self.dry_run,
            create: self.create,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = cli.runtime_config();
    output::init_logging(&config);

    match run(cli.config, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(config_path: Option<PathBuf>, config: Config) -> anyhow::Result<()> {
    let files = match config_path {
        Some(path) => vec![path],
        None => settings::default_files()?,
    };
    let settings = Settings::load(&files).context("Failed to load configuration")?;

    let marker = StampFile::default_location()?;
    log::debug!("Using last-run marker {}", marker.path().display());

    let start = Instant::now();
    let updater = Updater::new(GitCli::new(&config), marker, config);
    match updater.run(&settings)? {
        RunReport::RateLimited { .. } => {}
        RunReport::Completed(results) => {
            output::print_summary(&results, start.elapsed(), &config);
        }
    }

    Ok(())
}
