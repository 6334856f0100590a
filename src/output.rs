//! Log formatting and the end-of-run summary.
//!
//! Log lines go to stderr as `<timestamp> <LEVEL> <message>`, with warnings
//! and errors highlighted. The summary is only printed in verbose mode.

use crate::config::Config;
use crate::repo::{UpdateOutcome, UpdateResult};
use colored::{ColoredString, Colorize};
use log::Level;
use std::io::Write;
use std::time::Duration;

/// Installs the global logger. `RUST_LOG` overrides the verbosity flag.
pub fn init_logging(config: &Config) {
    env_logger::Builder::new()
        .filter_level(config.log_level())
        .parse_default_env()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} {} {}",
                buf.timestamp_seconds(),
                format_level(record.level()),
                record.args()
            )
        })
        .init();
}

/// Level name padded to a fixed width, colored for warnings and errors.
pub fn format_level(level: Level) -> ColoredString {
    let name = match level {
        Level::Error => "ERROR",
        Level::Warn => "WARNING",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    };
    let padded = format!("{name:<8}");
    match level {
        Level::Error => padded.red().bold(),
        Level::Warn => padded.yellow().bold(),
        _ => padded.normal(),
    }
}

pub fn print_summary(results: &[UpdateResult], duration: Duration, config: &Config) {
    if !config.is_verbose() {
        return;
    }

    print_section("Summary");
    for result in results {
        let symbol = if result.outcome.is_warning() {
            "!".yellow().bold()
        } else {
            "✓".green()
        };
        println!(
            "  {} {} {} {} in {}",
            symbol,
            result.name.white().bold(),
            result.path.display().to_string().dimmed(),
            outcome_label(result.outcome).cyan(),
            format_duration(result.duration).dimmed(),
        );
    }

    let warnings = results.iter().filter(|r| r.outcome.is_warning()).count();
    println!(
        "\n{}: {} repositories, {} need attention, in {}",
        "Total".white().bold(),
        results.len(),
        warnings,
        format_duration(duration)
    );
}

fn outcome_label(outcome: UpdateOutcome) -> &'static str {
    match outcome {
        UpdateOutcome::Missing => "missing",
        UpdateOutcome::Dirty => "uncommitted changes",
        UpdateOutcome::AutoUpdateDisabled => "auto_update off",
        UpdateOutcome::Cloned => "cloned",
        UpdateOutcome::Updated => "updated",
        UpdateOutcome::AlreadyCurrent => "up to date",
        UpdateOutcome::DryRun => "dry run",
    }
}

fn format_duration(duration: Duration) -> String {
    format!("{:.2}s", duration.as_secs_f32())
}

fn print_section(title: &str) {
    let line = "=".repeat(50).cyan().dimmed();
    let padding = (50 - title.len()) / 2;
    let centered = format!("{:>width$}", title, width = padding + title.len());
    println!("\n{}\n{}\n{}\n", line, centered.cyan().bold(), line);
}
