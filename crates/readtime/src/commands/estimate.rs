//! Estimate command: reading time of a file.

use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use readtime_core::settings::MAX_READING_SPEED;
use readtime_core::{Duration, Settings, compute_duration, present};

use super::{open_store, read_input_file};

/// Arguments for the `estimate` subcommand.
#[derive(Args, Debug)]
pub struct EstimateArgs {
    /// File to analyze (HTML or plain text).
    pub file: Utf8PathBuf,

    /// Reading speed in words per minute (overrides the stored setting).
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_READING_SPEED)))]
    pub speed: Option<u32>,
}

/// Reading time report for one file.
#[derive(Debug, Serialize)]
pub struct EstimateReport {
    /// Words per minute used for the estimate.
    pub reading_speed: u32,
    /// The estimated duration.
    #[serde(flatten)]
    pub duration: Duration,
    /// The duration formatted with the configured labels.
    pub time_text: String,
}

/// Estimate the reading time of a file.
#[instrument(name = "cmd_estimate", skip_all, fields(file = %args.file))]
pub fn cmd_estimate(
    args: EstimateArgs,
    global_json: bool,
    options_path: &Utf8Path,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    debug!(file = %args.file, speed = ?args.speed, "executing estimate command");

    let content = read_input_file(&args.file, max_input_bytes)?;
    let settings = Settings::load(&open_store(options_path)?);
    let report = estimate(&content, &settings, args.speed);

    if global_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "{} {}",
            report.time_text.bold(),
            format!(
                "({} words at {} wpm)",
                report.duration.words, report.reading_speed
            )
            .dimmed()
        );
    }

    Ok(())
}

fn estimate(content: &str, settings: &Settings, speed: Option<u32>) -> EstimateReport {
    let reading_speed = speed.unwrap_or_else(|| settings.effective_speed());
    let duration = compute_duration(content, reading_speed);
    EstimateReport {
        reading_speed,
        duration,
        time_text: present::format_time_text(&duration, settings),
    }
}
