use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use subfix::config::{CheckMode, Config};
use subfix::pipeline::{print_issues, print_summary, run, to_json, Outcome, RunOptions};
use subfix::subtitle::srt::parse_time;
use subfix::subtitle::{default_output_path, Millis, OutputTarget};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "subfix")]
#[command(version, about = "Check and fix SRT subtitle timing")]
#[command(
    long_about = "Enforce minimum gaps, display durations, reading speed and line length in SRT \
                  subtitles. Fixed files are written next to the input as fixed.<name>, to OUTPUT, \
                  or in place with a .bak backup."
)]
struct Cli {
    /// Input SRT file
    input: PathBuf,

    /// Output file (defaults to fixed.<input name>)
    #[arg(conflicts_with = "in_place")]
    output: Option<PathBuf>,

    /// Overwrite the input, keeping the previous version as <input>.bak
    #[arg(short, long)]
    in_place: bool,

    /// Gap check: off, check, fix
    #[arg(long)]
    gap: Option<CheckMode>,

    /// Duration and reading speed check: off, check, fix
    #[arg(long)]
    timing: Option<CheckMode>,

    /// Line length check: off, check
    #[arg(long)]
    length: Option<CheckMode>,

    /// Minimum gap between subtitles in ms
    #[arg(long)]
    min_gap: Option<Millis>,

    /// Minimum subtitle duration in ms
    #[arg(long)]
    min_duration: Option<Millis>,

    /// Maximum subtitle duration in ms
    #[arg(long)]
    max_duration: Option<Millis>,

    /// Maximum reading speed in characters per second
    #[arg(long)]
    max_cps: Option<f64>,

    /// Text length that triggers a warning
    #[arg(long)]
    line_warn: Option<usize>,

    /// Text length that triggers an error
    #[arg(long)]
    line_error: Option<usize>,

    /// Only process subtitles from this time (HH:MM:SS,mmm, MM:SS or ms)
    #[arg(long, value_parser = parse_time)]
    from: Option<Millis>,

    /// Only process subtitles before this time
    #[arg(long, value_parser = parse_time)]
    to: Option<Millis>,

    /// Write only the selected range
    #[arg(long)]
    crop: bool,

    /// Report split points at large gaps instead of checking
    #[arg(long)]
    split: bool,

    /// Target segment length for --split (HH:MM:SS, MM:SS or ms)
    #[arg(long, value_parser = parse_time)]
    split_interval: Option<Millis>,

    /// Minimum silence to split at, in ms
    #[arg(long)]
    split_gap: Option<Millis>,

    /// Check without writing anything
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn apply_overrides(cli: &Cli, config: &mut Config) {
    if let Some(mode) = cli.gap {
        config.gap_check = mode;
    }
    if let Some(mode) = cli.timing {
        config.timing_check = mode;
    }
    if let Some(mode) = cli.length {
        config.length_check = mode;
    }
    if let Some(gap) = cli.min_gap {
        config.min_gap_ms = gap;
        // The standalone check warns at the same floor the timing fix reserves.
        config.gap.warn = gap;
        config.gap.error = config.gap.error.min(gap);
    }
    if let Some(ms) = cli.min_duration {
        config.min_duration_ms = ms;
    }
    if let Some(ms) = cli.max_duration {
        config.max_duration_ms = ms;
    }
    if let Some(cps) = cli.max_cps {
        config.max_chars_per_sec = cps;
    }
    if let Some(n) = cli.line_warn {
        config.line_length.warn = n;
    }
    if let Some(n) = cli.line_error {
        config.line_length.error = n;
    }
    if let Some(ms) = cli.split_interval {
        config.split_interval_ms = ms;
    }
    if let Some(ms) = cli.split_gap {
        config.split_gap_ms = ms;
    }
}

fn output_target(cli: &Cli, input: &Path) -> OutputTarget {
    if cli.in_place {
        OutputTarget::InPlace
    } else {
        OutputTarget::Path(
            cli.output
                .clone()
                .unwrap_or_else(|| default_output_path(input)),
        )
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let mut config = Config::load().context("Failed to load configuration")?;
    apply_overrides(&cli, &mut config);
    config
        .validate()
        .context("Configuration validation failed")?;

    let options = RunOptions {
        output: output_target(&cli, &cli.input),
        from: cli.from,
        to: cli.to,
        crop: cli.crop,
        split_only: cli.split,
        dry_run: cli.dry_run,
    };

    info!("Input:  {}", cli.input.display());
    info!(
        "Checks: gap={} timing={} length={}",
        config.gap_check, config.timing_check, config.length_check
    );

    let result = run(&cli.input, &config, &options)
        .with_context(|| format!("Failed to process {}", cli.input.display()))?;

    if cli.json {
        println!("{}", to_json(&result)?);
        return Ok(());
    }

    if let Outcome::Check(report) = &result.outcome {
        print_issues(report);
    }
    print_summary(&result);

    Ok(())
}
