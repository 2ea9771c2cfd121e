use crate::check::{check_and_fix, CheckReport, IssueStatus, Severity};
use crate::config::Config;
use crate::error::{Result, SubfixError};
use crate::locate::locate;
use crate::split::{compute_splits, describe, Segment};
use crate::subtitle::srt::format_timestamp;
use crate::subtitle::{load_track, save_track, Millis, OutputTarget, Track};
use console::style;
use serde::Serialize;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::info;

/// Per-run options that are not subtitle constraints.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub output: OutputTarget,
    /// Only subtitles in `[from, to)` are checked.
    pub from: Option<Millis>,
    pub to: Option<Millis>,
    /// Keep only the selected range in the output.
    pub crop: bool,
    /// Report split points instead of checking.
    pub split_only: bool,
    pub dry_run: bool,
}

impl RunOptions {
    pub fn new(output: OutputTarget) -> Self {
        Self {
            output,
            from: None,
            to: None,
            crop: false,
            split_only: false,
            dry_run: false,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Outcome {
    Check(CheckReport),
    Split { segments: Vec<Segment> },
}

#[derive(Debug, Serialize)]
pub struct RunResult {
    pub input: PathBuf,
    pub output_path: Option<PathBuf>,
    pub subtitles: usize,
    pub range: Range<usize>,
    pub outcome: Outcome,
    #[serde(skip)]
    pub elapsed: Duration,
}

/// Load, check or split, and save one subtitle file.
pub fn run(input: &Path, config: &Config, options: &RunOptions) -> Result<RunResult> {
    let started = Instant::now();

    if !input.exists() {
        return Err(SubfixError::FileNotFound(input.display().to_string()));
    }

    let mut track = load_track(input)?;
    info!("Loaded {} subtitles from {}", track.len(), input.display());
    let subtitles = track.len();

    let range = resolve_range(&track, options.from, options.to)?;

    if options.split_only {
        let mut selected = track.clone();
        selected.crop(range.clone());
        let splits: Vec<usize> = compute_splits(&selected, config)?
            .into_iter()
            .map(|pos| pos + range.start)
            .collect();
        let segments = describe(&track, range.start, &splits);
        info!("Found {} segments", segments.len());
        return Ok(RunResult {
            input: input.to_path_buf(),
            output_path: None,
            subtitles,
            range,
            outcome: Outcome::Split { segments },
            elapsed: started.elapsed(),
        });
    }

    let report = check_and_fix(&mut track, config, range.clone());
    info!(
        "Checked {} subtitles: {} issues, {} fixes applied",
        range.len(),
        report.issues.len(),
        report.summary.fixes_applied
    );

    if options.crop {
        track.crop(range.clone());
        info!("Cropped to {} subtitles", track.len());
    }

    let output_path = if options.dry_run {
        info!("Dry run, nothing written");
        None
    } else {
        Some(save_track(&track, input, &options.output)?)
    };

    Ok(RunResult {
        input: input.to_path_buf(),
        output_path,
        subtitles,
        range,
        outcome: Outcome::Check(report),
        elapsed: started.elapsed(),
    })
}

/// Map a `[from, to)` time window to a position range.
///
/// A subtitle is selected when it ends at or after `from` and starts before `to`.
/// Boundaries that do not land on a subtitle edge are logged with the edge used.
pub fn resolve_range(track: &Track, from: Option<Millis>, to: Option<Millis>) -> Result<Range<usize>> {
    let len = track.len();

    if let (Some(from), Some(to)) = (from, to) {
        if from >= to {
            return Err(SubfixError::Range {
                message: format!(
                    "start {} is not before end {}",
                    format_timestamp(from),
                    format_timestamp(to)
                ),
                hint: format_timestamp(from),
            });
        }
    }

    let begin = match from {
        None => 0,
        Some(t) => {
            let pos = locate(track, t);
            if pos == len {
                let hint = track
                    .last()
                    .map_or_else(|| format_timestamp(0), |s| format_timestamp(s.start));
                return Err(SubfixError::Range {
                    message: format!("start {} is after the last subtitle", format_timestamp(t)),
                    hint,
                });
            }
            if track[pos].start != t {
                info!(
                    "Range start {} resolved to #{} at {}",
                    format_timestamp(t),
                    track[pos].index,
                    format_timestamp(track[pos].start)
                );
            }
            pos
        }
    };

    let end = match to {
        None => len,
        Some(t) => {
            let mut pos = locate(track, t);
            if pos < len && track[pos].start < t {
                pos += 1;
            }
            let exact = (pos > 0 && track[pos - 1].end == t) || (pos < len && track[pos].start == t);
            if !exact && pos > 0 {
                info!(
                    "Range end {} resolved to #{} ending at {}",
                    format_timestamp(t),
                    track[pos - 1].index,
                    format_timestamp(track[pos - 1].end)
                );
            }
            pos
        }
    };

    if begin >= end && len > 0 {
        let hint = format_timestamp(track[begin.min(len - 1)].start);
        return Err(SubfixError::Range {
            message: "no subtitles in the selected range".to_string(),
            hint,
        });
    }

    Ok(begin..end)
}

/// Print each issue on its own line, coloured by severity.
pub fn print_issues(report: &CheckReport) {
    for issue in &report.issues {
        let label = match issue.severity {
            Severity::Info => style(issue.severity.to_string()).cyan(),
            Severity::Warning => style(issue.severity.to_string()).yellow(),
            Severity::Error => style(issue.severity.to_string()).red().bold(),
        };
        let status = match issue.status {
            IssueStatus::Fixed => style(" (fixed)").green(),
            IssueStatus::Unfixable => style(" (unfixable)").red(),
            IssueStatus::Open => style(""),
        };
        println!("{:>5} {}{}", label, issue, status);
    }
}

pub fn print_summary(result: &RunResult) {
    println!();
    println!("═══════════════════════════════════════════════════════════════");
    println!("                         Subtitle Check                         ");
    println!("═══════════════════════════════════════════════════════════════");
    println!();
    println!("  Input:      {}", result.input.display());
    match &result.output_path {
        Some(path) => println!("  Output:     {}", path.display()),
        None => println!("  Output:     (not written)"),
    }
    println!(
        "  Subtitles:  {} ({} selected)",
        result.subtitles,
        result.range.len()
    );
    println!();

    match &result.outcome {
        Outcome::Check(report) => {
            let s = &report.summary;
            println!("  Gaps created:   {}", s.gaps_created);
            println!("  Prolonged:      {}", s.prolonged);
            println!("  Shortened:      {}", s.shortened);
            println!("  Too fast:       {}", s.compromised);
            println!("  Unfixable:      {}", s.unfixable);
            println!("  Too long:       {}", s.too_long);
            println!("  Fixes applied:  {}", s.fixes_applied);
            println!();
            println!(
                "  Issues:     {} info, {} warnings, {} errors",
                s.infos, s.warnings, s.errors
            );
        }
        Outcome::Split { segments } => {
            println!("  Segments:");
            for (i, seg) in segments.iter().enumerate() {
                let gap = seg
                    .gap_before
                    .map(|g| format!(" (after {:.1}s gap)", g as f64 / 1000.0))
                    .unwrap_or_default();
                println!(
                    "    {:>3}. {} --> {}  subtitles {}..{}{}",
                    i + 1,
                    format_timestamp(seg.start),
                    format_timestamp(seg.end),
                    seg.range.start + 1,
                    seg.range.end,
                    gap
                );
            }
        }
    }

    println!();
    println!("  Time:       {:.2}s", result.elapsed.as_secs_f64());
    println!();
    println!("═══════════════════════════════════════════════════════════════");
}

pub fn to_json(result: &RunResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subtitle::track_from;

    fn sample() -> Track {
        track_from(&[
            (1000, 2000, "a"),
            (3000, 4000, "b"),
            (5000, 6000, "c"),
            (7000, 8000, "d"),
        ])
    }

    #[test]
    fn test_resolve_full_range() {
        assert_eq!(resolve_range(&sample(), None, None).unwrap(), 0..4);
    }

    #[test]
    fn test_resolve_exact_boundaries() {
        let track = sample();
        assert_eq!(resolve_range(&track, Some(3000), Some(7000)).unwrap(), 1..3);
        assert_eq!(resolve_range(&track, Some(3000), Some(6000)).unwrap(), 1..3);
    }

    #[test]
    fn test_resolve_inexact_boundaries() {
        let track = sample();
        // 2500 is between "a" and "b"; 5500 is inside "c", which is kept.
        assert_eq!(resolve_range(&track, Some(2500), Some(5500)).unwrap(), 1..3);
        assert_eq!(resolve_range(&track, Some(0), Some(100_000)).unwrap(), 0..4);
    }

    #[test]
    fn test_resolve_errors() {
        let track = sample();

        let err = resolve_range(&track, Some(9000), None).unwrap_err();
        match err {
            SubfixError::Range { hint, .. } => assert_eq!(hint, "00:00:07,000"),
            other => panic!("unexpected error: {other}"),
        }

        assert!(resolve_range(&track, Some(5000), Some(4000)).is_err());
        assert!(resolve_range(&track, Some(2100), Some(2900)).is_err());
    }

    #[test]
    fn test_resolve_empty_track() {
        assert_eq!(resolve_range(&Track::default(), None, None).unwrap(), 0..0);
    }

    #[test]
    fn test_run_options_defaults() {
        let options = RunOptions::new(OutputTarget::InPlace);
        assert!(!options.crop);
        assert!(!options.split_only);
        assert!(!options.dry_run);
        assert_eq!(options.from, None);
    }
}
