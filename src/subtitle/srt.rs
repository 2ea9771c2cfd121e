// SRT subtitle format
use super::{Millis, Subtitle, Track};
use crate::error::{Result, SubfixError};
use regex::Regex;
use std::sync::LazyLock;

static TIMING_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+):(\d{2}):(\d{2})[,.](\d{1,3})\s*-->\s*(\d+):(\d{2}):(\d{2})[,.](\d{1,3})")
        .expect("Invalid regex")
});

/// Largest hour field accepted in a timestamp.
const MAX_HOURS: Millis = 99;

static CLOCK_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(\d+):)?(\d{1,2}):(\d{1,2})(?:[.,](\d{1,3}))?$").expect("Invalid regex")
});

static SECONDS_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)[.,](\d{1,3})$").expect("Invalid regex"));

/// Parse SRT content into a track sorted by start time.
pub fn parse_srt(content: &str) -> Result<Track> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut subs = Vec::new();
    let mut lines = content.lines().enumerate().peekable();

    while let Some((n, line)) = lines.next() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let index: usize = line
            .parse()
            .map_err(|_| SubfixError::parse(n + 1, format!("expected subtitle number, got '{}'", line)))?;

        let (n, timing) = lines
            .next()
            .ok_or_else(|| SubfixError::parse(n + 2, "missing timing line"))?;
        let caps = TIMING_LINE
            .captures(timing.trim())
            .ok_or_else(|| SubfixError::parse(n + 1, format!("malformed timing line '{}'", timing.trim())))?;
        let field = |i: usize| caps.get(i).map_or("", |m| m.as_str());
        let start = clock_to_millis(field(1), field(2), field(3), field(4))
            .ok_or_else(|| SubfixError::parse(n + 1, "start time out of range"))?;
        let end = clock_to_millis(field(5), field(6), field(7), field(8))
            .ok_or_else(|| SubfixError::parse(n + 1, "end time out of range"))?;

        let mut text_lines = Vec::new();
        while let Some((_, text)) = lines.peek() {
            if text.trim().is_empty() {
                break;
            }
            text_lines.push(text.trim_end().to_string());
            lines.next();
        }

        subs.push(Subtitle::new(index, start, end, text_lines.join("\n")));
    }

    Ok(Track::new(subs))
}

/// Render a track as SRT.
pub fn format_srt(track: &Track) -> String {
    track
        .iter()
        .map(|sub| {
            format!(
                "{}\n{} --> {}\n{}\n",
                sub.index,
                format_timestamp(sub.start),
                format_timestamp(sub.end),
                sub.text
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_timestamp(ms: Millis) -> String {
    let ms = ms.max(0);
    let total_secs = ms / 1000;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    let millis = ms % 1000;
    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
}

/// Parse a user supplied time: `HH:MM:SS,mmm`, `MM:SS`, `SS.mmm` or bare milliseconds.
pub fn parse_time(s: &str) -> std::result::Result<Millis, String> {
    let s = s.trim();
    if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
        return s.parse().map_err(|_| format!("Time out of range: {}", s));
    }
    if let Some(caps) = CLOCK_TIME.captures(s) {
        let field = |i: usize| caps.get(i).map_or("0", |m| m.as_str());
        return clock_to_millis(field(1), field(2), field(3), field(4))
            .ok_or_else(|| format!("Time out of range: {}", s));
    }
    if let Some(caps) = SECONDS_TIME.captures(s) {
        return clock_to_millis("0", "0", &caps[1], &caps[2])
            .ok_or_else(|| format!("Time out of range: {}", s));
    }
    Err(format!(
        "Unrecognized time: {}. Use HH:MM:SS,mmm, MM:SS, SS.mmm or milliseconds",
        s
    ))
}

fn clock_to_millis(hours: &str, minutes: &str, seconds: &str, fraction: &str) -> Option<Millis> {
    let hours: Millis = hours.parse().ok()?;
    let minutes: Millis = minutes.parse().ok()?;
    let seconds: Millis = seconds.parse().ok()?;
    if hours > MAX_HOURS || minutes >= 60 || seconds >= 60 {
        return None;
    }
    // "5" means 500ms, as in "00:00:01,5"
    let millis: Millis = if fraction.is_empty() {
        0
    } else {
        format!("{:0<3}", fraction).parse().ok()?
    };
    Some(hours * 3_600_000 + minutes * 60_000 + seconds * 1000 + millis)
}
