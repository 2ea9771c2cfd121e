use super::issue::{Ceiling, Issue, IssueKind, IssueStatus, Severity, TimingAction};
use crate::config::Config;
use crate::subtitle::{Millis, Track};

/// Stand-in for the next start when the subtitle is the last in the track.
pub const OPEN_END: Millis = 5 * 60 * 1000;

/// Shortest display time that keeps `chars` at or under `max_cps`.
pub fn reading_time(chars: usize, max_cps: f64) -> Millis {
    (chars as f64 * 1000.0 / max_cps).ceil() as Millis
}

/// Evaluate duration, reading speed and the gap ceiling for one subtitle.
///
/// Only the subtitle's own end is ever proposed for change, and the proposal never
/// crosses `next.start - min_gap`, so repairing left to right never reopens an
/// earlier violation.
pub fn check(track: &Track, pos: usize, config: &Config) -> Option<Issue> {
    let sub = &track[pos];
    let next_start = match track.as_slice().get(pos + 1) {
        Some(next) => next.start,
        None => sub.start.saturating_add(OPEN_END),
    };

    let gap_ceiling = next_start.saturating_sub(config.min_gap_ms);
    let duration_ceiling = sub.start.saturating_add(config.max_duration_ms);
    let (max_end, ceiling) = if gap_ceiling <= duration_ceiling {
        (gap_ceiling, Ceiling::NextSubtitle)
    } else {
        (duration_ceiling, Ceiling::MaxDuration)
    };

    let chars = sub.char_count();
    let target_end = sub.start.saturating_add(
        config
            .min_duration_ms
            .max(reading_time(chars, config.max_chars_per_sec)),
    );

    let action = if gap_ceiling <= sub.start {
        TimingAction::Unfixable
    } else if target_end <= max_end {
        if sub.end < target_end {
            TimingAction::Extend
        } else if sub.end > max_end {
            TimingAction::Trim
        } else {
            return None;
        }
    } else {
        TimingAction::Compromise
    };

    // A subtitle with no duration is an error whatever the repair.
    let (severity, status) = match action {
        TimingAction::Unfixable => (Severity::Error, IssueStatus::Unfixable),
        _ if sub.duration() <= 0 => (Severity::Error, IssueStatus::Open),
        TimingAction::Extend | TimingAction::Trim => (Severity::Info, IssueStatus::Open),
        TimingAction::Compromise => (Severity::Warning, IssueStatus::Open),
    };

    Some(Issue {
        position: pos,
        index: sub.index,
        start: sub.start,
        end: sub.end,
        severity,
        status,
        kind: IssueKind::Timing {
            action,
            duration_ms: sub.duration(),
            chars_per_sec: sub.chars_per_sec(),
            target_end,
            max_end,
            ceiling,
        },
    })
}
