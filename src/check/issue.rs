use crate::subtitle::srt::format_timestamp;
use crate::subtitle::{Millis, Track};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "INFO"),
            Severity::Warning => write!(f, "WARN"),
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

/// What a timing issue does (or cannot do) about the subtitle's end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimingAction {
    /// End raised to meet minimum duration and reading speed.
    Extend,
    /// End lowered to the ceiling.
    Trim,
    /// End set to the ceiling, which is still short of the target.
    Compromise,
    /// The next subtitle starts too early for any valid end.
    Unfixable,
}

/// Which limit produced the ceiling for a subtitle's end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Ceiling {
    NextSubtitle,
    MaxDuration,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum IssueKind {
    Gap {
        prev_index: usize,
        gap_ms: Millis,
        floor_ms: Millis,
        /// Shrunk end for the previous subtitle, if one exists.
        new_end: Option<Millis>,
    },
    Timing {
        action: TimingAction,
        duration_ms: Millis,
        chars_per_sec: Option<f64>,
        target_end: Millis,
        max_end: Millis,
        ceiling: Ceiling,
    },
    LineLength {
        chars: usize,
        limit: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueStatus {
    Open,
    Fixed,
    Unfixable,
}

/// A finding for one subtitle. Holds a snapshot of the timing at detection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    pub position: usize,
    pub index: usize,
    pub start: Millis,
    pub end: Millis,
    pub severity: Severity,
    pub status: IssueStatus,
    #[serde(flatten)]
    pub kind: IssueKind,
}

impl Issue {
    pub fn fixable(&self) -> bool {
        self.status != IssueStatus::Unfixable && self.proposed_fix().is_some()
    }

    /// The end-time change that resolves this issue, if any.
    pub fn proposed_fix(&self) -> Option<Fix> {
        match &self.kind {
            IssueKind::Gap { new_end, .. } => new_end.map(|new_end| Fix {
                position: self.position - 1,
                new_end,
            }),
            IssueKind::Timing {
                action,
                target_end,
                max_end,
                ..
            } => match action {
                TimingAction::Extend => Some(Fix {
                    position: self.position,
                    new_end: *target_end,
                }),
                TimingAction::Trim | TimingAction::Compromise => Some(Fix {
                    position: self.position,
                    new_end: *max_end,
                }),
                TimingAction::Unfixable => None,
            },
            IssueKind::LineLength { .. } => None,
        }
    }
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "#{} [{} --> {}] {}",
            self.index,
            format_timestamp(self.start),
            format_timestamp(self.end),
            self.kind
        )
    }
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueKind::Gap {
                prev_index,
                gap_ms,
                floor_ms,
                new_end,
            } => {
                write!(f, "gap of {}ms after #{} (min {}ms)", gap_ms, prev_index, floor_ms)?;
                match new_end {
                    Some(end) => write!(f, "; end #{} at {}", prev_index, format_timestamp(*end)),
                    None => write!(f, "; #{} cannot be shortened", prev_index),
                }
            }
            IssueKind::Timing {
                action,
                duration_ms,
                chars_per_sec,
                target_end,
                max_end,
                ceiling,
            } => {
                let speed = match chars_per_sec {
                    Some(cps) => format!("{:.1} cps", cps),
                    None => "no reading time".to_string(),
                };
                match action {
                    TimingAction::Extend => write!(
                        f,
                        "too short ({}ms, {}); extend to {}",
                        duration_ms,
                        speed,
                        format_timestamp(*target_end)
                    ),
                    TimingAction::Trim => match ceiling {
                        Ceiling::NextSubtitle => write!(
                            f,
                            "runs into the next subtitle's gap; end at {}",
                            format_timestamp(*max_end)
                        ),
                        Ceiling::MaxDuration => write!(
                            f,
                            "too long ({}ms); end at {}",
                            duration_ms,
                            format_timestamp(*max_end)
                        ),
                    },
                    TimingAction::Compromise => write!(
                        f,
                        "too fast ({}ms, {}); best end {} is short of {}",
                        duration_ms,
                        speed,
                        format_timestamp(*max_end),
                        format_timestamp(*target_end)
                    ),
                    TimingAction::Unfixable => write!(
                        f,
                        "next subtitle starts too close; no valid end exists ({})",
                        speed
                    ),
                }
            }
            IssueKind::LineLength { chars, limit } => {
                write!(f, "text too long: {} chars (max {}). Break it down!", chars, limit)
            }
        }
    }
}

/// A new end time for the subtitle at `position`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Fix {
    pub position: usize,
    pub new_end: Millis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Applied {
    pub position: usize,
    pub old_end: Millis,
    pub new_end: Millis,
}

impl Applied {
    pub fn changed(&self) -> bool {
        self.old_end != self.new_end
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("subtitle #{index}: {reason}")]
pub struct UnfixableConstraint {
    pub index: usize,
    pub reason: String,
}

impl Fix {
    /// Move the end time. Refuses anything that would leave the subtitle empty
    /// or overlapping its successor.
    pub fn apply(&self, track: &mut Track) -> Result<Applied, UnfixableConstraint> {
        let sub = &track[self.position];
        if self.new_end <= sub.start {
            return Err(UnfixableConstraint {
                index: sub.index,
                reason: format!(
                    "end {} would not be after start {}",
                    format_timestamp(self.new_end),
                    format_timestamp(sub.start)
                ),
            });
        }
        if let Some(next) = track.as_slice().get(self.position + 1) {
            if self.new_end > next.start {
                return Err(UnfixableConstraint {
                    index: sub.index,
                    reason: format!(
                        "end {} would overlap #{}",
                        format_timestamp(self.new_end),
                        next.index
                    ),
                });
            }
        }

        let old_end = sub.end;
        track.set_end(self.position, self.new_end);
        Ok(Applied {
            position: self.position,
            old_end,
            new_end: self.new_end,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subtitle::track_from;

    #[test]
    fn test_apply_moves_end() {
        let mut track = track_from(&[(0, 1000, "a"), (1500, 2000, "b")]);
        let applied = Fix {
            position: 0,
            new_end: 1300,
        }
        .apply(&mut track)
        .unwrap();

        assert!(applied.changed());
        assert_eq!(applied.old_end, 1000);
        assert_eq!(track[0].end, 1300);
        assert_eq!(track[0].start, 0);
    }

    #[test]
    fn test_apply_refuses_empty_subtitle() {
        let mut track = track_from(&[(500, 1000, "a")]);
        let err = Fix {
            position: 0,
            new_end: 500,
        }
        .apply(&mut track)
        .unwrap_err();

        assert_eq!(err.index, 1);
        assert_eq!(track[0].end, 1000);
    }

    #[test]
    fn test_apply_refuses_overlap() {
        let mut track = track_from(&[(0, 1000, "a"), (1500, 2000, "b")]);
        assert!(Fix {
            position: 0,
            new_end: 1600
        }
        .apply(&mut track)
        .is_err());
        assert_eq!(track[0].end, 1000);
    }

    #[test]
    fn test_line_length_has_no_fix() {
        let issue = Issue {
            position: 0,
            index: 1,
            start: 0,
            end: 1000,
            severity: Severity::Error,
            status: IssueStatus::Open,
            kind: IssueKind::LineLength {
                chars: 200,
                limit: 80,
            },
        };
        assert!(issue.proposed_fix().is_none());
        assert!(!issue.fixable());
        assert!(issue.to_string().contains("200 chars"));
    }

    #[test]
    fn test_gap_fix_targets_previous_subtitle() {
        let issue = Issue {
            position: 3,
            index: 4,
            start: 5000,
            end: 6000,
            severity: Severity::Warning,
            status: IssueStatus::Open,
            kind: IssueKind::Gap {
                prev_index: 3,
                gap_ms: 100,
                floor_ms: 150,
                new_end: Some(4850),
            },
        };
        assert_eq!(
            issue.proposed_fix(),
            Some(Fix {
                position: 2,
                new_end: 4850
            })
        );
    }
}
