use super::issue::{Issue, IssueKind, IssueStatus, Severity};
use crate::config::Limits;
use crate::subtitle::Subtitle;

/// Flag text over the length limits. Report only, rewrapping is left to a human.
pub fn check(sub: &Subtitle, pos: usize, limits: &Limits<usize>) -> Option<Issue> {
    let chars = sub.char_count();
    let (severity, limit) = if chars > limits.error {
        (Severity::Error, limits.error)
    } else if chars > limits.warn {
        (Severity::Warning, limits.warn)
    } else {
        return None;
    };

    Some(Issue {
        position: pos,
        index: sub.index,
        start: sub.start,
        end: sub.end,
        severity,
        status: IssueStatus::Open,
        kind: IssueKind::LineLength { chars, limit },
    })
}
