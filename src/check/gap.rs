use super::issue::{Issue, IssueKind, IssueStatus, Severity};
use crate::config::Limits;
use crate::subtitle::{Millis, Track};

/// Compare the gap before `pos` against the warning and error floors.
///
/// The proposed repair shrinks the previous subtitle's end until the gap reaches the
/// warning floor. If that would empty the previous subtitle the issue is unfixable.
pub fn check(track: &Track, pos: usize, floors: &Limits<Millis>) -> Option<Issue> {
    if pos == 0 {
        return None;
    }

    let gap = track.gap(pos);
    let severity = if gap < floors.error {
        Severity::Error
    } else if gap < floors.warn {
        Severity::Warning
    } else {
        return None;
    };

    let prev = &track[pos - 1];
    let shrunk = prev.end - (floors.warn - gap);
    let (new_end, severity, status) = if shrunk > prev.start {
        (Some(shrunk), severity, IssueStatus::Open)
    } else {
        (None, Severity::Error, IssueStatus::Unfixable)
    };

    let sub = &track[pos];
    Some(Issue {
        position: pos,
        index: sub.index,
        start: sub.start,
        end: sub.end,
        severity,
        status,
        kind: IssueKind::Gap {
            prev_index: prev.index,
            gap_ms: gap,
            floor_ms: floors.warn,
            new_end,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subtitle::track_from;

    const FLOORS: Limits<Millis> = Limits {
        warn: 150,
        error: 100,
    };

    #[test]
    fn test_first_subtitle_never_flagged() {
        let track = track_from(&[(0, 1000, "a")]);
        assert!(check(&track, 0, &FLOORS).is_none());
    }

    #[test]
    fn test_gap_severity() {
        let track = track_from(&[(0, 1000, "a"), (1120, 2000, "b"), (2050, 3000, "c"), (3150, 4000, "d")]);

        assert_eq!(check(&track, 1, &FLOORS).unwrap().severity, Severity::Warning);
        assert_eq!(check(&track, 2, &FLOORS).unwrap().severity, Severity::Error);
        assert!(check(&track, 3, &FLOORS).is_none());
    }

    #[test]
    fn test_gap_fix_shrinks_previous_by_deficit() {
        let track = track_from(&[(0, 1000, "a"), (1050, 2000, "b")]);
        let issue = check(&track, 1, &FLOORS).unwrap();
        let fix = issue.proposed_fix().unwrap();

        assert_eq!(fix.position, 0);
        assert_eq!(fix.new_end, 900);
    }

    #[test]
    fn test_overlap_is_error() {
        let track = track_from(&[(0, 1000, "a"), (800, 2000, "b")]);
        let issue = check(&track, 1, &FLOORS).unwrap();

        assert_eq!(issue.severity, Severity::Error);
        assert_eq!(issue.proposed_fix().unwrap().new_end, 650);
    }

    #[test]
    fn test_unfixable_when_previous_would_vanish() {
        let track = track_from(&[(1000, 1100, "a"), (1150, 2000, "b")]);
        let issue = check(&track, 1, &FLOORS).unwrap();

        assert_eq!(issue.status, IssueStatus::Unfixable);
        assert_eq!(issue.severity, Severity::Error);
        assert!(!issue.fixable());
    }
}
