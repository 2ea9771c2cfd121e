pub mod gap;
pub mod issue;
pub mod length;
pub mod timing;

pub use issue::{
    Applied, Ceiling, Fix, Issue, IssueKind, IssueStatus, Severity, TimingAction,
    UnfixableConstraint,
};

use crate::config::Config;
use crate::subtitle::Track;
use serde::Serialize;
use std::ops::Range;
use tracing::debug;

/// Counters for one check run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub gaps_created: usize,
    pub prolonged: usize,
    pub shortened: usize,
    pub compromised: usize,
    pub unfixable: usize,
    pub too_long: usize,
    pub fixes_applied: usize,
    pub infos: usize,
    pub warnings: usize,
    pub errors: usize,
}

impl Summary {
    /// Count one issue. Repair counters only move for issues that were fixed.
    /// `repeated` marks an unfixable gap already counted by the timing pass.
    fn tally(&mut self, issue: &Issue, repeated: bool) {
        match issue.severity {
            Severity::Info => self.infos += 1,
            Severity::Warning => self.warnings += 1,
            Severity::Error => self.errors += 1,
        }
        if issue.status == IssueStatus::Unfixable && !repeated {
            self.unfixable += 1;
        }
        let fixed = issue.status == IssueStatus::Fixed;
        match &issue.kind {
            IssueKind::Gap { .. } => {
                if fixed {
                    self.gaps_created += 1;
                }
            }
            IssueKind::Timing {
                action, ceiling, ..
            } => match action {
                TimingAction::Compromise => self.compromised += 1,
                _ if !fixed => {}
                TimingAction::Extend => self.prolonged += 1,
                TimingAction::Trim if *ceiling == Ceiling::NextSubtitle => {
                    self.gaps_created += 1
                }
                TimingAction::Trim => self.shortened += 1,
                TimingAction::Unfixable => {}
            },
            IssueKind::LineLength { .. } => self.too_long += 1,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckReport {
    pub range: Range<usize>,
    pub issues: Vec<Issue>,
    pub summary: Summary,
}

impl CheckReport {
    pub fn has_errors(&self) -> bool {
        self.summary.errors > 0
    }
}

/// Run the enabled checks over `range` and apply fixes for checks in fix mode.
///
/// Order: timing (merged gap, duration and reading speed repair), then the standalone
/// gap check, then line length. The gap check only mutates when the timing check is
/// not fixing, so a run never mixes the two gap repair policies.
pub fn check_and_fix(track: &mut Track, config: &Config, range: Range<usize>) -> CheckReport {
    let range = range.start.min(track.len())..range.end.min(track.len());
    let mut report = CheckReport {
        range: range.clone(),
        ..Default::default()
    };

    if config.timing_check.enabled() {
        for pos in range.clone() {
            if let Some(mut issue) = timing::check(track, pos, config) {
                if config.timing_check.fixes() {
                    resolve(&mut issue, track, &mut report.summary);
                }
                report.issues.push(issue);
            }
        }
    }

    if config.gap_check.enabled() {
        let fix_gaps = config.gap_check.fixes() && !config.timing_check.fixes();
        for pos in range.clone() {
            if let Some(mut issue) = gap::check(track, pos, &config.gap) {
                if fix_gaps {
                    resolve(&mut issue, track, &mut report.summary);
                }
                report.issues.push(issue);
            }
        }
    }

    if config.length_check.enabled() {
        for pos in range.clone() {
            if let Some(issue) = length::check(&track[pos], pos, &config.line_length) {
                report.issues.push(issue);
            }
        }
    }

    let timing_unfixable: Vec<usize> = report
        .issues
        .iter()
        .filter(|issue| {
            matches!(
                issue.kind,
                IssueKind::Timing {
                    action: TimingAction::Unfixable,
                    ..
                }
            )
        })
        .map(|issue| issue.position)
        .collect();
    for issue in &report.issues {
        let repeated = matches!(issue.kind, IssueKind::Gap { .. })
            && timing_unfixable.contains(&(issue.position - 1));
        report.summary.tally(issue, repeated);
    }
    report
}

fn resolve(issue: &mut Issue, track: &mut Track, summary: &mut Summary) {
    let Some(fix) = issue.proposed_fix() else {
        return;
    };
    if issue.status == IssueStatus::Unfixable {
        return;
    }

    match fix.apply(track) {
        Ok(applied) => {
            issue.status = IssueStatus::Fixed;
            if applied.changed() {
                summary.fixes_applied += 1;
                debug!(
                    "#{}: end {} -> {}",
                    track[applied.position].index, applied.old_end, applied.new_end
                );
            }
        }
        Err(e) => {
            debug!("Fix rejected: {}", e);
            issue.status = IssueStatus::Unfixable;
            issue.severity = Severity::Error;
        }
    }
}
