pub mod check;
pub mod config;
pub mod error;
pub mod locate;
pub mod pipeline;
pub mod split;
pub mod subtitle;

pub use check::{check_and_fix, CheckReport, Issue, IssueKind, Severity, Summary};
pub use config::{CheckMode, Config, Limits};
pub use error::{Result, SubfixError};
pub use locate::{find_next_big_gap, locate};
pub use pipeline::{print_summary, run, RunOptions, RunResult};
pub use split::compute_splits;
pub use subtitle::{Subtitle, Track};
