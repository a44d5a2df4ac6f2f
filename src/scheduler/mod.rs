//! Background tasks: the match cycle loop and the weekly report check.

mod errors;
pub mod match_cycle;
pub mod weekly;

pub use errors::{CycleError, ReportError};
pub use match_cycle::{run_match_loop, CycleOutcome, MatchCycleRunner};
pub use weekly::{
    is_report_due, run_weekly_loop, run_weekly_loop_with_clock, ReportOutcome, WeeklyReporter,
};

use std::time::Duration;

/// Pause after a failed or panicked cycle before the next attempt
pub const CYCLE_FAILURE_COOLDOWN: Duration = Duration::from_secs(60);

/// How often the weekly task checks whether a report is due
pub const WEEKLY_CHECK_INTERVAL: Duration = Duration::from_secs(60 * 60);
