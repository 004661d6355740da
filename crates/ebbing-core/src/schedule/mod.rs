//! Scheduler Module
//!
//! Spaced-repetition interval calculator with three interchangeable
//! policies sharing one algorithm:
//!
//! 1. Look up a base interval by review count (clamped to the table end)
//! 2. Apply the policy multiplier (none, time ratio, or readiness)
//! 3. Round to whole days, at least one unless a same-day review is explicit
//! 4. Add to the anchor date and replace the pending dates
//!
//! The due-set helpers in [`due`] drive "today's list" and the completion
//! calendar.

pub mod due;
mod intervals;
mod policy;
mod scheduler;

pub use due::{completed_days, due_items, due_items_by, is_fully_caught_up, window_start};

pub use intervals::{
    DEFAULT_CONFIDENCE_INTERVALS, DEFAULT_ERS_INTERVALS, DEFAULT_FORGOTTEN_INTERVALS,
    DEFAULT_NOT_PROFICIENT_INTERVALS, DEFAULT_PROFICIENT_INTERVALS, IntervalTable,
    IntervalTableError, MAX_INTERVAL_DAYS,
};

pub use policy::{
    CategoricalPolicy, ConfidencePolicy, ErsPolicy, PolicyKind, SchedulingPolicy, effort_factor,
    readiness_factor, time_ratio_factor,
};

pub use scheduler::{
    Result, ReviewEvent, ReviewOutcome, ScheduleError, Scheduler, round_interval,
};
