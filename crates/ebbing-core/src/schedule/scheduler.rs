//! Review scheduler
//!
//! Turns a review event into an updated item. Pure: no I/O, no clock,
//! the caller supplies "today".

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::policy::{SchedulingPolicy, effort_factor, readiness_factor};
use crate::item::{
    MAX_CONFIDENCE, MIN_CONFIDENCE, PerformanceState, Proficiency, Rating, ReviewEntry, TrackableItem, shift_days,
};

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Scheduling error type
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScheduleError {
    /// Rating outside the supported set or range for the active policy
    #[error("Invalid rating '{rating}': {reason}")]
    InvalidRating { rating: Rating, reason: &'static str },
    /// Actual effort that is zero, negative or not a number
    #[error("Invalid effort {0}: must be a positive number")]
    InvalidEffort(f64),
    /// Item is missing data the scheduler needs
    #[error("Corrupt item '{id}': {reason}")]
    CorruptItem { id: String, reason: String },
    /// Readiness score outside 0-100
    #[error("Invalid readiness score {0}: must be within 0-100")]
    InvalidReadiness(f64),
    /// Review dated before the last recorded review
    #[error("Review of '{id}' on {today} precedes its last review on {last}")]
    OutOfOrder {
        id: String,
        last: NaiveDate,
        today: NaiveDate,
    },
    /// Next review would fall outside the representable calendar
    #[error("Interval of {days} days from {anchor} for '{id}' leaves the calendar range")]
    DateOverflow {
        id: String,
        anchor: NaiveDate,
        days: i64,
    },
}

/// Scheduling result type
pub type Result<T> = std::result::Result<T, ScheduleError>;

// ============================================================================
// INPUT / OUTPUT
// ============================================================================

/// A single performance observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewEvent {
    pub rating: Rating,
    /// Time actually spent, same unit as the item's expected effort
    #[serde(default)]
    pub actual_effort: Option<f64>,
    /// Exam readiness score (0-100), consulted by the readiness policy only
    #[serde(default)]
    pub readiness: Option<f64>,
}

impl ReviewEvent {
    pub fn new(rating: Rating) -> Self {
        Self {
            rating,
            actual_effort: None,
            readiness: None,
        }
    }

    pub fn with_effort(mut self, actual_effort: f64) -> Self {
        self.actual_effort = Some(actual_effort);
        self
    }

    pub fn with_readiness(mut self, readiness: f64) -> Self {
        self.readiness = Some(readiness);
        self
    }
}

/// Result of recording a review
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewOutcome {
    /// The updated item; the caller persists it
    pub item: TrackableItem,
    /// Base interval from the table, `None` when no table was consulted
    pub base_days: Option<u32>,
    /// Combined multiplier applied to the base interval
    pub multiplier: f64,
    /// Final interval, `None` when the item was retired
    pub interval_days: Option<i64>,
}

impl ReviewOutcome {
    /// The newly scheduled date, if any
    pub fn next_review(&self) -> Option<NaiveDate> {
        self.item.earliest_due()
    }
}

/// Interval chosen by a policy before it is applied
#[derive(Debug, Clone, Copy, PartialEq)]
struct IntervalDecision {
    base_days: u32,
    multiplier: f64,
    days: i64,
}

/// Round an adjusted interval to whole days, never below one day unless
/// same-day review was asked for explicitly.
pub fn round_interval(raw: f64, allow_same_day: bool) -> i64 {
    if allow_same_day && raw == 0.0 {
        return 0;
    }
    (raw.round() as i64).max(1)
}

// ============================================================================
// SCHEDULER
// ============================================================================

/// Review scheduler for one policy
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    policy: SchedulingPolicy,
}

impl Scheduler {
    pub fn new(policy: SchedulingPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &SchedulingPolicy {
        &self.policy
    }

    /// Record a completed review and compute the next review date.
    ///
    /// The input item is left untouched; on success the returned outcome
    /// holds the updated copy with one more history entry and its pending
    /// dates replaced (cleared when the item is marked mastered).
    pub fn record_review(
        &self,
        item: &TrackableItem,
        event: &ReviewEvent,
        today: NaiveDate,
    ) -> Result<ReviewOutcome> {
        Self::check_item(item, today)?;

        if let Some(effort) = event.actual_effort {
            if !(effort.is_finite() && effort > 0.0) {
                return Err(ScheduleError::InvalidEffort(effort));
            }
        }

        let review_index = item.review_history.len();
        let mut updated = item.clone();
        updated.review_history.push(ReviewEntry {
            date: today,
            actual_effort: event.actual_effort,
            rating: Some(event.rating),
        });
        // Anchor is the review just recorded
        let anchor = today;

        let outcome = match event.rating {
            Rating::Mastered(true) => {
                updated.next_review_dates.clear();
                updated.performance = PerformanceState::Mastery(true);
                tracing::debug!(id = %item.id, "Item mastered, no further reviews scheduled");
                ReviewOutcome {
                    item: updated,
                    base_days: None,
                    multiplier: 1.0,
                    interval_days: None,
                }
            }
            Rating::Mastered(false) => {
                updated.next_review_dates = vec![next_date(&item.id, anchor, 1)?];
                updated.performance = PerformanceState::Mastery(false);
                tracing::debug!(id = %item.id, "Item unmastered, restarting in one day");
                ReviewOutcome {
                    item: updated,
                    base_days: None,
                    multiplier: 1.0,
                    interval_days: Some(1),
                }
            }
            rating => {
                let decision = self.decide(item, review_index, event)?;
                updated.next_review_dates = vec![next_date(&item.id, anchor, decision.days)?];
                updated.performance = PerformanceState::from(rating);
                tracing::debug!(
                    id = %item.id,
                    policy = self.policy.name(),
                    review_index,
                    base_days = decision.base_days,
                    multiplier = decision.multiplier,
                    days = decision.days,
                    "Scheduled next review"
                );
                ReviewOutcome {
                    item: updated,
                    base_days: Some(decision.base_days),
                    multiplier: decision.multiplier,
                    interval_days: Some(decision.days),
                }
            }
        };

        Ok(outcome)
    }

    /// Next date each rating would produce, without recording anything.
    ///
    /// `None` marks a rating that would retire the item.
    pub fn preview(
        &self,
        item: &TrackableItem,
        today: NaiveDate,
        readiness: Option<f64>,
    ) -> Result<Vec<(Rating, Option<NaiveDate>)>> {
        let mut candidates: Vec<Rating> = match &self.policy {
            SchedulingPolicy::Categorical(_) => {
                Proficiency::ALL.iter().map(|p| Rating::Proficiency(*p)).collect()
            }
            SchedulingPolicy::Confidence(_) | SchedulingPolicy::Ers(_) => {
                (MIN_CONFIDENCE..=MAX_CONFIDENCE).map(Rating::Confidence).collect()
            }
        };
        candidates.push(Rating::Mastered(true));

        candidates
            .into_iter()
            .map(|rating| {
                let event = ReviewEvent {
                    rating,
                    actual_effort: None,
                    readiness,
                };
                self.record_review(item, &event, today)
                    .map(|outcome| (rating, outcome.next_review()))
            })
            .collect()
    }

    /// Reject items the scheduler cannot reason about
    fn check_item(item: &TrackableItem, today: NaiveDate) -> Result<()> {
        if item.created_date.is_none() {
            return Err(ScheduleError::CorruptItem {
                id: item.id.clone(),
                reason: "missing created date".to_string(),
            });
        }
        if let Some(pos) = item
            .review_history
            .windows(2)
            .position(|pair| pair[1].date < pair[0].date)
        {
            return Err(ScheduleError::CorruptItem {
                id: item.id.clone(),
                reason: format!("review history out of order at entry {}", pos + 1),
            });
        }
        if let Some(last) = item.last_review_date() {
            if today < last {
                return Err(ScheduleError::OutOfOrder {
                    id: item.id.clone(),
                    last,
                    today,
                });
            }
        }
        Ok(())
    }

    /// Base interval lookup plus the policy's multiplier
    fn decide(
        &self,
        item: &TrackableItem,
        review_index: usize,
        event: &ReviewEvent,
    ) -> Result<IntervalDecision> {
        let rating = event.rating;
        match (&self.policy, rating) {
            (SchedulingPolicy::Categorical(policy), Rating::Proficiency(proficiency)) => {
                let base_days = policy.table(proficiency).days_at(review_index);
                let same_day = proficiency == Proficiency::Forgotten && base_days == 0;
                Ok(IntervalDecision {
                    base_days,
                    multiplier: 1.0,
                    days: round_interval(f64::from(base_days), same_day),
                })
            }
            (SchedulingPolicy::Confidence(policy), Rating::Confidence(level)) => {
                check_confidence(rating, level)?;
                let base_days = policy.intervals.days_at(review_index);
                let multiplier = effort_factor(
                    event.actual_effort,
                    item.expected_effort,
                    policy.default_expected_effort,
                );
                Ok(IntervalDecision {
                    base_days,
                    multiplier,
                    days: round_interval(f64::from(base_days) * multiplier, false),
                })
            }
            (SchedulingPolicy::Ers(policy), Rating::Confidence(level)) => {
                check_confidence(rating, level)?;
                if let Some(score) = event.readiness {
                    if !(0.0..=100.0).contains(&score) {
                        return Err(ScheduleError::InvalidReadiness(score));
                    }
                }
                let base_days = policy.intervals.days_at(review_index);
                let multiplier = effort_factor(
                    event.actual_effort,
                    item.expected_effort,
                    policy.default_expected_effort,
                ) * readiness_factor(event.readiness, level);
                Ok(IntervalDecision {
                    base_days,
                    multiplier,
                    days: round_interval(f64::from(base_days) * multiplier, false),
                })
            }
            (SchedulingPolicy::Categorical(_), _) => Err(ScheduleError::InvalidRating {
                rating,
                reason: "categorical policy expects proficient, not_proficient or forgotten",
            }),
            (SchedulingPolicy::Confidence(_) | SchedulingPolicy::Ers(_), _) => {
                Err(ScheduleError::InvalidRating {
                    rating,
                    reason: "confidence policy expects a confidence level from 1 to 5",
                })
            }
        }
    }
}

fn check_confidence(rating: Rating, level: u8) -> Result<()> {
    if (MIN_CONFIDENCE..=MAX_CONFIDENCE).contains(&level) {
        Ok(())
    } else {
        Err(ScheduleError::InvalidRating {
            rating,
            reason: "confidence level must be from 1 to 5",
        })
    }
}

fn next_date(id: &str, anchor: NaiveDate, days: i64) -> Result<NaiveDate> {
    shift_days(anchor, days).ok_or_else(|| ScheduleError::DateOverflow {
        id: id.to_string(),
        anchor,
        days,
    })
}

// ============================================================================
// TESTS
// ============================================================================
