//! Review statistics
//!
//! Per-day review counts for charts and a one-shot summary of the
//! collection.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::item::{ItemState, TrackableItem};
use crate::schedule::window_start;

/// Reviews recorded on one day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyCount {
    pub date: NaiveDate,
    pub reviews: usize,
}

/// Review counts for every day in `[end - span_days, end]`, including
/// days with no reviews. The window stops at the earliest representable date.
pub fn daily_review_counts(items: &[TrackableItem], end: NaiveDate, span_days: u32) -> Vec<DailyCount> {
    let start = window_start(end, span_days);

    let mut counts: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for entry in items.iter().flat_map(|item| item.review_history.iter()) {
        if entry.date >= start && entry.date <= end {
            *counts.entry(entry.date).or_default() += 1;
        }
    }

    start
        .iter_days()
        .take_while(|day| *day <= end)
        .map(|date| DailyCount {
            date,
            reviews: counts.get(&date).copied().unwrap_or(0),
        })
        .collect()
}

/// Collection totals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSummary {
    pub total_items: usize,
    pub due_today: usize,
    pub mastered: usize,
    pub unscheduled: usize,
    pub reviews_today: usize,
    pub total_reviews: usize,
    /// Item count per performance label
    pub by_performance: BTreeMap<String, usize>,
}

impl ReviewSummary {
    pub fn compute(items: &[TrackableItem], today: NaiveDate) -> Self {
        let mut summary = ReviewSummary {
            total_items: items.len(),
            ..Default::default()
        };

        for item in items {
            match item.state() {
                ItemState::Mastered => summary.mastered += 1,
                ItemState::Unscheduled => summary.unscheduled += 1,
                ItemState::Pending(date) if date <= today => summary.due_today += 1,
                ItemState::Pending(_) => {}
            }
            summary.total_reviews += item.review_count();
            summary.reviews_today += item
                .review_history
                .iter()
                .filter(|entry| entry.date == today)
                .count();
            *summary
                .by_performance
                .entry(item.performance.label())
                .or_default() += 1;
        }

        summary
    }
}
