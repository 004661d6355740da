//! Due-set queries
//!
//! Today's review list and the "day completed" check used by the
//! review calendar.

use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::item::{TrackableItem, shift_days};

/// Items whose earliest pending date is on or before `today`, oldest date
/// first and weakest performance first within a date.
pub fn due_items(items: &[TrackableItem], today: NaiveDate) -> Vec<&TrackableItem> {
    due_items_by(items, today, |a, b| a.performance.rank().cmp(&b.performance.rank()))
}

/// [`due_items`] with a caller-supplied tie-break for equal dates.
///
/// The sort is stable, so items the tie-break treats as equal keep their
/// collection order. Items with no pending date are never returned.
pub fn due_items_by<F>(items: &[TrackableItem], today: NaiveDate, mut tie_break: F) -> Vec<&TrackableItem>
where
    F: FnMut(&TrackableItem, &TrackableItem) -> Ordering,
{
    let mut due: Vec<(NaiveDate, &TrackableItem)> = items
        .iter()
        .filter_map(|item| item.earliest_due().filter(|d| *d <= today).map(|d| (d, item)))
        .collect();

    due.sort_by(|(date_a, a), (date_b, b)| date_a.cmp(date_b).then_with(|| tie_break(a, b)));
    due.into_iter().map(|(_, item)| item).collect()
}

/// Whether `date` counts as a completed review day.
///
/// True only when at least one review was recorded on `date` and no item
/// still has a pending date on or before `date` without a review on
/// exactly that day. A day with nothing due and nothing reviewed is not
/// completed.
pub fn is_fully_caught_up(items: &[TrackableItem], date: NaiveDate) -> bool {
    let mut reviewed_any = false;
    for item in items {
        let reviewed = item.reviewed_on(date);
        reviewed_any |= reviewed;
        if !reviewed && item.next_review_dates.iter().any(|d| *d <= date) {
            return false;
        }
    }
    reviewed_any
}

/// First day of the window `[end - span_days, end]`, saturating at the
/// earliest representable date
pub fn window_start(end: NaiveDate, span_days: u32) -> NaiveDate {
    shift_days(end, -i64::from(span_days)).unwrap_or(NaiveDate::MIN)
}

/// Completed days in the window `[end - span_days, end]`, oldest first
pub fn completed_days(items: &[TrackableItem], end: NaiveDate, span_days: u32) -> Vec<NaiveDate> {
    // A day with no review cannot be complete
    let Some(first_review) = items
        .iter()
        .flat_map(|item| item.review_history.iter().map(|entry| entry.date))
        .min()
    else {
        return Vec::new();
    };
    let start = window_start(end, span_days).max(first_review);
    start
        .iter_days()
        .take_while(|day| *day <= end)
        .filter(|day| is_fully_caught_up(items, *day))
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
