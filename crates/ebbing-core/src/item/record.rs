//! Trackable Item - The unit being scheduled
//!
//! Each item carries:
//! - Identity (id, subject, kind)
//! - Creation date and expected effort
//! - Append-only review history
//! - Pending review dates and the last performance signal

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use super::performance::{PerformanceState, Rating};

/// Default effort budget when an item does not specify one (minutes)
pub const DEFAULT_EXPECTED_EFFORT: f64 = 60.0;

/// Move a date by a signed number of days, `None` past the calendar range
pub fn shift_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    let magnitude = Days::new(days.unsigned_abs());
    if days >= 0 {
        date.checked_add_days(magnitude)
    } else {
        date.checked_sub_days(magnitude)
    }
}

// ============================================================================
// ITEM KIND
// ============================================================================

/// What sort of study unit an item represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// A one-off study task
    Task,
    /// A stage of a longer study plan
    Stage,
    /// A knowledge point, usually backed by a note file
    #[default]
    KnowledgePoint,
    /// A practice problem
    Problem,
}

impl ItemKind {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Task => "task",
            ItemKind::Stage => "stage",
            ItemKind::KnowledgePoint => "knowledge_point",
            ItemKind::Problem => "problem",
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ItemKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "task" => Ok(ItemKind::Task),
            "stage" => Ok(ItemKind::Stage),
            "knowledge_point" | "point" => Ok(ItemKind::KnowledgePoint),
            "problem" => Ok(ItemKind::Problem),
            _ => Err(format!("Unknown item kind: {}", s)),
        }
    }
}

// ============================================================================
// REVIEW ENTRY
// ============================================================================

/// One completed review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewEntry {
    /// Day the review happened
    pub date: NaiveDate,
    /// Time actually spent, same unit as `expected_effort`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_effort: Option<f64>,
    /// Signal that produced this entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
}

impl ReviewEntry {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            actual_effort: None,
            rating: None,
        }
    }
}

// ============================================================================
// ITEM STATE
// ============================================================================

/// Scheduling state derived from an item's fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemState {
    /// No pending date and not mastered
    Unscheduled,
    /// Waiting for the earliest pending date
    Pending(NaiveDate),
    /// Retired from scheduling
    Mastered,
}

// ============================================================================
// TRACKABLE ITEM
// ============================================================================

/// A schedulable study unit (task, stage, knowledge point, problem)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackableItem {
    /// Stable identifier, unique within its store (a note path or a name)
    pub id: String,
    /// Grouping label, e.g. the vault folder a note lives in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default)]
    pub kind: ItemKind,
    /// Day the item was registered. Records migrated from stores that
    /// never kept it load as `None` and are refused by the scheduler.
    #[serde(default)]
    pub created_date: Option<NaiveDate>,
    /// Anticipated review effort, used by effort-ratio scheduling
    #[serde(default = "default_expected_effort")]
    pub expected_effort: f64,
    /// Completed reviews, oldest first
    #[serde(default)]
    pub review_history: Vec<ReviewEntry>,
    /// Pending review dates; empty when mastered
    #[serde(default)]
    pub next_review_dates: Vec<NaiveDate>,
    #[serde(default)]
    pub performance: PerformanceState,
}

fn default_expected_effort() -> f64 {
    DEFAULT_EXPECTED_EFFORT
}

impl TrackableItem {
    /// Register a new item, first review due `first_review_offset` days after creation
    ///
    /// An offset that leaves the calendar range registers the item with no
    /// pending review.
    pub fn new(id: impl Into<String>, created: NaiveDate, first_review_offset: i64) -> Self {
        let id = id.into();
        let first_review = shift_days(created, first_review_offset);
        if first_review.is_none() {
            tracing::warn!(%id, first_review_offset, "First review offset out of range, item left unscheduled");
        }
        Self {
            id,
            subject: None,
            kind: ItemKind::default(),
            created_date: Some(created),
            expected_effort: DEFAULT_EXPECTED_EFFORT,
            review_history: Vec::new(),
            next_review_dates: first_review.into_iter().collect(),
            performance: PerformanceState::default(),
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_kind(mut self, kind: ItemKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_expected_effort(mut self, effort: f64) -> Self {
        self.expected_effort = effort;
        self
    }

    pub fn with_performance(mut self, performance: PerformanceState) -> Self {
        self.performance = performance;
        self
    }

    /// Number of completed reviews
    pub fn review_count(&self) -> usize {
        self.review_history.len()
    }

    /// Date of the most recent review
    pub fn last_review_date(&self) -> Option<NaiveDate> {
        self.review_history.last().map(|entry| entry.date)
    }

    /// Date intervals are measured from: last review, else creation
    pub fn anchor_date(&self) -> Option<NaiveDate> {
        self.last_review_date().or(self.created_date)
    }

    /// Earliest pending review date
    pub fn earliest_due(&self) -> Option<NaiveDate> {
        self.next_review_dates.iter().min().copied()
    }

    /// Check if the item is due on or before `today`
    pub fn is_due(&self, today: NaiveDate) -> bool {
        self.earliest_due().map(|d| d <= today).unwrap_or(false)
    }

    /// Check if a review was recorded on exactly `date`
    pub fn reviewed_on(&self, date: NaiveDate) -> bool {
        self.review_history.iter().any(|entry| entry.date == date)
    }

    /// Derived scheduling state
    pub fn state(&self) -> ItemState {
        if self.performance.is_mastered() {
            return ItemState::Mastered;
        }
        match self.earliest_due() {
            Some(date) => ItemState::Pending(date),
            None => ItemState::Unscheduled,
        }
    }

    /// File name portion of a path-like id
    pub fn display_name(&self) -> &str {
        self.id.rsplit('/').next().unwrap_or(&self.id)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_item_due_next_day() {
        let item = TrackableItem::new("math/limits.md", date(2024, 1, 1), 1);
        assert_eq!(item.next_review_dates, vec![date(2024, 1, 2)]);
        assert_eq!(item.anchor_date(), Some(date(2024, 1, 1)));
        assert_eq!(item.state(), ItemState::Pending(date(2024, 1, 2)));
        assert!(!item.is_due(date(2024, 1, 1)));
        assert!(item.is_due(date(2024, 1, 2)));
    }

    #[test]
    fn test_new_item_with_out_of_range_offset_is_unscheduled() {
        let item = TrackableItem::new("a", date(2024, 1, 1), i64::MAX);
        assert!(item.next_review_dates.is_empty());
        assert_eq!(item.created_date, Some(date(2024, 1, 1)));

        let item = TrackableItem::new("b", date(2024, 1, 1), i64::MIN);
        assert!(item.next_review_dates.is_empty());
    }

    #[test]
    fn test_shift_days() {
        assert_eq!(shift_days(date(2024, 1, 1), 31), Some(date(2024, 2, 1)));
        assert_eq!(shift_days(date(2024, 1, 1), -1), Some(date(2023, 12, 31)));
        assert_eq!(shift_days(date(2024, 1, 1), 4_000_000_000), None);
        assert_eq!(shift_days(NaiveDate::MIN, -1), None);
    }

    #[test]
    fn test_anchor_prefers_last_review() {
        let mut item = TrackableItem::new("a", date(2024, 1, 1), 1);
        item.review_history.push(ReviewEntry::new(date(2024, 1, 5)));
        assert_eq!(item.anchor_date(), Some(date(2024, 1, 5)));
        assert!(item.reviewed_on(date(2024, 1, 5)));
        assert!(!item.reviewed_on(date(2024, 1, 4)));
    }

    #[test]
    fn test_mastered_state() {
        let mut item = TrackableItem::new("a", date(2024, 1, 1), 1)
            .with_performance(PerformanceState::Mastery(true));
        item.next_review_dates.clear();
        assert_eq!(item.state(), ItemState::Mastered);
        assert!(!item.is_due(date(2030, 1, 1)));
    }

    #[test]
    fn test_legacy_record_defaults() {
        // Older stores only kept an id and a pending date
        let json = r#"{"id": "physics/waves.md", "nextReviewDates": ["2024-03-01"], "legacyColor": "red"}"#;
        let item: TrackableItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.created_date, None);
        assert_eq!(item.expected_effort, DEFAULT_EXPECTED_EFFORT);
        assert_eq!(item.kind, ItemKind::KnowledgePoint);
        assert_eq!(item.display_name(), "waves.md");
    }

    #[test]
    fn test_item_kind_parse() {
        assert_eq!("knowledge-point".parse::<ItemKind>().unwrap(), ItemKind::KnowledgePoint);
        assert_eq!("Problem".parse::<ItemKind>().unwrap(), ItemKind::Problem);
        assert!("chapter".parse::<ItemKind>().is_err());
    }
}
