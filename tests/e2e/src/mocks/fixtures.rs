//! Test Data Factory
//!
//! Provides utilities for generating realistic test data:
//! - Items with review histories
//! - Vaults of subject folders on disk
//! - Pre-built scenarios for due-list and calendar tests

use std::collections::HashMap;
use std::path::Path;

use chrono::{Duration, NaiveDate};
use ebbing_core::{PerformanceState, Proficiency, Rating, ReviewEntry, TrackableItem};

/// Factory for creating test data
pub struct TestDataFactory;

/// Scenario containing related test data
#[derive(Debug)]
pub struct TestScenario {
    /// The collection
    pub items: Vec<TrackableItem>,
    /// The date the scenario is evaluated on
    pub today: NaiveDate,
    /// Description of the scenario
    pub description: String,
    /// Named item ids for assertions
    pub metadata: HashMap<String, String>,
}

impl TestDataFactory {
    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    // ========================================================================
    // ITEMS
    // ========================================================================

    /// Item first due the day after `created`
    pub fn item(id: &str, subject: &str, created: NaiveDate) -> TrackableItem {
        TrackableItem::new(id, created, 1).with_subject(subject)
    }

    /// Item with a categorical review on each of `dates`, due on `next`
    pub fn reviewed_item(
        id: &str,
        created: NaiveDate,
        dates: &[NaiveDate],
        proficiency: Proficiency,
        next: Option<NaiveDate>,
    ) -> TrackableItem {
        let mut item = Self::item(id, "general", created)
            .with_performance(PerformanceState::Proficiency(proficiency));
        item.review_history = dates
            .iter()
            .map(|date| ReviewEntry {
                date: *date,
                actual_effort: None,
                rating: Some(Rating::Proficiency(proficiency)),
            })
            .collect();
        item.next_review_dates = next.into_iter().collect();
        item
    }

    /// `count` items spread over subjects, created a day apart
    pub fn batch(count: usize, start: NaiveDate) -> Vec<TrackableItem> {
        let subjects = ["math", "physics", "history"];
        (0..count)
            .map(|i| {
                let subject = subjects[i % subjects.len()];
                Self::item(
                    &format!("{}/note-{:03}.md", subject, i),
                    subject,
                    start + Duration::days(i as i64),
                )
            })
            .collect()
    }

    // ========================================================================
    // VAULTS
    // ========================================================================

    /// Write `<root>/<subject>/<name>` for each pair
    pub fn write_vault(root: &Path, notes: &[(&str, &str)]) {
        for (subject, name) in notes {
            let dir = root.join(subject);
            std::fs::create_dir_all(&dir).expect("Failed to create subject dir");
            std::fs::write(dir.join(name), format!("# {}\n", name)).expect("Failed to write note");
        }
    }

    // ========================================================================
    // SCENARIOS
    // ========================================================================

    /// Mixed collection evaluated on 2024-03-10
    ///
    /// - `overdue`: due 03-08, weak
    /// - `overdue_strong`: due 03-08, proficient
    /// - `today`: due 03-10
    /// - `future`: due 03-15
    /// - `retired`: no pending date
    pub fn create_due_scenario() -> TestScenario {
        let today = Self::date(2024, 3, 10);
        let created = Self::date(2024, 3, 1);
        let mut metadata = HashMap::new();

        let overdue = Self::reviewed_item(
            "math/overdue.md",
            created,
            &[Self::date(2024, 3, 2)],
            Proficiency::Forgotten,
            Some(Self::date(2024, 3, 8)),
        );
        let overdue_strong = Self::reviewed_item(
            "math/overdue-strong.md",
            created,
            &[Self::date(2024, 3, 2)],
            Proficiency::Proficient,
            Some(Self::date(2024, 3, 8)),
        );
        let due_today = Self::reviewed_item(
            "physics/today.md",
            created,
            &[Self::date(2024, 3, 6)],
            Proficiency::NotProficient,
            Some(today),
        );
        let future = Self::reviewed_item(
            "physics/future.md",
            created,
            &[Self::date(2024, 3, 8)],
            Proficiency::Proficient,
            Some(Self::date(2024, 3, 15)),
        );
        let retired = Self::reviewed_item(
            "history/retired.md",
            created,
            &[Self::date(2024, 3, 3)],
            Proficiency::Proficient,
            None,
        );

        for (key, item) in [
            ("overdue", &overdue),
            ("overdue_strong", &overdue_strong),
            ("today", &due_today),
            ("future", &future),
            ("retired", &retired),
        ] {
            metadata.insert(key.to_string(), item.id.clone());
        }

        TestScenario {
            items: vec![future, retired, overdue_strong, due_today, overdue],
            today,
            description: "Due list with overdue, today, future and retired items".to_string(),
            metadata,
        }
    }
}
