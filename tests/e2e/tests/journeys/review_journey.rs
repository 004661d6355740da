//! Review journeys: daily study loops through a real store

use ebbing_core::{
    ItemStore, PolicyKind, Proficiency, Rating, ReviewEvent, ReviewSummary, ScheduleError,
    TrackableItem, completed_days, due_items, is_fully_caught_up,
};
use ebbing_e2e_tests::{TestDataFactory, TestStoreManager};

/// Review everything due each day in `[from, to]` with `rating`
fn study(db: &TestStoreManager, from: chrono::NaiveDate, to: chrono::NaiveDate, rating: Rating) {
    let scheduler = db.config().scheduler();
    for today in from.iter_days().take_while(|d| *d <= to) {
        let mut items = db.load();
        let due: Vec<String> = due_items(&items, today).iter().map(|i| i.id.clone()).collect();
        for id in due {
            let index = items.iter().position(|i| i.id == id).unwrap();
            let outcome = scheduler
                .record_review(&items[index], &ReviewEvent::new(rating), today)
                .unwrap();
            items[index] = outcome.item;
        }
        db.store.save(&items).unwrap();
    }
}

#[test]
fn test_daily_loop_follows_not_proficient_table() {
    let db = TestStoreManager::new_temp();
    let created = TestDataFactory::date(2024, 1, 1);
    db.seed(&[TestDataFactory::item("math/limits.md", "math", created)]);

    study(
        &db,
        TestDataFactory::date(2024, 1, 2),
        TestDataFactory::date(2024, 1, 10),
        Rating::Proficiency(Proficiency::NotProficient),
    );

    let item = db.store.require("math/limits.md").unwrap();
    let reviewed: Vec<_> = item.review_history.iter().map(|e| e.date).collect();
    assert_eq!(
        reviewed,
        vec![
            TestDataFactory::date(2024, 1, 2),
            TestDataFactory::date(2024, 1, 3),
            TestDataFactory::date(2024, 1, 5),
            TestDataFactory::date(2024, 1, 9),
        ]
    );
    assert_eq!(item.next_review_dates, vec![TestDataFactory::date(2024, 1, 16)]);

    let items = db.load();
    let completed = completed_days(&items, TestDataFactory::date(2024, 1, 10), 8);
    assert_eq!(completed, reviewed);
    assert!(!is_fully_caught_up(&items, TestDataFactory::date(2024, 1, 4)));
}

#[test]
fn test_confidence_policy_uses_effort() {
    let db = TestStoreManager::new_temp();
    let mut config = db.config();
    config.policy = PolicyKind::Confidence;
    let scheduler = config.scheduler();

    let start = TestDataFactory::date(2024, 2, 1);
    let mut item = TestDataFactory::item("physics/waves.md", "physics", start);
    let mut today = start + chrono::Duration::days(1);
    let mut intervals = Vec::new();

    // 90/60 overruns, 30/60 and 20/60 finish early
    for effort in [90.0, 30.0, 20.0] {
        let event = ReviewEvent::new(Rating::Confidence(3)).with_effort(effort);
        let outcome = scheduler.record_review(&item, &event, today).unwrap();
        intervals.push(outcome.interval_days.unwrap());
        today = outcome.next_review().unwrap();
        item = outcome.item;
    }
    db.seed(&[item]);

    // base 1 x 0.9, base 2 x 1.1, base 4 x 1.25
    assert_eq!(intervals, vec![1, 2, 5]);
    let stored = db.store.require("physics/waves.md").unwrap();
    assert_eq!(stored.review_count(), 3);
    assert_eq!(stored.review_history[0].actual_effort, Some(90.0));
}

#[test]
fn test_mastered_items_leave_the_due_list() {
    let db = TestStoreManager::new_temp();
    let scenario = TestDataFactory::create_due_scenario();
    db.seed(&scenario.items);
    let scheduler = db.config().scheduler();

    let mut items = db.load();
    let target = &scenario.metadata["overdue"];
    let index = items.iter().position(|i| &i.id == target).unwrap();
    let outcome = scheduler
        .record_review(&items[index], &ReviewEvent::new(Rating::Mastered(true)), scenario.today)
        .unwrap();
    assert_eq!(outcome.next_review(), None);
    items[index] = outcome.item;
    db.store.save(&items).unwrap();

    let items = db.load();
    let due: Vec<&str> = due_items(&items, scenario.today).iter().map(|i| i.id.as_str()).collect();
    assert_eq!(
        due,
        vec![
            scenario.metadata["overdue_strong"].as_str(),
            scenario.metadata["today"].as_str()
        ]
    );

    let summary = ReviewSummary::compute(&items, scenario.today);
    assert_eq!(summary.total_items, 5);
    assert_eq!(summary.mastered, 1);
    assert_eq!(summary.due_today, 2);
    assert_eq!(summary.reviews_today, 1);
}

#[test]
fn test_rejected_review_leaves_store_untouched() {
    let db = TestStoreManager::new_temp();
    let scenario = TestDataFactory::create_due_scenario();
    db.seed(&scenario.items);
    let before = db.load();

    let future: &TrackableItem = before
        .iter()
        .find(|i| i.id == scenario.metadata["future"])
        .unwrap();
    let scheduler = db.config().scheduler();

    // Last review was 03-08
    let err = scheduler
        .record_review(
            future,
            &ReviewEvent::new(Rating::Proficiency(Proficiency::Proficient)),
            TestDataFactory::date(2024, 3, 7),
        )
        .unwrap_err();
    assert!(matches!(err, ScheduleError::OutOfOrder { .. }));

    let err = scheduler
        .record_review(future, &ReviewEvent::new(Rating::Confidence(4)), scenario.today)
        .unwrap_err();
    assert!(matches!(err, ScheduleError::InvalidRating { .. }));

    assert_eq!(db.load(), before);
}
