//! Vault journeys: discovery, registration and daily-note annotation

use ebbing_core::{
    ItemStore, MarkdownAnnotator, NoteAnnotator, PerformanceState, PolicyKind, register_new,
    scan_vault,
};
use ebbing_e2e_tests::{TestDataFactory, TestStoreManager};

fn register_and_annotate(db: &TestStoreManager, today: chrono::NaiveDate) -> Vec<String> {
    let config = db.config();
    let notes = scan_vault(&db.vault_dir()).unwrap();
    let mut items = db.load();
    let created = register_new(&items, &notes, today, &config);

    let annotator = MarkdownAnnotator::new(db.notes_dir(), today);
    for item in &created {
        let labels = vec![item.subject.clone().unwrap_or_default()];
        annotator.on_item_registered(&item.id, &labels).unwrap();
    }
    items.extend(created.iter().cloned());
    db.store.save(&items).unwrap();
    created.into_iter().map(|i| i.id).collect()
}

#[test]
fn test_scan_registers_each_note_once() {
    let db = TestStoreManager::new_temp();
    TestDataFactory::write_vault(
        &db.vault_dir(),
        &[("math", "limits.md"), ("math", "series.md"), ("physics", "waves.md")],
    );
    let today = TestDataFactory::date(2024, 5, 1);

    let first = register_and_annotate(&db, today);
    assert_eq!(first, vec!["math/limits.md", "math/series.md", "physics/waves.md"]);

    let second = register_and_annotate(&db, today);
    assert!(second.is_empty());
    assert_eq!(db.item_count(), 3);

    TestDataFactory::write_vault(&db.vault_dir(), &[("history", "rome.md")]);
    let third = register_and_annotate(&db, TestDataFactory::date(2024, 5, 2));
    assert_eq!(third, vec!["history/rome.md"]);

    let rome = db.store.require("history/rome.md").unwrap();
    assert_eq!(rome.subject.as_deref(), Some("history"));
    assert_eq!(rome.next_review_dates, vec![TestDataFactory::date(2024, 5, 3)]);
}

#[test]
fn test_daily_note_blocks_follow_item_lifecycle() {
    let db = TestStoreManager::new_temp();
    TestDataFactory::write_vault(&db.vault_dir(), &[("math", "limits.md"), ("math", "series.md")]);
    let today = TestDataFactory::date(2024, 5, 1);

    // Pre-existing journal text survives annotation
    std::fs::create_dir_all(db.notes_dir()).unwrap();
    let note = db.notes_dir().join("2024-05-01.md");
    std::fs::write(&note, "# 2024-05-01\nRead chapter 3.\n").unwrap();

    register_and_annotate(&db, today);
    let content = std::fs::read_to_string(&note).unwrap();
    assert!(content.starts_with("# 2024-05-01\nRead chapter 3.\n"));
    assert!(content.contains("- [[math/limits.md]] math"));
    assert!(content.contains("- [[math/series.md]] math"));

    let annotator = MarkdownAnnotator::new(db.notes_dir(), TestDataFactory::date(2024, 5, 9));
    annotator.on_item_removed("math/limits.md").unwrap();
    let content = std::fs::read_to_string(&note).unwrap();
    assert!(!content.contains("math/limits.md"));
    assert!(content.contains("math/series.md"));
}

#[test]
fn test_registration_uses_configured_representation() {
    let db = TestStoreManager::new_temp();
    TestDataFactory::write_vault(&db.vault_dir(), &[("math", "limits.md")]);

    let mut config = db.config();
    config.policy = PolicyKind::Ers;
    let notes = scan_vault(&db.vault_dir()).unwrap();
    let created = register_new(&[], &notes, TestDataFactory::date(2024, 5, 1), &config);

    assert_eq!(created.len(), 1);
    assert_eq!(created[0].performance, PerformanceState::Confidence(0));
}
