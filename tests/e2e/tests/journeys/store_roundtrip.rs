//! Store journeys: persistence across backends and processes

use ebbing_core::{ItemStore, JsonStore, SqliteStore, due_items};
use ebbing_e2e_tests::{TestDataFactory, TestStoreManager};

#[test]
fn test_sqlite_to_json_and_back() {
    let db = TestStoreManager::new_temp();
    let scenario = TestDataFactory::create_due_scenario();
    db.seed(&scenario.items);

    let json = db.json_store();
    json.save(&db.load()).unwrap();
    let from_json = json.load().unwrap();
    assert_eq!(from_json, scenario.items);

    let other = SqliteStore::open(db.root().join("copy.db")).unwrap();
    other.save(&from_json).unwrap();
    assert_eq!(other.load().unwrap(), scenario.items);
}

#[test]
fn test_reopen_sees_committed_items() {
    let db = TestStoreManager::new_temp();
    let items = TestDataFactory::batch(25, TestDataFactory::date(2024, 1, 1));
    db.seed(&items);

    let reopened = db.reopen();
    assert_eq!(reopened.count().unwrap(), 25);
    assert_eq!(reopened.load().unwrap(), items);
    assert_eq!(reopened.schema_version().unwrap(), 2);
}

#[test]
fn test_indexed_due_query_matches_in_memory_query() {
    let db = TestStoreManager::new_temp();
    let scenario = TestDataFactory::create_due_scenario();
    db.seed(&scenario.items);

    let from_index: Vec<String> = db
        .store
        .due(scenario.today)
        .unwrap()
        .into_iter()
        .map(|i| i.id)
        .collect();
    let items = db.load();
    let in_memory: Vec<String> = due_items(&items, scenario.today)
        .into_iter()
        .map(|i| i.id.clone())
        .collect();

    assert_eq!(from_index, in_memory);
    assert_eq!(from_index.len(), 3);
    assert_eq!(from_index[0], scenario.metadata["overdue"]);
}

#[test]
fn test_backup_is_a_usable_store() {
    let db = TestStoreManager::new_temp();
    db.seed(&TestDataFactory::batch(5, TestDataFactory::date(2024, 1, 1)));

    let backup_path = db.root().join("backup.db");
    db.store.backup_to(&backup_path).unwrap();
    db.seed(&[]);

    let backup = SqliteStore::open(&backup_path).unwrap();
    assert_eq!(backup.count().unwrap(), 5);
    assert!(db.is_empty());
}

#[test]
fn test_json_store_survives_rewrites() {
    let db = TestStoreManager::new_temp();
    let store = JsonStore::new(db.root().join("nested").join("items.json"));
    let mut items = TestDataFactory::batch(3, TestDataFactory::date(2024, 1, 1));

    store.save(&items).unwrap();
    items.remove(1);
    store.save(&items).unwrap();

    assert_eq!(store.load().unwrap(), items);
}
