//! Test Store Manager
//!
//! Provides isolated item stores for testing:
//! - Temporary SQLite and JSON stores that are cleaned up on drop
//! - A scratch vault and notes directory beside the store
//! - Snapshots of the collection for restore

use std::path::{Path, PathBuf};

use ebbing_core::{EbbingConfig, ItemStore, JsonStore, SqliteStore, StoreKind, TrackableItem};
use tempfile::TempDir;

/// Manager for test stores
///
/// Creates isolated store instances for each test to prevent interference.
/// Everything lives under one temporary directory deleted on drop.
///
/// # Example
///
/// ```rust,ignore
/// let db = TestStoreManager::new_temp();
/// db.store.save(&items)?;
/// ```
pub struct TestStoreManager {
    /// The SQLite store
    pub store: SqliteStore,
    temp_dir: TempDir,
    db_path: PathBuf,
    snapshot: Option<Vec<TrackableItem>>,
}

impl TestStoreManager {
    /// Create a new SQLite store in a temporary directory
    pub fn new_temp() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("data").join("ebbing.db");
        let store = SqliteStore::open(&db_path).expect("Failed to create test store");

        Self {
            store,
            temp_dir,
            db_path,
            snapshot: None,
        }
    }

    /// Get the database path
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// A JSON store in the same temporary directory
    pub fn json_store(&self) -> JsonStore {
        JsonStore::new(self.root().join("data").join("items.json"))
    }

    /// Vault directory, created on first use
    pub fn vault_dir(&self) -> PathBuf {
        let dir = self.root().join("vault");
        std::fs::create_dir_all(&dir).expect("Failed to create vault dir");
        dir
    }

    /// Daily notes directory (not created)
    pub fn notes_dir(&self) -> PathBuf {
        self.root().join("daily")
    }

    /// Config pointing every path into the temporary directory
    pub fn config(&self) -> EbbingConfig {
        EbbingConfig {
            store: StoreKind::Sqlite,
            data_dir: Some(self.root().join("data")),
            vault_path: Some(self.vault_dir()),
            notes_dir: Some(self.notes_dir()),
            ..Default::default()
        }
    }

    /// Reopen the database, as a second process would
    pub fn reopen(&self) -> SqliteStore {
        SqliteStore::open(&self.db_path).expect("Failed to reopen test store")
    }

    pub fn is_empty(&self) -> bool {
        self.item_count() == 0
    }

    pub fn item_count(&self) -> usize {
        self.store.count().unwrap_or(0)
    }

    // ========================================================================
    // SEEDING METHODS
    // ========================================================================

    /// Seed the store with `items`, replacing whatever was there
    pub fn seed(&self, items: &[TrackableItem]) {
        self.store.save(items).expect("Failed to seed store");
    }

    pub fn load(&self) -> Vec<TrackableItem> {
        self.store.load().expect("Failed to load store")
    }

    // ========================================================================
    // SNAPSHOTS
    // ========================================================================

    pub fn take_snapshot(&mut self) {
        self.snapshot = Some(self.load());
    }

    /// Restore the last snapshot; returns false when there is none
    pub fn restore_snapshot(&self) -> bool {
        match &self.snapshot {
            Some(items) => {
                self.seed(items);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_manager_isolation_and_snapshot() {
        let mut db = TestStoreManager::new_temp();
        assert!(db.is_empty());
        assert!(db.path().exists());

        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        db.seed(&[TrackableItem::new("a.md", day, 1)]);
        db.take_snapshot();
        db.seed(&[]);
        assert!(db.is_empty());

        assert!(db.restore_snapshot());
        assert_eq!(db.item_count(), 1);
    }
}
