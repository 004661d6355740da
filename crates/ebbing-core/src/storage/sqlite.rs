//! SQLite Item Store
//!
//! One row per item. History, pending dates and performance live in
//! JSON columns; `earliest_due` is denormalized for the due query.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::{NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, Transaction, params};
use serde::de::DeserializeOwned;

use super::{ItemStore, Result, StorageError};
use crate::item::{ItemKind, TrackableItem};
use crate::schedule::due_items;

const SELECT_ITEMS: &str = "SELECT id, subject, kind, created_date, expected_effort,
        review_history, next_review_dates, performance
     FROM items";

/// SQLite-backed [`ItemStore`]
///
/// All methods take `&self`; the connection sits behind a mutex so the
/// store is `Send + Sync`.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl SqliteStore {
    /// Apply PRAGMAs and optional encryption to a connection
    fn configure_connection(conn: &Connection) -> Result<()> {
        #[cfg(feature = "encryption")]
        {
            if let Ok(key) = std::env::var("EBBING_ENCRYPTION_KEY") {
                if !key.is_empty() {
                    conn.pragma_update(None, "key", &key)?;
                }
            }
        }

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA temp_store = MEMORY;
             PRAGMA foreign_keys = ON;
             PRAGMA busy_timeout = 5000;",
        )?;

        Ok(())
    }

    /// Open (or create) the database at `path` and migrate it
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;

        // Restrict database file permissions to owner-only on Unix
        #[cfg(unix)]
        if path.exists() {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            let _ = std::fs::set_permissions(path, perms);
        }

        Self::configure_connection(&conn)?;
        let applied = super::migrations::apply_migrations(&conn)?;
        tracing::debug!(path = %path.display(), applied, "Opened item store");

        Ok(Self {
            conn: Mutex::new(conn),
            path: Some(path.to_path_buf()),
        })
    }

    /// Throwaway in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::configure_connection(&conn)?;
        super::migrations::apply_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            path: None,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StorageError::Init("Connection lock poisoned".into()))
    }

    /// Current schema version
    pub fn schema_version(&self) -> Result<u32> {
        let conn = self.lock()?;
        Ok(super::migrations::get_current_version(&conn)?)
    }

    /// Get an item by id
    pub fn get(&self, id: &str) -> Result<Option<TrackableItem>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!("{} WHERE id = ?1", SELECT_ITEMS))?;
        let item = stmt.query_row(params![id], Self::row_to_item).optional()?;
        Ok(item)
    }

    /// Get an item by id, failing when it is not tracked
    pub fn require(&self, id: &str) -> Result<TrackableItem> {
        self.get(id)?
            .ok_or_else(|| StorageError::NotFound(id.to_string()))
    }

    /// Insert or replace one item, keeping its position if it exists
    pub fn upsert(&self, item: &TrackableItem) -> Result<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        Self::write_item(&tx, item, None)?;
        tx.commit()?;
        tracing::debug!(id = %item.id, "Upserted item");
        Ok(())
    }

    /// Delete an item, returning whether it existed
    pub fn delete(&self, id: &str) -> Result<bool> {
        let conn = self.lock()?;
        let rows = conn.execute("DELETE FROM items WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    pub fn count(&self) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM items", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Items with a pending date on or before `today`, in review order
    pub fn due(&self, today: NaiveDate) -> Result<Vec<TrackableItem>> {
        let items = {
            let conn = self.lock()?;
            let mut stmt = conn.prepare(&format!(
                "{} WHERE earliest_due IS NOT NULL AND earliest_due <= ?1",
                SELECT_ITEMS
            ))?;
            let rows = stmt.query_map(params![today], Self::row_to_item)?;
            rows.collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(due_items(&items, today).into_iter().cloned().collect())
    }

    /// Create a consistent backup using VACUUM INTO
    pub fn backup_to(&self, path: &Path) -> Result<()> {
        let path_str = path
            .to_str()
            .ok_or_else(|| StorageError::Init("Invalid backup path encoding".to_string()))?;
        if path_str.bytes().any(|b| b < 0x20 && b != b'\t') {
            return Err(StorageError::Init(
                "Backup path contains invalid characters".to_string(),
            ));
        }
        let conn = self.lock()?;
        // VACUUM INTO doesn't support parameterized queries; escape single quotes
        conn.execute_batch(&format!("VACUUM INTO '{}'", path_str.replace('\'', "''")))?;
        tracing::info!(path = %path.display(), "Backup written");
        Ok(())
    }

    fn write_item(tx: &Transaction<'_>, item: &TrackableItem, position: Option<i64>) -> Result<()> {
        let history = serde_json::to_string(&item.review_history)?;
        let dates = serde_json::to_string(&item.next_review_dates)?;
        let performance = serde_json::to_string(&item.performance)?;

        tx.execute(
            "INSERT INTO items (id, position, subject, kind, created_date, expected_effort,
                 review_history, next_review_dates, performance, earliest_due, updated_at)
             VALUES (?1,
                 COALESCE(?2, (SELECT position FROM items WHERE id = ?1),
                          (SELECT COALESCE(MAX(position) + 1, 0) FROM items)),
                 ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
             ON CONFLICT(id) DO UPDATE SET
                 position = excluded.position,
                 subject = excluded.subject,
                 kind = excluded.kind,
                 created_date = excluded.created_date,
                 expected_effort = excluded.expected_effort,
                 review_history = excluded.review_history,
                 next_review_dates = excluded.next_review_dates,
                 performance = excluded.performance,
                 earliest_due = excluded.earliest_due,
                 updated_at = excluded.updated_at",
            params![
                item.id,
                position,
                item.subject,
                item.kind.as_str(),
                item.created_date,
                item.expected_effort,
                history,
                dates,
                performance,
                item.earliest_due(),
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn parse_json<T: DeserializeOwned>(value: &str, column: usize) -> rusqlite::Result<T> {
        serde_json::from_str(value).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                column,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })
    }

    /// Convert a row to TrackableItem
    fn row_to_item(row: &rusqlite::Row) -> rusqlite::Result<TrackableItem> {
        let kind: String = row.get(2)?;
        let kind = kind.parse::<ItemKind>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                2,
                rusqlite::types::Type::Text,
                Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, e)),
            )
        })?;
        let history: String = row.get(5)?;
        let dates: String = row.get(6)?;
        let performance: String = row.get(7)?;

        Ok(TrackableItem {
            id: row.get(0)?,
            subject: row.get(1)?,
            kind,
            created_date: row.get(3)?,
            expected_effort: row.get(4)?,
            review_history: Self::parse_json(&history, 5)?,
            next_review_dates: Self::parse_json(&dates, 6)?,
            performance: Self::parse_json(&performance, 7)?,
        })
    }
}

impl ItemStore for SqliteStore {
    fn load(&self) -> Result<Vec<TrackableItem>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!("{} ORDER BY position, id", SELECT_ITEMS))?;
        let rows = stmt.query_map([], Self::row_to_item)?;
        let items = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        tracing::debug!(count = items.len(), "Loaded items");
        Ok(items)
    }

    /// Replace the whole collection in one transaction
    fn save(&self, items: &[TrackableItem]) -> Result<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM items", [])?;
        for (position, item) in items.iter().enumerate() {
            Self::write_item(&tx, item, Some(position as i64))?;
        }
        tx.commit()?;
        tracing::debug!(count = items.len(), "Saved items");
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{PerformanceState, Proficiency, Rating, ReviewEntry};
    use tempfile::tempdir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample(id: &str, created: NaiveDate) -> TrackableItem {
        TrackableItem::new(id, created, 1).with_subject("math")
    }

    #[test]
    fn test_store_creation() {
        let dir = tempdir().unwrap();
        let store = SqliteStore::open(dir.path().join("test.db")).unwrap();
        assert_eq!(store.count().unwrap(), 0);
        assert_eq!(store.schema_version().unwrap(), 2);
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_and_load_preserves_order_and_fields() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut reviewed = sample("math/limits.md", date(2024, 1, 1));
        reviewed.review_history.push(ReviewEntry {
            date: date(2024, 1, 2),
            actual_effort: Some(45.0),
            rating: Some(Rating::Proficiency(Proficiency::Proficient)),
        });
        reviewed.performance = PerformanceState::Proficiency(Proficiency::Proficient);
        let items = vec![sample("z.md", date(2024, 1, 3)), reviewed.clone()];

        store.save(&items).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded, items);
        assert_eq!(store.get("math/limits.md").unwrap(), Some(reviewed));
    }

    #[test]
    fn test_save_replaces_collection() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .save(&[sample("a.md", date(2024, 1, 1)), sample("b.md", date(2024, 1, 1))])
            .unwrap();
        store.save(&[sample("c.md", date(2024, 1, 1))]).unwrap();

        let ids: Vec<String> = store.load().unwrap().into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec!["c.md"]);
    }

    #[test]
    fn test_upsert_keeps_position() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .save(&[sample("a.md", date(2024, 1, 1)), sample("b.md", date(2024, 1, 1))])
            .unwrap();

        let mut a = store.require("a.md").unwrap();
        a.next_review_dates = vec![date(2024, 2, 1)];
        store.upsert(&a).unwrap();
        store.upsert(&sample("c.md", date(2024, 1, 5))).unwrap();

        let loaded = store.load().unwrap();
        let ids: Vec<&str> = loaded.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["a.md", "b.md", "c.md"]);
        assert_eq!(loaded[0].next_review_dates, vec![date(2024, 2, 1)]);
    }

    #[test]
    fn test_delete_and_not_found() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.upsert(&sample("a.md", date(2024, 1, 1))).unwrap();

        assert!(store.delete("a.md").unwrap());
        assert!(!store.delete("a.md").unwrap());
        assert!(matches!(store.require("a.md"), Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_due_query() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut unscheduled = sample("done.md", date(2024, 1, 1));
        unscheduled.next_review_dates.clear();
        store
            .save(&[
                sample("later.md", date(2024, 1, 9)),
                sample("late.md", date(2024, 1, 1)),
                sample("today.md", date(2024, 1, 4)),
                unscheduled,
            ])
            .unwrap();

        let due: Vec<String> = store
            .due(date(2024, 1, 5))
            .unwrap()
            .into_iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(due, vec!["late.md", "today.md"]);
    }

    #[test]
    fn test_reopen_and_backup() {
        let dir = tempdir().unwrap();
        let db = dir.path().join("items.db");
        {
            let store = SqliteStore::open(&db).unwrap();
            store.upsert(&sample("a.md", date(2024, 1, 1))).unwrap();
            store.backup_to(&dir.path().join("backup.db")).unwrap();
        }

        let reopened = SqliteStore::open(&db).unwrap();
        assert_eq!(reopened.count().unwrap(), 1);

        let backup = SqliteStore::open(dir.path().join("backup.db")).unwrap();
        assert_eq!(backup.load().unwrap().len(), 1);
    }
}
