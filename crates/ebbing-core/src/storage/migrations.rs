//! Database Migrations
//!
//! Schema migration definitions for the item store.

/// Migration definitions
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "Initial items table with JSON history columns",
        up: MIGRATION_V1_UP,
    },
    Migration {
        version: 2,
        description: "Denormalized earliest due date for due queries",
        up: MIGRATION_V2_UP,
    },
];

/// A database migration
#[derive(Debug, Clone)]
pub struct Migration {
    /// Version number
    pub version: u32,
    /// Description
    pub description: &'static str,
    /// SQL to apply
    pub up: &'static str,
}

/// V1: Initial schema
const MIGRATION_V1_UP: &str = r#"
CREATE TABLE IF NOT EXISTS items (
    id TEXT PRIMARY KEY,
    position INTEGER NOT NULL,
    subject TEXT,
    kind TEXT NOT NULL DEFAULT 'knowledge_point',
    created_date TEXT,
    expected_effort REAL NOT NULL DEFAULT 60.0,

    -- JSON columns: ReviewEntry[], date[], PerformanceState
    review_history TEXT NOT NULL DEFAULT '[]',
    next_review_dates TEXT NOT NULL DEFAULT '[]',
    performance TEXT NOT NULL,

    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_items_position ON items(position);
CREATE INDEX IF NOT EXISTS idx_items_subject ON items(subject);

-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL
);

INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (1, datetime('now'));
"#;

/// V2: earliest pending date, backfilled from the JSON column
const MIGRATION_V2_UP: &str = r#"
ALTER TABLE items ADD COLUMN earliest_due TEXT;

UPDATE items SET earliest_due = (
    SELECT MIN(value) FROM json_each(items.next_review_dates)
);

CREATE INDEX IF NOT EXISTS idx_items_earliest_due ON items(earliest_due);

UPDATE schema_version SET version = 2, applied_at = datetime('now');
"#;

/// Get current schema version from database
pub fn get_current_version(conn: &rusqlite::Connection) -> rusqlite::Result<u32> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .or(Ok(0))
}

/// Apply pending migrations, returning how many ran
pub fn apply_migrations(conn: &rusqlite::Connection) -> rusqlite::Result<u32> {
    let current_version = get_current_version(conn)?;
    let mut applied = 0;

    for migration in MIGRATIONS {
        if migration.version > current_version {
            tracing::info!(
                "Applying migration v{}: {}",
                migration.version,
                migration.description
            );
            conn.execute_batch(migration.up)?;
            applied += 1;
        }
    }

    Ok(applied)
}
