//! Storage Module
//!
//! Item Store backends behind one trait:
//! - [`SqliteStore`]: versioned schema, WAL, JSON history columns
//! - [`JsonStore`]: a single pretty-printed file, written atomically

mod json;
mod migrations;
mod sqlite;

pub use json::JsonStore;
pub use migrations::{MIGRATIONS, Migration};
pub use sqlite::SqliteStore;

use crate::item::TrackableItem;

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Storage error type
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Item not found
    #[error("Item not found: {0}")]
    NotFound(String),
    /// Initialization error
    #[error("Initialization error: {0}")]
    Init(String),
}

/// Storage result type
pub type Result<T> = std::result::Result<T, StorageError>;

/// Persistence for the item collection
///
/// The scheduler never touches a store; callers load, schedule, then save.
pub trait ItemStore {
    /// Read every item in collection order
    fn load(&self) -> Result<Vec<TrackableItem>>;

    /// Replace the stored collection with `items`
    fn save(&self, items: &[TrackableItem]) -> Result<()>;
}

impl<S: ItemStore + ?Sized> ItemStore for Box<S> {
    fn load(&self) -> Result<Vec<TrackableItem>> {
        (**self).load()
    }

    fn save(&self, items: &[TrackableItem]) -> Result<()> {
        (**self).save(items)
    }
}
