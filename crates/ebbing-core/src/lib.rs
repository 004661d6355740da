//! # Ebbing Core
//!
//! Spaced-repetition scheduling for study notes, built around the
//! Ebbinghaus forgetting curve:
//!
//! - **Scheduler**: three interchangeable policies (categorical tables,
//!   confidence with effort ratio, exam readiness) over one base-interval
//!   algorithm
//! - **Due-set queries**: today's review list and the completion calendar
//! - **Item Store**: SQLite (versioned migrations) or a single JSON file
//! - **Note Annotator**: idempotent labelled blocks in daily Markdown notes
//! - **Vault discovery**: subject folders of Markdown notes become items
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chrono::NaiveDate;
//! use ebbing_core::{
//!     ItemStore, Proficiency, Rating, ReviewEvent, Scheduler, SqliteStore, TrackableItem,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = SqliteStore::open("ebbing.db")?;
//! let created = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let item = TrackableItem::new("math/limits.md", created, 1);
//!
//! let scheduler = Scheduler::default();
//! let event = ReviewEvent::new(Rating::Proficiency(Proficiency::Proficient));
//! let outcome = scheduler.record_review(&item, &event, created.succ_opt().unwrap())?;
//!
//! store.upsert(&outcome.item)?;
//! println!("next review: {:?}", outcome.next_review());
//! # let _ = store.load()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `bundled-sqlite` (default): compile SQLite into the binary
//! - `encryption`: SQLCipher, keyed by `EBBING_ENCRYPTION_KEY`

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// MODULES
// ============================================================================

pub mod config;
pub mod item;
pub mod notes;
pub mod readiness;
pub mod schedule;
pub mod stats;
pub mod storage;
pub mod vault;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use config::{ConfigError, EbbingConfig, IntervalConfig, StoreKind};

pub use item::{
    DEFAULT_EXPECTED_EFFORT, ItemKind, ItemState, MAX_CONFIDENCE, MIN_CONFIDENCE,
    PerformanceState, Proficiency, Rating, Representation, ReviewEntry, TrackableItem, shift_days,
};

pub use schedule::{
    CategoricalPolicy, ConfidencePolicy, ErsPolicy, IntervalTable, IntervalTableError,
    PolicyKind, ReviewEvent, ReviewOutcome, ScheduleError, Scheduler, SchedulingPolicy,
    completed_days, due_items, due_items_by, is_fully_caught_up, window_start,
};

pub use readiness::{ReadinessConfig, exam_readiness, mastery_ratio};

pub use stats::{DailyCount, ReviewSummary, daily_review_counts};

pub use storage::{ItemStore, JsonStore, Result, SqliteStore, StorageError};

pub use notes::{MarkdownAnnotator, NoopAnnotator, NoteAnnotator, NoteError};

pub use vault::{NoteFile, register_new, scan_vault};

// ============================================================================
// VERSION INFO
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// PRELUDE
// ============================================================================

/// Convenient imports for common usage
pub mod prelude {
    pub use crate::{
        EbbingConfig, ItemStore, PerformanceState, Proficiency, Rating, ReviewEvent,
        ReviewOutcome, ScheduleError, Scheduler, StorageError, TrackableItem, due_items,
    };
}
