//! Item module - Core types for anything that gets reviewed
//!
//! - Trackable items with append-only review history
//! - Proficiency, confidence and mastery signals
//! - Derived scheduling state

mod performance;
mod record;

pub use performance::{
    MAX_CONFIDENCE, MIN_CONFIDENCE, PerformanceState, Proficiency, Rating, Representation,
};
pub use record::{DEFAULT_EXPECTED_EFFORT, ItemKind, ItemState, ReviewEntry, TrackableItem, shift_days};
