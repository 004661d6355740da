//! Base interval tables
//!
//! A table is a non-decreasing list of day counts indexed by how many
//! reviews an item already has. Indices past the end reuse the last entry.

use serde::{Deserialize, Serialize};

/// Default table for items rated proficient
pub const DEFAULT_PROFICIENT_INTERVALS: [u32; 5] = [1, 2, 4, 7, 15];

/// Default table for items rated not proficient
pub const DEFAULT_NOT_PROFICIENT_INTERVALS: [u32; 4] = [1, 2, 4, 7];

/// Default table for forgotten items (review again today)
pub const DEFAULT_FORGOTTEN_INTERVALS: [u32; 1] = [0];

/// Default table for confidence-rated items
pub const DEFAULT_CONFIDENCE_INTERVALS: [u32; 8] = [1, 2, 4, 7, 15, 30, 60, 120];

/// Default table for readiness-scaled items
pub const DEFAULT_ERS_INTERVALS: [u32; 7] = [1, 2, 4, 7, 15, 30, 60];

/// Longest interval a configured table may hold (about a century)
pub const MAX_INTERVAL_DAYS: u32 = 36_500;

/// Problems with a candidate interval table
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntervalTableError {
    #[error("Interval table is empty")]
    Empty,
    #[error("Interval table decreases at position {index}: {previous} -> {next}")]
    Decreasing {
        index: usize,
        previous: u32,
        next: u32,
    },
}

/// Monotonically non-decreasing days-until-next-review table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u32>", into = "Vec<u32>")]
pub struct IntervalTable(Vec<u32>);

impl IntervalTable {
    /// Build a table, rejecting empty or decreasing sequences
    pub fn new(days: Vec<u32>) -> Result<Self, IntervalTableError> {
        if days.is_empty() {
            return Err(IntervalTableError::Empty);
        }
        if let Some(index) = days.windows(2).position(|pair| pair[1] < pair[0]) {
            return Err(IntervalTableError::Decreasing {
                index: index + 1,
                previous: days[index],
                next: days[index + 1],
            });
        }
        Ok(Self(days))
    }

    /// Interval for the given review index, clamped to the last entry
    pub fn days_at(&self, review_index: usize) -> u32 {
        let last = self.0.len() - 1;
        self.0[review_index.min(last)]
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    /// Longest interval in the table
    pub fn max_days(&self) -> u32 {
        self.0.iter().copied().max().unwrap_or(0)
    }

    /// Whether any entry schedules a same-day review
    pub fn has_zero(&self) -> bool {
        self.0.contains(&0)
    }
}

impl TryFrom<Vec<u32>> for IntervalTable {
    type Error = IntervalTableError;

    fn try_from(days: Vec<u32>) -> Result<Self, Self::Error> {
        Self::new(days)
    }
}

impl From<IntervalTable> for Vec<u32> {
    fn from(table: IntervalTable) -> Self {
        table.0
    }
}

impl<const N: usize> From<[u32; N]> for IntervalTable {
    /// Only for the compile-time defaults above, which are non-empty and sorted
    fn from(days: [u32; N]) -> Self {
        debug_assert!(N > 0);
        Self(days.to_vec())
    }
}

// ============================================================================
// TESTS
// ============================================================================
