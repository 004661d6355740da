//! Scheduling policies
//!
//! One algorithm family, three members:
//!
//! | Policy      | Rating           | Modifier                                  |
//! |-------------|------------------|-------------------------------------------|
//! | Categorical | proficiency      | table chosen by category, no multiplier   |
//! | Confidence  | confidence 1-5   | time-ratio factor                         |
//! | Ers         | confidence 1-5   | time-ratio x readiness x confidence       |
//!
//! Every member looks up a base interval by review index and multiplies it;
//! only the tables and multipliers differ.

use serde::{Deserialize, Serialize};

use super::intervals::{
    DEFAULT_CONFIDENCE_INTERVALS, DEFAULT_ERS_INTERVALS, DEFAULT_FORGOTTEN_INTERVALS,
    DEFAULT_NOT_PROFICIENT_INTERVALS, DEFAULT_PROFICIENT_INTERVALS, IntervalTable,
};
use crate::item::{DEFAULT_EXPECTED_EFFORT, Proficiency, Representation};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Time ratio above which the interval shrinks the most
pub const RATIO_SEVERE_OVERRUN: f64 = 1.5;

/// Time ratio above which the interval shrinks slightly
pub const RATIO_OVERRUN: f64 = 1.2;

/// Lower bound of the on-target band
pub const RATIO_ON_TARGET: f64 = 0.8;

/// Time ratio below which the interval grows the most
pub const RATIO_FAST: f64 = 0.5;

/// Allowed range for the readiness scale `100 / ERS`
pub const READINESS_SCALE_MIN: f64 = 0.5;
pub const READINESS_SCALE_MAX: f64 = 1.5;

/// Multiplier for confidence >= 4 under the readiness policy
pub const STRONG_RETENTION_MULTIPLIER: f64 = 1.5;

/// Multiplier for confidence <= 2 under the readiness policy
pub const WEAK_RETENTION_MULTIPLIER: f64 = 0.7;

// ============================================================================
// MULTIPLIERS
// ============================================================================

/// Multiplier for an actual/expected time ratio.
///
/// Always one of `0.75, 0.9, 1.0, 1.1, 1.25`:
/// - ratio > 1.5 → 0.75
/// - 1.2 < ratio ≤ 1.5 → 0.9
/// - 0.8 ≤ ratio ≤ 1.2 → 1.0
/// - 0.5 ≤ ratio < 0.8 → 1.1
/// - ratio < 0.5 → 1.25
pub fn time_ratio_factor(ratio: f64) -> f64 {
    if ratio > RATIO_SEVERE_OVERRUN {
        0.75
    } else if ratio > RATIO_OVERRUN {
        0.9
    } else if ratio >= RATIO_ON_TARGET {
        1.0
    } else if ratio >= RATIO_FAST {
        1.1
    } else {
        1.25
    }
}

/// Time-ratio multiplier for an optional effort observation.
///
/// A non-positive `expected` falls back to `default_expected`.
pub fn effort_factor(actual: Option<f64>, expected: f64, default_expected: f64) -> f64 {
    let Some(actual) = actual else {
        return 1.0;
    };
    let expected = if expected.is_finite() && expected > 0.0 {
        expected
    } else {
        default_expected
    };
    time_ratio_factor(actual / expected)
}

/// Readiness multiplier: `clamp(100 / ers, 0.5, 1.5)` (1.0 when ERS is
/// absent or zero) times the confidence adjustment.
pub fn readiness_factor(ers: Option<f64>, confidence: u8) -> f64 {
    let scale = match ers {
        Some(score) if score > 0.0 => (100.0 / score).clamp(READINESS_SCALE_MIN, READINESS_SCALE_MAX),
        _ => 1.0,
    };
    let retention = if confidence >= 4 {
        STRONG_RETENTION_MULTIPLIER
    } else if confidence <= 2 {
        WEAK_RETENTION_MULTIPLIER
    } else {
        1.0
    };
    scale * retention
}

// ============================================================================
// POLICIES
// ============================================================================

/// Interval tables keyed by proficiency category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoricalPolicy {
    pub proficient: IntervalTable,
    pub not_proficient: IntervalTable,
    pub forgotten: IntervalTable,
}

impl Default for CategoricalPolicy {
    fn default() -> Self {
        Self {
            proficient: DEFAULT_PROFICIENT_INTERVALS.into(),
            not_proficient: DEFAULT_NOT_PROFICIENT_INTERVALS.into(),
            forgotten: DEFAULT_FORGOTTEN_INTERVALS.into(),
        }
    }
}

impl CategoricalPolicy {
    /// Table for a category
    pub fn table(&self, proficiency: Proficiency) -> &IntervalTable {
        match proficiency {
            Proficiency::Proficient => &self.proficient,
            Proficiency::NotProficient => &self.not_proficient,
            Proficiency::Forgotten => &self.forgotten,
        }
    }
}

/// Single table with a time-ratio adjustment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfidencePolicy {
    pub intervals: IntervalTable,
    /// Substituted for non-positive expected effort
    pub default_expected_effort: f64,
}

impl Default for ConfidencePolicy {
    fn default() -> Self {
        Self {
            intervals: DEFAULT_CONFIDENCE_INTERVALS.into(),
            default_expected_effort: DEFAULT_EXPECTED_EFFORT,
        }
    }
}

/// Confidence scheduling further scaled by the exam readiness score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErsPolicy {
    pub intervals: IntervalTable,
    pub default_expected_effort: f64,
}

impl Default for ErsPolicy {
    fn default() -> Self {
        Self {
            intervals: DEFAULT_ERS_INTERVALS.into(),
            default_expected_effort: DEFAULT_EXPECTED_EFFORT,
        }
    }
}

/// The active member of the algorithm family
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "camelCase")]
pub enum SchedulingPolicy {
    Categorical(CategoricalPolicy),
    Confidence(ConfidencePolicy),
    Ers(ErsPolicy),
}

impl Default for SchedulingPolicy {
    fn default() -> Self {
        SchedulingPolicy::Categorical(CategoricalPolicy::default())
    }
}

impl SchedulingPolicy {
    /// Performance representation this policy expects on items
    pub fn representation(&self) -> Representation {
        match self {
            SchedulingPolicy::Categorical(_) => Representation::Proficiency,
            SchedulingPolicy::Confidence(_) | SchedulingPolicy::Ers(_) => Representation::Confidence,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SchedulingPolicy::Categorical(_) => "categorical",
            SchedulingPolicy::Confidence(_) => "confidence",
            SchedulingPolicy::Ers(_) => "ers",
        }
    }
}

/// Which policy to build from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    #[default]
    Categorical,
    Confidence,
    Ers,
}

impl std::str::FromStr for PolicyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "categorical" | "proficiency" => Ok(PolicyKind::Categorical),
            "confidence" => Ok(PolicyKind::Confidence),
            "ers" | "readiness" => Ok(PolicyKind::Ers),
            _ => Err(format!("Unknown policy: {}", s)),
        }
    }
}

impl std::fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PolicyKind::Categorical => write!(f, "categorical"),
            PolicyKind::Confidence => write!(f, "confidence"),
            PolicyKind::Ers => write!(f, "ers"),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
