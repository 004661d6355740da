//! Performance signals
//!
//! Two closely related enums live here:
//! - [`Rating`]: what the user reports for a single review
//! - [`PerformanceState`]: what the item remembers between reviews
//!
//! A collection settles on one representation (proficiency category,
//! 1-5 confidence, or a mastered flag) and the scheduler policy must agree
//! with it.

use serde::{Deserialize, Serialize};

// ============================================================================
// PROFICIENCY CATEGORY
// ============================================================================

/// Coarse self-assessment used by the categorical policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Proficiency {
    /// Recalled fluently
    Proficient,
    /// Recalled with effort or partially
    #[default]
    NotProficient,
    /// Could not recall; review again the same day
    Forgotten,
}

impl Proficiency {
    /// All categories, weakest first
    pub const ALL: [Proficiency; 3] = [
        Proficiency::Forgotten,
        Proficiency::NotProficient,
        Proficiency::Proficient,
    ];

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Proficiency::Proficient => "proficient",
            Proficiency::NotProficient => "not_proficient",
            Proficiency::Forgotten => "forgotten",
        }
    }

    /// Human-facing label
    pub fn label(&self) -> &'static str {
        match self {
            Proficiency::Proficient => "Proficient",
            Proficiency::NotProficient => "Not Proficient",
            Proficiency::Forgotten => "Forgotten",
        }
    }

    /// Ordering key, weakest first
    pub fn rank(&self) -> u8 {
        match self {
            Proficiency::Forgotten => 0,
            Proficiency::NotProficient => 1,
            Proficiency::Proficient => 2,
        }
    }
}

impl std::fmt::Display for Proficiency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Proficiency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "proficient" => Ok(Proficiency::Proficient),
            "not_proficient" => Ok(Proficiency::NotProficient),
            "forgotten" => Ok(Proficiency::Forgotten),
            _ => Err(format!("Unknown proficiency: {}", s)),
        }
    }
}

// ============================================================================
// RATING
// ============================================================================

/// The signal a user gives when completing a review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Rating {
    /// Categorical proficiency
    Proficiency(Proficiency),
    /// Confidence level, valid range 1-5
    Confidence(u8),
    /// Mastered flag; `true` retires the item, `false` restarts it
    Mastered(bool),
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rating::Proficiency(p) => write!(f, "{}", p),
            Rating::Confidence(level) => write!(f, "confidence {}", level),
            Rating::Mastered(true) => write!(f, "mastered"),
            Rating::Mastered(false) => write!(f, "unmastered"),
        }
    }
}

impl std::str::FromStr for Rating {
    type Err = String;

    /// Accepts a proficiency name, a bare confidence number, or
    /// `mastered` / `unmastered`. Range checks happen in the scheduler.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(level) = trimmed.parse::<u8>() {
            return Ok(Rating::Confidence(level));
        }
        match trimmed.to_lowercase().as_str() {
            "mastered" => Ok(Rating::Mastered(true)),
            "unmastered" | "not_mastered" => Ok(Rating::Mastered(false)),
            other => other
                .parse::<Proficiency>()
                .map(Rating::Proficiency)
                .map_err(|_| format!("Unknown rating: {}", s)),
        }
    }
}

// ============================================================================
// PERFORMANCE STATE
// ============================================================================

/// Lowest valid confidence rating; 0 is reserved for "unrated"
pub const MIN_CONFIDENCE: u8 = 1;

/// Highest valid confidence rating
pub const MAX_CONFIDENCE: u8 = 5;

/// Performance remembered on the item between reviews
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum PerformanceState {
    /// Last categorical rating
    Proficiency(Proficiency),
    /// Last confidence level, 0 when never rated
    Confidence(u8),
    /// Mastered flag
    Mastery(bool),
}

impl Default for PerformanceState {
    fn default() -> Self {
        PerformanceState::Proficiency(Proficiency::NotProficient)
    }
}

impl PerformanceState {
    /// Ordering key for due lists, weakest first
    pub fn rank(&self) -> u8 {
        match self {
            PerformanceState::Proficiency(p) => p.rank(),
            PerformanceState::Confidence(level) => *level,
            PerformanceState::Mastery(mastered) => u8::from(*mastered),
        }
    }

    /// Whether the item counts towards the mastery ratio
    pub fn is_strong(&self) -> bool {
        match self {
            PerformanceState::Proficiency(p) => *p == Proficiency::Proficient,
            PerformanceState::Confidence(level) => *level >= 4,
            PerformanceState::Mastery(mastered) => *mastered,
        }
    }

    /// Whether the item has been retired from scheduling
    pub fn is_mastered(&self) -> bool {
        matches!(self, PerformanceState::Mastery(true))
    }

    /// Fresh state in the given representation
    pub fn initial(representation: Representation) -> Self {
        match representation {
            Representation::Proficiency => PerformanceState::Proficiency(Proficiency::NotProficient),
            Representation::Confidence => PerformanceState::Confidence(0),
            Representation::Mastery => PerformanceState::Mastery(false),
        }
    }

    /// Short label for listings
    pub fn label(&self) -> String {
        match self {
            PerformanceState::Proficiency(p) => p.label().to_string(),
            PerformanceState::Confidence(0) => "Unrated".to_string(),
            PerformanceState::Confidence(level) => format!("Confidence {}", level),
            PerformanceState::Mastery(true) => "Mastered".to_string(),
            PerformanceState::Mastery(false) => "Learning".to_string(),
        }
    }
}

impl From<Rating> for PerformanceState {
    fn from(rating: Rating) -> Self {
        match rating {
            Rating::Proficiency(p) => PerformanceState::Proficiency(p),
            Rating::Confidence(level) => PerformanceState::Confidence(level),
            Rating::Mastered(mastered) => PerformanceState::Mastery(mastered),
        }
    }
}

/// Which performance representation a collection uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Representation {
    #[default]
    Proficiency,
    Confidence,
    Mastery,
}

// ============================================================================
// TESTS
// ============================================================================
