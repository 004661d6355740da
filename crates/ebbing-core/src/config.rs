//! Configuration
//!
//! One JSON file, every field optional, plus environment overrides.
//! Nothing here points at a user-specific path; the data directory
//! falls back to the platform project directory.
//!
//! | Variable           | Field        |
//! |--------------------|--------------|
//! | `EBBING_DATA_DIR`  | `data_dir`   |
//! | `EBBING_VAULT`     | `vault_path` |
//! | `EBBING_NOTES_DIR` | `notes_dir`  |
//! | `EBBING_POLICY`    | `policy`     |

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::item::{DEFAULT_EXPECTED_EFFORT, Representation};
use crate::readiness::ReadinessConfig;
use crate::schedule::{
    CategoricalPolicy, ConfidencePolicy, DEFAULT_CONFIDENCE_INTERVALS, DEFAULT_ERS_INTERVALS,
    DEFAULT_FORGOTTEN_INTERVALS, DEFAULT_NOT_PROFICIENT_INTERVALS, DEFAULT_PROFICIENT_INTERVALS,
    ErsPolicy, IntervalTable, MAX_INTERVAL_DAYS, PolicyKind, Scheduler, SchedulingPolicy,
};

/// Database file name inside the data directory
pub const DATABASE_FILE: &str = "ebbing.db";

/// JSON store file name inside the data directory
pub const ITEMS_FILE: &str = "items.json";

/// Config file name inside the platform config directory
pub const CONFIG_FILE: &str = "config.json";

/// Configuration error type
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid configuration: {0}")]
    Invalid(String),
    #[error("Could not determine project directories")]
    NoProjectDirs,
}

/// Which Item Store backs the collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    #[default]
    Sqlite,
    Json,
}

/// Base interval tables for every policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IntervalConfig {
    pub proficient: IntervalTable,
    pub not_proficient: IntervalTable,
    pub forgotten: IntervalTable,
    pub confidence: IntervalTable,
    pub ers: IntervalTable,
}

impl Default for IntervalConfig {
    fn default() -> Self {
        Self {
            proficient: DEFAULT_PROFICIENT_INTERVALS.into(),
            not_proficient: DEFAULT_NOT_PROFICIENT_INTERVALS.into(),
            forgotten: DEFAULT_FORGOTTEN_INTERVALS.into(),
            confidence: DEFAULT_CONFIDENCE_INTERVALS.into(),
            ers: DEFAULT_ERS_INTERVALS.into(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EbbingConfig {
    /// Active scheduling policy
    pub policy: PolicyKind,
    pub intervals: IntervalConfig,
    /// Substituted when an item's expected effort is not positive
    pub default_expected_effort: f64,
    /// Days between registering an item and its first review
    pub first_review_offset_days: i64,
    pub readiness: ReadinessConfig,
    pub store: StoreKind,
    /// Where the item store lives; platform data dir when unset
    pub data_dir: Option<PathBuf>,
    /// Note vault to scan for knowledge points
    pub vault_path: Option<PathBuf>,
    /// Directory of daily notes the annotator writes into
    pub notes_dir: Option<PathBuf>,
}

impl Default for EbbingConfig {
    fn default() -> Self {
        Self {
            policy: PolicyKind::default(),
            intervals: IntervalConfig::default(),
            default_expected_effort: DEFAULT_EXPECTED_EFFORT,
            first_review_offset_days: 1,
            readiness: ReadinessConfig::default(),
            store: StoreKind::default(),
            data_dir: None,
            vault_path: None,
            notes_dir: None,
        }
    }
}

impl EbbingConfig {
    /// Read a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        tracing::debug!(path = %path.display(), policy = %config.policy, "Loaded config");
        Ok(config)
    }

    /// Read a config file if it exists, defaults otherwise
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Platform location of the config file
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let dirs = project_dirs()?;
        Ok(dirs.config_dir().join(CONFIG_FILE))
    }

    /// Apply `EBBING_*` overrides from the process environment
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup (the environment in production)
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(dir) = non_empty("EBBING_DATA_DIR") {
            self.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(vault) = non_empty("EBBING_VAULT") {
            self.vault_path = Some(PathBuf::from(vault));
        }
        if let Some(notes) = non_empty("EBBING_NOTES_DIR") {
            self.notes_dir = Some(PathBuf::from(notes));
        }
        if let Some(policy) = non_empty("EBBING_POLICY") {
            self.policy = policy.parse().map_err(ConfigError::Invalid)?;
        }
        Ok(())
    }

    /// Reject settings the scheduler cannot honour
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.default_expected_effort.is_finite() && self.default_expected_effort > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "defaultExpectedEffort must be positive, got {}",
                self.default_expected_effort
            )));
        }
        if !(0..=i64::from(MAX_INTERVAL_DAYS)).contains(&self.first_review_offset_days) {
            return Err(ConfigError::Invalid(format!(
                "firstReviewOffsetDays must be within 0-{}, got {}",
                MAX_INTERVAL_DAYS, self.first_review_offset_days
            )));
        }
        let all_tables = [
            ("proficient", &self.intervals.proficient),
            ("notProficient", &self.intervals.not_proficient),
            ("forgotten", &self.intervals.forgotten),
            ("confidence", &self.intervals.confidence),
            ("ers", &self.intervals.ers),
        ];
        for (name, table) in all_tables {
            if table.max_days() > MAX_INTERVAL_DAYS {
                return Err(ConfigError::Invalid(format!(
                    "intervals.{} entries must not exceed {} days, got {}",
                    name,
                    MAX_INTERVAL_DAYS,
                    table.max_days()
                )));
            }
        }
        let same_day_tables = [
            ("proficient", &self.intervals.proficient),
            ("notProficient", &self.intervals.not_proficient),
            ("confidence", &self.intervals.confidence),
            ("ers", &self.intervals.ers),
        ];
        for (name, table) in same_day_tables {
            if table.has_zero() {
                return Err(ConfigError::Invalid(format!(
                    "intervals.{} may not contain 0; only the forgotten table schedules same-day reviews",
                    name
                )));
            }
        }
        Ok(())
    }

    /// Build the policy selected by `policy`
    pub fn scheduling_policy(&self) -> SchedulingPolicy {
        match self.policy {
            PolicyKind::Categorical => SchedulingPolicy::Categorical(CategoricalPolicy {
                proficient: self.intervals.proficient.clone(),
                not_proficient: self.intervals.not_proficient.clone(),
                forgotten: self.intervals.forgotten.clone(),
            }),
            PolicyKind::Confidence => SchedulingPolicy::Confidence(ConfidencePolicy {
                intervals: self.intervals.confidence.clone(),
                default_expected_effort: self.default_expected_effort,
            }),
            PolicyKind::Ers => SchedulingPolicy::Ers(ErsPolicy {
                intervals: self.intervals.ers.clone(),
                default_expected_effort: self.default_expected_effort,
            }),
        }
    }

    pub fn scheduler(&self) -> Scheduler {
        Scheduler::new(self.scheduling_policy())
    }

    /// Performance representation new items start in
    pub fn representation(&self) -> Representation {
        self.scheduling_policy().representation()
    }

    /// Data directory, creating the platform default if needed
    pub fn resolve_data_dir(&self) -> Result<PathBuf, ConfigError> {
        let dir = match &self.data_dir {
            Some(dir) => dir.clone(),
            None => project_dirs()?.data_dir().to_path_buf(),
        };
        std::fs::create_dir_all(&dir).map_err(|source| ConfigError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(dir)
    }

    /// Path of the item store file for the configured backend
    pub fn store_path(&self) -> Result<PathBuf, ConfigError> {
        let file = match self.store {
            StoreKind::Sqlite => DATABASE_FILE,
            StoreKind::Json => ITEMS_FILE,
        };
        Ok(self.resolve_data_dir()?.join(file))
    }
}

fn project_dirs() -> Result<ProjectDirs, ConfigError> {
    ProjectDirs::from("com", "ebbing", "ebbing").ok_or(ConfigError::NoProjectDirs)
}

// ============================================================================
// TESTS
// ============================================================================
