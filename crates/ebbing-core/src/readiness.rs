//! Exam Readiness Score (ERS)
//!
//! A 0-100 blend of how much of the collection is strong and how the
//! most recent practice exams went. Feeds the readiness scheduling policy.

use serde::{Deserialize, Serialize};

use crate::item::TrackableItem;

/// Weights and window for the readiness blend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReadinessConfig {
    /// Weight of the mastery ratio component
    pub mastery_weight: f64,
    /// Weight of the practice exam component
    pub exam_weight: f64,
    /// How many of the latest exam scores to average
    pub recent_exams: usize,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            mastery_weight: 0.6,
            exam_weight: 0.4,
            recent_exams: 5,
        }
    }
}

/// Fraction of items that are mastered, proficient, or rated 4+ confidence
pub fn mastery_ratio(items: &[TrackableItem]) -> f64 {
    if items.is_empty() {
        return 0.0;
    }
    let strong = items.iter().filter(|item| item.performance.is_strong()).count();
    strong as f64 / items.len() as f64
}

/// Exam readiness in `[0, 100]`.
///
/// `exam_scores` are oldest first; only the last `recent_exams` count.
/// Scores are clamped to 0-100 and non-finite scores are skipped. Without
/// any usable score the mastery component stands alone.
pub fn exam_readiness(items: &[TrackableItem], exam_scores: &[f64], config: &ReadinessConfig) -> f64 {
    let mastery = mastery_ratio(items) * 100.0;

    let recent: Vec<f64> = exam_scores
        .iter()
        .rev()
        .filter(|s| s.is_finite())
        .take(config.recent_exams)
        .map(|s| s.clamp(0.0, 100.0))
        .collect();

    let total_weight = config.mastery_weight + config.exam_weight;
    let score = if recent.is_empty() || total_weight <= 0.0 {
        mastery
    } else {
        let exam = recent.iter().sum::<f64>() / recent.len() as f64;
        (mastery * config.mastery_weight + exam * config.exam_weight) / total_weight
    };

    score.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{PerformanceState, Proficiency};
    use chrono::NaiveDate;

    fn items(states: &[PerformanceState]) -> Vec<TrackableItem> {
        let created = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        states
            .iter()
            .enumerate()
            .map(|(i, s)| TrackableItem::new(format!("item-{i}"), created, 1).with_performance(*s))
            .collect()
    }

    #[test]
    fn test_mastery_ratio() {
        let items = items(&[
            PerformanceState::Proficiency(Proficiency::Proficient),
            PerformanceState::Proficiency(Proficiency::Forgotten),
            PerformanceState::Mastery(true),
            PerformanceState::Confidence(2),
        ]);
        assert!((mastery_ratio(&items) - 0.5).abs() < 1e-9);
        assert_eq!(mastery_ratio(&[]), 0.0);
    }

    #[test]
    fn test_readiness_without_exams() {
        let items = items(&[PerformanceState::Mastery(true), PerformanceState::Mastery(false)]);
        let score = exam_readiness(&items, &[], &ReadinessConfig::default());
        assert!((score - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_readiness_uses_recent_exams_only() {
        let items = items(&[PerformanceState::Mastery(true)]);
        let config = ReadinessConfig {
            recent_exams: 2,
            ..Default::default()
        };
        // last two exams average 80; 0.6 * 100 + 0.4 * 80 = 92
        let score = exam_readiness(&items, &[10.0, 70.0, 90.0], &config);
        assert!((score - 92.0).abs() < 1e-9);
    }

    #[test]
    fn test_readiness_clamps_scores() {
        let items = items(&[PerformanceState::Mastery(false)]);
        let score = exam_readiness(&items, &[250.0, f64::NAN], &ReadinessConfig::default());
        assert!((score - 40.0).abs() < 1e-9);
    }
}
