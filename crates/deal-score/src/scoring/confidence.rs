use super::config::ConfidenceConfig;
use super::domain::{ConfidenceLabel, ScoreRange, SubScore};

/// Confidence assessment derived from sub-score data coverage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ConfidenceAssessment {
    pub confidence: f64,
    pub label: ConfidenceLabel,
    pub range: Option<ScoreRange>,
}

/// Each available weighted sub-score contributes an equal share of the total
/// confidence. Factors carrying zero weight do not count either way.
pub(crate) fn coverage(subs: &[SubScore]) -> f64 {
    let weighted: Vec<&SubScore> = subs.iter().filter(|sub| sub.weight > 0.0).collect();
    if weighted.is_empty() {
        return 0.0;
    }
    let available = weighted.iter().filter(|sub| sub.available).count();
    (available as f64 / weighted.len() as f64).clamp(0.0, 1.0)
}

pub(crate) fn assess(
    score: u8,
    subs: &[SubScore],
    config: &ConfidenceConfig,
) -> ConfidenceAssessment {
    let confidence = coverage(subs);

    let label = if confidence >= config.high_threshold {
        ConfidenceLabel::High
    } else if confidence >= config.medium_threshold {
        ConfidenceLabel::Medium
    } else {
        ConfidenceLabel::Low
    };

    let range = (confidence < config.high_threshold).then(|| {
        let spread = ((config.high_threshold - confidence) * config.range_multiplier).round();
        let score = f64::from(score);
        ScoreRange {
            low: (score - spread).clamp(0.0, 100.0) as u8,
            high: (score + spread).clamp(0.0, 100.0) as u8,
        }
    });

    ConfidenceAssessment {
        confidence,
        label,
        range,
    }
}
