//! Composite deal scoring.
//!
//! Five independent factor calculators (value, yield, cash flow, uplift and
//! constraints) each produce a 0-100 sub-score. The engine combines them with a
//! fixed weight table, derives a confidence from how many factors had real data,
//! and ranks the strongest and weakest factors for display.

mod calculators;
pub mod config;
mod confidence;
pub mod domain;
mod drivers;
pub mod numbers;

#[cfg(test)]
mod tests;

pub use config::{
    Band, BandTable, Bound, ConfidenceConfig, ConstraintsConfig, FactorConfig, LabelBand,
    LabelScale, ScoringConfig, SeverityPenalties, UpliftConfig, WeightTable,
};
pub use domain::{
    ConfidenceLabel, ConstraintFlag, Drivers, ScoreInputs, ScoreRange, ScoreResult, Severity,
    SubScore, SubScoreName, UpliftScenario,
};

use crate::report::{map_report, PropertyReport};
use calculators::CALCULATORS;
use numbers::clamp_score;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Either a raw property report or pre-built engine inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScoreRequest {
    Report(PropertyReport),
    Inputs(ScoreInputs),
}

/// Stateless scorer that applies the rubric configuration to deal inputs.
#[derive(Debug, Clone, Default)]
pub struct DealScorer {
    config: ScoringConfig,
}

impl DealScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn score_request(&self, request: &ScoreRequest) -> ScoreResult {
        match request {
            ScoreRequest::Report(report) => self.score_report(report),
            ScoreRequest::Inputs(inputs) => self.score(inputs),
        }
    }

    pub fn score_report(&self, report: &PropertyReport) -> ScoreResult {
        self.score(&map_report(report))
    }

    pub fn score(&self, inputs: &ScoreInputs) -> ScoreResult {
        let inputs = inputs.sanitized();
        let subs = self.sub_scores(&inputs);
        let score = self.aggregate(&subs);
        let assessment = confidence::assess(score, &subs, &self.config.confidence);
        let drivers = drivers::rank(&subs);

        debug!(
            score,
            confidence = assessment.confidence,
            label = assessment.label.label(),
            "deal scored"
        );

        ScoreResult {
            score,
            score_range: assessment.range,
            confidence: assessment.confidence,
            confidence_label: assessment.label,
            subs,
            drivers,
        }
    }

    fn sub_scores(&self, inputs: &ScoreInputs) -> Vec<SubScore> {
        CALCULATORS
            .iter()
            .map(|(name, calculate)| {
                let calculation = calculate(inputs, &self.config);
                debug!(
                    factor = name.display_name(),
                    score = calculation.score,
                    available = calculation.available,
                    "sub-score computed"
                );
                SubScore {
                    name: *name,
                    score: calculation.score,
                    label: calculation.label,
                    detail: calculation.detail,
                    available: calculation.available,
                    weight: self.config.weights.weight_for(*name),
                }
            })
            .collect()
    }

    /// Weighted sum of the sub-scores, rounded and clamped to 0-100.
    fn aggregate(&self, subs: &[SubScore]) -> u8 {
        let weighted: f64 = subs
            .iter()
            .map(|sub| f64::from(sub.score) * self.config.weights.weight_for(sub.name))
            .sum();
        clamp_score(weighted)
    }
}

/// Score inputs with the canonical configuration.
pub fn score_deal(inputs: &ScoreInputs) -> ScoreResult {
    DealScorer::default().score(inputs)
}
