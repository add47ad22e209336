//! Composite investment scoring for residential property deals.
//!
//! [`scoring::DealScorer`] turns partially-available price, rent, cash-flow,
//! uplift and constraint signals into a 0-100 deal score with a confidence
//! measure, a per-factor breakdown and the strongest/weakest drivers.
//! [`report::map_report`] adapts upstream property analysis reports into the
//! engine's canonical inputs.

pub mod batch;
pub mod config;
pub mod error;
pub mod report;
pub mod scoring;
pub mod telemetry;

pub use report::{map_report, PropertyReport};
pub use scoring::{
    score_deal, DealScorer, ScoreInputs, ScoreRequest, ScoreResult, ScoringConfig, SubScore,
    SubScoreName,
};
