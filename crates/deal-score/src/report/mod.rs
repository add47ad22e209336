//! Property analysis report consumed from the upstream research pipeline.
//!
//! Only the fields the scorer reads are modelled; anything else in the payload
//! is ignored. Numbers are read tolerantly so a malformed figure degrades to
//! "missing" rather than rejecting the whole report.

mod mapping;

pub use mapping::map_report;

use crate::scoring::numbers::deserialize_safe_number;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyReport {
    #[serde(default)]
    pub value_snapshot: Option<ValueSnapshot>,
    #[serde(default)]
    pub rental_position: Option<RentalPosition>,
    #[serde(default)]
    pub value_add_strategies: Vec<ValueAddStrategy>,
    #[serde(default)]
    pub development_scenarios: Vec<DevelopmentScenario>,
    #[serde(default)]
    pub watch_outs: Vec<WatchOut>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueSnapshot {
    #[serde(default, deserialize_with = "deserialize_safe_number")]
    pub indicative_midpoint: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_safe_number")]
    pub asking_price: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentalPosition {
    #[serde(default, deserialize_with = "deserialize_safe_number")]
    pub gross_yield_percent: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_safe_number")]
    pub estimated_annual_rent: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_safe_number")]
    pub estimated_cash_position_weekly: Option<f64>,
}

/// Low/high currency estimate. Either end may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MoneyRange {
    #[serde(default, deserialize_with = "deserialize_safe_number")]
    pub low: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_safe_number")]
    pub high: Option<f64>,
}

impl MoneyRange {
    pub(crate) fn is_empty(&self) -> bool {
        self.low.is_none() && self.high.is_none()
    }
}

/// Renovation or resale strategy with an expected uplift.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueAddStrategy {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub estimated_uplift: Option<MoneyRange>,
    #[serde(default)]
    pub sale_profit_estimate: Option<MoneyRange>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevelopmentScenario {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub estimated_net_profit: Option<MoneyRange>,
    #[serde(default)]
    pub key_constraints: Vec<String>,
    #[serde(default)]
    pub key_risks: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WatchOutSeverity {
    Critical,
    Warning,
    Info,
    #[serde(other)]
    Unrecognized,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchOut {
    pub title: String,
    pub severity: WatchOutSeverity,
}
