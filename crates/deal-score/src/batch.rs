//! Batch scoring of deals listed in a CSV file.
//!
//! One row per deal. Every numeric column is optional; blank or non-numeric
//! cells are treated as missing. Constraint flags are not part of the format.

use crate::scoring::numbers::safe_number;
use crate::scoring::{DealScorer, ScoreInputs, ScoreResult, UpliftScenario};
use serde::{Deserialize, Deserializer};
use std::io::Read;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("failed to read deal batch: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid deal batch CSV: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchEntry {
    pub id: String,
    pub inputs: ScoreInputs,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome {
    pub id: String,
    pub result: ScoreResult,
}

pub fn read_entries_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<BatchEntry>, BatchError> {
    let file = std::fs::File::open(path)?;
    read_entries(file)
}

pub fn read_entries<R: Read>(reader: R) -> Result<Vec<BatchEntry>, BatchError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut entries = Vec::new();

    for (index, record) in csv_reader.deserialize::<DealRow>().enumerate() {
        let row = record?;
        let id = row
            .id
            .clone()
            .unwrap_or_else(|| format!("row-{}", index + 1));
        entries.push(BatchEntry {
            id,
            inputs: row.into_inputs(),
        });
    }

    Ok(entries)
}

/// Score every entry, preserving input order.
pub fn score_entries(scorer: &DealScorer, entries: &[BatchEntry]) -> Vec<BatchOutcome> {
    entries
        .iter()
        .map(|entry| BatchOutcome {
            id: entry.id.clone(),
            result: scorer.score(&entry.inputs),
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct DealRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    id: Option<String>,
    #[serde(default, deserialize_with = "cell_number")]
    purchase_price: Option<f64>,
    #[serde(default, deserialize_with = "cell_number")]
    asking_price: Option<f64>,
    #[serde(default, deserialize_with = "cell_number")]
    annual_rent: Option<f64>,
    #[serde(default, deserialize_with = "cell_number")]
    annual_expenses: Option<f64>,
    #[serde(default, deserialize_with = "cell_number")]
    annual_debt_service: Option<f64>,
    #[serde(default, deserialize_with = "cell_number")]
    cash_flow_annual: Option<f64>,
    #[serde(default, deserialize_with = "cell_number")]
    cash_flow_weekly: Option<f64>,
    #[serde(default, deserialize_with = "cell_number")]
    yield_percent: Option<f64>,
    #[serde(default, deserialize_with = "cell_number")]
    uplift_conservative: Option<f64>,
    #[serde(default, deserialize_with = "cell_number")]
    uplift_base: Option<f64>,
    #[serde(default, deserialize_with = "cell_number")]
    uplift_upside: Option<f64>,
}

impl DealRow {
    fn into_inputs(self) -> ScoreInputs {
        let uplift = UpliftScenario {
            conservative: self.uplift_conservative,
            base: self.uplift_base,
            upside: self.uplift_upside,
        };
        let has_uplift =
            uplift.conservative.is_some() || uplift.base.is_some() || uplift.upside.is_some();

        ScoreInputs {
            purchase_price: self.purchase_price,
            asking_price: self.asking_price,
            annual_rent: self.annual_rent,
            annual_expenses: self.annual_expenses,
            annual_debt_service: self.annual_debt_service,
            cash_flow_annual: self.cash_flow_annual,
            cash_flow_weekly: self.cash_flow_weekly,
            yield_percent: self.yield_percent,
            uplift: has_uplift.then_some(uplift),
            constraints: None,
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn cell_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = empty_string_as_none(deserializer)?;
    Ok(opt.and_then(|raw| safe_number(raw.trim().replace([',', '$'], "").parse().ok())))
}
