use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::numbers::{deserialize_safe_number, safe_number};

/// Severity tier attached to an identified risk or planning limitation.
///
/// Deserialization is lenient: matching is case-insensitive and anything
/// unrecognised (or not a string) is treated as medium.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }

    fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" => Severity::Low,
            "high" => Severity::High,
            _ => Severity::Medium,
        }
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(value.as_str().map(Severity::parse).unwrap_or_default())
    }
}

/// A single identified risk (zoning, heritage, flood, ...).
///
/// Only `severity` is needed on input; a missing `key` is derived from `label`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawConstraintFlag")]
pub struct ConstraintFlag {
    pub key: String,
    pub label: String,
    pub severity: Severity,
}

#[derive(Deserialize)]
struct RawConstraintFlag {
    #[serde(default)]
    key: String,
    #[serde(default)]
    label: String,
    #[serde(default)]
    severity: Severity,
}

impl From<RawConstraintFlag> for ConstraintFlag {
    fn from(raw: RawConstraintFlag) -> Self {
        let key = if raw.key.trim().is_empty() {
            constraint_key(&raw.label)
        } else {
            raw.key
        };
        Self {
            key,
            label: raw.label,
            severity: raw.severity,
        }
    }
}

impl ConstraintFlag {
    pub fn new(label: impl Into<String>, severity: Severity) -> Self {
        let label = label.into();
        Self {
            key: constraint_key(&label),
            label,
            severity,
        }
    }
}

/// Slug used as the flag identifier: lowercase ASCII words joined by `-`.
pub(crate) fn constraint_key(label: &str) -> String {
    label
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| word.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

/// Absolute value uplift expected under three scenarios. Amounts may be negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpliftScenario {
    #[serde(default, deserialize_with = "deserialize_safe_number")]
    pub conservative: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_safe_number")]
    pub base: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_safe_number")]
    pub upside: Option<f64>,
}

/// Canonical engine input. Every field is optional; zero and absent are distinct.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreInputs {
    #[serde(default, deserialize_with = "deserialize_safe_number")]
    pub purchase_price: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_safe_number")]
    pub asking_price: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_safe_number")]
    pub annual_rent: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_safe_number")]
    pub annual_expenses: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_safe_number")]
    pub annual_debt_service: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_safe_number")]
    pub cash_flow_annual: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_safe_number")]
    pub cash_flow_weekly: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_safe_number")]
    pub yield_percent: Option<f64>,
    #[serde(default)]
    pub uplift: Option<UpliftScenario>,
    #[serde(default)]
    pub constraints: Option<Vec<ConstraintFlag>>,
}

impl ScoreInputs {
    /// Copy with every non-finite number replaced by `None`.
    pub fn sanitized(&self) -> Self {
        Self {
            purchase_price: safe_number(self.purchase_price),
            asking_price: safe_number(self.asking_price),
            annual_rent: safe_number(self.annual_rent),
            annual_expenses: safe_number(self.annual_expenses),
            annual_debt_service: safe_number(self.annual_debt_service),
            cash_flow_annual: safe_number(self.cash_flow_annual),
            cash_flow_weekly: safe_number(self.cash_flow_weekly),
            yield_percent: safe_number(self.yield_percent),
            uplift: self.uplift.map(|uplift| UpliftScenario {
                conservative: safe_number(uplift.conservative),
                base: safe_number(uplift.base),
                upside: safe_number(uplift.upside),
            }),
            constraints: self.constraints.clone(),
        }
    }
}

/// The five scoring factors, in canonical definition order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SubScoreName {
    Value,
    Yield,
    CashFlow,
    Uplift,
    Constraints,
}

impl SubScoreName {
    pub const ALL: [SubScoreName; 5] = [
        SubScoreName::Value,
        SubScoreName::Yield,
        SubScoreName::CashFlow,
        SubScoreName::Uplift,
        SubScoreName::Constraints,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            SubScoreName::Value => "value",
            SubScoreName::Yield => "yield",
            SubScoreName::CashFlow => "cash flow",
            SubScoreName::Uplift => "uplift",
            SubScoreName::Constraints => "constraints",
        }
    }
}

/// One factor's contribution to the deal score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubScore {
    pub name: SubScoreName,
    pub score: u8,
    pub label: String,
    pub detail: String,
    pub available: bool,
    pub weight: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRange {
    pub low: u8,
    pub high: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceLabel {
    Low,
    Medium,
    High,
}

impl ConfidenceLabel {
    pub fn label(&self) -> &'static str {
        match self {
            ConfidenceLabel::Low => "Low",
            ConfidenceLabel::Medium => "Medium",
            ConfidenceLabel::High => "High",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Drivers {
    pub positive: Vec<SubScore>,
    pub negative: Vec<SubScore>,
}

/// Engine output: composite score, confidence, breakdown and drivers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub score: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_range: Option<ScoreRange>,
    pub confidence: f64,
    pub confidence_label: ConfidenceLabel,
    pub subs: Vec<SubScore>,
    pub drivers: Drivers,
}

impl ScoreResult {
    pub fn sub(&self, name: SubScoreName) -> Option<&SubScore> {
        self.subs.iter().find(|sub| sub.name == name)
    }

    /// One-line narrative for logs and terminal output.
    pub fn summary(&self) -> String {
        let range = match self.score_range {
            Some(range) => format!(", {}-{}", range.low, range.high),
            None => String::new(),
        };
        let names = |subs: &[SubScore]| {
            subs.iter()
                .map(|sub| sub.name.display_name())
                .collect::<Vec<_>>()
                .join(", ")
        };

        format!(
            "{}/100 ({} confidence{}): strongest {}; weakest {}",
            self.score,
            self.confidence_label.label(),
            range,
            names(&self.drivers.positive),
            names(&self.drivers.negative),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn constraint_key_slugifies_label() {
        assert_eq!(constraint_key("Heritage overlay (HO12)"), "heritage-overlay-ho12");
        assert_eq!(constraint_key("  Flood   zone "), "flood-zone");
    }

    #[test]
    fn inputs_deserialize_with_tolerant_numbers() {
        let inputs: ScoreInputs = serde_json::from_value(json!({
            "purchasePrice": "800000",
            "askingPrice": null,
            "annualRent": "unknown",
            "cashFlowWeekly": -120,
            "uplift": { "base": 40000, "conservative": "bad" },
            "constraints": [{ "key": "flood", "label": "Flood", "severity": "high" }]
        }))
        .expect("inputs parse");

        assert_eq!(inputs.purchase_price, Some(800000.0));
        assert_eq!(inputs.asking_price, None);
        assert_eq!(inputs.annual_rent, None);
        assert_eq!(inputs.cash_flow_weekly, Some(-120.0));
        let uplift = inputs.uplift.expect("uplift present");
        assert_eq!(uplift.base, Some(40000.0));
        assert_eq!(uplift.conservative, None);
        assert_eq!(inputs.constraints.map(|flags| flags.len()), Some(1));
    }

    #[test]
    fn sanitized_strips_nan_and_infinity() {
        let inputs = ScoreInputs {
            purchase_price: Some(f64::NAN),
            yield_percent: Some(f64::INFINITY),
            annual_rent: Some(30000.0),
            uplift: Some(UpliftScenario {
                base: Some(f64::NEG_INFINITY),
                ..UpliftScenario::default()
            }),
            ..ScoreInputs::default()
        };

        let clean = inputs.sanitized();
        assert_eq!(clean.purchase_price, None);
        assert_eq!(clean.yield_percent, None);
        assert_eq!(clean.annual_rent, Some(30000.0));
        assert_eq!(clean.uplift.and_then(|uplift| uplift.base), None);
    }
}
