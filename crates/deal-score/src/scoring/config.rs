use serde::{Deserialize, Serialize};

use super::calculators::UNKNOWN_LABEL;
use super::domain::{Severity, SubScoreName};

const WEIGHT_TOLERANCE: f64 = 1e-9;

/// Complete scoring rubric: weights, breakpoints, labels and confidence rules.
///
/// Every constant the engine uses lives here so alternate schemes can be swapped
/// without touching calculator logic. Sections omitted from a config file fall
/// back to the canonical defaults.
///
/// Example JSON:
/// ```json
/// {
///   "weights": { "value": 0.2, "yield": 0.2, "cashFlow": 0.3, "uplift": 0.2, "constraints": 0.1 },
///   "confidence": { "highThreshold": 0.75, "mediumThreshold": 0.5, "rangeMultiplier": 20.0 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ScoringConfig {
    #[serde(default)]
    pub weights: WeightTable,
    #[serde(default = "FactorConfig::value")]
    pub value: FactorConfig,
    #[serde(rename = "yield", default = "FactorConfig::rental_yield")]
    pub rental_yield: FactorConfig,
    #[serde(default = "FactorConfig::cash_flow")]
    pub cash_flow: FactorConfig,
    #[serde(default)]
    pub uplift: UpliftConfig,
    #[serde(default)]
    pub constraints: ConstraintsConfig,
    #[serde(default)]
    pub confidence: ConfidenceConfig,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: WeightTable::default(),
            value: FactorConfig::value(),
            rental_yield: FactorConfig::rental_yield(),
            cash_flow: FactorConfig::cash_flow(),
            uplift: UpliftConfig::default(),
            constraints: ConstraintsConfig::default(),
            confidence: ConfidenceConfig::default(),
        }
    }
}

/// Aggregation weights per sub-score. Must sum to exactly 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct WeightTable {
    pub value: f64,
    #[serde(rename = "yield")]
    pub rental_yield: f64,
    pub cash_flow: f64,
    pub uplift: f64,
    pub constraints: f64,
}

impl Default for WeightTable {
    fn default() -> Self {
        Self {
            value: 0.20,
            rental_yield: 0.20,
            cash_flow: 0.30,
            uplift: 0.20,
            constraints: 0.10,
        }
    }
}

impl WeightTable {
    /// Four-factor scheme that ignores the price premium.
    ///
    /// The value sub-score is still reported with weight 0, but it no longer
    /// counts toward confidence (each remaining factor is worth 0.25) and is
    /// never ranked as a driver.
    pub fn without_value() -> Self {
        Self {
            value: 0.0,
            rental_yield: 0.25,
            cash_flow: 0.35,
            uplift: 0.25,
            constraints: 0.15,
        }
    }

    pub fn weight_for(&self, name: SubScoreName) -> f64 {
        match name {
            SubScoreName::Value => self.value,
            SubScoreName::Yield => self.rental_yield,
            SubScoreName::CashFlow => self.cash_flow,
            SubScoreName::Uplift => self.uplift,
            SubScoreName::Constraints => self.constraints,
        }
    }

    pub fn total(&self) -> f64 {
        SubScoreName::ALL
            .iter()
            .map(|name| self.weight_for(*name))
            .sum()
    }

    pub fn is_normalized(&self) -> bool {
        (self.total() - 1.0).abs() < WEIGHT_TOLERANCE
    }
}

/// Comparison applied by a single breakpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Bound {
    AtLeast(f64),
    Below(f64),
    AtMost(f64),
}

impl Bound {
    pub fn matches(&self, value: f64) -> bool {
        match self {
            Bound::AtLeast(n) => value >= *n,
            Bound::Below(n) => value < *n,
            Bound::AtMost(n) => value <= *n,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Band {
    pub bound: Bound,
    pub score: f64,
}

/// Ordered breakpoints; the first matching band wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BandTable {
    pub bands: Vec<Band>,
    pub otherwise: f64,
}

impl BandTable {
    fn new(bands: &[(Bound, f64)], otherwise: f64) -> Self {
        Self {
            bands: bands
                .iter()
                .map(|(bound, score)| Band {
                    bound: *bound,
                    score: *score,
                })
                .collect(),
            otherwise,
        }
    }

    pub fn lookup(&self, value: f64) -> f64 {
        self.bands
            .iter()
            .find(|band| band.bound.matches(value))
            .map(|band| band.score)
            .unwrap_or(self.otherwise)
    }

    fn scores(&self) -> impl Iterator<Item = f64> + '_ {
        self.bands
            .iter()
            .map(|band| band.score)
            .chain(std::iter::once(self.otherwise))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LabelBand {
    pub min_score: u8,
    pub label: String,
}

/// Descending score bands mapping a sub-score to its display label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LabelScale {
    pub bands: Vec<LabelBand>,
    pub otherwise: String,
}

impl LabelScale {
    fn new(bands: &[(u8, &str)], otherwise: &str) -> Self {
        Self {
            bands: bands
                .iter()
                .map(|(min_score, label)| LabelBand {
                    min_score: *min_score,
                    label: label.to_string(),
                })
                .collect(),
            otherwise: otherwise.to_string(),
        }
    }

    fn strength() -> Self {
        Self::new(&[(75, "Strong"), (45, "OK")], "Weak")
    }

    pub fn label_for(&self, score: u8) -> &str {
        self.bands
            .iter()
            .find(|band| score >= band.min_score)
            .map(|band| band.label.as_str())
            .unwrap_or(self.otherwise.as_str())
    }
}

/// Breakpoints, neutral fallback and labels for a single factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FactorConfig {
    pub breakpoints: BandTable,
    pub fallback_score: u8,
    pub labels: LabelScale,
}

impl FactorConfig {
    /// Price premium of asking over purchase price, in percent.
    pub fn value() -> Self {
        Self {
            breakpoints: BandTable::new(
                &[
                    (Bound::AtLeast(40.0), 5.0),
                    (Bound::AtLeast(30.0), 15.0),
                    (Bound::AtLeast(20.0), 30.0),
                    (Bound::AtLeast(10.0), 50.0),
                    (Bound::AtLeast(0.0), 70.0),
                    (Bound::AtLeast(-10.0), 85.0),
                    (Bound::AtLeast(-20.0), 95.0),
                ],
                100.0,
            ),
            fallback_score: 60,
            labels: LabelScale::new(
                &[
                    (85, "Great Value"),
                    (70, "Fair"),
                    (50, "Overpriced"),
                    (30, "Poor Value"),
                ],
                "Avoid",
            ),
        }
    }

    /// Net or gross yield, in percent.
    pub fn rental_yield() -> Self {
        Self {
            breakpoints: BandTable::new(
                &[
                    (Bound::Below(2.0), 10.0),
                    (Bound::Below(3.0), 30.0),
                    (Bound::Below(4.0), 55.0),
                    (Bound::Below(5.0), 75.0),
                    (Bound::Below(6.0), 88.0),
                ],
                95.0,
            ),
            fallback_score: 55,
            labels: LabelScale::strength(),
        }
    }

    /// Weekly cash position in currency units.
    pub fn cash_flow() -> Self {
        Self {
            breakpoints: BandTable::new(
                &[
                    (Bound::AtLeast(200.0), 95.0),
                    (Bound::AtLeast(50.0), 80.0),
                    (Bound::AtLeast(-49.0), 65.0),
                    (Bound::AtLeast(-199.0), 40.0),
                    (Bound::AtLeast(-499.0), 20.0),
                ],
                10.0,
            ),
            fallback_score: 55,
            labels: LabelScale::strength(),
        }
    }
}

/// Base uplift breakpoints plus the downside penalty for a negative conservative case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpliftConfig {
    pub breakpoints: BandTable,
    pub conservative_penalties: BandTable,
    pub fallback_score: u8,
    pub labels: LabelScale,
}

impl Default for UpliftConfig {
    fn default() -> Self {
        Self {
            breakpoints: BandTable::new(
                &[
                    (Bound::AtMost(0.0), 35.0),
                    (Bound::AtMost(5.0), 55.0),
                    (Bound::AtMost(10.0), 70.0),
                    (Bound::AtMost(20.0), 85.0),
                ],
                95.0,
            ),
            conservative_penalties: BandTable::new(
                &[(Bound::AtLeast(-5.0), 10.0), (Bound::AtLeast(-10.0), 18.0)],
                25.0,
            ),
            fallback_score: 55,
            labels: LabelScale::strength(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeverityPenalties {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
}

impl SeverityPenalties {
    pub fn for_severity(&self, severity: Severity) -> f64 {
        match severity {
            Severity::Low => self.low,
            Severity::Medium => self.medium,
            Severity::High => self.high,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConstraintsConfig {
    pub penalties: SeverityPenalties,
    pub fallback_score: u8,
    pub labels: LabelScale,
}

impl Default for ConstraintsConfig {
    fn default() -> Self {
        Self {
            penalties: SeverityPenalties {
                low: 6.0,
                medium: 12.0,
                high: 22.0,
            },
            fallback_score: 60,
            labels: LabelScale::new(&[(75, "Few Issues"), (45, "Some Issues")], "Major Issues"),
        }
    }
}

/// Confidence label thresholds and the width of the uncertainty range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfidenceConfig {
    pub high_threshold: f64,
    pub medium_threshold: f64,
    /// Points of spread per unit of confidence below `high_threshold`.
    pub range_multiplier: f64,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            high_threshold: 0.75,
            medium_threshold: 0.5,
            range_multiplier: 20.0,
        }
    }
}

impl ScoringConfig {
    /// Validate the rubric. Returns every problem found, not just the first.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        for name in SubScoreName::ALL {
            let weight = self.weights.weight_for(name);
            if !weight.is_finite() || weight < 0.0 {
                errors.push(format!(
                    "scoring.weights.{}: must be a non-negative number (got {})",
                    field_name(name),
                    weight
                ));
            }
        }
        if !self.weights.is_normalized() {
            errors.push(format!(
                "scoring.weights: must sum to 1.0 (got {:.4})",
                self.weights.total()
            ));
        }

        check_factor("scoring.value", &self.value, &mut errors);
        check_factor("scoring.yield", &self.rental_yield, &mut errors);
        check_factor("scoring.cashFlow", &self.cash_flow, &mut errors);

        check_scores(
            "scoring.uplift.breakpoints",
            &self.uplift.breakpoints,
            &mut errors,
        );
        check_fallback(
            "scoring.uplift.fallbackScore",
            self.uplift.fallback_score,
            &mut errors,
        );
        check_labels("scoring.uplift.labels", &self.uplift.labels, &mut errors);
        for (i, penalty) in self.uplift.conservative_penalties.scores().enumerate() {
            if !penalty.is_finite() || penalty < 0.0 {
                errors.push(format!(
                    "scoring.uplift.conservativePenalties[{}]: must be non-negative (got {})",
                    i, penalty
                ));
            }
        }

        let penalties = &self.constraints.penalties;
        for (severity, penalty) in [
            (Severity::Low, penalties.low),
            (Severity::Medium, penalties.medium),
            (Severity::High, penalties.high),
        ] {
            if !penalty.is_finite() || penalty < 0.0 {
                errors.push(format!(
                    "scoring.constraints.penalties.{}: must be non-negative (got {})",
                    severity.label(),
                    penalty
                ));
            }
        }
        check_fallback(
            "scoring.constraints.fallbackScore",
            self.constraints.fallback_score,
            &mut errors,
        );
        check_labels(
            "scoring.constraints.labels",
            &self.constraints.labels,
            &mut errors,
        );

        let confidence = &self.confidence;
        let ordered = 0.0 <= confidence.medium_threshold
            && confidence.medium_threshold <= confidence.high_threshold
            && confidence.high_threshold <= 1.0;
        if !ordered {
            errors.push(format!(
                "scoring.confidence: thresholds must satisfy 0 <= medium <= high <= 1 (got medium {}, high {})",
                confidence.medium_threshold, confidence.high_threshold
            ));
        }
        if !confidence.range_multiplier.is_finite() || confidence.range_multiplier < 0.0 {
            errors.push(format!(
                "scoring.confidence.rangeMultiplier: must be non-negative (got {})",
                confidence.range_multiplier
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn field_name(name: SubScoreName) -> &'static str {
    match name {
        SubScoreName::Value => "value",
        SubScoreName::Yield => "yield",
        SubScoreName::CashFlow => "cashFlow",
        SubScoreName::Uplift => "uplift",
        SubScoreName::Constraints => "constraints",
    }
}

fn check_factor(path: &str, factor: &FactorConfig, errors: &mut Vec<String>) {
    check_scores(&format!("{path}.breakpoints"), &factor.breakpoints, errors);
    check_fallback(&format!("{path}.fallbackScore"), factor.fallback_score, errors);
    check_labels(&format!("{path}.labels"), &factor.labels, errors);
}

/// Bands must be strictly descending and may not reuse the unavailable label.
fn check_labels(path: &str, scale: &LabelScale, errors: &mut Vec<String>) {
    for (i, band) in scale.bands.iter().enumerate() {
        if band.min_score > 100 {
            errors.push(format!(
                "{}.bands[{}].minScore: must be within 0..=100 (got {})",
                path, i, band.min_score
            ));
        }
        if i > 0 && band.min_score >= scale.bands[i - 1].min_score {
            errors.push(format!(
                "{}.bands[{}].minScore: bands must be in descending order (got {} after {})",
                path,
                i,
                band.min_score,
                scale.bands[i - 1].min_score
            ));
        }
    }

    let labels = scale
        .bands
        .iter()
        .enumerate()
        .map(|(i, band)| (format!("{path}.bands[{i}].label"), band.label.as_str()))
        .chain(std::iter::once((
            format!("{path}.otherwise"),
            scale.otherwise.as_str(),
        )));
    for (label_path, label) in labels {
        if label.trim().is_empty() || label.trim().eq_ignore_ascii_case(UNKNOWN_LABEL) {
            errors.push(format!(
                "{label_path}: must be a non-empty label other than \"{UNKNOWN_LABEL}\" (got \"{label}\")"
            ));
        }
    }
}

fn check_scores(path: &str, table: &BandTable, errors: &mut Vec<String>) {
    for (i, score) in table.scores().enumerate() {
        if !(0.0..=100.0).contains(&score) {
            errors.push(format!(
                "{}[{}]: score must be within 0..=100 (got {})",
                path, i, score
            ));
        }
    }
}

fn check_fallback(path: &str, score: u8, errors: &mut Vec<String>) {
    if score > 100 {
        errors.push(format!("{path}: must be within 0..=100 (got {score})"));
    }
}
