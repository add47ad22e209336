use super::config::{FactorConfig, LabelScale, ScoringConfig};
use super::domain::{ScoreInputs, Severity, SubScoreName};
use super::numbers::clamp_score;

pub(crate) const UNKNOWN_LABEL: &str = "Unknown";

const WEEKS_PER_YEAR: f64 = 52.0;

/// Output shared by every factor calculator.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Calculation {
    pub score: u8,
    pub available: bool,
    pub label: String,
    pub detail: String,
}

impl Calculation {
    fn scored(score: f64, labels: &LabelScale, detail: String) -> Self {
        let score = clamp_score(score);
        Self {
            score,
            available: true,
            label: labels.label_for(score).to_string(),
            detail,
        }
    }

    fn unavailable(fallback_score: u8, detail: &str) -> Self {
        Self {
            score: fallback_score.min(100),
            available: false,
            label: UNKNOWN_LABEL.to_string(),
            detail: detail.to_string(),
        }
    }
}

pub(crate) type Calculator = fn(&ScoreInputs, &ScoringConfig) -> Calculation;

/// Calculators in canonical definition order.
pub(crate) const CALCULATORS: [(SubScoreName, Calculator); 5] = [
    (SubScoreName::Value, value_score),
    (SubScoreName::Yield, yield_score),
    (SubScoreName::CashFlow, cash_flow_score),
    (SubScoreName::Uplift, uplift_score),
    (SubScoreName::Constraints, constraints_score),
];

fn positive_price(inputs: &ScoreInputs) -> Option<f64> {
    inputs.purchase_price.filter(|price| *price > 0.0)
}

pub(crate) fn value_score(inputs: &ScoreInputs, config: &ScoringConfig) -> Calculation {
    let factor = &config.value;
    let (Some(asking), Some(price)) = (inputs.asking_price, positive_price(inputs)) else {
        return Calculation::unavailable(
            factor.fallback_score,
            "Asking price or purchase price not provided",
        );
    };

    let premium_pct = (asking - price) / price * 100.0;
    let detail = if premium_pct >= 0.0 {
        format!("Asking price is {premium_pct:.1}% above estimated value")
    } else {
        format!("Asking price is {:.1}% below estimated value", -premium_pct)
    };

    score_factor(factor, premium_pct, detail)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum YieldBasis {
    Quoted,
    Net,
    Gross,
}

pub(crate) fn yield_score(inputs: &ScoreInputs, config: &ScoringConfig) -> Calculation {
    let factor = &config.rental_yield;
    let resolved = match inputs.yield_percent {
        Some(quoted) => Some((quoted, YieldBasis::Quoted)),
        None => match (positive_price(inputs), inputs.annual_rent) {
            (Some(price), Some(rent)) => Some(match inputs.annual_expenses {
                Some(expenses) => ((rent - expenses) / price * 100.0, YieldBasis::Net),
                None => (rent / price * 100.0, YieldBasis::Gross),
            }),
            _ => None,
        },
    };

    let Some((yield_pct, basis)) = resolved else {
        return Calculation::unavailable(
            factor.fallback_score,
            "Yield, rent or purchase price not provided",
        );
    };

    let detail = match basis {
        YieldBasis::Quoted => format!("Yield of {yield_pct:.2}%"),
        YieldBasis::Net => format!("Net yield of {yield_pct:.2}% after expenses"),
        YieldBasis::Gross => format!("Gross yield of {yield_pct:.2}% (expenses not provided)"),
    };

    score_factor(factor, yield_pct, detail)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum CashFlowSource {
    Annual,
    Weekly,
    Derived,
}

type CashFlowResolver = fn(&ScoreInputs) -> Option<(f64, CashFlowSource)>;

/// Sources for the annual cash figure, highest priority first.
const CASH_FLOW_RESOLVERS: [CashFlowResolver; 3] =
    [explicit_annual_cash_flow, weekly_cash_flow, derived_cash_flow];

fn explicit_annual_cash_flow(inputs: &ScoreInputs) -> Option<(f64, CashFlowSource)> {
    inputs
        .cash_flow_annual
        .map(|annual| (annual, CashFlowSource::Annual))
}

fn weekly_cash_flow(inputs: &ScoreInputs) -> Option<(f64, CashFlowSource)> {
    inputs
        .cash_flow_weekly
        .map(|weekly| (weekly * WEEKS_PER_YEAR, CashFlowSource::Weekly))
}

/// Missing expenses or debt service count as zero, but rent is required.
fn derived_cash_flow(inputs: &ScoreInputs) -> Option<(f64, CashFlowSource)> {
    inputs.annual_rent.map(|rent| {
        let expenses = inputs.annual_expenses.unwrap_or(0.0);
        let debt_service = inputs.annual_debt_service.unwrap_or(0.0);
        (rent - expenses - debt_service, CashFlowSource::Derived)
    })
}

fn resolve_cash_flow(inputs: &ScoreInputs) -> Option<(f64, CashFlowSource)> {
    CASH_FLOW_RESOLVERS
        .iter()
        .find_map(|resolve| resolve(inputs))
}

pub(crate) fn cash_flow_score(inputs: &ScoreInputs, config: &ScoringConfig) -> Calculation {
    let factor = &config.cash_flow;
    let Some((annual, source)) = resolve_cash_flow(inputs) else {
        return Calculation::unavailable(
            factor.fallback_score,
            "No cash flow figure or rent provided",
        );
    };

    let weekly = annual / WEEKS_PER_YEAR;
    let origin = match source {
        CashFlowSource::Annual => "from annual cash flow",
        CashFlowSource::Weekly => "as reported",
        CashFlowSource::Derived => "derived from rent less expenses and debt service",
    };
    let detail = format!("{} per week {}", signed_currency(weekly), origin);

    score_factor(factor, weekly, detail)
}

pub(crate) fn uplift_score(inputs: &ScoreInputs, config: &ScoringConfig) -> Calculation {
    let uplift_config = &config.uplift;
    let uplift = inputs.uplift.unwrap_or_default();
    let (Some(price), Some(base)) = (positive_price(inputs), uplift.base) else {
        return Calculation::unavailable(
            uplift_config.fallback_score,
            "Purchase price or base uplift not provided",
        );
    };

    let base_pct = base / price * 100.0;
    let mut score = uplift_config.breakpoints.lookup(base_pct);
    let mut detail = format!("Base uplift of {base_pct:.1}% of purchase price");

    if let Some(conservative) = uplift.conservative {
        let conservative_pct = conservative / price * 100.0;
        if conservative_pct < 0.0 {
            let penalty = uplift_config.conservative_penalties.lookup(conservative_pct);
            score -= penalty;
            detail.push_str(&format!(
                "; conservative case loses {:.1}% (-{penalty:.0})",
                -conservative_pct
            ));
        }
    }

    Calculation::scored(score, &uplift_config.labels, detail)
}

pub(crate) fn constraints_score(inputs: &ScoreInputs, config: &ScoringConfig) -> Calculation {
    let constraints_config = &config.constraints;
    let flags = match inputs.constraints.as_deref() {
        Some(flags) if !flags.is_empty() => flags,
        _ => {
            return Calculation::unavailable(
                constraints_config.fallback_score,
                "No constraints identified",
            )
        }
    };

    let penalty: f64 = flags
        .iter()
        .map(|flag| constraints_config.penalties.for_severity(flag.severity))
        .sum();

    let count = |severity: Severity| flags.iter().filter(|f| f.severity == severity).count();
    let mut tiers = Vec::new();
    for severity in [Severity::High, Severity::Medium, Severity::Low] {
        let n = count(severity);
        if n > 0 {
            tiers.push(format!("{} {}", n, severity.label()));
        }
    }
    let detail = format!(
        "{} constraint(s) flagged ({})",
        flags.len(),
        tiers.join(", ")
    );

    Calculation::scored(100.0 - penalty, &constraints_config.labels, detail)
}

fn score_factor(factor: &FactorConfig, measure: f64, detail: String) -> Calculation {
    Calculation::scored(factor.breakpoints.lookup(measure), &factor.labels, detail)
}

fn signed_currency(amount: f64) -> String {
    if amount < 0.0 {
        format!("-${:.0}", -amount)
    } else {
        format!("+${amount:.0}")
    }
}
