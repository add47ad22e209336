use crate::scoring::{ConstraintFlag, ScoreInputs, ScoringConfig, Severity, UpliftScenario};

pub(super) fn config() -> ScoringConfig {
    ScoringConfig::default()
}

pub(super) fn priced(purchase_price: f64) -> ScoreInputs {
    ScoreInputs {
        purchase_price: Some(purchase_price),
        ..ScoreInputs::default()
    }
}

pub(super) fn uplift(conservative: f64, base: f64, upside: f64) -> Option<UpliftScenario> {
    Some(UpliftScenario {
        conservative: Some(conservative),
        base: Some(base),
        upside: Some(upside),
    })
}

pub(super) fn flags(severities: &[Severity]) -> Option<Vec<ConstraintFlag>> {
    Some(
        severities
            .iter()
            .enumerate()
            .map(|(i, severity)| ConstraintFlag::new(format!("Constraint {}", i + 1), *severity))
            .collect(),
    )
}

/// Strong, fully-populated deal apart from the asking price.
pub(super) fn strong_deal() -> ScoreInputs {
    ScoreInputs {
        yield_percent: Some(5.5),
        cash_flow_weekly: Some(150.0),
        uplift: uplift(40000.0, 80000.0, 120000.0),
        constraints: flags(&[Severity::Low]),
        ..priced(800000.0)
    }
}
