use super::{MoneyRange, PropertyReport, WatchOutSeverity};
use crate::scoring::domain::{ConstraintFlag, ScoreInputs, Severity, UpliftScenario};
use tracing::debug;

type UpliftSource = fn(&PropertyReport) -> Option<Vec<MoneyRange>>;

/// Uplift sources, highest priority first.
const UPLIFT_SOURCES: [(&str, UpliftSource); 2] = [
    ("value-add strategies", strategy_ranges),
    ("development scenarios", development_ranges),
];

/// Translate an upstream report into engine inputs.
///
/// Fields missing upstream stay `None`; nothing is defaulted to zero.
pub fn map_report(report: &PropertyReport) -> ScoreInputs {
    let snapshot = report.value_snapshot.clone().unwrap_or_default();
    let rental = report.rental_position.clone().unwrap_or_default();
    let constraints = constraint_flags(report);

    ScoreInputs {
        purchase_price: snapshot.indicative_midpoint,
        asking_price: snapshot.asking_price,
        annual_rent: rental.estimated_annual_rent,
        annual_expenses: None,
        annual_debt_service: None,
        cash_flow_annual: None,
        cash_flow_weekly: rental.estimated_cash_position_weekly,
        yield_percent: rental.gross_yield_percent,
        uplift: uplift_scenario(report),
        constraints: (!constraints.is_empty()).then_some(constraints),
    }
}

fn strategy_ranges(report: &PropertyReport) -> Option<Vec<MoneyRange>> {
    let ranges: Vec<MoneyRange> = report
        .value_add_strategies
        .iter()
        .filter_map(|strategy| {
            strategy
                .estimated_uplift
                .filter(|range| !range.is_empty())
                .or(strategy.sale_profit_estimate)
        })
        .filter(|range| !range.is_empty())
        .collect();
    (!ranges.is_empty()).then_some(ranges)
}

fn development_ranges(report: &PropertyReport) -> Option<Vec<MoneyRange>> {
    let ranges: Vec<MoneyRange> = report
        .development_scenarios
        .iter()
        .filter_map(|scenario| scenario.estimated_net_profit)
        .filter(|range| !range.is_empty())
        .collect();
    (!ranges.is_empty()).then_some(ranges)
}

pub(crate) fn uplift_scenario(report: &PropertyReport) -> Option<UpliftScenario> {
    let (source, ranges) = UPLIFT_SOURCES
        .iter()
        .find_map(|(source, resolve)| resolve(report).map(|ranges| (*source, ranges)))?;

    let low = mean(ranges.iter().filter_map(|range| range.low));
    let high = mean(ranges.iter().filter_map(|range| range.high));
    let base = match (low, high) {
        (Some(low), Some(high)) => Some((low + high) / 2.0),
        (one, other) => one.or(other),
    };

    debug!(source, ranges = ranges.len(), ?base, "uplift resolved");

    Some(UpliftScenario {
        conservative: low,
        base,
        upside: high,
    })
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), value| {
        (sum + value, count + 1)
    });
    (count > 0).then(|| sum / count as f64)
}

/// Scenario constraints and risks (medium), then watch-outs by severity. No dedup.
pub(crate) fn constraint_flags(report: &PropertyReport) -> Vec<ConstraintFlag> {
    let scenario_flags = report.development_scenarios.iter().flat_map(|scenario| {
        scenario
            .key_constraints
            .iter()
            .chain(scenario.key_risks.iter())
            .map(|text| ConstraintFlag::new(text.trim(), Severity::Medium))
    });

    let watch_out_flags = report.watch_outs.iter().map(|watch_out| {
        ConstraintFlag::new(
            watch_out.title.trim(),
            watch_out_severity(watch_out.severity),
        )
    });

    scenario_flags.chain(watch_out_flags).collect()
}

fn watch_out_severity(severity: WatchOutSeverity) -> Severity {
    match severity {
        WatchOutSeverity::Critical => Severity::High,
        WatchOutSeverity::Warning | WatchOutSeverity::Unrecognized => Severity::Medium,
        WatchOutSeverity::Info => Severity::Low,
    }
}
