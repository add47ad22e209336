use super::common::*;
use crate::scoring::confidence::{assess, coverage};
use crate::scoring::drivers::rank;
use crate::scoring::{
    ConfidenceConfig, ConfidenceLabel, DealScorer, ScoreInputs, ScoreRange, ScoreRequest,
    Severity, SubScore, SubScoreName, WeightTable,
};
use crate::report::{PropertyReport, RentalPosition, ValueSnapshot};

fn sub(name: SubScoreName, score: u8, available: bool) -> SubScore {
    SubScore {
        name,
        score,
        label: String::new(),
        detail: String::new(),
        available,
        weight: 0.2,
    }
}

#[test]
fn strong_deal_scores_weighted_sum() {
    let result = DealScorer::new(config()).score(&strong_deal());

    // 60*0.2 + 88*0.2 + 80*0.3 + 70*0.2 + 94*0.1
    assert_eq!(result.score, 77);
    assert_eq!(result.confidence_label, ConfidenceLabel::High);
    assert!(result.score_range.is_none());

    let scores: Vec<(SubScoreName, u8)> =
        result.subs.iter().map(|sub| (sub.name, sub.score)).collect();
    assert_eq!(
        scores,
        vec![
            (SubScoreName::Value, 60),
            (SubScoreName::Yield, 88),
            (SubScoreName::CashFlow, 80),
            (SubScoreName::Uplift, 70),
            (SubScoreName::Constraints, 94),
        ]
    );
}

#[test]
fn sub_scores_carry_applied_weights() {
    let result = DealScorer::new(config()).score(&strong_deal());
    let weights: Vec<f64> = result.subs.iter().map(|sub| sub.weight).collect();
    assert_eq!(weights, vec![0.20, 0.20, 0.30, 0.20, 0.10]);
}

#[test]
fn four_factor_weights_ignore_value() {
    let mut four_factor = config();
    four_factor.weights = WeightTable::without_value();
    let scorer = DealScorer::new(four_factor);

    let mut cheap = strong_deal();
    cheap.asking_price = Some(600_000.0);
    let mut overpriced = strong_deal();
    overpriced.asking_price = Some(1_200_000.0);

    assert_eq!(scorer.score(&cheap).score, scorer.score(&overpriced).score);
}

#[test]
fn four_factor_confidence_ignores_unweighted_value() {
    let inputs = ScoreInputs {
        asking_price: Some(520_000.0),
        yield_percent: Some(5.5),
        ..priced(500_000.0)
    };

    let five_factor = DealScorer::new(config()).score(&inputs);
    assert!((five_factor.confidence - 0.4).abs() < 1e-9);

    let mut four_factor_config = config();
    four_factor_config.weights = WeightTable::without_value();
    let four_factor = DealScorer::new(four_factor_config).score(&inputs);

    assert!((four_factor.confidence - 0.25).abs() < 1e-9);
    assert_eq!(four_factor.confidence_label, ConfidenceLabel::Low);
    let value = four_factor.sub(SubScoreName::Value).expect("value still reported");
    assert!(value.available);
    assert_eq!(value.weight, 0.0);
    assert!(four_factor
        .drivers
        .positive
        .iter()
        .chain(four_factor.drivers.negative.iter())
        .all(|driver| driver.name != SubScoreName::Value));
}

#[test]
fn zero_weight_sub_scores_are_not_counted() {
    let mut subs: Vec<SubScore> = SubScoreName::ALL
        .iter()
        .map(|name| sub(*name, 50, false))
        .collect();
    subs[0].available = true;
    subs[0].weight = 0.0;
    subs[0].score = 100;

    assert_eq!(coverage(&subs), 0.0);
    let drivers = rank(&subs);
    assert!(drivers.positive.iter().all(|s| s.name != SubScoreName::Value));
    assert_eq!(drivers.positive.len(), 2);
}

#[test]
fn non_finite_inputs_are_treated_as_missing() {
    let inputs = ScoreInputs {
        yield_percent: Some(f64::NAN),
        cash_flow_weekly: Some(f64::INFINITY),
        ..priced(500_000.0)
    };
    let scorer = DealScorer::new(config());
    assert_eq!(scorer.score(&inputs), scorer.score(&priced(500_000.0)));
}

#[test]
fn coverage_is_share_of_available_sub_scores() {
    let subs: Vec<SubScore> = SubScoreName::ALL
        .iter()
        .enumerate()
        .map(|(i, name)| sub(*name, 50, i < 3))
        .collect();
    assert!((coverage(&subs) - 0.6).abs() < 1e-9);
    assert_eq!(coverage(&[]), 0.0);
}

#[test]
fn medium_confidence_emits_range() {
    let subs: Vec<SubScore> = SubScoreName::ALL
        .iter()
        .enumerate()
        .map(|(i, name)| sub(*name, 50, i < 3))
        .collect();

    let assessment = assess(70, &subs, &ConfidenceConfig::default());
    assert_eq!(assessment.label, ConfidenceLabel::Medium);
    // spread = round((0.75 - 0.6) * 20) = 3
    assert_eq!(assessment.range, Some(ScoreRange { low: 67, high: 73 }));
}

#[test]
fn range_is_clamped_to_score_bounds() {
    let subs: Vec<SubScore> = SubScoreName::ALL
        .iter()
        .map(|name| sub(*name, 50, false))
        .collect();

    let low = assess(5, &subs, &ConfidenceConfig::default());
    assert_eq!(low.label, ConfidenceLabel::Low);
    assert_eq!(low.range, Some(ScoreRange { low: 0, high: 20 }));

    let high = assess(95, &subs, &ConfidenceConfig::default());
    assert_eq!(high.range, Some(ScoreRange { low: 80, high: 100 }));
}

#[test]
fn full_coverage_has_no_range() {
    let subs: Vec<SubScore> = SubScoreName::ALL
        .iter()
        .map(|name| sub(*name, 50, true))
        .collect();
    let assessment = assess(50, &subs, &ConfidenceConfig::default());
    assert_eq!(assessment.confidence, 1.0);
    assert_eq!(assessment.label, ConfidenceLabel::High);
    assert_eq!(assessment.range, None);
}

#[test]
fn drivers_keep_canonical_order_on_ties() {
    let subs = vec![
        sub(SubScoreName::Value, 60, false),
        sub(SubScoreName::Yield, 55, true),
        sub(SubScoreName::CashFlow, 20, true),
        sub(SubScoreName::Uplift, 45, true),
        sub(SubScoreName::Constraints, 60, false),
    ];

    let drivers = rank(&subs);
    let positive: Vec<SubScoreName> = drivers.positive.iter().map(|s| s.name).collect();
    let negative: Vec<SubScoreName> = drivers.negative.iter().map(|s| s.name).collect();

    assert_eq!(positive, vec![SubScoreName::Value, SubScoreName::Constraints]);
    assert_eq!(negative, vec![SubScoreName::CashFlow, SubScoreName::Uplift]);
}

#[test]
fn drivers_handle_short_lists() {
    let drivers = rank(&[sub(SubScoreName::Yield, 40, true)]);
    assert_eq!(drivers.positive.len(), 1);
    assert_eq!(drivers.negative.len(), 1);
    assert!(rank(&[]).positive.is_empty());
}

#[test]
fn score_request_dispatches_reports_through_mapper() {
    let report = PropertyReport {
        value_snapshot: Some(ValueSnapshot {
            indicative_midpoint: Some(800_000.0),
            asking_price: None,
        }),
        rental_position: Some(RentalPosition {
            gross_yield_percent: Some(5.5),
            estimated_annual_rent: None,
            estimated_cash_position_weekly: Some(150.0),
        }),
        ..PropertyReport::default()
    };
    let inputs = ScoreInputs {
        yield_percent: Some(5.5),
        cash_flow_weekly: Some(150.0),
        ..priced(800_000.0)
    };

    let scorer = DealScorer::new(config());
    assert_eq!(
        scorer.score_request(&ScoreRequest::Report(report)),
        scorer.score_request(&ScoreRequest::Inputs(inputs))
    );
}

#[test]
fn summary_names_drivers_and_range() {
    let inputs = ScoreInputs {
        constraints: flags(&[Severity::High, Severity::High, Severity::High]),
        ..priced(500_000.0)
    };
    let result = DealScorer::new(config()).score(&inputs);

    let summary = result.summary();
    assert!(summary.starts_with(&format!("{}/100 (Low confidence, ", result.score)));
    assert!(summary.ends_with("weakest constraints, uplift"));
}
