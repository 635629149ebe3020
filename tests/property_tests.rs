use proptest::prelude::*;
use strum::EnumCount;
use titleforge::config::{FitnessWeights, ZScoreMethod};
use titleforge::features::{extract_features, Feature};
use titleforge::fitness::FitnessScorer;
use titleforge::patterns::PatternSet;
use titleforge::readability::character_readability;
use titleforge::stats::{
    calculate_pattern_lift, log_modified_z_score, median, std_dev, z_score, Baseline,
};

const FLOOR: f64 = 1e-9;

// --- STRATEGIES ---

// Odd lengths, so the median is a member of the sample
prop_compose! {
    fn arb_odd_sample()(values in prop::collection::vec(0.0..1e6f64, 1..40)) -> Vec<f64> {
        let mut v = values;
        if v.len() % 2 == 0 {
            v.pop();
        }
        v
    }
}

prop_compose! {
    fn arb_group()(values in prop::collection::vec(1.0..1e4f64, 2..25)) -> Vec<f64> {
        values
    }
}

proptest! {
    #[test]
    fn prop_median_scores_zero(v in arb_odd_sample()) {
        let z = log_modified_z_score(median(&v).unwrap(), &v, FLOOR).unwrap();
        prop_assert!(z.abs() < 1e-9, "z = {}", z);
    }

    #[test]
    fn prop_identical_values_never_divide_by_zero(x in 0.0..1e6f64, n in 2usize..30, other in 0.0..1e6f64) {
        let v = vec![x; n];
        prop_assert_eq!(std_dev(&v).unwrap(), 0.0);
        prop_assert_eq!(z_score(other, &v, FLOOR).unwrap(), 0.0);
        prop_assert_eq!(log_modified_z_score(other, &v, FLOOR).unwrap(), 0.0);
        for method in [ZScoreMethod::Classic, ZScoreMethod::LogMad] {
            prop_assert!(Baseline::fit(&v, method, FLOOR).unwrap().is_degenerate());
        }
    }

    #[test]
    fn prop_lift_is_scale_invariant(a in arb_group(), b in arb_group(), k in 0.01..100.0f64) {
        let base = calculate_pattern_lift(&a, &b, 0.1);
        let sa: Vec<f64> = a.iter().map(|x| x * k).collect();
        let sb: Vec<f64> = b.iter().map(|x| x * k).collect();
        let scaled = calculate_pattern_lift(&sa, &sb, 0.1);

        prop_assert!((base.lift_ratio - scaled.lift_ratio).abs() <= 1e-9 * base.lift_ratio);
        prop_assert!((base.t_statistic - scaled.t_statistic).abs() <= 1e-6 * base.t_statistic.abs().max(1.0));
        prop_assert!((base.p_value - scaled.p_value).abs() < 1e-6);
    }

    #[test]
    fn prop_lift_against_empty_is_neutral(a in prop::collection::vec(0.0..1e4f64, 0..20)) {
        let r = calculate_pattern_lift(&a, &[], 0.1);
        prop_assert_eq!(r.lift_ratio, 1.0);
        prop_assert!(!r.significant);
    }

    #[test]
    fn prop_features_total_and_deterministic(title in ".{0,120}") {
        let a = extract_features(&title);
        let b = extract_features(&title);
        prop_assert_eq!(a.len(), Feature::COUNT);
        prop_assert_eq!(&a, &b);
    }

    #[test]
    fn prop_scores_are_bounded(title in ".{0,120}") {
        let r = character_readability(&title);
        prop_assert!(r.score.is_finite() && (0.0..=100.0).contains(&r.score));

        let scorer = FitnessScorer::new(&PatternSet::default(), &FitnessWeights::default());
        let s = scorer.score(&title);
        prop_assert!((0.0..=100.0).contains(&s.total));
    }
}
