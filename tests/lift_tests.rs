mod common;

use common::{approx_eq, as_of, scenario_items};
use titleforge::config::StatsParams;
use titleforge::features::Feature;
use titleforge::patterns::feature_lifts;
use titleforge::stats::{calculate_pattern_lift, compute_z_scores, welch_t_test};

const ALPHA: f64 = 0.1;

#[test]
fn test_empty_without_group_is_neutral() {
    let r = calculate_pattern_lift(&[10.0, 20.0, 30.0], &[], ALPHA);
    assert_eq!(r.lift_ratio, 1.0);
    assert_eq!(r.p_value, 1.0);
    assert!(!r.significant);
    assert_eq!(r.average_with_feature, 20.0);
}

#[test]
fn test_empty_with_group_is_neutral() {
    let r = calculate_pattern_lift(&[], &[1.0, 2.0], ALPHA);
    assert_eq!(r.lift_ratio, 1.0);
    assert!(!r.significant);
}

#[test]
fn test_zero_baseline_average_is_neutral() {
    let r = calculate_pattern_lift(&[5.0, 6.0], &[0.0, 0.0, 0.0], ALPHA);
    assert_eq!(r.lift_ratio, 1.0);
    assert!(!r.significant);
}

#[test]
fn test_clear_lift_is_significant() {
    let with = [300.0, 320.0, 310.0, 295.0, 330.0, 305.0];
    let without = [100.0, 110.0, 95.0, 105.0, 98.0, 102.0, 101.0];
    let r = calculate_pattern_lift(&with, &without, ALPHA);

    assert!(r.lift_ratio > 2.9 && r.lift_ratio < 3.2, "lift {}", r.lift_ratio);
    assert!(r.p_value < 0.001, "p {}", r.p_value);
    assert!(r.significant);
    assert!(r.t_statistic > 0.0);
}

#[test]
fn test_noisy_small_groups_are_not_significant() {
    let with = [50.0, 400.0, 120.0];
    let without = [90.0, 310.0, 60.0, 200.0];
    let r = calculate_pattern_lift(&with, &without, ALPHA);
    assert!(r.lift_ratio > 1.0);
    assert!(!r.significant, "p {}", r.p_value);
}

#[test]
fn test_welch_matches_reference_values() {
    // Reference: t = -2.4554, df = 24.99, p = 0.0214
    let a = [
        27.5, 21.0, 19.0, 23.6, 17.0, 17.9, 16.9, 20.1, 21.9, 22.6, 23.1, 19.6, 19.0, 21.7, 21.4,
    ];
    let b = [
        27.1, 22.0, 20.8, 23.4, 23.4, 23.5, 25.8, 22.0, 24.8, 20.2, 21.9, 22.1, 22.9, 20.5, 24.4,
    ];
    let w = welch_t_test(&a, &b);
    assert!(approx_eq(w.t_statistic, -2.4554, 1e-3), "t {}", w.t_statistic);
    assert!(approx_eq(w.degrees_of_freedom, 24.99, 1e-2), "df {}", w.degrees_of_freedom);
    assert!(approx_eq(w.p_value, 0.0214, 1e-3), "p {}", w.p_value);
}

#[test]
fn test_welch_singleton_groups_give_p_one() {
    let w = welch_t_test(&[5.0], &[1.0, 2.0, 3.0]);
    assert_eq!(w.p_value, 1.0);
}

#[test]
fn test_welch_constant_groups() {
    assert_eq!(welch_t_test(&[4.0, 4.0], &[4.0, 4.0, 4.0]).p_value, 1.0);
    assert_eq!(welch_t_test(&[9.0, 9.0], &[4.0, 4.0, 4.0]).p_value, 0.0);
}

#[test]
fn test_feature_lifts_cover_every_flag() {
    let scored = compute_z_scores(&scenario_items(), as_of(), &StatsParams::default()).unwrap();
    let lifts = feature_lifts(&scored, ALPHA);

    assert_eq!(lifts.len(), Feature::flags().count());
    for l in &lifts {
        assert_eq!(l.with_count + l.without_count, 30);
    }

    let leading = lifts
        .iter()
        .find(|l| l.feature == Feature::StartsWithNumber)
        .unwrap();
    assert_eq!(leading.with_count, 5);
    assert!(leading.lift.lift_ratio > 15.0);
    assert!(leading.lift.significant);

    // Nobody in the sample mentions "ultimate"
    let ultimate = lifts
        .iter()
        .find(|l| l.feature == Feature::MentionsUltimate)
        .unwrap();
    assert_eq!(ultimate.with_count, 0);
    assert_eq!(ultimate.lift.lift_ratio, 1.0);
}
