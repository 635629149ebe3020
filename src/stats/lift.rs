//! Lift and significance between items that show a feature and items that don't.
//!
//! Uses Welch's t-test (unequal variances) via `statrs`. Per-pattern groups are
//! usually small (5-20 items), so a raw percentage difference is not trusted
//! on its own.

use super::moments::{mean, sample_variance};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiftResult {
    pub average_with_feature: f64,
    pub average_without_feature: f64,
    pub lift_ratio: f64,
    pub t_statistic: f64,
    pub degrees_of_freedom: f64,
    pub p_value: f64,
    pub significant: bool,
}

impl LiftResult {
    /// "No signal": lift 1, p-value 1.
    pub fn neutral(average_with_feature: f64, average_without_feature: f64) -> Self {
        Self {
            average_with_feature,
            average_without_feature,
            lift_ratio: 1.0,
            t_statistic: 0.0,
            degrees_of_freedom: 0.0,
            p_value: 1.0,
            significant: false,
        }
    }
}

/// Welch t-test result for two independent samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WelchTest {
    pub t_statistic: f64,
    pub degrees_of_freedom: f64,
    /// Two-sided.
    pub p_value: f64,
}

/// Two-sided Welch's t-test. Groups with fewer than two values give p = 1.
pub fn welch_t_test(a: &[f64], b: &[f64]) -> WelchTest {
    let insufficient = WelchTest {
        t_statistic: 0.0,
        degrees_of_freedom: 0.0,
        p_value: 1.0,
    };
    if a.len() < 2 || b.len() < 2 {
        return insufficient;
    }

    let (na, nb) = (a.len() as f64, b.len() as f64);
    let (va, vb) = (sample_variance(a) / na, sample_variance(b) / nb);
    let diff = mean(a) - mean(b);
    let se = (va + vb).sqrt();

    if !se.is_finite() || se == 0.0 || se <= f64::EPSILON * diff.abs() {
        // Both groups are constant: either identical or perfectly separated
        return WelchTest {
            t_statistic: 0.0,
            degrees_of_freedom: na + nb - 2.0,
            p_value: if diff == 0.0 { 1.0 } else { 0.0 },
        };
    }

    let t = diff / se;
    let df = (va + vb).powi(2) / (va.powi(2) / (na - 1.0) + vb.powi(2) / (nb - 1.0));

    let p_value = match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => (2.0 * (1.0 - dist.cdf(t.abs()))).clamp(0.0, 1.0),
        Err(_) => 1.0,
    };

    WelchTest {
        t_statistic: t,
        degrees_of_freedom: df,
        p_value,
    }
}

/// Compares outcomes of items with a feature against items without it.
///
/// Either group empty, or a zero "without" average, yields the neutral result
/// (`lift_ratio = 1`, `significant = false`) instead of an error.
pub fn calculate_pattern_lift(with_feature: &[f64], without_feature: &[f64], alpha: f64) -> LiftResult {
    let avg_with = mean(with_feature);
    let avg_without = mean(without_feature);

    if with_feature.is_empty() || without_feature.is_empty() || avg_without == 0.0 {
        return LiftResult::neutral(avg_with, avg_without);
    }

    let test = welch_t_test(with_feature, without_feature);

    LiftResult {
        average_with_feature: avg_with,
        average_without_feature: avg_without,
        lift_ratio: avg_with / avg_without,
        t_statistic: test.t_statistic,
        degrees_of_freedom: test.degrees_of_freedom,
        p_value: test.p_value,
        significant: test.p_value < alpha,
    }
}
