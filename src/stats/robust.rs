use super::moments;
use crate::config::{StatsParams, ZScoreMethod};
use crate::error::{TfResult, TitleForgeError};
use crate::item::{Item, ScoredItem, ZScoreResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Converts MAD into a stddev-comparable unit for normal data.
pub const MAD_SCALE: f64 = 0.6745;
/// Mean absolute deviation to stddev for normal data (sqrt(pi/2)).
pub const MEAN_AD_SCALE: f64 = 1.253314;

#[inline(always)]
pub fn log_transform(x: f64) -> f64 {
    x.ln_1p()
}

/// Inverse of [`log_transform`].
#[inline(always)]
pub fn exp_transform(y: f64) -> f64 {
    y.exp_m1()
}

pub fn validate_non_negative(values: &[f64]) -> TfResult<()> {
    match values.iter().position(|v| !v.is_finite() || *v < 0.0) {
        Some(idx) => Err(TitleForgeError::invalid(format!(
            "value at index {} must be a non-negative number, got {}",
            idx, values[idx]
        ))),
        None => Ok(()),
    }
}

fn validate_value(x: f64) -> TfResult<()> {
    if !x.is_finite() || x < 0.0 {
        return Err(TitleForgeError::invalid(format!(
            "value must be a non-negative number, got {}",
            x
        )));
    }
    Ok(())
}

/// Arithmetic mean. Rejects negative values; empty input gives 0.
pub fn mean(values: &[f64]) -> TfResult<f64> {
    validate_non_negative(values)?;
    Ok(moments::mean(values))
}

/// Population standard deviation. Empty, singleton and constant input give 0.
pub fn std_dev(values: &[f64]) -> TfResult<f64> {
    validate_non_negative(values)?;
    Ok(moments::std_dev(values))
}

pub fn median(values: &[f64]) -> TfResult<f64> {
    validate_non_negative(values)?;
    Ok(moments::median(values))
}

/// Median absolute deviation from the median.
pub fn mad(values: &[f64]) -> TfResult<f64> {
    validate_non_negative(values)?;
    Ok(moments::mad(values))
}

pub fn log_values(values: &[f64]) -> TfResult<Vec<f64>> {
    validate_non_negative(values)?;
    Ok(values.iter().map(|&v| log_transform(v)).collect())
}

/// Mean of `ln(x + 1)`. Stays in the log domain; see [`exp_transform`].
pub fn log_mean(values: &[f64]) -> TfResult<f64> {
    Ok(moments::mean(&log_values(values)?))
}

/// Population stddev of `ln(x + 1)`. Lower means more consistent.
pub fn log_std_dev(values: &[f64]) -> TfResult<f64> {
    Ok(moments::std_dev(&log_values(values)?))
}

/// Location and scale of a population, fitted once and reused per value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Baseline {
    pub method: ZScoreMethod,
    pub center: f64,
    pub spread: f64,
    // Divisor applied to (x - center); 0 means degenerate
    scale: f64,
}

impl Baseline {
    pub fn fit(values: &[f64], method: ZScoreMethod, floor: f64) -> TfResult<Self> {
        validate_non_negative(values)?;

        let baseline = match method {
            ZScoreMethod::Classic => {
                let center = moments::mean(values);
                let spread = moments::std_dev(values);
                Self {
                    method,
                    center,
                    spread,
                    scale: if spread < floor { 0.0 } else { spread },
                }
            }
            ZScoreMethod::LogMad => {
                let logs: Vec<f64> = values.iter().map(|&v| log_transform(v)).collect();
                let center = moments::median(&logs);
                let mad = moments::mad(&logs);
                if mad >= floor {
                    Self {
                        method,
                        center,
                        spread: mad,
                        scale: mad / MAD_SCALE,
                    }
                } else {
                    // More than half the sample sits on the median
                    let mean_ad = moments::mean_absolute_deviation(&logs, center);
                    Self {
                        method,
                        center,
                        spread: mean_ad,
                        scale: if mean_ad < floor {
                            0.0
                        } else {
                            MEAN_AD_SCALE * mean_ad
                        },
                    }
                }
            }
        };
        Ok(baseline)
    }

    pub fn is_degenerate(&self) -> bool {
        self.scale == 0.0
    }

    pub fn z(&self, x: f64) -> TfResult<f64> {
        validate_value(x)?;
        if self.is_degenerate() {
            return Ok(0.0);
        }
        let value = match self.method {
            ZScoreMethod::Classic => x,
            ZScoreMethod::LogMad => log_transform(x),
        };
        Ok((value - self.center) / self.scale)
    }
}

/// Plain `(x - mean) / stddev`; 0 when the population has no spread.
pub fn z_score(x: f64, values: &[f64], floor: f64) -> TfResult<f64> {
    Baseline::fit(values, ZScoreMethod::Classic, floor)?.z(x)
}

/// `0.6745 * (ln(x+1) - median(ln(V+1))) / MAD(ln(V+1))`.
pub fn log_modified_z_score(x: f64, values: &[f64], floor: f64) -> TfResult<f64> {
    Baseline::fit(values, ZScoreMethod::LogMad, floor)?.z(x)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NicheComparison {
    /// Log-domain z-score of the value against the niche baseline.
    pub normalized: f64,
    pub baseline_log_mean: f64,
    pub baseline_log_std_dev: f64,
    /// `expTransform(baseline_log_mean)`
    pub baseline_typical: f64,
    /// Value divided by the baseline median; 1 when the median is 0.
    pub ratio_to_median: f64,
}

/// Scores one channel's velocity against a niche-wide baseline sample.
pub fn niche_normalized_velocity(
    value: f64,
    baseline: &[f64],
    floor: f64,
) -> TfResult<NicheComparison> {
    validate_value(value)?;
    let logs = log_values(baseline)?;
    let log_mean = moments::mean(&logs);
    let log_sd = moments::std_dev(&logs);

    let normalized = if logs.is_empty() || log_sd < floor {
        0.0
    } else {
        (log_transform(value) - log_mean) / log_sd
    };

    let med = moments::median(baseline);
    let ratio_to_median = if med > 0.0 { value / med } else { 1.0 };

    Ok(NicheComparison {
        normalized,
        baseline_log_mean: log_mean,
        baseline_log_std_dev: log_sd,
        baseline_typical: exp_transform(log_mean),
        ratio_to_median,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopulationSummary {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub median: f64,
    pub mad: f64,
    pub log_mean: f64,
    pub log_std_dev: f64,
    /// Original-scale value of the log-domain mean.
    pub typical: f64,
}

impl PopulationSummary {
    pub fn from_values(values: &[f64]) -> TfResult<Self> {
        let logs = log_values(values)?;
        let log_mean = moments::mean(&logs);
        Ok(Self {
            count: values.len(),
            mean: moments::mean(values),
            std_dev: moments::std_dev(values),
            median: moments::median(values),
            mad: moments::mad(values),
            log_mean,
            log_std_dev: moments::std_dev(&logs),
            typical: exp_transform(log_mean),
        })
    }
}

/// Scores every item's velocity against the velocities of the same batch.
pub fn compute_z_scores(
    items: &[Item],
    as_of: DateTime<Utc>,
    params: &StatsParams,
) -> TfResult<Vec<ScoredItem>> {
    for item in items {
        item.validate()?;
    }

    let velocities: Vec<f64> = items.iter().map(|i| i.velocity(as_of)).collect();
    let baseline = Baseline::fit(&velocities, params.z_method, params.spread_floor)?;

    items
        .iter()
        .zip(velocities.iter())
        .map(|(item, &velocity)| {
            let z = baseline.z(velocity)?;
            Ok(ScoredItem {
                item: item.clone(),
                age_in_days: item.age_in_days(as_of),
                velocity,
                z: ZScoreResult {
                    raw_value: velocity,
                    mean: baseline.center,
                    spread: baseline.spread,
                    z_score: z,
                    is_outlier: z > params.outlier_threshold,
                    is_underperformer: z < params.underperformer_threshold,
                },
            })
        })
        .collect()
}
