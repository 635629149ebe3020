pub mod loader;

use crate::error::{TfResult, TitleForgeError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// One fetched video: a title, its view count and when it was published.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub title: String,
    #[serde(alias = "views")]
    pub metric_value: f64,
    #[serde(alias = "published_at", alias = "publishedAt")]
    pub timestamp_created: DateTime<Utc>,
}

impl Item {
    pub fn new(
        title: impl Into<String>,
        metric_value: f64,
        timestamp_created: DateTime<Utc>,
    ) -> TfResult<Self> {
        let item = Self {
            title: title.into(),
            metric_value,
            timestamp_created,
        };
        item.validate()?;
        Ok(item)
    }

    /// Parses an RFC 3339 timestamp, rejecting anything malformed.
    pub fn from_rfc3339(title: impl Into<String>, metric_value: f64, timestamp: &str) -> TfResult<Self> {
        let ts = DateTime::parse_from_rfc3339(timestamp.trim())
            .map_err(|e| {
                TitleForgeError::invalid(format!("malformed timestamp '{}': {}", timestamp, e))
            })?
            .with_timezone(&Utc);
        Self::new(title, metric_value, ts)
    }

    pub fn validate(&self) -> TfResult<()> {
        if !self.metric_value.is_finite() || self.metric_value < 0.0 {
            return Err(TitleForgeError::invalid(format!(
                "metric value for '{}' must be a non-negative number, got {}",
                self.title, self.metric_value
            )));
        }
        Ok(())
    }

    /// Days between publication and `as_of`. Future timestamps count as age 0.
    pub fn age_in_days(&self, as_of: DateTime<Utc>) -> f64 {
        let secs = (as_of - self.timestamp_created).num_seconds() as f64;
        (secs / SECONDS_PER_DAY).max(0.0)
    }

    pub fn velocity(&self, as_of: DateTime<Utc>) -> f64 {
        self.metric_value / self.age_in_days(as_of).max(1.0)
    }
}

/// Outcome of scoring one value against its population.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZScoreResult {
    pub raw_value: f64,
    /// Population centre: the mean (classic) or the log-domain median (MAD).
    pub mean: f64,
    /// Population spread: the stddev (classic) or the log-domain MAD.
    pub spread: f64,
    pub z_score: f64,
    pub is_outlier: bool,
    pub is_underperformer: bool,
}

/// An [`Item`] annotated with the fields derived for one analysis call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredItem {
    pub item: Item,
    pub age_in_days: f64,
    pub velocity: f64,
    pub z: ZScoreResult,
}

impl ScoredItem {
    pub fn title(&self) -> &str {
        &self.item.title
    }

    pub fn z_score(&self) -> f64 {
        self.z.z_score
    }

    pub fn is_outlier(&self) -> bool {
        self.z.is_outlier
    }

    pub fn is_underperformer(&self) -> bool {
        self.z.is_underperformer
    }
}
