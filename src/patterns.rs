use crate::config::{PatternParams, StatsParams};
use crate::features::{extract_features, tokenize, Feature, FeatureVector};
use crate::item::ScoredItem;
use crate::stats::moments::mean;
use crate::stats::{calculate_pattern_lift, LiftResult};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "you", "your", "with", "this", "that", "are", "was", "how", "why",
    "what", "from", "into", "its", "not", "but", "all", "can", "get", "out", "our", "has",
    "have", "who", "will", "just",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pattern {
    pub feature_name: Feature,
    /// Fraction of the subset exhibiting the feature, in [0, 1].
    pub prevalence: f64,
    pub average_z_score: f64,
    pub sample_size: usize,
    /// Ranking signal only, not a probability.
    pub weight: f64,
}

/// What the outlier subset looks like, beyond feature prevalence.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlierProfile {
    pub outlier_count: usize,
    pub underperformer_count: usize,
    pub population: usize,
    pub average_z_score: f64,
    pub average_word_count: f64,
    /// Most frequent content words across outlier titles, most common first.
    pub top_words: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternSet {
    pub positive: Vec<Pattern>,
    pub negative: Vec<Pattern>,
    pub profile: OutlierProfile,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureLift {
    pub feature: Feature,
    pub with_count: usize,
    pub without_count: usize,
    pub lift: LiftResult,
}

fn extract_all(items: &[ScoredItem]) -> Vec<FeatureVector> {
    items
        .par_iter()
        .map(|i| extract_features(i.title()))
        .collect()
}

/// Sorts by weight, highest first. Stable, so ties keep vocabulary order.
fn rank(patterns: &mut [Pattern]) {
    patterns.sort_by(|a, b| b.weight.total_cmp(&a.weight));
}

/// Derives a pattern for `feature` over `subset` (indices into the population),
/// or `None` when the feature is too rare to count as a signal.
fn derive_pattern(
    feature: Feature,
    subset: &[usize],
    items: &[ScoredItem],
    features: &[FeatureVector],
    params: &PatternParams,
) -> Option<Pattern> {
    if subset.is_empty() {
        return None;
    }

    let matching: Vec<f64> = subset
        .iter()
        .filter(|&&idx| features[idx].has(feature))
        .map(|&idx| items[idx].z_score())
        .collect();

    if matching.len() < params.min_subset_occurrences || matching.is_empty() {
        return None;
    }

    let prevalence = matching.len() as f64 / subset.len() as f64;
    let average_z_score = mean(&matching);
    let weight = (prevalence * average_z_score.abs() * params.pattern_weight_scale).round();

    Some(Pattern {
        feature_name: feature,
        prevalence,
        average_z_score,
        sample_size: matching.len(),
        weight,
    })
}

fn top_words(titles: &[&str], limit: usize) -> Vec<String> {
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    let mut order = 0;
    for title in titles {
        for token in tokenize(title) {
            if token.chars().count() < 3
                || token.chars().all(|c| c.is_ascii_digit())
                || STOP_WORDS.contains(&token.as_str())
            {
                continue;
            }
            let entry = counts.entry(token).or_insert((0, order));
            entry.0 += 1;
            order += 1;
        }
    }

    let mut ranked: Vec<(String, (usize, usize))> = counts.into_iter().collect();
    // Most frequent first, then first seen
    ranked.sort_by(|a, b| b.1 .0.cmp(&a.1 .0).then(a.1 .1.cmp(&b.1 .1)));
    ranked.into_iter().take(limit).map(|(w, _)| w).collect()
}

/// Splits scored items into outliers and underperformers and derives the
/// features each group over-represents.
///
/// A pattern is only emitted when the subset holds at least
/// `min_subset_occurrences` examples of the feature and the whole population
/// holds at least `min_population_occurrences`.
pub fn learn_patterns(
    items: &[ScoredItem],
    stats: &StatsParams,
    params: &PatternParams,
) -> PatternSet {
    let features = extract_all(items);

    let outliers: Vec<usize> = (0..items.len())
        .filter(|&i| items[i].z_score() > stats.outlier_threshold)
        .collect();
    let underperformers: Vec<usize> = (0..items.len())
        .filter(|&i| items[i].z_score() < stats.underperformer_threshold)
        .collect();

    let mut positive = Vec::new();
    let mut negative = Vec::new();

    for feature in Feature::flags() {
        let population_count = features.iter().filter(|f| f.has(feature)).count();
        if population_count < params.min_population_occurrences {
            continue;
        }
        if let Some(p) = derive_pattern(feature, &outliers, items, &features, params) {
            positive.push(p);
        }
        if let Some(p) = derive_pattern(feature, &underperformers, items, &features, params) {
            negative.push(p);
        }
    }

    rank(&mut positive);
    rank(&mut negative);

    let outlier_z: Vec<f64> = outliers.iter().map(|&i| items[i].z_score()).collect();
    let outlier_words: Vec<f64> = outliers
        .iter()
        .map(|&i| features[i].word_count() as f64)
        .collect();
    let outlier_titles: Vec<&str> = outliers.iter().map(|&i| items[i].title()).collect();

    let profile = OutlierProfile {
        outlier_count: outliers.len(),
        underperformer_count: underperformers.len(),
        population: items.len(),
        average_z_score: mean(&outlier_z),
        average_word_count: mean(&outlier_words),
        top_words: top_words(&outlier_titles, params.top_word_count),
    };

    info!(
        "🧬 Learned {} positive / {} negative patterns ({} outliers, {} underperformers of {})",
        positive.len(),
        negative.len(),
        profile.outlier_count,
        profile.underperformer_count,
        profile.population
    );
    for p in &positive {
        debug!(
            "   + {} prevalence={:.2} avg_z={:.2} weight={}",
            p.feature_name, p.prevalence, p.average_z_score, p.weight
        );
    }

    PatternSet {
        positive,
        negative,
        profile,
    }
}

/// Lift of every boolean feature: velocities of items with it versus without it.
pub fn feature_lifts(items: &[ScoredItem], alpha: f64) -> Vec<FeatureLift> {
    let features = extract_all(items);

    Feature::flags()
        .map(|feature| {
            let mut with = Vec::new();
            let mut without = Vec::new();
            for (item, fv) in items.iter().zip(features.iter()) {
                if fv.has(feature) {
                    with.push(item.velocity);
                } else {
                    without.push(item.velocity);
                }
            }

            FeatureLift {
                feature,
                with_count: with.len(),
                without_count: without.len(),
                lift: calculate_pattern_lift(&with, &without, alpha),
            }
        })
        .collect()
}
