//! Entry points for report layers. Every call recomputes from its inputs; no
//! state survives between calls.

use crate::config::Config;
use crate::error::{TfResult, TitleForgeError};
use crate::fitness::FitnessScorer;
use crate::item::{Item, ScoredItem};
use crate::optimizer::mutation::MutationContext;
use crate::optimizer::{OptimizationOptions, TitleCandidate, TitleOptimizer, WalkStats};
use crate::patterns::{self, FeatureLift, PatternSet};
use crate::readability::{self, CharacterReadability, MeanDifferenceCi, ReadabilityComparison};
use crate::stats::{self, LiftResult, PopulationSummary};
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationReport {
    pub best_title: TitleCandidate,
    pub walk_path: Vec<TitleCandidate>,
    pub patterns: PatternSet,
    pub statistics: PopulationSummary,
    pub iterations: usize,
    pub steps: WalkStats,
    pub final_temperature: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub items: Vec<ScoredItem>,
    pub patterns: PatternSet,
    pub lifts: Vec<FeatureLift>,
    pub statistics: PopulationSummary,
    pub readability: ReadabilityComparison,
}

pub fn compute_z_scores(
    items: &[Item],
    as_of: DateTime<Utc>,
    config: &Config,
) -> TfResult<Vec<ScoredItem>> {
    stats::compute_z_scores(items, as_of, &config.stats)
}

pub fn learn_patterns(items: &[Item], as_of: DateTime<Utc>, config: &Config) -> TfResult<PatternSet> {
    let scored = compute_z_scores(items, as_of, config)?;
    Ok(patterns::learn_patterns(&scored, &config.stats, &config.patterns))
}

pub fn calculate_pattern_lift(with_feature: &[f64], without_feature: &[f64], config: &Config) -> LiftResult {
    stats::calculate_pattern_lift(with_feature, without_feature, config.stats.alpha)
}

pub fn character_readability(text: &str) -> CharacterReadability {
    readability::character_readability(text)
}

pub fn mean_difference_ci(a: &[f64], b: &[f64], config: &Config) -> MeanDifferenceCi {
    readability::mean_difference_ci(a, b, &config.stats)
}

fn velocity_summary(scored: &[ScoredItem]) -> TfResult<PopulationSummary> {
    let velocities: Vec<f64> = scored.iter().map(|s| s.velocity).collect();
    PopulationSummary::from_values(&velocities)
}

/// Z-scores, patterns, feature lifts and the readability comparison in one pass.
pub fn analyze(items: &[Item], as_of: DateTime<Utc>, config: &Config) -> TfResult<AnalysisReport> {
    config.validate()?;
    let scored = compute_z_scores(items, as_of, config)?;
    let patterns = patterns::learn_patterns(&scored, &config.stats, &config.patterns);
    let lifts = patterns::feature_lifts(&scored, config.stats.alpha);
    let statistics = velocity_summary(&scored)?;
    let readability = readability::compare_title_readability(&scored, &config.stats);

    Ok(AnalysisReport {
        items: scored,
        patterns,
        lifts,
        statistics,
        readability,
    })
}

/// Learns patterns from `items` and walks `starting_title` toward a higher
/// fitness. `iterations` overrides the configured budget (still capped at
/// `max_iterations`); `seed` makes the walk reproducible.
pub fn optimize_title(
    starting_title: &str,
    items: &[Item],
    iterations: Option<usize>,
    as_of: DateTime<Utc>,
    config: &Config,
    seed: Option<u64>,
) -> TfResult<OptimizationReport> {
    config.validate()?;
    if starting_title.trim().is_empty() {
        return Err(TitleForgeError::invalid("starting title is empty"));
    }

    let scored = compute_z_scores(items, as_of, config)?;
    let patterns = patterns::learn_patterns(&scored, &config.stats, &config.patterns);
    let statistics = velocity_summary(&scored)?;

    let scorer = Arc::new(FitnessScorer::new(&patterns, &config.fitness));
    let context = Arc::new(MutationContext::new(&patterns, &config.search, as_of.year()));

    let mut options = OptimizationOptions::from(config);
    if let Some(n) = iterations {
        options.iterations = n;
    }

    let result = TitleOptimizer::new(scorer, context, options).run(starting_title, seed);

    Ok(OptimizationReport {
        best_title: result.best_title,
        walk_path: result.walk_path,
        patterns,
        statistics,
        iterations: result.iterations,
        steps: result.steps,
        final_temperature: result.final_temperature,
    })
}
