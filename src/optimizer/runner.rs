use crate::config::{Config, SearchParams};
use crate::fitness::FitnessScorer;
use crate::optimizer::mutation::MutationContext;
use crate::optimizer::{TitleCandidate, Walk, WalkStats};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

pub struct OptimizationOptions {
    pub iterations: usize,
    pub replicas: usize,
    pub top_n: usize,
    pub search: SearchParams,
}

impl From<&Config> for OptimizationOptions {
    fn from(cfg: &Config) -> Self {
        Self {
            iterations: cfg.search.iterations,
            replicas: cfg.search.replicas.max(1),
            top_n: cfg.search.top_n,
            search: cfg.search.clone(),
        }
    }
}

impl OptimizationOptions {
    /// Requested iterations, capped at `max_iterations`.
    pub fn effective_iterations(&self) -> usize {
        if self.iterations > self.search.max_iterations {
            warn!(
                "⚠️  {} iterations requested, capping at {}",
                self.iterations, self.search.max_iterations
            );
            self.search.max_iterations
        } else {
            self.iterations
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationResult {
    pub best_title: TitleCandidate,
    /// Accepted candidates, unique by text, best first, at most `top_n`.
    pub walk_path: Vec<TitleCandidate>,
    pub iterations: usize,
    pub steps: WalkStats,
    pub final_temperature: f64,
}

pub struct TitleOptimizer {
    scorer: Arc<FitnessScorer>,
    context: Arc<MutationContext>,
    options: OptimizationOptions,
}

impl TitleOptimizer {
    pub fn new(
        scorer: Arc<FitnessScorer>,
        context: Arc<MutationContext>,
        options: OptimizationOptions,
    ) -> Self {
        Self {
            scorer,
            context,
            options,
        }
    }

    /// Runs every replica for the full iteration budget and merges them. With a
    /// seed, replica `i` uses `seed + i` and the result is reproducible.
    pub fn run(&self, start: &str, seed: Option<u64>) -> OptimizationResult {
        let opts = &self.options;
        let iterations = opts.effective_iterations();

        // 1. Initialize Walks
        let mut walks: Vec<Walk> = (0..opts.replicas.max(1))
            .map(|i| {
                let rng = match seed {
                    Some(s) => fastrand::Rng::with_seed(s.wrapping_add(i as u64)),
                    None => fastrand::Rng::new(),
                };
                Walk::new(
                    self.scorer.clone(),
                    self.context.clone(),
                    start,
                    &opts.search,
                    rng,
                )
            })
            .collect();

        info!(
            "🔥 Walking {} replica(s) for {} iterations at T={}",
            walks.len(),
            iterations,
            opts.search.temperature
        );

        // 2. Evolve in Parallel
        walks.par_iter_mut().for_each(|w| {
            w.run(iterations);
        });

        // 3. Merge (replica order, so ties resolve to the lowest index)
        let mut best = walks[0].best.clone();
        let mut steps = WalkStats::default();
        for w in &walks {
            if w.best.fitness_score > best.fitness_score {
                best = w.best.clone();
            }
            steps.accepted += w.stats.accepted;
            steps.rejected += w.stats.rejected;
            steps.skipped += w.stats.skipped;
        }

        let walk_path = rank_path(walks.iter().flat_map(|w| w.path.iter()), opts.top_n);
        let final_temperature = walks[0].temperature;

        info!(
            "🏆 Best: {:.1} '{}' ({} accepted, {} rejected, {} skipped)",
            best.fitness_score, best.text, steps.accepted, steps.rejected, steps.skipped
        );

        OptimizationResult {
            best_title: best,
            walk_path,
            iterations,
            steps,
            final_temperature,
        }
    }
}

/// Dedupes by text (keeping the higher score, then the earlier entry) and
/// sorts by score, highest first.
fn rank_path<'a>(
    path: impl Iterator<Item = &'a TitleCandidate>,
    top_n: usize,
) -> Vec<TitleCandidate> {
    let mut unique: Vec<TitleCandidate> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for c in path {
        match index.get(&c.text) {
            Some(&i) => {
                if c.fitness_score > unique[i].fitness_score {
                    unique[i] = c.clone();
                }
            }
            None => {
                index.insert(c.text.clone(), unique.len());
                unique.push(c.clone());
            }
        }
    }

    unique.sort_by(|a, b| b.fitness_score.total_cmp(&a.fitness_score));
    unique.truncate(top_n.max(1));
    unique
}
