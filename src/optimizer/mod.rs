pub mod mutation;
pub mod runner;

use self::mutation::*;
use crate::config::{ProposalStrategy, SearchParams};
use crate::fitness::{FitnessScorer, ScoreBreakdown};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

pub use self::runner::{OptimizationOptions, OptimizationResult, TitleOptimizer};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleCandidate {
    pub text: String,
    pub fitness_score: f64,
    pub score_breakdown: ScoreBreakdown,
    pub confidence_percent: f64,
    pub step_index: usize,
    /// `None` for the starting title.
    pub mutation: Option<MutationKind>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Accepted,
    Rejected,
    /// No mutation survived the length filter.
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalkStats {
    pub accepted: usize,
    pub rejected: usize,
    pub skipped: usize,
}

/// One Metropolis random walk over title strings.
pub struct Walk {
    pub scorer: Arc<FitnessScorer>,
    pub context: Arc<MutationContext>,

    pub current: TitleCandidate,
    pub best: TitleCandidate,
    /// Accepted states in order, starting with the initial title.
    pub path: Vec<TitleCandidate>,

    pub temperature: f64,
    pub cooling_rate: f64,
    pub proposal: ProposalStrategy,
    pub stats: WalkStats,

    pub rng: fastrand::Rng,
}

impl Walk {
    pub fn new(
        scorer: Arc<FitnessScorer>,
        context: Arc<MutationContext>,
        start: &str,
        params: &SearchParams,
        rng: fastrand::Rng,
    ) -> Self {
        let initial = candidate(&scorer, start.trim().to_string(), 0, None);

        Walk {
            scorer,
            context,
            current: initial.clone(),
            best: initial.clone(),
            path: vec![initial],
            temperature: params.temperature,
            cooling_rate: params.cooling_rate,
            proposal: params.proposal,
            stats: WalkStats::default(),
            rng,
        }
    }

    fn propose(&mut self, mutations: Vec<Mutation>, step_index: usize) -> Option<TitleCandidate> {
        match self.proposal {
            ProposalStrategy::Best => {
                let mut best: Option<TitleCandidate> = None;
                for m in mutations {
                    let c = candidate(&self.scorer, m.text, step_index, Some(m.kind));
                    // Strict comparison keeps the first of equal scores
                    if best
                        .as_ref()
                        .map_or(true, |b| c.fitness_score > b.fitness_score)
                    {
                        best = Some(c);
                    }
                }
                best
            }
            ProposalStrategy::Sample => {
                if mutations.is_empty() {
                    return None;
                }
                let idx = self.rng.usize(0..mutations.len());
                let m = &mutations[idx];
                Some(candidate(&self.scorer, m.text.clone(), step_index, Some(m.kind)))
            }
        }
    }

    pub fn step(&mut self, step_index: usize) -> StepOutcome {
        let mutations = generate_mutations(&mut self.rng, &self.current.text, &self.context);
        if mutations.is_empty() {
            self.stats.skipped += 1;
            self.cool();
            return StepOutcome::Skipped;
        }

        let Some(proposal) = self.propose(mutations, step_index) else {
            self.stats.skipped += 1;
            self.cool();
            return StepOutcome::Skipped;
        };

        let delta = proposal.fitness_score - self.current.fitness_score;

        // Metropolis Criterion
        let accept = delta > 0.0 || self.rng.f64() < (delta / self.temperature).exp();

        let outcome = if accept {
            debug!(
                "   step {:>2} ✅ {:+.1} -> {:.1} '{}'",
                step_index, delta, proposal.fitness_score, proposal.text
            );
            if proposal.fitness_score > self.best.fitness_score {
                self.best = proposal.clone();
            }
            self.current = proposal.clone();
            self.path.push(proposal);
            self.stats.accepted += 1;
            StepOutcome::Accepted
        } else {
            debug!(
                "   step {:>2} ❌ {:+.1} '{}'",
                step_index, delta, proposal.text
            );
            self.stats.rejected += 1;
            StepOutcome::Rejected
        };

        self.cool();
        outcome
    }

    pub fn run(&mut self, iterations: usize) -> WalkStats {
        for i in 1..=iterations {
            self.step(i);
        }
        self.stats
    }

    fn cool(&mut self) {
        self.temperature *= self.cooling_rate;
    }
}

fn candidate(
    scorer: &FitnessScorer,
    text: String,
    step_index: usize,
    mutation: Option<MutationKind>,
) -> TitleCandidate {
    let score = scorer.score(&text);
    TitleCandidate {
        text,
        fitness_score: score.total,
        score_breakdown: score.breakdown,
        confidence_percent: score.confidence_percent,
        step_index,
        mutation,
    }
}
