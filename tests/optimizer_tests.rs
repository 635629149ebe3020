mod common;

use common::{as_of, scenario_items};
use std::sync::Arc;
use titleforge::api::optimize_title;
use titleforge::config::{Config, ProposalStrategy, SearchParams};
use titleforge::fitness::FitnessScorer;
use titleforge::optimizer::mutation::MutationContext;
use titleforge::optimizer::{StepOutcome, Walk};
use titleforge::patterns::PatternSet;
use titleforge::TitleForgeError;

const START: &str = "Baking Sourdough Bread At Home";

#[test]
fn test_zero_iterations_returns_start() {
    let report =
        optimize_title(START, &scenario_items(), Some(0), as_of(), &Config::default(), Some(1))
            .unwrap();

    assert_eq!(report.iterations, 0);
    assert_eq!(report.best_title.text, START);
    assert_eq!(report.best_title.step_index, 0);
    assert!(report.best_title.mutation.is_none());
    assert_eq!(report.walk_path.len(), 1);
    assert_eq!(report.walk_path[0], report.best_title);
    assert_eq!(report.steps.accepted + report.steps.rejected + report.steps.skipped, 0);
}

#[test]
fn test_same_seed_same_walk() {
    let items = scenario_items();
    let config = Config::default();
    let a = optimize_title(START, &items, Some(25), as_of(), &config, Some(42)).unwrap();
    let b = optimize_title(START, &items, Some(25), as_of(), &config, Some(42)).unwrap();

    assert_eq!(a.walk_path, b.walk_path);
    assert_eq!(a.best_title, b.best_title);
    assert_eq!(a.steps, b.steps);
}

#[test]
fn test_same_seed_same_walk_with_replicas() {
    let items = scenario_items();
    let mut config = Config::default();
    config.search.replicas = 4;
    config.search.proposal = ProposalStrategy::Sample;

    let a = optimize_title(START, &items, None, as_of(), &config, Some(9)).unwrap();
    let b = optimize_title(START, &items, None, as_of(), &config, Some(9)).unwrap();
    assert_eq!(a.walk_path, b.walk_path);
    assert_eq!(a.best_title, b.best_title);
}

#[test]
fn test_iterations_are_capped() {
    let report =
        optimize_title(START, &scenario_items(), Some(500), as_of(), &Config::default(), Some(3))
            .unwrap();
    assert_eq!(report.iterations, 50);
    assert_eq!(
        report.steps.accepted + report.steps.rejected + report.steps.skipped,
        50
    );
}

#[test]
fn test_walk_finds_better_title_and_reports_it() {
    let report =
        optimize_title(START, &scenario_items(), None, as_of(), &Config::default(), Some(5))
            .unwrap();

    let start_score = report
        .walk_path
        .iter()
        .find(|c| c.text == START)
        .map(|c| c.fitness_score);
    assert!(report.best_title.fitness_score >= start_score.unwrap_or(0.0));
    // A leading digit alone is worth the capped pattern match
    assert!(report.best_title.fitness_score > 40.0, "{:?}", report.best_title);
    assert_eq!(report.walk_path[0], report.best_title);
    assert!(!report.patterns.positive.is_empty());
    assert_eq!(report.statistics.count, 30);
}

#[test]
fn test_walk_path_is_ranked_unique_and_in_window() {
    let report =
        optimize_title(START, &scenario_items(), Some(40), as_of(), &Config::default(), Some(8))
            .unwrap();

    assert!(report.walk_path.len() <= 10);
    for pair in report.walk_path.windows(2) {
        assert!(pair[0].fitness_score >= pair[1].fitness_score);
        assert_ne!(pair[0].text, pair[1].text);
    }
    for c in report.walk_path.iter().filter(|c| c.mutation.is_some()) {
        let len = c.text.chars().count();
        assert!((20..=80).contains(&len), "'{}' has {} chars", c.text, len);
        assert!(c.step_index >= 1);
    }
}

#[test]
fn test_empty_title_is_rejected() {
    let err = optimize_title("  ", &scenario_items(), None, as_of(), &Config::default(), None)
        .unwrap_err();
    assert!(matches!(err, TitleForgeError::InvalidInput(_)));
}

#[test]
fn test_invalid_config_is_rejected() {
    let mut config = Config::default();
    config.search.temperature = 0.0;
    let err = optimize_title(START, &scenario_items(), None, as_of(), &config, None).unwrap_err();
    assert!(matches!(err, TitleForgeError::Config(_)));
}

// --- WALK INTERNALS ---

fn bare_walk(start: &str, params: &SearchParams, seed: u64) -> Walk {
    let patterns = PatternSet::default();
    let scorer = Arc::new(FitnessScorer::new(&patterns, &Default::default()));
    let ctx = Arc::new(MutationContext::new(&patterns, params, 2024));
    Walk::new(scorer, ctx, start, params, fastrand::Rng::with_seed(seed))
}

#[test]
fn test_step_without_mutations_is_skipped() {
    let params = SearchParams {
        min_title_chars: 79,
        max_title_chars: 80,
        ..Default::default()
    };
    let mut walk = bare_walk("Short Title", &params, 0);
    assert_eq!(walk.step(1), StepOutcome::Skipped);
    assert_eq!(walk.path.len(), 1);
    assert_eq!(walk.current.text, "Short Title");
    assert_eq!(walk.stats.skipped, 1);
}

#[test]
fn test_best_never_drops_below_current_history() {
    let params = SearchParams {
        proposal: ProposalStrategy::Sample,
        temperature: 50.0,
        ..Default::default()
    };
    let mut walk = bare_walk(START, &params, 21);
    walk.run(50);

    let best_on_path = walk
        .path
        .iter()
        .map(|c| c.fitness_score)
        .fold(f64::MIN, f64::max);
    assert_eq!(walk.best.fitness_score, best_on_path);
    assert_eq!(walk.path.len(), walk.stats.accepted + 1);
}

#[test]
fn test_cooling_lowers_temperature() {
    let params = SearchParams {
        cooling_rate: 0.9,
        ..Default::default()
    };
    let mut walk = bare_walk(START, &params, 2);
    walk.run(10);
    let expected = 0.3 * 0.9f64.powi(10);
    assert!((walk.temperature - expected).abs() < 1e-12);
}

#[test]
fn test_fixed_temperature_by_default() {
    let mut walk = bare_walk(START, &SearchParams::default(), 2);
    walk.run(10);
    assert_eq!(walk.temperature, 0.3);
}
