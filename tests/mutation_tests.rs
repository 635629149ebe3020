use std::collections::HashSet;
use titleforge::config::SearchParams;
use titleforge::features::Feature;
use titleforge::optimizer::mutation::{generate_mutations, MutationContext, MutationKind};
use titleforge::patterns::{OutlierProfile, Pattern, PatternSet};

fn context() -> MutationContext {
    MutationContext::new(&PatternSet::default(), &SearchParams::default(), 2024)
}

fn kinds(title: &str, seed: u64) -> Vec<MutationKind> {
    let mut rng = fastrand::Rng::with_seed(seed);
    generate_mutations(&mut rng, title, &context())
        .into_iter()
        .map(|m| m.kind)
        .collect()
}

#[test]
fn test_fallback_hooks_without_patterns() {
    let ctx = context();
    assert_eq!(ctx.hook_words, vec!["Ultimate", "Secret", "Best", "Easy"]);
    assert!(ctx.top_words.is_empty());
}

#[test]
fn test_hooks_follow_positive_patterns() {
    let patterns = PatternSet {
        positive: vec![Pattern {
            feature_name: Feature::MentionsTruth,
            prevalence: 0.8,
            average_z_score: 3.0,
            sample_size: 4,
            weight: 24.0,
        }],
        negative: vec![],
        profile: OutlierProfile {
            top_words: vec!["sourdough".to_string()],
            ..Default::default()
        },
    };
    let ctx = MutationContext::new(&patterns, &SearchParams::default(), 2024);
    assert_eq!(ctx.hook_words, vec!["Truth"]);
    assert_eq!(ctx.top_words, vec!["sourdough"]);
}

#[test]
fn test_mutations_respect_window_and_are_unique() {
    let ctx = context();
    let title = "Baking Bread At Home For The First Time";
    for seed in 0..50 {
        let mut rng = fastrand::Rng::with_seed(seed);
        let muts = generate_mutations(&mut rng, title, &ctx);
        assert!(!muts.is_empty());

        let mut seen = HashSet::new();
        for m in &muts {
            let len = m.text.chars().count();
            assert!((20..=80).contains(&len), "{:?} has {} chars", m, len);
            assert_ne!(m.text, title);
            assert!(seen.insert(m.text.clone()), "duplicate {:?}", m);
        }
    }
}

#[test]
fn test_seeded_generation_is_reproducible() {
    let ctx = context();
    let title = "Baking Bread At Home For The First Time";
    let mut a = fastrand::Rng::with_seed(7);
    let mut b = fastrand::Rng::with_seed(7);
    assert_eq!(
        generate_mutations(&mut a, title, &ctx),
        generate_mutations(&mut b, title, &ctx)
    );
}

#[test]
fn test_catalogue_skips_features_already_present() {
    let k = kinds("7 Ways To Bake Bread In 2024?", 1);
    assert!(!k.contains(&MutationKind::PrependListCount));
    assert!(!k.contains(&MutationKind::AppendQuestion));
    assert!(!k.contains(&MutationKind::AppendYear));
    assert!(!k.contains(&MutationKind::ListicleFrame));
}

#[test]
fn test_plain_title_gets_the_full_catalogue() {
    let k = kinds("Baking Bread At Home For Beginners", 3);
    for expected in [
        MutationKind::PrependListCount,
        MutationKind::AppendQuestion,
        MutationKind::PrependQuestion,
        MutationKind::AppendYear,
        MutationKind::AppendHook,
        MutationKind::ListicleFrame,
    ] {
        assert!(k.contains(&expected), "missing {}", expected);
    }
    // Nothing to trim, and no outlier vocabulary to substitute
    assert!(!k.contains(&MutationKind::TrimTail));
    assert!(!k.contains(&MutationKind::SubstituteFirstWord));
}

#[test]
fn test_long_titles_get_trimmed() {
    let title = "Everything I Learned Baking Sourdough Bread Every Single Day For A Year";
    let mut rng = fastrand::Rng::with_seed(11);
    let muts = generate_mutations(&mut rng, title, &context());
    let trimmed = muts
        .iter()
        .find(|m| m.kind == MutationKind::TrimTail)
        .expect("long title should offer a trim");
    assert_eq!(
        trimmed.text,
        "Everything I Learned Baking Sourdough Bread Every Single Day For"
    );
}

#[test]
fn test_short_titles_yield_nothing_inside_window() {
    let ctx = MutationContext {
        min_chars: 70,
        max_chars: 80,
        ..context()
    };
    let mut rng = fastrand::Rng::with_seed(0);
    assert!(generate_mutations(&mut rng, "Bread", &ctx).is_empty());
}
