use chrono::{Duration, TimeZone, Utc};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use std::sync::Arc;
use titleforge::api;
use titleforge::config::Config;
use titleforge::features::extract_features;
use titleforge::fitness::FitnessScorer;
use titleforge::item::Item;
use titleforge::optimizer::mutation::MutationContext;
use titleforge::optimizer::{OptimizationOptions, TitleOptimizer};

fn setup_items() -> Vec<Item> {
    let as_of = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    (0..200)
        .map(|i| {
            let title = if i % 10 == 0 {
                format!("{} Ways To Bake Better Bread (Tested)", 3 + i % 7)
            } else {
                format!("Baking Day {} With My Sourdough Starter", i)
            };
            let views = if i % 10 == 0 { 50_000.0 } else { 1_000.0 + i as f64 };
            Item::new(title, views, as_of - Duration::days(5 + i % 30)).unwrap()
        })
        .collect()
}

fn criterion_benchmark(c: &mut Criterion) {
    let as_of = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    let items = setup_items();
    let config = Config::default();
    let patterns = api::learn_patterns(&items, as_of, &config).unwrap();
    let scorer = Arc::new(FitnessScorer::new(&patterns, &config.fitness));
    let context = Arc::new(MutationContext::new(&patterns, &config.search, 2024));

    let title = "The Secret To Crispy Crust: 5 Mistakes To Avoid In 2024?";

    c.bench_function("extract_features", |b| {
        b.iter(|| extract_features(black_box(title)))
    });

    c.bench_function("score_title", |b| b.iter(|| scorer.score(black_box(title))));

    c.bench_function("learn_patterns (200 items)", |b| {
        b.iter(|| api::learn_patterns(black_box(&items), as_of, &config))
    });

    c.bench_function("optimize (50 steps)", |b| {
        b.iter(|| {
            let mut options = OptimizationOptions::from(&config);
            options.iterations = 50;
            TitleOptimizer::new(scorer.clone(), context.clone(), options)
                .run(black_box("Baking Sourdough Bread At Home"), Some(7))
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
