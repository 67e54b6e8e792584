//! Benchmarks for cocina aggregation hot paths.
//!
//! Run with: cargo bench
//!
//! Results include 95% confidence intervals via Criterion.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use cocina::core::aggregate;
use cocina::core::table::Table;

fn ingredients_table(rows: usize) -> Table {
    let vocab = ["onion", "garlic", "salt", "oil", "turmeric", "ginger"];
    Table {
        name: "ingredients".to_string(),
        headers: vec!["recipe_id".to_string(), "name".to_string()],
        rows: (0..rows)
            .map(|i| {
                vec![
                    format!("recipe_{}", i % 50),
                    vocab[i % vocab.len()].to_string(),
                ]
            })
            .collect(),
    }
}

fn interactions_table(rows: usize) -> Table {
    Table {
        name: "interactions".to_string(),
        headers: vec!["recipe_id".to_string(), "type".to_string()],
        rows: (0..rows)
            .map(|i| {
                let kind = if i % 3 == 0 { "like" } else { "view" };
                vec![format!("recipe_{}", i % 50), kind.to_string()]
            })
            .collect(),
    }
}

fn recipes_table(rows: usize) -> Table {
    Table {
        name: "recipe".to_string(),
        headers: vec!["recipe_id".to_string(), "prep_time_min".to_string()],
        rows: (0..rows)
            .map(|i| vec![format!("recipe_{}", i), (5 + i % 55).to_string()])
            .collect(),
    }
}

fn bench_top_ingredients(c: &mut Criterion) {
    let mut group = c.benchmark_group("top_ingredients");
    for size in [100, 1_000, 10_000] {
        let table = ingredients_table(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &table, |b, table| {
            b.iter(|| {
                let ranked = aggregate::top_ingredients(black_box(table), 20).unwrap();
                black_box(ranked);
            });
        });
    }
    group.finish();
}

fn bench_prep_vs_likes(c: &mut Criterion) {
    let mut group = c.benchmark_group("prep_vs_likes");
    for size in [100, 1_000, 10_000] {
        let recipes = recipes_table(50);
        let interactions = interactions_table(size);
        group.bench_with_input(
            BenchmarkId::from_parameter(size),
            &(recipes, interactions),
            |b, (recipes, interactions)| {
                b.iter(|| {
                    let points =
                        aggregate::prep_vs_likes(black_box(recipes), black_box(interactions))
                            .unwrap();
                    black_box(points);
                });
            },
        );
    }
    group.finish();
}

fn bench_histogram(c: &mut Criterion) {
    let mut group = c.benchmark_group("histogram");
    for size in [100, 10_000] {
        let values: Vec<f64> = (0..size).map(|i| (i % 60) as f64).collect();
        group.bench_with_input(BenchmarkId::from_parameter(size), &values, |b, values| {
            b.iter(|| {
                let bins = aggregate::histogram(black_box(values), 10);
                black_box(bins);
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_top_ingredients,
    bench_prep_vs_likes,
    bench_histogram
);
criterion_main!(benches);
