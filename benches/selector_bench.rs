use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use std::sync::Arc;

use platepix::{Catalog, MealRef, RawImageRecord, Selector, SelectorConfig};

fn synthetic_catalog(size: usize, dims: usize) -> Arc<Catalog> {
    let records = (0..size)
        .map(|i| {
            // Deterministic spread of unit-ish vectors across the space.
            let embedding: Vec<f32> = (0..dims)
                .map(|d| ((i * 31 + d * 17) % 97) as f32 / 97.0 - 0.5)
                .collect();
            RawImageRecord {
                name: format!("Catalog Dish {i}"),
                url: format!("https://cdn.example.com/dish-{i}.jpg"),
                description: String::new(),
                embedding,
                is_vegetarian: Some(i % 3 != 0),
            }
        })
        .collect();
    Arc::new(Catalog::resolve(records))
}

fn bench_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("selector");

    for &size in &[100usize, 1_000, 5_000] {
        let catalog = synthetic_catalog(size, 384);
        let selector = Selector::new(Arc::clone(&catalog), SelectorConfig::default()).unwrap();
        let meal_ref = MealRef {
            id: "bench".into(),
            name: "Paneer Tikka Masala".into(),
        };
        let embedding: Vec<f32> = (0..384).map(|d| (d % 13) as f32 / 13.0 - 0.5).collect();

        group.bench_function(format!("select_{size}_images"), |b| {
            b.iter_batched(
                || embedding.clone(),
                |emb| selector.select(&meal_ref, &emb, true).unwrap(),
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(benches, bench_select);
criterion_main!(benches);
