// Performance benchmarks for the tunerank pipeline
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::prelude::*;
use rand::rngs::StdRng;
use serde_json::json;
use tunerank::prelude::*;
use tunerank::TfidfVectorizer;

const WORDS: &[&str] = &[
    "rain", "night", "drive", "summer", "ocean", "neon", "heart", "dust", "gold", "river",
    "fire", "glass", "echo", "shadow", "light", "dream", "storm", "velvet", "city", "moon",
];

fn random_title(rng: &mut StdRng) -> String {
    (0..3)
        .map(|_| WORDS[rng.random_range(0..WORDS.len())])
        .collect::<Vec<_>>()
        .join(" ")
}

fn random_track(rng: &mut StdRng, id: usize) -> serde_json::Value {
    json!({
        "track_id": format!("t{}", id),
        "track_name": random_title(rng),
        "artists": format!("artist {}", rng.random_range(0..200)),
        "track_genre": WORDS[rng.random_range(0..WORDS.len())],
        "tempo": rng.random_range(60.0f32..180.0f32),
        "energy": rng.random::<f32>(),
        "valence": rng.random::<f32>(),
        "danceability": rng.random::<f32>(),
        "acousticness": rng.random::<f32>(),
        "instrumentalness": rng.random::<f32>(),
        "popularity": rng.random_range(0.0f32..100.0f32)
    })
}

fn generate_pool(size: usize) -> Vec<Item> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..size)
        .map(|i| Item::from_value(random_track(&mut rng, i)))
        .collect()
}

fn generate_history(size: usize) -> Vec<TrackRecord> {
    let mut rng = StdRng::seed_from_u64(7);
    (0..size)
        .map(|i| TrackRecord::from_value(random_track(&mut rng, i * 3)))
        .collect()
}

fn benchmark_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("fit");

    for size in [1000, 10000].iter() {
        let pool = generate_pool(*size);
        group.bench_with_input(BenchmarkId::new("hybrid", size), size, |b, _| {
            let recommender = Recommender::new(RecommenderConfig::default()).unwrap();
            b.iter(|| recommender.fit(black_box(pool.clone())).unwrap());
        });
    }

    group.finish();
}

fn benchmark_profile(c: &mut Criterion) {
    let mut group = c.benchmark_group("profile");
    let history = generate_history(50);

    for size in [1000, 10000].iter() {
        for (name, config) in [
            ("features", RecommenderConfig::discovery()),
            ("hybrid", RecommenderConfig::default()),
        ] {
            let recommender = Recommender::new(config).unwrap();
            let pool = recommender.fit(generate_pool(*size)).unwrap();
            group.bench_with_input(BenchmarkId::new(name, size), size, |b, _| {
                b.iter(|| {
                    recommender
                        .recommend_for_profile(black_box(&pool), black_box(&history))
                        .unwrap()
                });
            });
        }
    }

    group.finish();
}

fn benchmark_tfidf(c: &mut Criterion) {
    let documents: Vec<String> = generate_pool(5000).iter().map(Item::document).collect();
    let fitted = TfidfVectorizer::default().fit(&documents).unwrap();

    c.bench_function("tfidf_fit_5000", |b| {
        b.iter(|| TfidfVectorizer::default().fit(black_box(&documents)).unwrap())
    });
    c.bench_function("tfidf_transform", |b| {
        b.iter(|| fitted.transform(black_box("neon rain night drive artist 12")))
    });
}

criterion_group!(benches, benchmark_fit, benchmark_profile, benchmark_tfidf);
criterion_main!(benches);
