//! Benchmarks for the session queries
//!
//! Run with: cargo bench --package session
//!
//! Uses a synthetic dataset the size of the real catalog with one heavy user.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use data_loader::{Dataset, PredictionRow, RatingEvent, TranslationMap};
use session::{Session, UserSelector};

const CATALOG: usize = 89_418;

fn build_session() -> Session {
    let mut dataset = Dataset::new(CATALOG);

    let mut translation = TranslationMap::default();
    translation.external_to_internal.insert(1, 0);
    for movie in 0..CATALOG {
        translation.movie_to_id.insert(movie, movie as u64);
        translation.id_to_title.insert(movie as u64, format!("Film {}", movie));
    }
    dataset.set_translation(translation);

    for movie in (0..CATALOG).step_by(50) {
        dataset.insert_rating(RatingEvent {
            user: 0,
            movie,
            score: (movie % 5 + 1) as f64,
        });
    }
    let row: Vec<f64> = (0..CATALOG).map(|m| 1.0 + (m % 41) as f64 / 10.0).collect();
    dataset.insert_predictions(0, PredictionRow::new(row));

    let mut session = Session::with_seed(dataset, 1);
    session
        .set_active_user(UserSelector::Id(1))
        .expect("Failed to select benchmark user");
    session
}

fn bench_recommend(c: &mut Criterion) {
    let mut session = build_session();

    c.bench_function("recommend_5", |b| {
        b.iter(|| black_box(session.recommend(black_box(5)).unwrap()))
    });
}

fn bench_top_movies(c: &mut Criterion) {
    let mut session = build_session();

    c.bench_function("top_movies_10", |b| {
        b.iter(|| black_box(session.top_movies(black_box(10)).unwrap()))
    });
}

fn bench_accuracy(c: &mut Criterion) {
    let session = build_session();

    c.bench_function("accuracy", |b| b.iter(|| black_box(session.accuracy().unwrap())));
}

criterion_group!(benches, bench_recommend, bench_top_movies, bench_accuracy);
criterion_main!(benches);
