//! Time a full dataset load.
//!
//! Run with: cargo run --release --example benchmark_load -p data-loader -- [short|long]

use data_loader::{Dataset, DatasetMode, LoaderConfig};
use std::time::Instant;

fn main() {
    let mode: DatasetMode = std::env::args()
        .nth(1)
        .as_deref()
        .unwrap_or("short")
        .parse()
        .expect("Mode must be 'short' or 'long'");
    let config = LoaderConfig::for_mode(mode);

    println!("Loading {} dataset...", mode);
    println!("  ratings:     {}", config.ratings);
    println!("  predictions: {}\n", config.predictions);

    let start = Instant::now();
    let dataset = Dataset::load(&config).expect("Failed to load dataset");
    let elapsed = start.elapsed();

    let (rating_users, prediction_users, ratings) = dataset.counts();

    println!("=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Users with ratings: {}", rating_users);
    println!("Users with predictions: {}", prediction_users);
    println!("Ratings: {}", ratings);
    println!("Prediction cells: {}", prediction_users * dataset.catalog_size());
    println!(
        "\nPerformance: {:.0} ratings/second",
        ratings as f64 / elapsed.as_secs_f64()
    );
}
