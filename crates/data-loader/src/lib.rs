//! # Data Loader Crate
//!
//! This crate loads the three inputs of the MUBI recommendation explorer:
//! the ratings table, the model's predictions table and the translation map.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (RatingEvent, PredictionRow, TranslationMap, Dataset)
//! - **source**: Remote (URL) and local (file) table locations
//! - **config**: Dataset mode and loader configuration with per-mode defaults
//! - **parser**: Parse CSV tables and the translation JSON into Rust structs
//! - **index**: Build the per-user indices and validate the dataset
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::{Dataset, DatasetMode, LoaderConfig};
//!
//! let config = LoaderConfig::for_mode(DatasetMode::Short)
//!     .with_translation("translation_dict.json");
//! let dataset = Dataset::load(&config)?;
//!
//! let internal = dataset.translation().internal_user(30637830).unwrap();
//! println!("User rated {} movies", dataset.get_user_ratings(internal).len());
//! ```

// Public modules
pub mod config;
pub mod error;
pub mod index;
pub mod parser;
pub mod source;
pub mod types;

// Re-export commonly used types for convenience
pub use config::{DatasetMode, LoaderConfig};
pub use error::{DataLoadError, Result};
pub use source::DataSource;
pub use types::{
    // Type aliases
    ExternalUserId,
    InternalUserId,
    MovieId,
    MovieIndex,
    // Core types
    Dataset,
    PredictionLayout,
    PredictionRow,
    RatingEvent,
    TranslationMap,
};
