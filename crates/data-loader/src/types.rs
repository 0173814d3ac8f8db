//! Core domain types for the MUBI ratings and predictions tables.
//!
//! This module defines the fundamental data structures used throughout the system:
//! - Type aliases for the different kinds of identifiers
//! - `RatingEvent`, one historical rating
//! - `PredictionRow` / `PredictionTable`, the model output read back as a lookup table
//! - `TranslationMap`, the static id <-> title mapping
//! - `Dataset`, the in-memory database the session queries

use serde::Deserialize;
use std::collections::HashMap;

// =============================================================================
// Type Aliases
// =============================================================================
// These keep the four kinds of identifiers apart at the signature level

/// User identifier as known on the MUBI platform
pub type ExternalUserId = u64;

/// User identifier used as a row key in the loaded tables
pub type InternalUserId = u64;

/// Position of a movie in a prediction vector (0..catalog_size)
pub type MovieIndex = usize;

/// MUBI movie identifier, the key of the title map
pub type MovieId = u64;

// =============================================================================
// Ratings
// =============================================================================

/// A single rating a user gave to a movie.
///
/// The field names match the CSV header of the ratings sheet, except for
/// `score` which is stored under `rating_score`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct RatingEvent {
    pub user: InternalUserId,
    pub movie: MovieIndex,
    /// Rating value from 1 to 5
    #[serde(rename = "rating_score")]
    pub score: f64,
}

// =============================================================================
// Predictions
// =============================================================================

/// Predicted ratings of one user for every movie in the catalog.
///
/// Indexed by `MovieIndex`; its length always equals the catalog size once
/// the owning `Dataset` has been validated.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PredictionRow(Vec<f64>);

impl PredictionRow {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    /// Predicted rating for a movie, `None` if the index is outside the catalog
    pub fn get(&self, movie: MovieIndex) -> Option<f64> {
        self.0.get(movie).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

impl From<Vec<f64>> for PredictionRow {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

/// On-disk orientation of a predictions table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredictionLayout {
    /// One row per movie, one column per user (the small shared sheet)
    MovieRows,
    /// One row per user, one column per movie (the large local file)
    UserRows,
}

// =============================================================================
// Translation
// =============================================================================

/// Static mapping between platform ids, table ids and titles.
///
/// Loaded once from `translation_dict.json` and never mutated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslationMap {
    pub external_to_internal: HashMap<ExternalUserId, InternalUserId>,
    pub movie_to_id: HashMap<MovieIndex, MovieId>,
    pub id_to_title: HashMap<MovieId, String>,
}

impl TranslationMap {
    /// Resolve a platform user id to the id used in the tables
    pub fn internal_user(&self, user: ExternalUserId) -> Option<InternalUserId> {
        self.external_to_internal.get(&user).copied()
    }

    /// Title of the movie at a given catalog position
    pub fn title(&self, movie: MovieIndex) -> Option<&str> {
        let movie_id = self.movie_to_id.get(&movie)?;
        self.id_to_title.get(movie_id).map(String::as_str)
    }

    /// Every known platform user id, sorted ascending
    pub fn external_users(&self) -> Vec<ExternalUserId> {
        let mut users: Vec<ExternalUserId> = self.external_to_internal.keys().copied().collect();
        users.sort_unstable();
        users
    }
}

// =============================================================================
// Dataset - The In-Memory Database
// =============================================================================

/// Everything a session needs: ratings grouped by user, the predictions
/// table, the translation map and the set of users `random` draws from.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub(crate) catalog_size: usize,
    /// All ratings made by each user
    pub(crate) user_ratings: HashMap<InternalUserId, Vec<RatingEvent>>,
    pub(crate) predictions: HashMap<InternalUserId, PredictionRow>,
    pub(crate) translation: TranslationMap,
    pub(crate) user_universe: Vec<ExternalUserId>,
}

impl Dataset {
    /// Creates a new, empty Dataset for a catalog of `catalog_size` movies
    pub fn new(catalog_size: usize) -> Self {
        Self {
            catalog_size,
            user_ratings: HashMap::new(),
            predictions: HashMap::new(),
            translation: TranslationMap::default(),
            user_universe: Vec::new(),
        }
    }

    pub fn catalog_size(&self) -> usize {
        self.catalog_size
    }

    /// Get all ratings made by a user
    ///
    /// Returns an empty slice if the user has no ratings
    pub fn get_user_ratings(&self, user: InternalUserId) -> &[RatingEvent] {
        self.user_ratings
            .get(&user)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Get the prediction vector of a user
    pub fn get_predictions(&self, user: InternalUserId) -> Option<&PredictionRow> {
        self.predictions.get(&user)
    }

    pub fn translation(&self) -> &TranslationMap {
        &self.translation
    }

    /// The platform user ids random selection draws from
    pub fn user_universe(&self) -> &[ExternalUserId] {
        &self.user_universe
    }

    /// Insert a rating into the per-user index
    pub fn insert_rating(&mut self, rating: RatingEvent) {
        self.user_ratings
            .entry(rating.user)
            .or_insert_with(Vec::new)
            .push(rating);
    }

    /// Insert (or replace) the prediction vector of a user
    pub fn insert_predictions(&mut self, user: InternalUserId, row: PredictionRow) {
        self.predictions.insert(user, row);
    }

    pub fn set_translation(&mut self, translation: TranslationMap) {
        self.translation = translation;
    }

    pub fn set_user_universe(&mut self, users: Vec<ExternalUserId>) {
        self.user_universe = users;
    }

    /// Get counts for debugging/validation: (rating users, prediction users, ratings)
    pub fn counts(&self) -> (usize, usize, usize) {
        let total_ratings = self.user_ratings.values().map(|v| v.len()).sum();
        (self.user_ratings.len(), self.predictions.len(), total_ratings)
    }
}
