//! Dataset building and validation.
//!
//! `Dataset::load` fetches the three inputs, builds the per-user indices and
//! checks the invariants the query layer relies on:
//! - every prediction row covers the whole catalog
//! - every catalog position translates to a title
//! - every curated user resolves through the translation map

use crate::config::{DatasetMode, LoaderConfig};
use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::*;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, instrument};

/// Short name of a source for error messages
fn file_label(location: &str) -> String {
    Path::new(location.split('?').next().unwrap_or(location))
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| location.to_string())
}

impl Dataset {
    /// Load ratings, predictions and translation map as described by `config`
    ///
    /// Steps:
    /// 1. Read the translation map (local file)
    /// 2. Fetch ratings and predictions
    /// 3. Parse both tables in parallel
    /// 4. Build the per-user indices
    /// 5. Pick the user universe for the mode
    /// 6. Validate
    #[instrument(skip(config), fields(mode = %config.mode))]
    pub fn load(config: &LoaderConfig) -> Result<Self> {
        let start = Instant::now();

        let translation_source = crate::DataSource::Path(config.translation.clone());
        let translation_text = translation_source.fetch_text(config.fetch_timeout)?;
        let translation = parser::parse_translation(&translation_text)?;
        debug!(
            "Translation map: {} users, {} movies, {} titles",
            translation.external_to_internal.len(),
            translation.movie_to_id.len(),
            translation.id_to_title.len()
        );

        info!("Fetching ratings from {}", config.ratings);
        let ratings_text = config.ratings.fetch_text(config.fetch_timeout)?;
        info!("Fetching predictions from {}", config.predictions);
        let predictions_text = config.predictions.fetch_text(config.fetch_timeout)?;

        let ratings_label = file_label(&config.ratings.to_string());
        let predictions_label = file_label(&config.predictions.to_string());
        let layout = config.mode.prediction_layout();

        let (ratings, predictions) = rayon::join(
            || parser::parse_ratings(&ratings_text, &ratings_label),
            || {
                parser::parse_predictions(
                    &predictions_text,
                    &predictions_label,
                    layout,
                    config.catalog_size,
                )
            },
        );
        let ratings = ratings?;
        let predictions = predictions?;

        let mut dataset = Dataset::new(config.catalog_size);
        for rating in ratings {
            dataset.insert_rating(rating);
        }
        for (user, row) in predictions {
            dataset.insert_predictions(user, row);
        }

        let universe = match config.mode {
            DatasetMode::Short => config.curated_users.clone(),
            DatasetMode::Long => translation
                .external_users()
                .into_iter()
                .filter(|&user| {
                    translation
                        .internal_user(user)
                        .is_some_and(|internal| dataset.predictions.contains_key(&internal))
                })
                .collect(),
        };
        dataset.set_translation(translation);
        dataset.set_user_universe(universe);

        dataset.validate()?;

        let (rating_users, prediction_users, total_ratings) = dataset.counts();
        info!(
            "Loaded {} ratings from {} users and predictions for {} users in {:.2?}",
            total_ratings,
            rating_users,
            prediction_users,
            start.elapsed()
        );
        Ok(dataset)
    }

    /// Validate data integrity
    ///
    /// Check that:
    /// - every prediction row has exactly `catalog_size` entries
    /// - every catalog position has a movie id, and every movie id a title
    /// - every user in the universe resolves to an internal id
    pub fn validate(&self) -> Result<()> {
        for (&user, row) in &self.predictions {
            if row.len() != self.catalog_size {
                return Err(DataLoadError::CatalogMismatch {
                    user,
                    expected: self.catalog_size,
                    found: row.len(),
                });
            }
        }

        for (&movie, movie_id) in &self.translation.movie_to_id {
            if !self.translation.id_to_title.contains_key(movie_id) {
                return Err(DataLoadError::MissingReference {
                    entity: format!("Title for movie {}", movie),
                    id: *movie_id,
                });
            }
        }

        for movie in 0..self.catalog_size {
            if !self.translation.movie_to_id.contains_key(&movie) {
                return Err(DataLoadError::MissingReference {
                    entity: "Movie index".to_string(),
                    id: movie as u64,
                });
            }
        }

        for &user in &self.user_universe {
            if self.translation.internal_user(user).is_none() {
                return Err(DataLoadError::MissingReference {
                    entity: "User".to_string(),
                    id: user,
                });
            }
        }

        Ok(())
    }
}
