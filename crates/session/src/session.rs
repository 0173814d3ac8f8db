//! The stateful session: one dataset, one active user, seven queries.
//!
//! ## State machine
//! A session starts with no user selected. `set_active_user` moves it to
//! "user selected" and can be called again at any time to switch users.
//! Every query needs a selected user and reports `NoActiveUser` otherwise.
//!
//! ## Concurrency
//! `Session` is meant for a single interactive user. It has no internal
//! locking; randomized queries take `&mut self` to advance the generator.

use std::collections::HashSet;

use data_loader::{
    Dataset, ExternalUserId, InternalUserId, LoaderConfig, MovieIndex, PredictionRow,
    RatingEvent, TranslationMap,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use tracing::{debug, info};

use crate::candidates::{CANDIDATE_POOL_SIZE, draw_candidate_pool};
use crate::error::{Result, SessionError};
use crate::ranking::{RankOrder, select_ranked};
use crate::types::{RatedTitle, Recommendation, UserSelector, UserSummary};

/// Default number of recommendations
pub const DEFAULT_RECOMMENDATIONS: usize = 5;
/// Smallest accepted number of recommendations
pub const MIN_RECOMMENDATIONS: usize = 1;
/// Largest accepted number of recommendations
pub const MAX_RECOMMENDATIONS: usize = 20;
/// Default number of movies for top/bottom lists
pub const DEFAULT_RANKED_MOVIES: usize = 10;

/// Round to `decimals` places, ties to even
fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

/// Whether a prediction is close enough to the actual rating
///
/// A 5 only needs a prediction of at least 4; anything else needs to be
/// within half a point either way.
pub fn is_close_enough(predicted: f64, actual: f64) -> bool {
    if actual == 5.0 {
        predicted >= actual - 1.0
    } else {
        (actual - 0.5..=actual + 0.5).contains(&predicted)
    }
}

fn translate(translation: &TranslationMap, movie: MovieIndex) -> Result<String> {
    translation
        .title(movie)
        .map(str::to_string)
        .ok_or(SessionError::UnknownMovie(movie))
}

/// The currently selected user and their slices of both tables
#[derive(Debug, Clone)]
pub struct ActiveUser {
    pub external_id: ExternalUserId,
    pub internal_id: InternalUserId,
    ratings: Vec<RatingEvent>,
    predictions: PredictionRow,
}

impl ActiveUser {
    pub fn ratings(&self) -> &[RatingEvent] {
        &self.ratings
    }

    pub fn predictions(&self) -> &PredictionRow {
        &self.predictions
    }
}

/// Query session over a loaded dataset
pub struct Session {
    dataset: Dataset,
    rng: StdRng,
    active: Option<ActiveUser>,
}

impl Session {
    /// Create a session with no user selected, seeded from the OS
    pub fn new(dataset: Dataset) -> Self {
        Self {
            dataset,
            rng: StdRng::from_os_rng(),
            active: None,
        }
    }

    /// Create a session whose random choices are reproducible
    pub fn with_seed(dataset: Dataset, seed: u64) -> Self {
        Self {
            dataset,
            rng: StdRng::seed_from_u64(seed),
            active: None,
        }
    }

    /// Load the dataset described by `config` and select a first user
    pub fn load(config: &LoaderConfig, selector: UserSelector) -> Result<Self> {
        let dataset = Dataset::load(config)?;
        let mut session = Session::new(dataset);
        session.set_active_user(selector)?;
        Ok(session)
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn active_user(&self) -> Option<&ActiveUser> {
        self.active.as_ref()
    }

    fn require_user(&self) -> Result<&ActiveUser> {
        self.active.as_ref().ok_or(SessionError::NoActiveUser)
    }

    /// Switch the session to another user
    ///
    /// On failure the previously selected user stays active.
    pub fn set_active_user(&mut self, selector: UserSelector) -> Result<&ActiveUser> {
        let external_id = match selector {
            UserSelector::Id(id) => id,
            UserSelector::Random => *self
                .dataset
                .user_universe()
                .choose(&mut self.rng)
                .ok_or_else(|| SessionError::Usage("no users to choose from".to_string()))?,
        };

        let internal_id = self
            .dataset
            .translation()
            .internal_user(external_id)
            .ok_or(SessionError::UnknownUser(external_id))?;

        let predictions = self
            .dataset
            .get_predictions(internal_id)
            .cloned()
            .ok_or(SessionError::NoPredictions {
                external: external_id,
                internal: internal_id,
            })?;
        let ratings = self.dataset.get_user_ratings(internal_id).to_vec();

        info!(
            "Active user {} (internal {}) with {} ratings",
            external_id,
            internal_id,
            ratings.len()
        );

        Ok(&*self.active.insert(ActiveUser {
            external_id,
            internal_id,
            ratings,
            predictions,
        }))
    }

    /// Mean of the user's rating scores, rounded to 1 decimal
    pub fn mean_rating(&self) -> Result<f64> {
        let user = self.require_user()?;
        if user.ratings.is_empty() {
            return Err(SessionError::EmptyUser(user.external_id));
        }

        let total: f64 = user.ratings.iter().map(|r| r.score).sum();
        Ok(round_to(total / user.ratings.len() as f64, 1))
    }

    /// Up to `n` of the user's best rated movies
    pub fn top_movies(&mut self, n: usize) -> Result<Vec<RatedTitle>> {
        self.ranked_movies(n, RankOrder::Highest)
    }

    /// Up to `n` of the user's worst rated movies
    pub fn bottom_movies(&mut self, n: usize) -> Result<Vec<RatedTitle>> {
        self.ranked_movies(n, RankOrder::Lowest)
    }

    fn ranked_movies(&mut self, n: usize, order: RankOrder) -> Result<Vec<RatedTitle>> {
        let user = self.active.as_ref().ok_or(SessionError::NoActiveUser)?;
        let selected = select_ranked(&user.ratings, n, order, &mut self.rng);
        debug!("Selected {} of {} ratings ({:?})", selected.len(), user.ratings.len(), order);

        let translation = self.dataset.translation();
        selected
            .into_iter()
            .map(|event| -> Result<RatedTitle> {
                Ok(RatedTitle {
                    movie: event.movie,
                    title: translate(translation, event.movie)?,
                    score: event.score,
                })
            })
            .collect()
    }

    /// `n` unseen movies with the highest predicted rating
    ///
    /// Ranks a random pool of unseen movies rather than the whole catalog, so
    /// repeated calls surface different titles. `n` must be in `[1, 20]`.
    pub fn recommend(&mut self, n: usize) -> Result<Vec<Recommendation>> {
        if !(MIN_RECOMMENDATIONS..=MAX_RECOMMENDATIONS).contains(&n) {
            return Err(SessionError::Usage(format!(
                "number of recommendations must be between {} and {}, got {}",
                MIN_RECOMMENDATIONS, MAX_RECOMMENDATIONS, n
            )));
        }

        let user = self.active.as_ref().ok_or(SessionError::NoActiveUser)?;
        let seen: HashSet<MovieIndex> = user.ratings.iter().map(|r| r.movie).collect();
        let pool = draw_candidate_pool(
            &mut self.rng,
            self.dataset.catalog_size(),
            &seen,
            CANDIDATE_POOL_SIZE,
        );

        let translation = self.dataset.translation();
        let mut scored = pool
            .into_iter()
            .map(|movie| -> Result<(MovieIndex, f64, String)> {
                let predicted = user
                    .predictions
                    .get(movie)
                    .ok_or(SessionError::UnknownMovie(movie))?;
                Ok((movie, predicted, translate(translation, movie)?))
            })
            .collect::<Result<Vec<_>>>()?;

        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(n);

        Ok(scored
            .into_iter()
            .map(|(movie, predicted, title)| Recommendation {
                movie,
                title,
                predicted_rating: round_to(predicted, 1),
            })
            .collect())
    }

    /// Percentage of rated movies whose prediction was close enough, rounded to 2 decimals
    pub fn accuracy(&self) -> Result<f64> {
        let user = self.require_user()?;
        if user.ratings.is_empty() {
            return Err(SessionError::EmptyUser(user.external_id));
        }

        let mut close = 0usize;
        for rating in &user.ratings {
            let predicted = user
                .predictions
                .get(rating.movie)
                .ok_or(SessionError::UnknownMovie(rating.movie))?;
            if is_close_enough(predicted, rating.score) {
                close += 1;
            }
        }

        let accuracy = close as f64 / user.ratings.len() as f64 * 100.0;
        Ok(round_to(accuracy, 2))
    }

    /// Number of ratings the user has on record
    pub fn review_count(&self) -> Result<usize> {
        Ok(self.require_user()?.ratings.len())
    }

    /// Review count, mean and accuracy in one value
    pub fn summary(&self) -> Result<UserSummary> {
        let user = self.require_user()?;
        let optional = |value: Result<f64>| match value {
            Ok(v) => Ok(Some(v)),
            Err(SessionError::EmptyUser(_)) => Ok(None),
            Err(e) => Err(e),
        };

        Ok(UserSummary {
            external_id: user.external_id,
            internal_id: user.internal_id,
            review_count: user.ratings.len(),
            mean_rating: optional(self.mean_rating())?,
            accuracy: optional(self.accuracy())?,
        })
    }
}
