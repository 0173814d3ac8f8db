//! Values returned by the query operations.
//!
//! All of them serialize, so the same values can be printed as a report or
//! emitted as JSON.

use data_loader::{ExternalUserId, InternalUserId, MovieIndex};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::SessionError;

/// Which user `Session::set_active_user` should switch to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserSelector {
    /// Uniformly random pick from the dataset's user universe
    ///
    /// In long mode the universe only holds users with a prediction row.
    #[default]
    Random,
    /// A specific platform user id
    Id(ExternalUserId),
}

impl FromStr for UserSelector {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("random") {
            return Ok(UserSelector::Random);
        }
        s.parse::<ExternalUserId>()
            .map(UserSelector::Id)
            .map_err(|_| SessionError::Usage(format!("expected a user id or 'random', got '{}'", s)))
    }
}

impl fmt::Display for UserSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserSelector::Random => write!(f, "random"),
            UserSelector::Id(id) => write!(f, "{}", id),
        }
    }
}

/// One of the user's own ratings, with the movie title resolved
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatedTitle {
    pub movie: MovieIndex,
    pub title: String,
    pub score: f64,
}

/// An unseen movie and the model's predicted rating, rounded to 1 decimal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub movie: MovieIndex,
    pub title: String,
    pub predicted_rating: f64,
}

/// Headline numbers for the active user
///
/// `mean_rating` and `accuracy` are `None` when the user has no ratings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserSummary {
    pub external_id: ExternalUserId,
    pub internal_id: InternalUserId,
    pub review_count: usize,
    pub mean_rating: Option<f64>,
    pub accuracy: Option<f64>,
}
