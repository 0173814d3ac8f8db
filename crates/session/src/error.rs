//! Error types for the session crate.

use data_loader::{DataLoadError, ExternalUserId, InternalUserId, MovieIndex};
use thiserror::Error;

/// Errors a session operation can report
///
/// None of them leave the session in a different state than before the call.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Loading the dataset failed
    #[error(transparent)]
    Data(#[from] DataLoadError),

    /// A query was made before any user was selected
    #[error("No user selected")]
    NoActiveUser,

    /// The platform user id is not in the translation map
    #[error("Unknown user: {0}")]
    UnknownUser(ExternalUserId),

    /// The user is known but the predictions table has no row for them
    #[error("No predictions for user {external} (internal id {internal})")]
    NoPredictions {
        external: ExternalUserId,
        internal: InternalUserId,
    },

    /// The movie index cannot be translated or is outside the catalog
    #[error("Unknown movie: {0}")]
    UnknownMovie(MovieIndex),

    /// An argument is outside its documented range
    #[error("Usage error: {0}")]
    Usage(String),

    /// Statistics were requested for a user without ratings
    #[error("User {0} has no ratings")]
    EmptyUser(ExternalUserId),
}

pub type Result<T> = std::result::Result<T, SessionError>;
