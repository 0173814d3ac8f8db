//! Error types for the data-loader crate.
//!
//! Every failure while fetching or parsing the ratings table, the predictions
//! table or the translation map ends up as one of these variants. Nothing is
//! retried; the caller decides what to do.

use thiserror::Error;

/// Errors that can occur during data loading and parsing
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// A remote or local source could not be read
    ///
    /// Covers network failures, timeouts, non-success HTTP statuses and
    /// missing or unreadable local files.
    #[error("Data unavailable from {location}: {reason}")]
    DataUnavailable { location: String, reason: String },

    /// Row in a tabular file couldn't be parsed
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// A data field had an invalid value
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// A prediction row does not cover the whole catalog
    #[error("Prediction row for user {user} has {found} entries, expected {expected}")]
    CatalogMismatch {
        user: u64,
        expected: usize,
        found: usize,
    },

    /// Referenced entity doesn't exist (e.g., movie id without a title)
    #[error("Missing reference: {entity} with id {id}")]
    MissingReference { entity: String, id: u64 },

    /// The translation map is not the JSON shape we expect
    #[error("Invalid translation map: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
