//! Loader configuration.
//!
//! The shared sheet URLs and local file names are defaults, not globals:
//! `LoaderConfig::for_mode` fills them in and every field can be overridden
//! before calling `Dataset::load`.

use crate::error::DataLoadError;
use crate::source::DataSource;
use crate::types::{ExternalUserId, PredictionLayout};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// CSV export of the ratings sheet
pub const SHORT_RATINGS_URL: &str = "https://docs.google.com/spreadsheets/d/1olKN3RWDIFGG1cQ6NA8x_26PpFJ8Umu31GfzSvgGfvs/export?format=csv&gid=121740241";

/// CSV export of the predictions sheet for the curated users
pub const SHORT_PREDICTIONS_URL: &str = "https://docs.google.com/spreadsheets/d/1dY-Bj_1P0YavMa-e7F37MtR8Y10ZpyhPuUK91M7z5JU/export?format=csv&gid=1293929908";

/// Human-readable views of the two sheets, shown in the welcome banner
pub const SHORT_RATINGS_VIEW_URL: &str =
    "https://docs.google.com/spreadsheets/d/1olKN3RWDIFGG1cQ6NA8x_26PpFJ8Umu31GfzSvgGfvs/edit#gid=121740241";
pub const SHORT_PREDICTIONS_VIEW_URL: &str =
    "https://docs.google.com/spreadsheets/d/1dY-Bj_1P0YavMa-e7F37MtR8Y10ZpyhPuUK91M7z5JU/edit#gid=1293929908";

/// Download page of the predictions file for 1000 users
pub const LONG_PREDICTIONS_DOWNLOAD_URL: &str =
    "https://drive.google.com/file/d/1URuF9NYKas5pZPqYcxlx5QeCBOtbqa_w/view?usp=sharing";

pub const DEFAULT_TRANSLATION_PATH: &str = "translation_dict.json";
pub const DEFAULT_LONG_PREDICTIONS_PATH: &str = "user_recs.csv";

/// Number of movies the prediction model covers
pub const DEFAULT_CATALOG_SIZE: usize = 89_418;

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(60);

/// Users present in the small shared predictions sheet
pub const CURATED_USERS: [ExternalUserId; 5] =
    [30637830, 43744268, 32627933, 51927810, 50184113];

/// Which predictions dataset to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DatasetMode {
    /// Shared sheet with predictions for the curated users
    #[default]
    Short,
    /// Downloaded file with predictions for every user in the translation map
    Long,
}

impl DatasetMode {
    pub fn prediction_layout(&self) -> PredictionLayout {
        match self {
            DatasetMode::Short => PredictionLayout::MovieRows,
            DatasetMode::Long => PredictionLayout::UserRows,
        }
    }
}

impl FromStr for DatasetMode {
    type Err = DataLoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "short" | "use_short" => Ok(DatasetMode::Short),
            "long" | "use_long" => Ok(DatasetMode::Long),
            other => Err(DataLoadError::InvalidValue {
                field: "mode".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for DatasetMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetMode::Short => write!(f, "short"),
            DatasetMode::Long => write!(f, "long"),
        }
    }
}

/// Everything `Dataset::load` needs to know
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    pub mode: DatasetMode,
    pub ratings: DataSource,
    pub predictions: DataSource,
    pub translation: PathBuf,
    pub catalog_size: usize,
    pub fetch_timeout: Duration,
    /// Users `random` draws from in short mode
    pub curated_users: Vec<ExternalUserId>,
}

impl LoaderConfig {
    /// Default sources for a mode
    pub fn for_mode(mode: DatasetMode) -> Self {
        let predictions = match mode {
            DatasetMode::Short => DataSource::Url(SHORT_PREDICTIONS_URL.to_string()),
            DatasetMode::Long => DataSource::Path(PathBuf::from(DEFAULT_LONG_PREDICTIONS_PATH)),
        };

        Self {
            mode,
            ratings: DataSource::Url(SHORT_RATINGS_URL.to_string()),
            predictions,
            translation: PathBuf::from(DEFAULT_TRANSLATION_PATH),
            catalog_size: DEFAULT_CATALOG_SIZE,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            curated_users: CURATED_USERS.to_vec(),
        }
    }

    /// Override the ratings source
    pub fn with_ratings(mut self, source: DataSource) -> Self {
        self.ratings = source;
        self
    }

    /// Override the predictions source
    pub fn with_predictions(mut self, source: DataSource) -> Self {
        self.predictions = source;
        self
    }

    /// Override the translation map path
    pub fn with_translation(mut self, path: impl Into<PathBuf>) -> Self {
        self.translation = path.into();
        self
    }

    /// Override the catalog size (default: 89418)
    pub fn with_catalog_size(mut self, size: usize) -> Self {
        self.catalog_size = size;
        self
    }

    /// Override the remote fetch timeout (default: 60s)
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Override the curated user list used in short mode
    pub fn with_curated_users(mut self, users: Vec<ExternalUserId>) -> Self {
        self.curated_users = users;
        self
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self::for_mode(DatasetMode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_str() {
        assert_eq!("short".parse::<DatasetMode>().unwrap(), DatasetMode::Short);
        assert_eq!("use_long".parse::<DatasetMode>().unwrap(), DatasetMode::Long);
        assert!("medium".parse::<DatasetMode>().is_err());
    }

    #[test]
    fn test_defaults_per_mode() {
        let short = LoaderConfig::for_mode(DatasetMode::Short);
        assert!(short.predictions.is_remote());
        assert_eq!(short.curated_users.len(), 5);
        assert_eq!(short.catalog_size, DEFAULT_CATALOG_SIZE);

        let long = LoaderConfig::for_mode(DatasetMode::Long);
        assert_eq!(
            long.predictions,
            DataSource::Path(PathBuf::from(DEFAULT_LONG_PREDICTIONS_PATH))
        );
        assert_eq!(long.mode.prediction_layout(), PredictionLayout::UserRows);
    }

    #[test]
    fn test_builder_overrides() {
        let config = LoaderConfig::for_mode(DatasetMode::Long)
            .with_catalog_size(10)
            .with_translation("fixtures/translation.json")
            .with_fetch_timeout(Duration::from_secs(5));

        assert_eq!(config.catalog_size, 10);
        assert_eq!(config.translation, PathBuf::from("fixtures/translation.json"));
        assert_eq!(config.fetch_timeout, Duration::from_secs(5));
    }
}
