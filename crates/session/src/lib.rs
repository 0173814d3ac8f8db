//! Session crate for the MUBI recommendation explorer.
//!
//! A `Session` owns a loaded `Dataset`, keeps track of the active user and
//! answers the per-user queries:
//! - mean rating
//! - top / bottom rated movies
//! - recommendations drawn from the model's predictions
//! - prediction accuracy
//! - review count
//!
//! Every query has a pure entry point on `Session` returning values, and a
//! formatting adapter in `report` returning printable lines.
//!
//! ## Example Usage
//! ```ignore
//! use data_loader::{DatasetMode, LoaderConfig};
//! use session::{report, Session, UserSelector};
//!
//! let config = LoaderConfig::for_mode(DatasetMode::Short);
//! let mut session = Session::load(&config, UserSelector::Random)?;
//!
//! let recs = session.recommend(5)?;          // Vec<Recommendation>
//! println!("{}", report::mean_rating(&session)?);
//!
//! session.set_active_user("43744268".parse()?)?;
//! println!("{}", report::top_movies(&mut session, 10)?);
//! ```

pub mod candidates;
pub mod error;
pub mod ranking;
pub mod report;
pub mod session;
pub mod types;

// Re-export main types
pub use error::{Result, SessionError};
pub use report::Report;
pub use session::{
    ActiveUser, DEFAULT_RANKED_MOVIES, DEFAULT_RECOMMENDATIONS, MAX_RECOMMENDATIONS,
    MIN_RECOMMENDATIONS, Session, is_close_enough,
};
pub use types::{RatedTitle, Recommendation, UserSelector, UserSummary};
