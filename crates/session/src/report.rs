//! Human-readable reports.
//!
//! Each function wraps the matching `Session` query and turns its value into
//! printable lines. The `format_*` functions do the formatting alone, so a
//! caller that already holds the value does not have to query twice.

use std::fmt;

use crate::error::Result;
use crate::session::Session;
use crate::types::{RatedTitle, Recommendation, UserSummary};

/// Ordered lines of text
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Report {
    lines: Vec<String>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line (builder pattern)
    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", line)?;
        }
        Ok(())
    }
}

pub fn format_mean_rating(mean: f64) -> Report {
    Report::new().line(format!("This user's average rating is {:.1}.", mean))
}

pub fn format_recommendations(recommendations: &[Recommendation]) -> Report {
    recommendations.iter().fold(Report::new(), |report, rec| {
        report.line(format!(
            "Suggestion: {}. Estimated rating: {:.1}.",
            rec.title, rec.predicted_rating
        ))
    })
}

fn format_ranked(heading: &str, movies: &[RatedTitle]) -> Report {
    let header = format!("Here are {} of this user's {} movies:", movies.len(), heading);
    movies.iter().fold(Report::new().line(header), |report, movie| {
        report.line(format!("{}  ({}/5)", movie.title, movie.score))
    })
}

pub fn format_top_movies(movies: &[RatedTitle]) -> Report {
    format_ranked("top rated", movies)
}

pub fn format_bottom_movies(movies: &[RatedTitle]) -> Report {
    format_ranked("lowest rated", movies)
}

pub fn format_accuracy(accuracy: f64) -> Report {
    Report::new().line(format!(
        "This user's predictions were accurate {:.2}% of the time.",
        accuracy
    ))
}

pub fn format_review_count(count: usize) -> Report {
    Report::new().line(format!("This user has {} reviews on record.", count))
}

pub fn format_summary(summary: &UserSummary) -> Report {
    let mut report = Report::new()
        .line(format!(
            "User {} (internal id {})",
            summary.external_id, summary.internal_id
        ))
        .line(format_review_count(summary.review_count).to_string());

    report = match summary.mean_rating {
        Some(mean) => report.line(format_mean_rating(mean).to_string()),
        None => report.line("This user has no ratings to average."),
    };
    match summary.accuracy {
        Some(accuracy) => report.line(format_accuracy(accuracy).to_string()),
        None => report,
    }
}

pub fn mean_rating(session: &Session) -> Result<Report> {
    Ok(format_mean_rating(session.mean_rating()?))
}

pub fn recommend(session: &mut Session, n: usize) -> Result<Report> {
    Ok(format_recommendations(&session.recommend(n)?))
}

pub fn top_movies(session: &mut Session, n: usize) -> Result<Report> {
    Ok(format_top_movies(&session.top_movies(n)?))
}

pub fn bottom_movies(session: &mut Session, n: usize) -> Result<Report> {
    Ok(format_bottom_movies(&session.bottom_movies(n)?))
}

pub fn accuracy(session: &Session) -> Result<Report> {
    Ok(format_accuracy(session.accuracy()?))
}

pub fn review_count(session: &Session) -> Result<Report> {
    Ok(format_review_count(session.review_count()?))
}

pub fn summary(session: &Session) -> Result<Report> {
    Ok(format_summary(&session.summary()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_display_joins_lines() {
        let report = Report::new().line("first").line("second");
        assert_eq!(report.to_string(), "first\nsecond");
        assert_eq!(Report::new().to_string(), "");
    }

    #[test]
    fn test_format_mean_and_accuracy() {
        assert_eq!(
            format_mean_rating(4.0).to_string(),
            "This user's average rating is 4.0."
        );
        assert_eq!(
            format_accuracy(66.67).to_string(),
            "This user's predictions were accurate 66.67% of the time."
        );
        assert_eq!(
            format_review_count(0).to_string(),
            "This user has 0 reviews on record."
        );
    }

    #[test]
    fn test_format_ranked_movies() {
        let movies = vec![
            RatedTitle { movie: 1, title: "Stalker".to_string(), score: 5.0 },
            RatedTitle { movie: 2, title: "Mirror".to_string(), score: 4.0 },
        ];

        let report = format_top_movies(&movies);

        assert_eq!(
            report.lines(),
            &[
                "Here are 2 of this user's top rated movies:".to_string(),
                "Stalker  (5/5)".to_string(),
                "Mirror  (4/5)".to_string(),
            ]
        );
        assert!(format_bottom_movies(&movies).lines()[0].contains("lowest rated"));
    }

    #[test]
    fn test_format_recommendations() {
        let recs = vec![Recommendation {
            movie: 3,
            title: "Solaris".to_string(),
            predicted_rating: 4.9,
        }];

        assert_eq!(
            format_recommendations(&recs).to_string(),
            "Suggestion: Solaris. Estimated rating: 4.9."
        );
    }

    #[test]
    fn test_format_summary_for_empty_user() {
        let summary = UserSummary {
            external_id: 200,
            internal_id: 2,
            review_count: 0,
            mean_rating: None,
            accuracy: None,
        };

        let report = format_summary(&summary);

        assert_eq!(report.lines().len(), 3);
        assert_eq!(report.lines()[2], "This user has no ratings to average.");
    }
}
