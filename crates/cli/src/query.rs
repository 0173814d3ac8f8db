//! Queries shared by the one-shot subcommands and the interactive shell.

use std::io::Write;

use anyhow::Result;
use serde::Serialize;
use session::{report, Report, Session};

/// One of the per-user queries, with its count argument where it has one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query {
    Mean,
    Recommend(usize),
    Top(usize),
    Bottom(usize),
    Accuracy,
    Reviews,
    Summary,
}

/// Write a value either as its report or as JSON
fn emit<T: Serialize, W: Write>(out: &mut W, value: &T, report: Report, json: bool) -> Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(value)?)?;
    } else {
        writeln!(out, "{}", report)?;
    }
    Ok(())
}

/// Run a query against the active user and write the result to `out`
pub fn run_query<W: Write>(session: &mut Session, query: Query, json: bool, out: &mut W) -> Result<()> {
    tracing::debug!("Running {:?}", query);

    match query {
        Query::Mean => {
            let mean = session.mean_rating()?;
            emit(out, &mean, report::format_mean_rating(mean), json)
        }
        Query::Recommend(n) => {
            let recs = session.recommend(n)?;
            emit(out, &recs, report::format_recommendations(&recs), json)
        }
        Query::Top(n) => {
            let movies = session.top_movies(n)?;
            emit(out, &movies, report::format_top_movies(&movies), json)
        }
        Query::Bottom(n) => {
            let movies = session.bottom_movies(n)?;
            emit(out, &movies, report::format_bottom_movies(&movies), json)
        }
        Query::Accuracy => {
            let accuracy = session.accuracy()?;
            emit(out, &accuracy, report::format_accuracy(accuracy), json)
        }
        Query::Reviews => {
            let count = session.review_count()?;
            emit(out, &count, report::format_review_count(count), json)
        }
        Query::Summary => {
            let summary = session.summary()?;
            emit(out, &summary, report::format_summary(&summary), json)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::{Dataset, PredictionRow, RatingEvent, TranslationMap};
    use session::{SessionError, UserSelector};

    fn create_test_session() -> Session {
        let mut dataset = Dataset::new(3);
        let mut translation = TranslationMap::default();
        translation.external_to_internal.insert(7, 0);
        for movie in 0..3 {
            translation.movie_to_id.insert(movie, movie as u64);
            translation.id_to_title.insert(movie as u64, format!("Film {}", movie));
        }
        dataset.set_translation(translation);
        dataset.insert_rating(RatingEvent { user: 0, movie: 0, score: 4.0 });
        dataset.insert_predictions(0, PredictionRow::new(vec![4.2, 3.1, 4.8]));

        let mut session = Session::with_seed(dataset, 9);
        session.set_active_user(UserSelector::Id(7)).unwrap();
        session
    }

    #[test]
    fn test_every_query_runs() {
        let mut session = create_test_session();

        for query in [
            Query::Mean,
            Query::Recommend(2),
            Query::Top(10),
            Query::Bottom(10),
            Query::Accuracy,
            Query::Reviews,
            Query::Summary,
        ] {
            let mut out = Vec::new();
            run_query(&mut session, query, false, &mut out).unwrap();
            run_query(&mut session, query, true, &mut out).unwrap();
            assert!(!out.is_empty());
        }
    }

    #[test]
    fn test_text_and_json_output() {
        let mut session = create_test_session();

        let mut text = Vec::new();
        run_query(&mut session, Query::Reviews, false, &mut text).unwrap();
        assert_eq!(String::from_utf8(text).unwrap(), "This user has 1 reviews on record.\n");

        let mut json = Vec::new();
        run_query(&mut session, Query::Mean, true, &mut json).unwrap();
        assert_eq!(String::from_utf8(json).unwrap(), "4.0\n");
    }

    #[test]
    fn test_usage_error_surfaces() {
        let mut session = create_test_session();

        let mut out = Vec::new();
        let err = run_query(&mut session, Query::Recommend(25), false, &mut out).unwrap_err();
        assert!(out.is_empty());
        assert!(matches!(
            err.downcast_ref::<SessionError>(),
            Some(SessionError::Usage(_))
        ));
    }
}
