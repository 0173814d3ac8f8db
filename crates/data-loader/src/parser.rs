//! Parsers for the three inputs.
//!
//! - ratings CSV: header row, columns `user`, `movie`, `rating_score` (others ignored)
//! - predictions CSV: either one row per movie (`MovieRows`) or one row per user (`UserRows`),
//!   first column is the row label
//! - translation JSON: `userid_to_user`, `movie_to_id`, `id_to_title`
//!
//! Parsers work on text that has already been fetched, so they are oblivious to
//! whether it came from a URL or a file.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use csv::StringRecord;
use rayon::prelude::*;
use serde::Deserialize;
use serde_json::Value;
use std::collections::{HashMap, HashSet};

/// Parse an identifier written either as `42` or as `42.0`
///
/// Tables exported from dataframes sometimes carry integer ids as floats.
pub fn parse_id(field: &str, raw: &str) -> Result<u64> {
    let raw = raw.trim();
    if let Ok(id) = raw.parse::<u64>() {
        return Ok(id);
    }
    match raw.parse::<f64>() {
        Ok(f) if f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => Ok(f as u64),
        _ => Err(DataLoadError::InvalidValue {
            field: field.to_string(),
            value: raw.to_string(),
        }),
    }
}

fn csv_error(file: &str, err: csv::Error) -> DataLoadError {
    let line = err.position().map(|p| p.line() as usize).unwrap_or(0);
    DataLoadError::ParseError {
        file: file.to_string(),
        line,
        reason: err.to_string(),
    }
}

fn record_line(record: &StringRecord) -> usize {
    record.position().map(|p| p.line() as usize).unwrap_or(0)
}

fn reader(text: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes())
}

/// Parse the ratings table
pub fn parse_ratings(text: &str, file: &str) -> Result<Vec<RatingEvent>> {
    let mut reader = reader(text);
    let mut ratings = Vec::new();

    for result in reader.deserialize::<RatingEvent>() {
        let rating = result.map_err(|e| csv_error(file, e))?;
        ratings.push(rating);
    }

    Ok(ratings)
}

/// Parse a predictions table into one dense row per user
///
/// Row lengths are not checked against the catalog here; `Dataset::validate`
/// does that for both layouts. `catalog_size` is only needed to place
/// movie rows when the table has to be transposed.
pub fn parse_predictions(
    text: &str,
    file: &str,
    layout: PredictionLayout,
    catalog_size: usize,
) -> Result<HashMap<InternalUserId, PredictionRow>> {
    let mut reader = reader(text);
    let headers = reader.headers().map_err(|e| csv_error(file, e))?.clone();

    let records = reader
        .records()
        .collect::<std::result::Result<Vec<StringRecord>, csv::Error>>()
        .map_err(|e| csv_error(file, e))?;

    match layout {
        PredictionLayout::UserRows => parse_user_rows(&headers, &records, file),
        PredictionLayout::MovieRows => parse_movie_rows(&headers, &records, file, catalog_size),
    }
}

fn parse_score(file: &str, line: usize, raw: &str) -> Result<f64> {
    raw.parse::<f64>().map_err(|e| DataLoadError::ParseError {
        file: file.to_string(),
        line,
        reason: format!("Invalid predicted rating '{}': {}", raw, e),
    })
}

/// Parse the label column and the scores of one record
fn parse_labelled_row(record: &StringRecord, file: &str, label: &str) -> Result<(u64, Vec<f64>)> {
    let line = record_line(record);
    let raw_label = record.get(0).ok_or_else(|| DataLoadError::ParseError {
        file: file.to_string(),
        line,
        reason: format!("Missing {}", label),
    })?;
    let id = parse_id(label, raw_label).map_err(|e| DataLoadError::ParseError {
        file: file.to_string(),
        line,
        reason: e.to_string(),
    })?;

    let scores = record
        .iter()
        .skip(1)
        .map(|raw| parse_score(file, line, raw))
        .collect::<Result<Vec<f64>>>()?;

    Ok((id, scores))
}

/// Layout: `,0,1,...,N-1` then `<user>,<pred>,...`
fn parse_user_rows(
    headers: &StringRecord,
    records: &[StringRecord],
    file: &str,
) -> Result<HashMap<InternalUserId, PredictionRow>> {
    // Columns must be the catalog positions in order, otherwise indexing by
    // movie would silently read the wrong prediction
    for (position, raw) in headers.iter().skip(1).enumerate() {
        let movie = parse_id("movie column", raw)?;
        if movie != position as u64 {
            return Err(DataLoadError::ParseError {
                file: file.to_string(),
                line: 1,
                reason: format!("Column {} is labelled '{}'", position + 1, raw),
            });
        }
    }

    let rows = records
        .par_iter()
        .map(|record| parse_labelled_row(record, file, "user"))
        .collect::<Result<Vec<_>>>()?;

    let mut table = HashMap::with_capacity(rows.len());
    for (record, (user, scores)) in records.iter().zip(rows) {
        if table.insert(user, PredictionRow::new(scores)).is_some() {
            return Err(DataLoadError::ParseError {
                file: file.to_string(),
                line: record_line(record),
                reason: format!("Duplicate row for user {}", user),
            });
        }
    }
    Ok(table)
}

/// Layout: `,<user>,<user>,...` then `<movie>,<pred>,...`; transposed on load
fn parse_movie_rows(
    headers: &StringRecord,
    records: &[StringRecord],
    file: &str,
    catalog_size: usize,
) -> Result<HashMap<InternalUserId, PredictionRow>> {
    let users = headers
        .iter()
        .skip(1)
        .map(|raw| parse_id("user column", raw))
        .collect::<Result<Vec<InternalUserId>>>()?;

    let mut seen_users = HashSet::with_capacity(users.len());
    for &user in &users {
        if !seen_users.insert(user) {
            return Err(DataLoadError::ParseError {
                file: file.to_string(),
                line: 1,
                reason: format!("Duplicate column for user {}", user),
            });
        }
    }

    let rows = records
        .par_iter()
        .map(|record| {
            parse_labelled_row(record, file, "movie").map(|(movie, scores)| {
                (movie as usize, scores, record_line(record))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut columns = vec![vec![f64::NAN; catalog_size]; users.len()];
    let mut seen = vec![false; catalog_size];

    for (movie, scores, line) in rows {
        if movie >= catalog_size {
            return Err(DataLoadError::ParseError {
                file: file.to_string(),
                line,
                reason: format!("Movie {} is outside the catalog of {}", movie, catalog_size),
            });
        }
        if seen[movie] {
            return Err(DataLoadError::ParseError {
                file: file.to_string(),
                line,
                reason: format!("Duplicate row for movie {}", movie),
            });
        }
        seen[movie] = true;
        for (column, score) in columns.iter_mut().zip(scores) {
            column[movie] = score;
        }
    }

    let covered = seen.iter().filter(|&&s| s).count();
    if covered != catalog_size {
        return Err(DataLoadError::CatalogMismatch {
            user: users.first().copied().unwrap_or_default(),
            expected: catalog_size,
            found: covered,
        });
    }

    Ok(users
        .into_iter()
        .zip(columns)
        .map(|(user, column)| (user, PredictionRow::new(column)))
        .collect())
}

#[derive(Deserialize)]
struct RawTranslation {
    userid_to_user: HashMap<String, Value>,
    movie_to_id: HashMap<String, Value>,
    id_to_title: HashMap<String, Value>,
}

fn value_to_id(field: &str, value: &Value) -> Result<u64> {
    match value {
        Value::Number(n) => match n.as_u64() {
            Some(id) => Ok(id),
            None => parse_id(field, &n.to_string()),
        },
        Value::String(s) => parse_id(field, s),
        other => Err(DataLoadError::InvalidValue {
            field: field.to_string(),
            value: other.to_string(),
        }),
    }
}

fn value_to_title(movie_id: MovieId, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(DataLoadError::InvalidValue {
            field: format!("title of movie {}", movie_id),
            value: other.to_string(),
        }),
    }
}

/// Parse the translation map
///
/// JSON object keys are always strings; values may be numbers or numeric strings.
pub fn parse_translation(text: &str) -> Result<TranslationMap> {
    let raw: RawTranslation = serde_json::from_str(text)?;

    let mut map = TranslationMap::default();

    for (key, value) in &raw.userid_to_user {
        let external = parse_id("userid_to_user key", key)?;
        let internal = value_to_id("userid_to_user value", value)?;
        map.external_to_internal.insert(external, internal);
    }

    for (key, value) in &raw.movie_to_id {
        let movie = parse_id("movie_to_id key", key)? as MovieIndex;
        let movie_id = value_to_id("movie_to_id value", value)?;
        map.movie_to_id.insert(movie, movie_id);
    }

    for (key, value) in &raw.id_to_title {
        let movie_id = parse_id("id_to_title key", key)?;
        map.id_to_title.insert(movie_id, value_to_title(movie_id, value)?);
    }

    Ok(map)
}
