//! CSV ingestion for the movies dataset
//!
//! The dataset is semicolon-delimited with a
//! `year;title;studios;producers;winner` header. The `winner` column holds
//! `yes` for awarded movies and is empty (or missing entirely on short
//! rows) for plain nominations.

use std::path::Path;

use serde::Deserialize;

use crate::error::ApiError;
use crate::movie::NewMovie;

#[derive(Debug, Deserialize)]
struct CsvRow {
    year: i32,
    title: String,
    studios: String,
    producers: String,
    #[serde(default)]
    winner: Option<String>,
}

impl From<CsvRow> for NewMovie {
    fn from(row: CsvRow) -> Self {
        NewMovie {
            year: row.year,
            title: row.title,
            studios: row.studios,
            producers: row.producers,
            winner: is_winner(row.winner.as_deref()),
        }
    }
}

fn is_winner(flag: Option<&str>) -> bool {
    flag.map(|f| f.trim().eq_ignore_ascii_case("yes"))
        .unwrap_or(false)
}

/// Read the movies CSV at `path`. Rows with a non-numeric year or missing
/// required columns are rejected here so malformed data never reaches the
/// interval calculation.
pub fn load_movies(path: &Path) -> Result<Vec<NewMovie>, ApiError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_path(path)?;

    let mut movies = Vec::new();
    for row in reader.deserialize::<CsvRow>() {
        movies.push(row?.into());
    }

    tracing::info!(count = movies.len(), path = %path.display(), "loaded movies dataset");
    Ok(movies)
}
