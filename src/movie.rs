use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// A row of the in-memory movies table, one per nominated movie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Movie {
    pub id: u32,
    pub year: i32,
    pub title: String,
    pub studios: String,
    /// Raw credit string as it appears in the dataset, comma-joined for
    /// co-productions ("Producer X, Producer Y").
    pub producers: String,
    pub winner: bool,
}

/// A movie row before the store has assigned it an id, produced by the CSV
/// loader and by accepted `POST /movies` bodies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMovie {
    pub year: i32,
    pub title: String,
    pub studios: String,
    pub producers: String,
    pub winner: bool,
}

impl From<CreateMovieRequest> for NewMovie {
    fn from(req: CreateMovieRequest) -> Self {
        Self {
            year: req.year,
            title: req.title,
            studios: req.studios,
            producers: req.producers,
            winner: req.winner,
        }
    }
}

/// Body of `POST /movies`.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateMovieRequest {
    #[validate(custom(function = validate_award_year))]
    #[schema(example = 1980)]
    pub year: i32,
    #[validate(length(min = 1, message = "title must not be empty"))]
    #[schema(example = "Can't Stop the Music")]
    pub title: String,
    #[validate(length(min = 1, message = "studios must not be empty"))]
    #[schema(example = "Associated Film Distribution")]
    pub studios: String,
    #[validate(length(min = 1, message = "producers must not be empty"))]
    #[schema(example = "Allan Carr")]
    pub producers: String,
    #[schema(example = true)]
    pub winner: bool,
}

/// The first Golden Raspberry ceremony covered the 1980 movie year; the
/// table schema allows anything from 1900 on.
const MIN_AWARD_YEAR: i32 = 1900;

fn validate_award_year(year: i32) -> Result<(), ValidationError> {
    let max_year = current_year();
    if year < MIN_AWARD_YEAR || year > max_year {
        let mut err = ValidationError::new("year");
        err.message = Some(format!("year must be between {MIN_AWARD_YEAR} and {max_year}").into());
        return Err(err);
    }
    Ok(())
}

fn current_year() -> i32 {
    use std::time::{SystemTime, UNIX_EPOCH};

    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    // Days-to-year conversion is enough here; off-by-a-day around New Year
    // does not matter for an upper bound on award years.
    1970 + (secs / 86_400 / 365) as i32
}
