use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use utoipa::ToSchema;
use validator::Validate;

use crate::cache::IntervalCache;
use crate::config::Config;
use crate::error::ApiError;
use crate::intervals::{compute_intervals, IntervalResult};
use crate::movie::{CreateMovieRequest, Movie};
use crate::rate_limiter::RateLimiter;
use crate::store::MovieStore;

/// Shared application state
pub type SharedState = Arc<AppState>;

/// Application state: the in-memory movie table plus the interval cache and
/// the request limiter.
pub struct AppState {
    pub store: RwLock<MovieStore>,
    pub cache: IntervalCache,
    pub limiter: RateLimiter,
}

impl AppState {
    pub fn new(config: &Config, store: MovieStore) -> Self {
        Self {
            store: RwLock::new(store),
            cache: IntervalCache::new(config.cache_ttl),
            limiter: RateLimiter::new(config.rate_limit_max, config.rate_limit_window),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub movies_loaded: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedResponse {
    pub message: String,
    pub id: u32,
}

/// Min and max award intervals across all winning producers.
///
/// The computed result is cached for the configured TTL; inserting a movie
/// invalidates the cache so the next call recomputes over the new table.
#[utoipa::path(
    get,
    path = "/producers/intervals",
    tag = "producers",
    responses(
        (status = 200, description = "Producers with the smallest and largest gap between consecutive wins", body = IntervalResult),
        (status = 429, description = "Rate limit exceeded"),
    )
)]
pub async fn get_producer_intervals(
    State(state): State<SharedState>,
) -> Result<Json<IntervalResult>, ApiError> {
    if let Some(cached) = state.cache.get()? {
        tracing::debug!("serving intervals from cache");
        return Ok(Json(cached));
    }

    let wins = state.store.read().await.winners();
    let result = compute_intervals(&wins);
    state.cache.put(result.clone())?;

    Ok(Json(result))
}

/// Add a movie to the in-memory table.
#[utoipa::path(
    post,
    path = "/movies",
    tag = "movies",
    request_body = CreateMovieRequest,
    responses(
        (status = 201, description = "Movie added", body = CreatedResponse),
        (status = 400, description = "Validation failed"),
    )
)]
pub async fn create_movie(
    State(state): State<SharedState>,
    Json(payload): Json<CreateMovieRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;

    let movie = state.store.write().await.insert(payload.into());
    // The dataset changed, so any cached interval result is stale.
    state.cache.invalidate()?;

    tracing::info!(id = movie.id, year = movie.year, title = %movie.title, "movie added");

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "Movie added successfully".to_string(),
            id: movie.id,
        }),
    ))
}

/// List the current contents of the movie table.
#[utoipa::path(
    get,
    path = "/movies",
    tag = "movies",
    responses(
        (status = 200, description = "All movies currently loaded", body = [Movie]),
    )
)]
pub async fn list_movies(State(state): State<SharedState>) -> Json<Vec<Movie>> {
    Json(state.store.read().await.all().to_vec())
}

/// Service health.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_check(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        movies_loaded: state.store.read().await.len(),
    })
}

/// Service index, standing in for the original static landing page.
pub async fn index() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "service": "awards-api",
        "version": env!("CARGO_PKG_VERSION"),
        "docs": "/api-docs",
        "endpoints": ["/producers/intervals", "/movies", "/health"],
    }))
}

/// Fallback for unknown routes.
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
