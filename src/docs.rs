/// OpenAPI documentation for the awards API
use utoipa::OpenApi;

use crate::handlers;
use crate::intervals::{Interval, IntervalResult};
use crate::movie::{CreateMovieRequest, Movie};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Golden Raspberry API",
        version = "1.0.0",
        description = "API for querying Golden Raspberry Awards winners: the producers with the shortest and longest gaps between consecutive wins.",
        license(name = "MIT")
    ),
    paths(
        handlers::get_producer_intervals,
        handlers::create_movie,
        handlers::list_movies,
        handlers::health_check,
    ),
    components(schemas(
        Interval,
        IntervalResult,
        Movie,
        CreateMovieRequest,
        handlers::HealthResponse,
        handlers::CreatedResponse,
    )),
    tags(
        (name = "producers", description = "Award interval queries"),
        (name = "movies", description = "Movie table access"),
        (name = "health", description = "Service health checks"),
    )
)]
pub struct ApiDoc;
