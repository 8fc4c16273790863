use std::sync::Arc;
use std::time::Duration;

use awards_api::config::Config;
use awards_api::handlers::AppState;
use awards_api::movie::NewMovie;
use awards_api::server::create_app;
use awards_api::store::MovieStore;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

fn movie(year: i32, title: &str, producers: &str, winner: bool) -> NewMovie {
    NewMovie {
        year,
        title: title.to_string(),
        studios: "Studio".to_string(),
        producers: producers.to_string(),
        winner,
    }
}

fn test_app_with_config(config: Config, rows: Vec<NewMovie>) -> Router {
    let store = MovieStore::from_rows(rows);
    create_app(Arc::new(AppState::new(&config, store)))
}

fn test_app(rows: Vec<NewMovie>) -> Router {
    test_app_with_config(Config::default(), rows)
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn intervals_returns_min_and_max_producers() {
    let app = test_app(vec![
        movie(1980, "Movie A1", "Producer A", true),
        movie(1981, "Movie A2", "Producer A", true),
        movie(1990, "Movie B1", "Producer B", true),
        movie(2003, "Movie B2", "Producer B", true),
        movie(2005, "Movie C1", "Producer C", true),
        movie(2010, "Movie C2", "Producer C", true),
    ]);

    let (status, body) = get_json(&app, "/producers/intervals").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "min": [{
                "producer": "Producer A",
                "interval": 1,
                "previousWin": 1980,
                "followingWin": 1981
            }],
            "max": [{
                "producer": "Producer B",
                "interval": 13,
                "previousWin": 1990,
                "followingWin": 2003
            }]
        })
    );
}

#[tokio::test]
async fn intervals_reports_all_tied_producers() {
    let app = test_app(vec![
        movie(2000, "Movie A1", "Producer A", true),
        movie(2005, "Movie A2", "Producer A", true),
        movie(2010, "Movie B1", "Producer B", true),
        movie(2015, "Movie B2", "Producer B", true),
    ]);

    let (status, body) = get_json(&app, "/producers/intervals").await;

    assert_eq!(status, StatusCode::OK);
    let expected = json!([
        {
            "producer": "Producer A",
            "interval": 5,
            "previousWin": 2000,
            "followingWin": 2005
        },
        {
            "producer": "Producer B",
            "interval": 5,
            "previousWin": 2010,
            "followingWin": 2015
        }
    ]);
    assert_eq!(body["min"], expected);
    assert_eq!(body["max"], expected);
}

#[tokio::test]
async fn intervals_is_empty_when_no_producer_repeats() {
    let app = test_app(vec![
        movie(1980, "Movie A", "Producer A", true),
        movie(1981, "Movie B", "Producer B", true),
        movie(1982, "Movie C", "Producer C", false),
    ]);

    let (status, body) = get_json(&app, "/producers/intervals").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "min": [], "max": [] }));
}

#[tokio::test]
async fn post_movie_invalidates_the_cached_intervals() {
    let app = test_app(vec![
        movie(1980, "Movie A1", "Producer A", true),
        movie(1981, "Movie A2", "Producer A", true),
    ]);

    // Prime the cache.
    let (_, body) = get_json(&app, "/producers/intervals").await;
    assert_eq!(body["max"][0]["producer"], "Producer A");

    for year in [1990, 2005] {
        let (status, body) = post_json(
            &app,
            "/movies",
            json!({
                "year": year,
                "title": format!("Movie B {year}"),
                "studios": "Studio B",
                "producers": "Producer B",
                "winner": true
            }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Movie added successfully");
    }

    // The new producer's 15-year gap must show up immediately, not after
    // the cache TTL.
    let (_, body) = get_json(&app, "/producers/intervals").await;
    assert_eq!(body["max"][0]["producer"], "Producer B");
    assert_eq!(body["max"][0]["interval"], 15);
}

#[tokio::test]
async fn post_movie_rejects_invalid_bodies() {
    let app = test_app(vec![]);

    let (status, body) = post_json(
        &app,
        "/movies",
        json!({
            "year": 1700,
            "title": "",
            "studios": "Studio",
            "producers": "Producer",
            "winner": true
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let errors = body["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 2);
    let fields: Vec<&str> = errors.iter().map(|e| e["field"].as_str().unwrap()).collect();
    assert!(fields.contains(&"year"));
    assert!(fields.contains(&"title"));
}

#[tokio::test]
async fn list_movies_returns_the_seeded_table() {
    let app = test_app(vec![
        movie(1980, "Movie A", "Producer A", true),
        movie(1981, "Movie B", "Producer B", false),
    ]);

    let (status, body) = get_json(&app, "/movies").await;

    assert_eq!(status, StatusCode::OK);
    let movies = body.as_array().unwrap();
    assert_eq!(movies.len(), 2);
    assert_eq!(movies[0]["id"], 1);
    assert_eq!(movies[0]["title"], "Movie A");
    assert_eq!(movies[1]["winner"], false);
}

#[tokio::test]
async fn unknown_routes_return_the_json_404_shape() {
    let app = test_app(vec![]);

    let (status, body) = get_json(&app, "/does-not-exist").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Route not found" }));
}

#[tokio::test]
async fn health_reports_loaded_movie_count() {
    let app = test_app(vec![movie(1980, "Movie A", "Producer A", true)]);

    let (status, body) = get_json(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["movies_loaded"], 1);
}

#[tokio::test]
async fn requests_beyond_the_rate_limit_get_429() {
    let config = Config {
        rate_limit_max: 2,
        rate_limit_window: Duration::from_secs(60),
        ..Config::default()
    };
    let app = test_app_with_config(config, vec![]);

    for _ in 0..2 {
        let (status, _) = get_json(&app, "/health").await;
        assert_eq!(status, StatusCode::OK);
    }

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().contains_key("Retry-After"));
    assert_eq!(
        response.headers()["X-RateLimit-Remaining"],
        axum::http::HeaderValue::from_static("0")
    );
}

#[tokio::test]
async fn rate_limit_headers_are_set_on_allowed_responses() {
    let app = test_app(vec![]);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["X-RateLimit-Limit"],
        axum::http::HeaderValue::from_static("100")
    );
    assert_eq!(
        response.headers()["X-RateLimit-Remaining"],
        axum::http::HeaderValue::from_static("99")
    );
}

#[tokio::test]
async fn security_headers_are_set_on_every_response() {
    let app = test_app(vec![movie(1980, "Movie A", "Producer A", true)]);

    for uri in ["/producers/intervals", "/does-not-exist"] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(
            response.headers()["x-content-type-options"],
            axum::http::HeaderValue::from_static("nosniff"),
            "missing nosniff on {uri}"
        );
        assert_eq!(
            response.headers()["x-frame-options"],
            axum::http::HeaderValue::from_static("SAMEORIGIN"),
            "missing frame options on {uri}"
        );
        assert_eq!(
            response.headers()["x-dns-prefetch-control"],
            axum::http::HeaderValue::from_static("off"),
            "missing dns prefetch control on {uri}"
        );
    }
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = test_app(vec![]);

    let (status, body) = get_json(&app, "/api-docs/openapi.json").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["info"]["title"], "Golden Raspberry API");
    assert!(body["paths"]["/producers/intervals"].is_object());
}
