use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{header, HeaderName, HeaderValue};
use axum::routing::get;
use axum::{middleware, Router};
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::docs::ApiDoc;
use crate::error::ApiError;
use crate::handlers::{
    create_movie, get_producer_intervals, health_check, index, list_movies, not_found, AppState,
    SharedState,
};
use crate::loader::load_movies;
use crate::middleware::{logging_middleware, rate_limit_middleware};
use crate::store::MovieStore;

/// Build the full router over the given state. Split out from `Server` so
/// tests can drive the app in-process without binding a socket.
pub fn create_app(state: SharedState) -> Router {
    let api = Router::new()
        .route("/", get(index))
        .route("/producers/intervals", get(get_producer_intervals))
        .route("/movies", get(list_movies).post(create_movie))
        .route("/health", get(health_check))
        .fallback(not_found)
        .with_state(state.clone());

    api.merge(SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                // Security headers on every response
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_FRAME_OPTIONS,
                    HeaderValue::from_static("SAMEORIGIN"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    HeaderName::from_static("x-dns-prefetch-control"),
                    HeaderValue::from_static("off"),
                ))
                .layer(middleware::from_fn(logging_middleware))
                .layer(middleware::from_fn_with_state(state, rate_limit_middleware)),
        )
}

pub struct Server {
    app: Router,
    state: SharedState,
    bind_addr: SocketAddr,
    rate_limit_window: std::time::Duration,
}

impl Server {
    /// Load the dataset and assemble the application.
    pub fn new(config: Config) -> Result<Self, ApiError> {
        let movies = load_movies(&config.data_path)?;
        let store = MovieStore::from_rows(movies);
        let state: SharedState = Arc::new(AppState::new(&config, store));

        Ok(Self {
            app: create_app(state.clone()),
            state,
            bind_addr: config.bind_addr,
            rate_limit_window: config.rate_limit_window,
        })
    }

    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let listener = tokio::net::TcpListener::bind(self.bind_addr).await?;

        // Periodically drop rate-limit windows that have fully elapsed so
        // the per-client map does not grow without bound.
        let state = self.state.clone();
        let mut cleanup = tokio::time::interval(self.rate_limit_window);
        tokio::spawn(async move {
            loop {
                cleanup.tick().await;
                match state.limiter.cleanup_expired() {
                    Ok(dropped) if dropped > 0 => {
                        tracing::debug!(dropped, "cleaned up expired rate-limit windows");
                    }
                    Ok(_) => {}
                    Err(e) => tracing::warn!(error = %e, "rate-limit cleanup failed"),
                }
            }
        });

        tracing::info!("awards-api listening on {}", self.bind_addr);
        tracing::info!("Swagger UI available at /api-docs");

        axum::serve(
            listener,
            self.app
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("received Ctrl+C, shutting down");
        },
        _ = terminate => {
            tracing::info!("received terminate signal, shutting down");
        },
    }
}
