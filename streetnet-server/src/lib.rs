//! HTTP service answering accessibility queries over a street network
//! loaded once at startup.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use std::time::Duration;

use axum::{
    BoxError, Router,
    error_handling::HandleErrorLayer,
    http::StatusCode,
    routing::{get, post},
};
use tower::{ServiceBuilder, limit::GlobalConcurrencyLimitLayer, timeout::TimeoutLayer};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use config::ServerConfig;
use error::ApiError;
use state::AppState;

/// Builds the service router with request limits from `config`
pub fn app(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/nearest", post(routes::nearest))
        .route("/route", post(routes::route))
        .route("/travel-times", post(routes::travel_times))
        .route("/ego-graph", post(routes::ego))
        .route("/reachable-area", post(routes::area))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .layer(TimeoutLayer::new(Duration::from_secs(
                    config.request_timeout_secs,
                )))
                .layer(GlobalConcurrencyLimitLayer::new(
                    config.max_concurrent_requests,
                )),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn handle_middleware_error(error: BoxError) -> ApiError {
    if error.is::<tower::timeout::error::Elapsed>() {
        ApiError::new(StatusCode::REQUEST_TIMEOUT, "Request timed out")
    } else {
        ApiError::internal(format!("Unhandled middleware error: {error}"))
    }
}
