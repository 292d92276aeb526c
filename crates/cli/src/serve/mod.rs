//! `pensum serve` -- HTTP JSON API for the calculation engine.
//!
//! Endpoints:
//! - GET  /health                 - liveness probe
//! - POST /calculation-requests   - evaluate a calculation request
//!
//! A request that parses and validates always yields HTTP 200, whether
//! the business outcome is SUCCESS or FAILURE. Malformed or
//! schema-invalid input yields HTTP 400 with a problem document listing
//! the offending fields; unexpected evaluation failures yield HTTP 500
//! with a generic problem document.

mod handlers;
mod state;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};

use pensum_eval::AccrualRateProvider;

use self::handlers::{handle_calculate, handle_health, handle_not_found};
use self::state::AppState;

/// Maximum request body size: 1 MB.
const MAX_BODY_SIZE: usize = 1024 * 1024;

/// A problem-details document with the given status and title.
fn problem(status: StatusCode, title: &str) -> impl IntoResponse {
    let body = serde_json::json!({
        "type": "about:blank",
        "title": title,
        "status": status.as_u16(),
    });
    (status, Json(body))
}

/// Build the application router.
pub(crate) fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/calculation-requests", post(handle_calculate))
        .fallback(handle_not_found)
        .layer(cors)
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .with_state(state)
}

/// Start the HTTP server on the given port.
pub async fn start_server(
    port: u16,
    rates: Arc<dyn AccrualRateProvider>,
) -> Result<(), Box<dyn std::error::Error>> {
    let state = Arc::new(AppState { rates });
    let app = router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "pensum listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server shut down");
    Ok(())
}

/// Wait for a shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl+C handler");
    tracing::info!("received shutdown signal");
}
