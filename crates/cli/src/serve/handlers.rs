//! HTTP route handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use pensum_core::{CalculationRequest, RequestError};
use pensum_eval::EvalContext;

use super::problem;
use super::state::AppState;

/// Fallback handler for unmatched routes.
pub(crate) async fn handle_not_found() -> impl IntoResponse {
    problem(StatusCode::NOT_FOUND, "not found")
}

/// GET /health
pub(crate) async fn handle_health() -> impl IntoResponse {
    let body = serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    });
    (StatusCode::OK, Json(body))
}

/// A problem document enumerating the fields a request was rejected for.
fn validation_problem(error: &RequestError) -> impl IntoResponse {
    let body = serde_json::json!({
        "type": "about:blank",
        "title": "invalid calculation request",
        "status": StatusCode::BAD_REQUEST.as_u16(),
        "invalid_fields": error.problems,
    });
    (StatusCode::BAD_REQUEST, Json(body))
}

/// POST /calculation-requests
///
/// Business validation never reaches 4xx: once the document parses and
/// validates, the response is 200 and the outcome field carries
/// SUCCESS/FAILURE. The synchronous engine runs inside `spawn_blocking`.
pub(crate) async fn handle_calculate(
    State(state): State<Arc<AppState>>,
    body: String,
) -> impl IntoResponse {
    let document: serde_json::Value = match serde_json::from_str(&body) {
        Ok(value) => value,
        Err(e) => {
            return problem(
                StatusCode::BAD_REQUEST,
                &format!("malformed JSON body: {}", e),
            )
            .into_response()
        }
    };

    let request = match CalculationRequest::from_json(&document) {
        Ok(request) => request,
        Err(e) => return validation_problem(&e).into_response(),
    };

    let rates = state.rates.clone();
    let result = tokio::task::spawn_blocking(move || {
        let ctx = EvalContext::new(rates.as_ref());
        pensum_eval::evaluate_request(&request, &ctx)
    })
    .await;

    match result {
        Ok(Ok(response)) => (StatusCode::OK, Json(response)).into_response(),
        Ok(Err(e)) => {
            tracing::error!(error = %e, "evaluation failed");
            problem(StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "evaluation task panicked");
            problem(StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
        }
    }
}
