pub(crate) mod classify;
pub(crate) mod health;
pub(crate) mod metrics;
pub(crate) mod profile;
pub(crate) mod rank;

use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, post},
};
use serde::Serialize;

use crate::app::AppState;

pub(crate) fn router(state: AppState) -> Router {
    Router::new()
        .route("/health/ready", get(health::ready))
        .route("/health/live", get(health::live))
        .route("/metrics", get(metrics::exporter))
        .route("/v1/profile", get(profile::show))
        .route("/v1/films/rank", post(rank::rank_film))
        .route("/v1/films/rank/batch", post(rank::rank_batch))
        .route("/v1/classify", post(classify::classify_text))
        .with_state(state)
}

#[derive(Debug, Serialize)]
pub(crate) struct ErrorResponse {
    error: String,
}

pub(crate) fn reject(
    state: &AppState,
    status: StatusCode,
    message: impl Into<String>,
) -> (StatusCode, Json<ErrorResponse>) {
    state.telemetry().metrics().rejected_requests.inc();
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}
