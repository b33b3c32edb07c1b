use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::{
    api::reject,
    app::AppState,
    pipeline::{FilmRequest, RankedFilm},
};

#[derive(Debug, Deserialize)]
pub(crate) struct BatchRequest {
    #[serde(default)]
    films: Vec<FilmRequest>,
}

#[derive(Debug, Serialize)]
struct BatchResponse {
    films: Vec<RankedFilm>,
}

pub(crate) async fn rank_film(
    State(state): State<AppState>,
    Json(payload): Json<FilmRequest>,
) -> impl IntoResponse {
    if payload.film_id.trim().is_empty() {
        return reject(&state, StatusCode::BAD_REQUEST, "film_id must not be empty")
            .into_response();
    }

    // 採点と全文分類はCPU処理なので非同期ワーカーから外す
    let ranker = state.ranker();
    match tokio::task::spawn_blocking(move || ranker.rank(payload)).await {
        Ok(ranked) => (StatusCode::OK, Json(ranked)).into_response(),
        Err(join_error) => {
            error!(error = %join_error, "film ranking task failed");
            reject(&state, StatusCode::INTERNAL_SERVER_ERROR, "film ranking failed")
                .into_response()
        }
    }
}

pub(crate) async fn rank_batch(
    State(state): State<AppState>,
    Json(payload): Json<BatchRequest>,
) -> impl IntoResponse {
    let limit = state.config().max_batch_films().get();
    if payload.films.len() > limit {
        let message = format!(
            "batch of {} films exceeds the limit of {limit}",
            payload.films.len()
        );
        return reject(&state, StatusCode::PAYLOAD_TOO_LARGE, message).into_response();
    }
    if let Some(index) = payload
        .films
        .iter()
        .position(|film| film.film_id.trim().is_empty())
    {
        let message = format!("films[{index}].film_id must not be empty");
        return reject(&state, StatusCode::BAD_REQUEST, message).into_response();
    }

    let film_count = payload.films.len();
    let ranker = state.ranker();
    let ranked = tokio::task::spawn_blocking(move || ranker.rank_batch(payload.films)).await;

    match ranked {
        Ok(films) => {
            info!(films = film_count, "batch ranked");
            (StatusCode::OK, Json(BatchResponse { films })).into_response()
        }
        Err(join_error) => {
            error!(error = %join_error, "batch ranking task failed");
            reject(
                &state,
                StatusCode::INTERNAL_SERVER_ERROR,
                "batch ranking failed",
            )
            .into_response()
        }
    }
}
