use axum::{Json, extract::State};
use serde::Deserialize;

use crate::{
    app::AppState,
    classification::{AnalyzeOptions, ContentAnalysis},
};

#[derive(Debug, Deserialize)]
pub(crate) struct ClassifyRequest {
    #[serde(default)]
    text: String,
    #[serde(default)]
    capture_evidence: bool,
}

pub(crate) async fn classify_text(
    State(state): State<AppState>,
    Json(payload): Json<ClassifyRequest>,
) -> Json<ContentAnalysis> {
    let options = AnalyzeOptions {
        capture_evidence: payload.capture_evidence,
    };
    Json(state.ranker().classify(&payload.text, options))
}
