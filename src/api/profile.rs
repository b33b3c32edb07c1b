use axum::{Json, extract::State};

use crate::{app::AppState, profile::ProfileSummary};

pub(crate) async fn show(State(state): State<AppState>) -> Json<ProfileSummary> {
    Json(state.profile().summary())
}
