use axum::Json;
use axum::extract::State;
use tracing::instrument;

use crate::contest::{phase, photos, results};
use crate::entity::contest_settings::ContestPhase;
use crate::error::AppError;
use crate::models::results::ResultsResponse;
use crate::models::settings::SettingsResponse;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/settings",
    tag = "Public",
    operation_id = "getSettings",
    summary = "Current contest phase and upload rules",
    responses((status = 200, description = "Contest settings", body = SettingsResponse)),
)]
#[instrument(skip(state))]
pub async fn get_settings(State(state): State<AppState>) -> Result<Json<SettingsResponse>, AppError> {
    Ok(Json(phase::get_settings(&state.db).await?.into()))
}

#[utoipa::path(
    get,
    path = "/results",
    tag = "Public",
    operation_id = "getResults",
    summary = "Contest podium",
    description = "Top three photos by votes once the contest reaches RESULTS; `results` is `null` before that. \
        Ties go to the earlier upload.",
    responses((status = 200, description = "Results", body = ResultsResponse)),
)]
#[instrument(skip(state))]
pub async fn get_results(State(state): State<AppState>) -> Result<Json<ResultsResponse>, AppError> {
    let phase = phase::get_phase(&state.db).await?;
    let candidates = if phase == ContestPhase::Results {
        photos::list_photos(&state.db).await?
    } else {
        Vec::new()
    };
    let results = results::project(phase, candidates);
    Ok(Json(ResultsResponse { phase, results }))
}
