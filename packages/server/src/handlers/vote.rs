use axum::Json;
use axum::extract::State;
use tracing::instrument;

use crate::contest::votes;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::auth::MessageResponse;
use crate::models::vote::{CastVoteRequest, VoteResponse};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/votes",
    tag = "Votes",
    operation_id = "castVote",
    summary = "Cast the caller's vote",
    description = "Each judge holds at most one vote. Only during JUDGING.",
    request_body = CastVoteRequest,
    responses(
        (status = 200, description = "Vote recorded", body = VoteResponse),
        (status = 400, description = "Phase closed or already voted (PHASE_CLOSED, ALREADY_VOTED, VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID, PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Photo not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id, photo_id = payload.photo_id))]
pub async fn cast_vote(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CastVoteRequest>,
) -> Result<Json<VoteResponse>, AppError> {
    let vote = votes::cast_vote(&state.db, &auth_user, payload.photo_id).await?;
    Ok(Json(vote.into()))
}

#[utoipa::path(
    delete,
    path = "/votes",
    tag = "Votes",
    operation_id = "retractVote",
    summary = "Withdraw the caller's vote",
    description = "Only during JUDGING.",
    responses(
        (status = 200, description = "Vote withdrawn", body = MessageResponse),
        (status = 400, description = "Phase closed (PHASE_CLOSED)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID, PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "No vote to withdraw (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn retract_vote(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, AppError> {
    votes::retract_vote(&state.db, &auth_user).await?;
    Ok(Json(MessageResponse::new("Voto eliminado correctamente")))
}
