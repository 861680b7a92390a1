use chrono::Utc;
use sea_orm::sea_query::{Expr, ExprTrait};
use sea_orm::*;
use tracing::info;

use crate::entity::contest_settings::ContestPhase;
use crate::entity::{photo, vote};
use crate::error::AppError;
use crate::extractors::auth::AuthUser;

use super::phase;

/// Record the caller's single vote and bump the photo's counter in one transaction.
pub async fn cast_vote(
    db: &DatabaseConnection,
    auth_user: &AuthUser,
    photo_id: i32,
) -> Result<vote::Model, AppError> {
    auth_user.require_permission("vote:cast")?;
    phase::require_phase(
        phase::get_phase(db).await?,
        ContestPhase::Judging,
        "El período de evaluación no está activo",
    )?;

    let txn = db.begin().await?;

    if current_vote(&txn, auth_user.user_id).await?.is_some() {
        return Err(AppError::AlreadyVoted);
    }

    photo::Entity::find_by_id(photo_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Foto no encontrada".into()))?;

    let model = vote::ActiveModel {
        judge_id: Set(auth_user.user_id),
        photo_id: Set(photo_id),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::AlreadyVoted,
        _ => AppError::from(e),
    })?;

    adjust_vote_count(&txn, photo_id, 1).await?;
    txn.commit().await?;

    info!(judge_id = auth_user.user_id, photo_id, "Vote cast");
    Ok(model)
}

/// Withdraw the caller's vote and decrement the photo's counter in one transaction.
pub async fn retract_vote(db: &DatabaseConnection, auth_user: &AuthUser) -> Result<(), AppError> {
    auth_user.require_permission("vote:cast")?;
    phase::require_phase(
        phase::get_phase(db).await?,
        ContestPhase::Judging,
        "El período de evaluación ha cerrado",
    )?;

    let txn = db.begin().await?;

    let existing = current_vote(&txn, auth_user.user_id)
        .await?
        .ok_or_else(no_vote)?;

    let deleted = vote::Entity::delete_by_id(existing.id).exec(&txn).await?;
    if deleted.rows_affected == 0 {
        // A concurrent retract got there first.
        return Err(no_vote());
    }

    adjust_vote_count(&txn, existing.photo_id, -1).await?;
    txn.commit().await?;

    info!(
        judge_id = auth_user.user_id,
        photo_id = existing.photo_id,
        "Vote retracted"
    );
    Ok(())
}

pub async fn current_vote<C: ConnectionTrait>(
    db: &C,
    judge_id: i32,
) -> Result<Option<vote::Model>, DbErr> {
    vote::Entity::find()
        .filter(vote::Column::JudgeId.eq(judge_id))
        .one(db)
        .await
}

/// `vote_count = vote_count + delta`, evaluated by the database.
pub(crate) async fn adjust_vote_count<C: ConnectionTrait>(
    db: &C,
    photo_id: i32,
    delta: i32,
) -> Result<(), AppError> {
    let result = photo::Entity::update_many()
        .col_expr(
            photo::Column::VoteCount,
            Expr::col(photo::Column::VoteCount).add(delta),
        )
        .filter(photo::Column::Id.eq(photo_id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Foto no encontrada".into()));
    }
    Ok(())
}

fn no_vote() -> AppError {
    AppError::NotFound("No tenés un voto registrado".into())
}
