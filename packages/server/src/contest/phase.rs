use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ConnectionTrait, DbErr, EntityTrait, Set};
use tracing::info;

use crate::entity::contest_settings::{
    self, ContestPhase, DEFAULT_ALLOWED_FILE_TYPES, DEFAULT_MAX_FILE_SIZE, SETTINGS_ID,
};
use crate::error::AppError;
use crate::extractors::auth::AuthUser;

/// Read the settings row, falling back to defaults while none has been written.
pub async fn get_settings<C: ConnectionTrait>(db: &C) -> Result<contest_settings::Model, DbErr> {
    Ok(contest_settings::Entity::find_by_id(SETTINGS_ID)
        .one(db)
        .await?
        .unwrap_or_else(contest_settings::Model::defaults))
}

pub async fn get_phase<C: ConnectionTrait>(db: &C) -> Result<ContestPhase, DbErr> {
    Ok(get_settings(db).await?.phase)
}

/// Move the contest to `raw` (one of the phase names). Any phase may follow any other.
pub async fn set_phase<C: ConnectionTrait>(
    db: &C,
    auth_user: &AuthUser,
    raw: &str,
) -> Result<contest_settings::Model, AppError> {
    auth_user.require_permission("contest:manage")?;
    let phase: ContestPhase = raw.trim().parse().map_err(|_| AppError::InvalidPhase)?;

    let row = contest_settings::ActiveModel {
        id: Set(SETTINGS_ID),
        phase: Set(phase),
        max_file_size: Set(DEFAULT_MAX_FILE_SIZE),
        allowed_file_types: Set(DEFAULT_ALLOWED_FILE_TYPES.to_string()),
        updated_at: Set(Utc::now()),
    };
    contest_settings::Entity::insert(row)
        .on_conflict(
            OnConflict::column(contest_settings::Column::Id)
                .update_columns([
                    contest_settings::Column::Phase,
                    contest_settings::Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    info!(%phase, by = auth_user.user_id, "Contest phase changed");
    Ok(get_settings(db).await?)
}

/// `PhaseClosed(message)` unless the contest is in `required`.
pub fn require_phase(
    current: ContestPhase,
    required: ContestPhase,
    message: &str,
) -> Result<(), AppError> {
    if current == required {
        Ok(())
    } else {
        Err(AppError::PhaseClosed(message.to_string()))
    }
}
