use chrono::Utc;
use common::storage::{PhotoStore, StorageKey};
use rand::seq::SliceRandom;
use sea_orm::*;
use tracing::{info, warn};

use crate::entity::contest_settings::{self, ContestPhase};
use crate::entity::{photo, user, vote};
use crate::error::AppError;
use crate::extractors::auth::AuthUser;
use crate::models::photo::PhotoResponse;
use crate::models::shared::validate_title;

use super::phase;

const ALREADY_UPLOADED: &str = "Ya has subido una foto. Elimínala primero para subir una nueva.";
const UNSUPPORTED_TYPE: &str = "Solo se permiten archivos JPG, PNG o WebP";

/// Raw upload as read from the request.
pub struct PhotoUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
    pub title: Option<String>,
}

/// An upload that passed every check and is ready to be stored.
#[derive(Debug)]
pub struct ValidatedUpload {
    pub title: String,
    pub content_type: String,
    pub extension: &'static str,
    pub bytes: Vec<u8>,
}

/// Which photo `remove` acts on.
#[derive(Debug, Clone, Copy)]
pub enum RemoveTarget {
    /// The caller's own photo (contestants, registration phase only).
    Own,
    /// Any photo by id (administrators, any phase).
    ById(i32),
}

/// Check capability, phase and ownership before any bytes are read.
///
/// Returns the settings the upload must be validated against.
pub async fn begin_upload<C: ConnectionTrait>(
    db: &C,
    auth_user: &AuthUser,
) -> Result<contest_settings::Model, AppError> {
    auth_user.require_permission("photo:upload")?;

    let settings = phase::get_settings(db).await?;
    phase::require_phase(
        settings.phase,
        ContestPhase::Registration,
        "El período de inscripción ha cerrado",
    )?;

    if find_by_owner(db, auth_user.user_id).await?.is_some() {
        return Err(AppError::AlreadyExists(ALREADY_UPLOADED.into()));
    }

    Ok(settings)
}

/// Enforce size, MIME type and title rules.
pub fn validate_upload(
    settings: &contest_settings::Model,
    upload: PhotoUpload,
) -> Result<ValidatedUpload, AppError> {
    if upload.bytes.is_empty() {
        return Err(AppError::Validation("No se proporcionó ningún archivo".into()));
    }

    if upload.bytes.len() as i64 > settings.max_file_size {
        return Err(AppError::Validation(format!(
            "El archivo debe ser menor a {}MB",
            settings.max_file_size / (1024 * 1024)
        )));
    }

    let content_type = upload
        .content_type
        .filter(|ct| !ct.is_empty() && ct != "application/octet-stream")
        .or_else(|| {
            upload
                .file_name
                .as_deref()
                .and_then(|name| mime_guess::from_path(name).first())
                .map(|m| m.essence_str().to_string())
        })
        .map(|ct| ct.to_ascii_lowercase())
        .ok_or_else(|| AppError::Validation(UNSUPPORTED_TYPE.into()))?;

    if !settings.allows_type(&content_type) {
        return Err(AppError::Validation(UNSUPPORTED_TYPE.into()));
    }
    let extension = extension_for(&content_type)
        .ok_or_else(|| AppError::Validation(UNSUPPORTED_TYPE.into()))?;

    let title = upload
        .title
        .filter(|t| !t.trim().is_empty())
        .or(upload.file_name)
        .unwrap_or_default();
    validate_title(&title)?;

    Ok(ValidatedUpload {
        title: title.trim().to_string(),
        content_type,
        extension,
        bytes: upload.bytes,
    })
}

fn extension_for(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        other => mime_guess::get_mime_extensions_str(other).and_then(|exts| exts.first().copied()),
    }
}

/// Store the bytes, then record the photo row.
///
/// If the row insert fails the stored object is left behind; the key is logged.
pub async fn complete_upload<C: ConnectionTrait>(
    db: &C,
    store: &dyn PhotoStore,
    auth_user: &AuthUser,
    upload: ValidatedUpload,
) -> Result<photo::Model, AppError> {
    let key = StorageKey::for_photo(auth_user.user_id, upload.extension);
    let locator = store
        .put(&key, &upload.bytes, &upload.content_type)
        .await?;

    let row = photo::ActiveModel {
        title: Set(upload.title),
        file_url: Set(locator.url),
        file_key: Set(locator.key.to_string()),
        content_type: Set(upload.content_type),
        size: Set(upload.bytes.len() as i64),
        contestant_id: Set(auth_user.user_id),
        vote_count: Set(0),
        uploaded_at: Set(Utc::now()),
        ..Default::default()
    };

    let model = row.insert(db).await.map_err(|e| {
        warn!(key = %locator.key, error = %e, "Photo row insert failed, stored object left orphaned");
        match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                AppError::AlreadyExists(ALREADY_UPLOADED.into())
            }
            _ => AppError::from(e),
        }
    })?;

    info!(photo_id = model.id, contestant_id = model.contestant_id, "Photo uploaded");
    Ok(model)
}

/// Delete a photo, the votes cast for it, and (best-effort) its stored bytes.
pub async fn remove(
    db: &DatabaseConnection,
    store: &dyn PhotoStore,
    auth_user: &AuthUser,
    target: RemoveTarget,
) -> Result<(), AppError> {
    let photo = match target {
        RemoveTarget::Own => {
            auth_user.require_permission("photo:delete_own")?;
            phase::require_phase(
                phase::get_phase(db).await?,
                ContestPhase::Registration,
                "No podés eliminar fotos fuera del período de inscripción",
            )?;
            find_by_owner(db, auth_user.user_id).await?
        }
        RemoveTarget::ById(id) => {
            auth_user.require_permission("photo:delete_any")?;
            photo::Entity::find_by_id(id).one(db).await?
        }
    }
    .ok_or_else(|| AppError::NotFound("Foto no encontrada".into()))?;

    let txn = db.begin().await?;
    let votes_removed = delete_photo_rows(&txn, photo.id).await?;
    txn.commit().await?;

    info!(
        photo_id = photo.id,
        votes_removed,
        by = auth_user.user_id,
        "Photo deleted"
    );

    discard_stored(store, &photo.file_key).await;
    Ok(())
}

/// Delete the votes referencing `photo_id`, then the photo row. Returns the
/// number of votes removed.
pub(crate) async fn delete_photo_rows<C: ConnectionTrait>(
    db: &C,
    photo_id: i32,
) -> Result<u64, DbErr> {
    let votes = vote::Entity::delete_many()
        .filter(vote::Column::PhotoId.eq(photo_id))
        .exec(db)
        .await?;
    photo::Entity::delete_by_id(photo_id).exec(db).await?;
    Ok(votes.rows_affected)
}

/// Best-effort removal of stored bytes; failures are logged, never surfaced.
pub(crate) async fn discard_stored(store: &dyn PhotoStore, file_key: &str) {
    let key = match StorageKey::parse(file_key) {
        Ok(key) => key,
        Err(e) => {
            warn!(file_key, error = %e, "Stored photo has an unusable key");
            return;
        }
    };
    match store.delete(&key).await {
        Ok(true) => {}
        Ok(false) => warn!(%key, "Stored photo was already gone"),
        Err(e) => warn!(%key, error = %e, "Failed to delete stored photo"),
    }
}

pub async fn find_by_owner<C: ConnectionTrait>(
    db: &C,
    contestant_id: i32,
) -> Result<Option<photo::Model>, DbErr> {
    photo::Entity::find()
        .filter(photo::Column::ContestantId.eq(contestant_id))
        .one(db)
        .await
}

/// Every photo with its contestant's name, newest first.
pub async fn list_photos<C: ConnectionTrait>(db: &C) -> Result<Vec<PhotoResponse>, DbErr> {
    let rows = photo::Entity::find()
        .find_also_related(user::Entity)
        .order_by_desc(photo::Column::UploadedAt)
        .order_by_desc(photo::Column::Id)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(PhotoResponse::from).collect())
}

/// Every photo in random order, for the public gallery.
pub async fn list_public_photos<C: ConnectionTrait>(db: &C) -> Result<Vec<PhotoResponse>, DbErr> {
    let mut photos = list_photos(db).await?;
    photos.shuffle(&mut rand::rng());
    Ok(photos)
}
