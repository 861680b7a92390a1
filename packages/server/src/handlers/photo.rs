use axum::body::Body;
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::storage::{StorageError, StorageKey};
use tokio_util::io::ReaderStream;
use tracing::instrument;

use crate::contest::photos::{self, PhotoUpload, RemoveTarget};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::auth::MessageResponse;
use crate::models::photo::{PhotoListResponse, PhotoResponse};
use crate::state::AppState;

/// Body limit for the upload route. Per-contest size rules are checked after reading.
pub fn upload_body_limit(max_object_size: u64) -> DefaultBodyLimit {
    // Multipart framing overhead on top of the largest accepted object.
    DefaultBodyLimit::max(max_object_size as usize + 64 * 1024)
}

#[utoipa::path(
    post,
    path = "/photos",
    tag = "Photos",
    operation_id = "uploadPhoto",
    summary = "Upload the caller's contest photo",
    description = "Multipart upload with a required `file` field and an optional `title` field \
        (defaults to the file name). Only during REGISTRATION; one photo per contestant.",
    request_body(content_type = "multipart/form-data", description = "Photo file with optional title"),
    responses(
        (status = 201, description = "Photo stored", body = PhotoResponse),
        (status = 400, description = "Validation error, phase closed or photo already uploaded (VALIDATION_ERROR, PHASE_CLOSED, ALREADY_EXISTS)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID, PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, multipart), fields(user_id = auth_user.user_id))]
pub async fn upload_photo(
    auth_user: AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let settings = photos::begin_upload(&state.db, &auth_user).await?;

    let mut upload = PhotoUpload {
        file_name: None,
        content_type: None,
        bytes: Vec::new(),
        title: None,
    };
    let mut has_file = false;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Error en el formulario: {e}")))?
    {
        match field.name() {
            Some("file") => {
                has_file = true;
                upload.file_name = field.file_name().map(|s| s.to_string());
                upload.content_type = field.content_type().map(|s| s.to_string());
                while let Some(chunk) = field
                    .chunk()
                    .await
                    .map_err(|e| AppError::Validation(format!("Error al leer el archivo: {e}")))?
                {
                    upload.bytes.extend_from_slice(&chunk);
                }
            }
            Some("title") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Error al leer el título: {e}")))?;
                upload.title = Some(text);
            }
            _ => {} // Ignore unknown fields.
        }
    }

    if !has_file {
        return Err(AppError::Validation("No se proporcionó ningún archivo".into()));
    }

    let validated = photos::validate_upload(&settings, upload)?;
    let model =
        photos::complete_upload(&state.db, &*state.photo_store, &auth_user, validated).await?;

    Ok((StatusCode::CREATED, Json(PhotoResponse::from(model))))
}

#[utoipa::path(
    delete,
    path = "/photos",
    tag = "Photos",
    operation_id = "deleteOwnPhoto",
    summary = "Delete the caller's own photo",
    description = "Removes the caller's photo and any votes cast for it. Only during REGISTRATION.",
    responses(
        (status = 200, description = "Photo deleted", body = MessageResponse),
        (status = 400, description = "Phase closed (PHASE_CLOSED)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID, PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "No photo uploaded (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn delete_own_photo(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, AppError> {
    photos::remove(&state.db, &*state.photo_store, &auth_user, RemoveTarget::Own).await?;
    Ok(Json(MessageResponse::new("Foto eliminada correctamente")))
}

#[utoipa::path(
    get,
    path = "/photos",
    tag = "Photos",
    operation_id = "listPhotos",
    summary = "List all photos",
    description = "All photos with their contestant's name, newest first. Requires `photo:view_all`.",
    responses(
        (status = 200, description = "Photo list", body = PhotoListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID, PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn list_photos(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<PhotoListResponse>, AppError> {
    auth_user.require_permission("photo:view_all")?;
    Ok(Json(photos::list_photos(&state.db).await?.into()))
}

#[utoipa::path(
    get,
    path = "/public/photos",
    tag = "Public",
    operation_id = "listPublicPhotos",
    summary = "Public gallery",
    description = "All photos in random order. No authentication required.",
    responses(
        (status = 200, description = "Photo list", body = PhotoListResponse),
    ),
)]
#[instrument(skip(state))]
pub async fn list_public_photos(
    State(state): State<AppState>,
) -> Result<Json<PhotoListResponse>, AppError> {
    Ok(Json(photos::list_public_photos(&state.db).await?.into()))
}

/// Stream stored photo bytes (filesystem backend URLs point here).
#[instrument(skip(state))]
pub async fn serve_file(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Response, AppError> {
    let not_found = || AppError::NotFound("Archivo no encontrado".into());

    let key = StorageKey::parse(&key).map_err(|_| not_found())?;
    let reader = state
        .photo_store
        .get_stream(&key)
        .await
        .map_err(|e| match e {
            StorageError::NotFound(_) | StorageError::InvalidKey(_) => not_found(),
            other => AppError::from(other),
        })?;

    let mime = mime_guess::from_path(key.as_str()).first_or_octet_stream();

    Response::builder()
        .header(header::CONTENT_TYPE, mime.as_ref())
        .header(header::CACHE_CONTROL, "public, max-age=3600")
        .body(Body::from_stream(ReaderStream::new(reader)))
        .map_err(|e| AppError::Internal(e.to_string()))
}
