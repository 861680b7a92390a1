use std::collections::HashMap;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use sea_orm::*;
use tracing::{info, instrument};

use crate::contest::photos::{self, RemoveTarget};
use crate::contest::{phase, votes};
use crate::entity::{password_reset_token, photo, role, user, vote};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::auth::MessageResponse;
use crate::models::settings::{SettingsResponse, UpdateSettingsRequest};
use crate::models::shared::normalize_email;
use crate::models::user::{
    CreateUserRequest, UpdateUserRequest, UserListResponse, UserResponse, validate_create_user,
    validate_update_user,
};
use crate::state::AppState;
use crate::utils::hash;

#[utoipa::path(
    get,
    path = "/settings",
    tag = "Admin",
    operation_id = "adminGetSettings",
    summary = "Read contest settings",
    responses(
        (status = 200, description = "Contest settings", body = SettingsResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID, PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn get_settings(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<SettingsResponse>, AppError> {
    auth_user.require_permission("contest:manage")?;
    Ok(Json(phase::get_settings(&state.db).await?.into()))
}

#[utoipa::path(
    post,
    path = "/settings",
    tag = "Admin",
    operation_id = "adminUpdateSettings",
    summary = "Change the contest phase",
    description = "Any phase may follow any other. Unknown phase names are rejected with INVALID_PHASE.",
    request_body = UpdateSettingsRequest,
    responses(
        (status = 200, description = "Updated settings", body = SettingsResponse),
        (status = 400, description = "Unknown phase (INVALID_PHASE, VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID, PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id, phase = %payload.phase))]
pub async fn update_settings(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<UpdateSettingsRequest>,
) -> Result<Json<SettingsResponse>, AppError> {
    let settings = phase::set_phase(&state.db, &auth_user, &payload.phase).await?;
    Ok(Json(settings.into()))
}

#[utoipa::path(
    get,
    path = "/users",
    tag = "Admin",
    operation_id = "adminListUsers",
    summary = "List users",
    description = "All users, newest first, with the photo each uploaded and the photo each voted for.",
    responses(
        (status = 200, description = "User list", body = UserListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID, PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn list_users(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<UserListResponse>, AppError> {
    auth_user.require_permission("user:manage")?;

    let users = user::Entity::find()
        .order_by_desc(user::Column::CreatedAt)
        .order_by_desc(user::Column::Id)
        .all(&state.db)
        .await?;

    let photo_by_owner: HashMap<i32, i32> = photo::Entity::find()
        .all(&state.db)
        .await?
        .into_iter()
        .map(|p| (p.contestant_id, p.id))
        .collect();
    let vote_by_judge: HashMap<i32, i32> = vote::Entity::find()
        .all(&state.db)
        .await?
        .into_iter()
        .map(|v| (v.judge_id, v.photo_id))
        .collect();

    let users: Vec<UserResponse> = users
        .into_iter()
        .map(|u| {
            let photo_id = photo_by_owner.get(&u.id).copied();
            let voted_photo_id = vote_by_judge.get(&u.id).copied();
            UserResponse::new(u, photo_id, voted_photo_id)
        })
        .collect();

    Ok(Json(UserListResponse {
        total: users.len() as u64,
        users,
    }))
}

#[utoipa::path(
    post,
    path = "/users",
    tag = "Admin",
    operation_id = "adminCreateUser",
    summary = "Create a user with any role",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID, PERMISSION_DENIED)", body = ErrorBody),
        (status = 409, description = "Email already registered (EMAIL_TAKEN)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id, email = %payload.email, role = %payload.role))]
pub async fn create_user(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("user:manage")?;
    validate_create_user(&payload)?;
    require_known_role(&payload.role)?;

    let hash = hash::hash_password(&payload.password)
        .map_err(|e| AppError::Internal(format!("Password hash error: {}", e)))?;

    let created = user::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        email: Set(normalize_email(&payload.email)),
        password: Set(hash),
        role: Set(payload.role),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .map_err(map_email_conflict)?;

    info!(created_id = created.id, role = %created.role, "User created");
    Ok((
        StatusCode::CREATED,
        Json(UserResponse::new(created, None, None)),
    ))
}

#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "Admin",
    operation_id = "adminUpdateUser",
    summary = "Update a user's name, email or role",
    params(("id" = i32, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID, PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "User not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Email already registered (EMAIL_TAKEN)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id, target_id = id))]
pub async fn update_user(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    auth_user.require_permission("user:manage")?;
    validate_update_user(&payload)?;
    if let Some(role) = &payload.role {
        require_known_role(role)?;
    }

    let existing = find_user(&state.db, id).await?;
    let mut active: user::ActiveModel = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(email) = payload.email {
        active.email = Set(normalize_email(&email));
    }
    if let Some(role) = payload.role {
        active.role = Set(role);
    }

    let updated = if active.is_changed() {
        active.update(&state.db).await.map_err(map_email_conflict)?
    } else {
        find_user(&state.db, id).await?
    };

    let photo_id = photos::find_by_owner(&state.db, id).await?.map(|p| p.id);
    let voted_photo_id = votes::current_vote(&state.db, id)
        .await?
        .map(|v| v.photo_id);

    Ok(Json(UserResponse::new(updated, photo_id, voted_photo_id)))
}

#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Admin",
    operation_id = "adminDeleteUser",
    summary = "Delete a user and everything they own",
    description = "In one transaction: withdraws the user's vote (decrementing its photo), deletes their \
        photo and the votes cast for it, their reset tokens, then the user. Stored bytes are removed afterwards.",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 400, description = "Cannot delete yourself (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID, PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "User not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id, target_id = id))]
pub async fn delete_user(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, AppError> {
    auth_user.require_permission("user:manage")?;
    if id == auth_user.user_id {
        return Err(AppError::Validation(
            "No podés eliminar tu propia cuenta".into(),
        ));
    }

    let target = find_user(&state.db, id).await?;

    let txn = state.db.begin().await?;

    if let Some(v) = votes::current_vote(&txn, id).await? {
        vote::Entity::delete_by_id(v.id).exec(&txn).await?;
        votes::adjust_vote_count(&txn, v.photo_id, -1).await?;
    }

    let owned = photos::find_by_owner(&txn, id).await?;
    if let Some(p) = &owned {
        photos::delete_photo_rows(&txn, p.id).await?;
    }

    password_reset_token::Entity::delete_many()
        .filter(password_reset_token::Column::Email.eq(&target.email))
        .exec(&txn)
        .await?;

    user::Entity::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;

    info!(deleted_id = id, "User deleted");

    if let Some(p) = owned {
        photos::discard_stored(&*state.photo_store, &p.file_key).await;
    }

    Ok(Json(MessageResponse::new("Usuario eliminado correctamente")))
}

#[utoipa::path(
    delete,
    path = "/photos/{id}",
    tag = "Admin",
    operation_id = "adminDeletePhoto",
    summary = "Delete any photo",
    description = "Removes the photo and the votes cast for it, in any phase.",
    params(("id" = i32, Path, description = "Photo ID")),
    responses(
        (status = 200, description = "Photo deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID, PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Photo not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id, photo_id = id))]
pub async fn delete_photo(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, AppError> {
    photos::remove(&state.db, &*state.photo_store, &auth_user, RemoveTarget::ById(id)).await?;
    Ok(Json(MessageResponse::new("Foto eliminada correctamente")))
}

fn require_known_role(role_name: &str) -> Result<(), AppError> {
    if role::ALL.contains(&role_name) {
        Ok(())
    } else {
        Err(AppError::Validation(format!("Rol inválido: {role_name}")))
    }
}

fn map_email_conflict(e: DbErr) -> AppError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::EmailTaken,
        _ => AppError::from(e),
    }
}

async fn find_user<C: ConnectionTrait>(db: &C, id: i32) -> Result<user::Model, AppError> {
    user::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Usuario no encontrado".into()))
}
