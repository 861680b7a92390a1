use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::{Duration, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::*;
use tracing::{info, instrument, warn};

use crate::contest::{photos, votes};
use crate::entity::{password_reset_token, photo, role, role_permission, user};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::client_ip::ClientIp;
use crate::extractors::json::AppJson;
use crate::models::auth::{
    ForgotPasswordRequest, ForgotPasswordResponse, LoginRequest, LoginResponse, MeResponse,
    MessageResponse, RegisterRequest, RegisterResponse, ResetPasswordRequest,
    validate_login_request, validate_register_request,
};
use crate::models::photo::PhotoResponse;
use crate::models::shared::{normalize_email, validate_password};
use crate::state::AppState;
use crate::utils::rate_limit::RateLimiter;
use crate::utils::{hash, jwt, token};

/// Lifetime of a password reset token.
const RESET_TOKEN_TTL_HOURS: i64 = 1;

const FORGOT_PASSWORD_MESSAGE: &str =
    "Si el email está registrado, recibirás un enlace para restablecer tu contraseña.";

fn throttle(limiter: &RateLimiter, ip: &str) -> Result<(), AppError> {
    limiter.check(ip).map_err(|retry_after| {
        warn!(ip, retry_after, "Rate limit exceeded");
        AppError::RateLimited { retry_after }
    })
}

#[utoipa::path(
    post,
    path = "/register",
    tag = "Auth",
    operation_id = "register",
    summary = "Register a contestant account",
    description = "Creates a contestant account when self-registration is enabled \
        (`auth.allow_registration`). Otherwise accounts are created by administrators.",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = RegisterResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 403, description = "Self-registration disabled (REGISTRATION_CLOSED)", body = ErrorBody),
        (status = 409, description = "Email already registered (EMAIL_TAKEN)", body = ErrorBody),
        (status = 429, description = "Too many attempts (RATE_LIMITED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(email = %payload.email))]
pub async fn register(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    AppJson(payload): AppJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    throttle(&state.limiters.register, &ip)?;

    if !state.config.auth.allow_registration {
        return Err(AppError::RegistrationClosed);
    }

    validate_register_request(&payload)?;

    let hash = hash::hash_password(&payload.password)
        .map_err(|e| AppError::Internal(format!("Password hash error: {}", e)))?;

    let new_user = user::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        email: Set(normalize_email(&payload.email)),
        password: Set(hash),
        role: Set(role::DEFAULT_ROLE.to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    let user = new_user.insert(&state.db).await.map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::EmailTaken,
        _ => AppError::from(e),
    })?;

    info!(user_id = user.id, "Contestant registered");
    Ok((StatusCode::CREATED, Json(RegisterResponse::from(user))))
}

#[utoipa::path(
    post,
    path = "/login",
    tag = "Auth",
    operation_id = "login",
    summary = "Log in and obtain a JWT",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Wrong email or password (INVALID_CREDENTIALS)", body = ErrorBody),
        (status = 429, description = "Too many attempts (RATE_LIMITED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(email = %payload.email))]
pub async fn login(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    throttle(&state.limiters.login, &ip)?;
    validate_login_request(&payload)?;

    let user = user::Entity::find()
        .filter(user::Column::Email.eq(normalize_email(&payload.email)))
        .one(&state.db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let is_valid = hash::verify_password(&payload.password, &user.password)
        .map_err(|e| AppError::Internal(format!("Password verify error: {}", e)))?;

    if !is_valid {
        return Err(AppError::InvalidCredentials);
    }

    let permissions: Vec<String> = role_permission::Entity::find()
        .filter(role_permission::Column::Role.eq(&user.role))
        .all(&state.db)
        .await?
        .into_iter()
        .map(|rp| rp.permission)
        .collect();

    let token = jwt::sign(
        user.id,
        &user.email,
        &user.role,
        permissions.clone(),
        &state.config.auth.jwt_secret,
        state.config.auth.token_ttl_hours,
    )
    .map_err(|e| AppError::Internal(format!("JWT sign error: {}", e)))?;

    Ok(Json(LoginResponse {
        token,
        name: user.name,
        email: user.email,
        role: user.role,
        permissions,
    }))
}

#[utoipa::path(
    get,
    path = "/me",
    tag = "Auth",
    operation_id = "me",
    summary = "Current user profile",
    description = "Returns the caller's profile together with their own photo and current vote, if any.",
    responses(
        (status = 200, description = "Profile", body = MeResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "User no longer exists (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn me(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<MeResponse>, AppError> {
    let user = user::Entity::find_by_id(auth_user.user_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Usuario no encontrado".into()))?;

    let photo: Option<photo::Model> = photos::find_by_owner(&state.db, user.id).await?;
    let vote = votes::current_vote(&state.db, user.id).await?;

    Ok(Json(MeResponse {
        photo: photo.map(|p| PhotoResponse::from((p, Some(user.clone())))),
        vote: vote.map(Into::into),
        id: user.id,
        name: user.name,
        email: user.email,
        role: user.role,
        permissions: auth_user.permissions,
    }))
}

#[utoipa::path(
    post,
    path = "/forgot-password",
    tag = "Auth",
    operation_id = "forgotPassword",
    summary = "Request a password reset link",
    description = "Always answers with the same message whether or not the email is registered. \
        When mail delivery fails the link is returned in `manual_link` so an administrator can forward it.",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Request accepted", body = ForgotPasswordResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 429, description = "Too many attempts (RATE_LIMITED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn forgot_password(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    AppJson(payload): AppJson<ForgotPasswordRequest>,
) -> Result<Json<ForgotPasswordResponse>, AppError> {
    throttle(&state.limiters.forgot_password, &ip)?;

    if !payload.email.contains('@') {
        return Err(AppError::Validation("Email inválido".into()));
    }
    let email = normalize_email(&payload.email);

    let mut response = ForgotPasswordResponse {
        message: FORGOT_PASSWORD_MESSAGE.into(),
        manual_link: None,
    };

    let Some(user) = user::Entity::find()
        .filter(user::Column::Email.eq(&email))
        .one(&state.db)
        .await?
    else {
        return Ok(Json(response));
    };

    let now = Utc::now();
    let token = token::generate_reset_token();
    password_reset_token::ActiveModel {
        email: Set(email.clone()),
        token: Set(token.clone()),
        expires_at: Set(now + Duration::hours(RESET_TOKEN_TTL_HOURS)),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    let reset_url = format!(
        "{}/reset-password?token={}",
        state.config.auth.public_url.trim_end_matches('/'),
        token
    );

    if let Err(e) = state
        .mailer
        .send_password_reset(&user.email, &user.name, &reset_url)
        .await
    {
        warn!(user_id = user.id, error = %e, "Reset link not delivered, returning it to the caller");
        response.manual_link = Some(reset_url);
    }

    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/reset-password",
    tag = "Auth",
    operation_id = "resetPassword",
    summary = "Set a new password using a reset token",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password updated", body = MessageResponse),
        (status = 400, description = "Validation error or invalid token (VALIDATION_ERROR, INVALID_RESET_TOKEN)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn reset_password(
    State(state): State<AppState>,
    AppJson(payload): AppJson<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    if payload.token.trim().is_empty() {
        return Err(AppError::Validation("Token y contraseña son requeridos".into()));
    }
    validate_password(&payload.password)?;

    let record = password_reset_token::Entity::find()
        .filter(password_reset_token::Column::Token.eq(payload.token.trim()))
        .one(&state.db)
        .await?
        .ok_or(AppError::InvalidResetToken)?;

    if record.expires_at < Utc::now() {
        password_reset_token::Entity::delete_by_id(record.id)
            .exec(&state.db)
            .await?;
        return Err(AppError::InvalidResetToken);
    }

    let hash = hash::hash_password(&payload.password)
        .map_err(|e| AppError::Internal(format!("Password hash error: {}", e)))?;

    let txn = state.db.begin().await?;
    // Claim the token first; a concurrent reset that already spent it deletes nothing.
    let claimed = password_reset_token::Entity::delete_by_id(record.id)
        .exec(&txn)
        .await?;
    if claimed.rows_affected == 0 {
        txn.rollback().await?;
        return Err(AppError::InvalidResetToken);
    }

    let updated = user::Entity::update_many()
        .col_expr(user::Column::Password, Expr::value(hash))
        .filter(user::Column::Email.eq(&record.email))
        .exec(&txn)
        .await?;

    if updated.rows_affected == 0 {
        // The account was deleted after the token was issued.
        txn.commit().await?;
        return Err(AppError::InvalidResetToken);
    }
    txn.commit().await?;

    info!(email = %record.email, "Password reset completed");
    Ok(Json(MessageResponse::new("Contraseña actualizada correctamente")))
}
