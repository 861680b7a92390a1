use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::photo::PhotoResponse;
use crate::models::shared::{validate_email, validate_name, validate_password};
use crate::models::vote::VoteResponse;

/// Request body for self-registration.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    /// Display name (1-100 characters).
    #[schema(example = "Ana Pérez")]
    pub name: String,
    #[schema(example = "ana@example.org")]
    pub email: String,
    /// Password (6-128 characters).
    #[schema(example = "s3cure_P@ss!")]
    pub password: String,
}

pub fn validate_register_request(payload: &RegisterRequest) -> Result<(), AppError> {
    validate_name(&payload.name)?;
    validate_email(&payload.email)?;
    validate_password(&payload.password)
}

/// Request body for user login.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    #[schema(example = "ana@example.org")]
    pub email: String,
    #[schema(example = "s3cure_P@ss!")]
    pub password: String,
}

pub fn validate_login_request(payload: &LoginRequest) -> Result<(), AppError> {
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(AppError::Validation(
            "Email y contraseña son requeridos".into(),
        ));
    }
    Ok(())
}

/// Successful registration response.
#[derive(Serialize, utoipa::ToSchema)]
pub struct RegisterResponse {
    #[schema(example = 42)]
    pub id: i32,
    #[schema(example = "Ana Pérez")]
    pub name: String,
    #[schema(example = "ana@example.org")]
    pub email: String,
    #[schema(example = "contestant")]
    pub role: String,
}

impl From<crate::entity::user::Model> for RegisterResponse {
    fn from(user: crate::entity::user::Model) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}

/// Successful login response.
#[derive(Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    /// JWT bearer token.
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    #[schema(example = "Ana Pérez")]
    pub name: String,
    #[schema(example = "ana@example.org")]
    pub email: String,
    #[schema(example = "contestant")]
    pub role: String,
    #[schema(example = json!(["photo:upload", "photo:delete_own", "photo:view_all"]))]
    pub permissions: Vec<String>,
}

/// Current authenticated user's profile.
#[derive(Serialize, utoipa::ToSchema)]
pub struct MeResponse {
    #[schema(example = 42)]
    pub id: i32,
    #[schema(example = "Ana Pérez")]
    pub name: String,
    #[schema(example = "ana@example.org")]
    pub email: String,
    #[schema(example = "contestant")]
    pub role: String,
    #[schema(example = json!(["photo:upload", "photo:delete_own", "photo:view_all"]))]
    pub permissions: Vec<String>,
    /// The caller's own photo, if any.
    pub photo: Option<PhotoResponse>,
    /// The caller's current vote, if any.
    pub vote: Option<VoteResponse>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct ForgotPasswordRequest {
    #[schema(example = "ana@example.org")]
    pub email: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ForgotPasswordResponse {
    pub message: String,
    /// Present only when the link could not be delivered by mail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual_link: Option<String>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct ResetPasswordRequest {
    /// Token from the reset link (64 hex characters).
    pub token: String,
    /// New password (6-128 characters).
    #[schema(example = "n3w_s3cure_P@ss!")]
    pub password: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
