use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::user;
use crate::error::AppError;
use crate::models::shared::{validate_email, validate_name, validate_password};

/// A user as seen by administrators.
#[derive(Serialize, utoipa::ToSchema)]
pub struct UserResponse {
    #[schema(example = 42)]
    pub id: i32,
    #[schema(example = "Ana Pérez")]
    pub name: String,
    #[schema(example = "ana@example.org")]
    pub email: String,
    #[schema(example = "contestant")]
    pub role: String,
    pub created_at: DateTime<Utc>,
    /// ID of the photo this user uploaded, if any.
    pub photo_id: Option<i32>,
    /// ID of the photo this user voted for, if any.
    pub voted_photo_id: Option<i32>,
}

impl UserResponse {
    pub fn new(user: user::Model, photo_id: Option<i32>, voted_photo_id: Option<i32>) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
            photo_id,
            voted_photo_id,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct UserListResponse {
    pub users: Vec<UserResponse>,
    #[schema(example = 25)]
    pub total: u64,
}

/// Request body for creating a user as an administrator.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateUserRequest {
    #[schema(example = "Juan Gómez")]
    pub name: String,
    #[schema(example = "juan@example.org")]
    pub email: String,
    /// One of `admin`, `contestant`, `judge`.
    #[schema(example = "judge")]
    pub role: String,
    #[schema(example = "s3cure_P@ss!")]
    pub password: String,
}

pub fn validate_create_user(payload: &CreateUserRequest) -> Result<(), AppError> {
    validate_name(&payload.name)?;
    validate_email(&payload.email)?;
    validate_password(&payload.password)
}

/// Partial update; absent fields are left unchanged.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
}

pub fn validate_update_user(payload: &UpdateUserRequest) -> Result<(), AppError> {
    if let Some(name) = &payload.name {
        validate_name(name)?;
    }
    if let Some(email) = &payload.email {
        validate_email(email)?;
    }
    Ok(())
}
