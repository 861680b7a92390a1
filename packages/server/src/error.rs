use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::storage::StorageError;
use sea_orm::DbErr;
use serde::Serialize;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `TOKEN_MISSING`,
    /// `TOKEN_INVALID`, `INVALID_CREDENTIALS`, `PERMISSION_DENIED`, `PHASE_CLOSED`,
    /// `INVALID_PHASE`, `ALREADY_EXISTS`, `ALREADY_VOTED`, `INVALID_RESET_TOKEN`,
    /// `REGISTRATION_CLOSED`, `NOT_FOUND`, `EMAIL_TAKEN`, `RATE_LIMITED`,
    /// `INTERNAL_ERROR`.
    #[schema(example = "PHASE_CLOSED")]
    pub code: &'static str,
    /// Human-readable error description (Spanish).
    #[schema(example = "El período de inscripción ha cerrado")]
    pub message: String,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    TokenMissing,
    TokenInvalid,
    InvalidCredentials,
    /// Role or ownership mismatch.
    PermissionDenied,
    /// The operation is not allowed in the current contest phase.
    PhaseClosed(String),
    InvalidPhase,
    AlreadyExists(String),
    AlreadyVoted,
    InvalidResetToken,
    RegistrationClosed,
    NotFound(String),
    EmailTaken,
    /// Rate limit exceeded. Contains seconds until retry is allowed.
    RateLimited {
        retry_after: u64,
    },
    Internal(String),
}

impl AppError {
    /// Machine-readable code, as sent in [`ErrorBody::code`].
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::TokenMissing => "TOKEN_MISSING",
            AppError::TokenInvalid => "TOKEN_INVALID",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::PermissionDenied => "PERMISSION_DENIED",
            AppError::PhaseClosed(_) => "PHASE_CLOSED",
            AppError::InvalidPhase => "INVALID_PHASE",
            AppError::AlreadyExists(_) => "ALREADY_EXISTS",
            AppError::AlreadyVoted => "ALREADY_VOTED",
            AppError::InvalidResetToken => "INVALID_RESET_TOKEN",
            AppError::RegistrationClosed => "REGISTRATION_CLOSED",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::EmailTaken => "EMAIL_TAKEN",
            AppError::RateLimited { .. } => "RATE_LIMITED",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::PhaseClosed(_)
            | AppError::InvalidPhase
            | AppError::AlreadyExists(_)
            | AppError::AlreadyVoted
            | AppError::InvalidResetToken => StatusCode::BAD_REQUEST,
            AppError::TokenMissing
            | AppError::TokenInvalid
            | AppError::InvalidCredentials
            | AppError::PermissionDenied => StatusCode::UNAUTHORIZED,
            AppError::RegistrationClosed => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::EmailTaken => StatusCode::CONFLICT,
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(self) -> String {
        match self {
            AppError::Validation(msg)
            | AppError::PhaseClosed(msg)
            | AppError::AlreadyExists(msg)
            | AppError::NotFound(msg) => msg,
            AppError::TokenMissing => "Autenticación requerida".into(),
            AppError::TokenInvalid => "Token inválido o expirado".into(),
            AppError::InvalidCredentials => "Email o contraseña incorrectos".into(),
            AppError::PermissionDenied => "No autorizado".into(),
            AppError::InvalidPhase => "Fase inválida".into(),
            AppError::AlreadyVoted => {
                "Ya has votado. Elimina tu voto anterior para cambiarlo.".into()
            }
            AppError::InvalidResetToken => "Token inválido o expirado".into(),
            AppError::RegistrationClosed => "El registro público está deshabilitado. \
                Las cuentas son creadas por la administración."
                .into(),
            AppError::EmailTaken => "El email ya está registrado".into(),
            AppError::RateLimited { .. } => {
                "Demasiados intentos. Por favor, intentá más tarde.".into()
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                "Ocurrió un error inesperado".into()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let retry_after = if let AppError::RateLimited { retry_after } = &self {
            Some(*retry_after)
        } else {
            None
        };

        let status = self.status();
        let body = ErrorBody {
            code: self.code(),
            message: self.message(),
        };

        if let Some(seconds) = retry_after {
            (status, [("Retry-After", seconds.to_string())], Json(body)).into_response()
        } else {
            (status, Json(body)).into_response()
        }
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::Internal(err.to_string())
    }
}
