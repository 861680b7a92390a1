use crate::error::AppError;

/// Validate a trimmed title (1-256 Unicode characters).
pub fn validate_title(title: &str) -> Result<(), AppError> {
    let title = title.trim();
    if title.is_empty() || title.chars().count() > 256 {
        return Err(AppError::Validation(
            "El título debe tener entre 1 y 256 caracteres".into(),
        ));
    }
    Ok(())
}

/// Validate a display name (1-100 Unicode characters after trimming).
pub fn validate_name(name: &str) -> Result<(), AppError> {
    let name = name.trim();
    if name.is_empty() || name.chars().count() > 100 {
        return Err(AppError::Validation(
            "El nombre debe tener entre 1 y 100 caracteres".into(),
        ));
    }
    Ok(())
}

/// Validate a password length (6-128 characters).
pub fn validate_password(password: &str) -> Result<(), AppError> {
    let len = password.chars().count();
    if !(6..=128).contains(&len) {
        return Err(AppError::Validation(
            "La contraseña debe tener entre 6 y 128 caracteres".into(),
        ));
    }
    Ok(())
}

/// Minimal shape check: something on each side of a single `@`.
pub fn validate_email(email: &str) -> Result<(), AppError> {
    let email = email.trim();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@')
        }
        None => false,
    };
    if !valid || email.chars().count() > 254 {
        return Err(AppError::Validation("Email inválido".into()));
    }
    Ok(())
}

/// Emails are compared and stored lower-cased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
