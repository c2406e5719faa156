//! Error taxonomy shared by every libris module

use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

/// Failures returned by repository and session operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("email '{email}' is already in use")]
    EmailInUse { email: String },

    #[error("validation error on '{field}': {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("session storage error: {message}")]
    Storage { message: String },

    #[error("no user is signed in")]
    Unauthenticated,
}

impl CoreError {
    /// Create a not found error
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Create an email conflict error
    pub fn email_in_use(email: impl Into<String>) -> Self {
        Self::EmailInUse {
            email: email.into(),
        }
    }

    /// Create a validation error
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Stable machine-readable code for this error kind.
    pub fn code(&self) -> &'static str {
        match self {
            CoreError::NotFound { .. } => "not_found",
            CoreError::InvalidCredentials => "invalid_credentials",
            CoreError::EmailInUse { .. } => "email_in_use",
            CoreError::Validation { .. } => "validation_error",
            CoreError::Storage { .. } => "storage_error",
            CoreError::Unauthenticated => "unauthenticated",
        }
    }
}

/// Reject blank display strings.
pub fn require_text(field: &'static str, value: &str) -> CoreResult<()> {
    if value.trim().is_empty() {
        return Err(CoreError::validation(field, format!("{field} must not be empty")));
    }
    Ok(())
}
