use thiserror::Error;

use super::auth::AuthError;

/// Error taxonomy shared by every donation point and favorites operation.
///
/// The first four variants are caller-facing outcomes. `Database` and
/// `Internal` are infrastructure failures and never carry business meaning.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    PermissionDenied(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl DomainError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }
}

impl From<AuthError> for DomainError {
    fn from(error: AuthError) -> Self {
        Self::PermissionDenied(error.to_string())
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
