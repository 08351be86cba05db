//! Mapping of domain errors onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::common::DomainError;

/// JSON error body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for DomainError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            DomainError::InvalidInput(message) => (StatusCode::BAD_REQUEST, message),
            DomainError::PermissionDenied(message) => (StatusCode::FORBIDDEN, message),
            DomainError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            DomainError::Conflict(message) => (StatusCode::CONFLICT, message),
            DomainError::Database(e) => {
                error!(error = %e, "Database error while handling request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            DomainError::Internal(e) => {
                error!(error = ?e, "Internal error while handling request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

/// Turn an extractor rejection (bad JSON, bad query string) into a 400
pub fn invalid_request(rejection: impl std::fmt::Display) -> DomainError {
    DomainError::invalid(rejection.to_string())
}
