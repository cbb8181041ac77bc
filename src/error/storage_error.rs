use crate::response::app_response::ErrorResponse;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Infrastructure failures of the persistence layer. Kept apart from the
/// domain taxonomy in `AuthError`: a raced uniqueness constraint is not
/// the same outcome as a checked duplicate, and connectivity loss is
/// nobody's business outcome at all.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage constraint violated: {0}")]
    ConstraintViolation(String),
    #[error("Storage unavailable: {0}")]
    Unavailable(#[from] sqlx::Error),
}

impl StorageError {
    pub fn code(&self) -> &'static str {
        match self {
            StorageError::ConstraintViolation(_) => "STG-001",
            StorageError::Unavailable(_) => "STG-002",
        }
    }
}

impl IntoResponse for StorageError {
    fn into_response(self) -> Response {
        let (status_code, message) = match &self {
            StorageError::ConstraintViolation(_) => (StatusCode::CONFLICT, self.to_string()),
            // Driver detail stays out of client responses
            StorageError::Unavailable(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Storage error".to_string())
            }
        };

        ErrorResponse::send(self.code(), message)
            .with_status(status_code)
            .into_response()
    }
}
