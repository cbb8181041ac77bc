pub(crate) mod auth_error;
pub(crate) mod hash_error;
pub(crate) mod request_error;
pub(crate) mod storage_error;
pub(crate) mod token_error;

use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Unified application error type. The enum itself is transport-agnostic;
/// only the `IntoResponse` impls translate kinds into HTTP statuses.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] auth_error::AuthError),
    #[error(transparent)]
    Token(#[from] token_error::TokenError),
    #[error(transparent)]
    Hash(#[from] hash_error::HashError),
    #[error(transparent)]
    Storage(#[from] storage_error::StorageError),
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Auth(e) => e.code(),
            ApiError::Token(e) => e.code(),
            ApiError::Hash(e) => e.code(),
            ApiError::Storage(e) => e.code(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Auth(error) => error.into_response(),
            ApiError::Token(error) => error.into_response(),
            ApiError::Hash(error) => error.into_response(),
            ApiError::Storage(error) => error.into_response(),
        }
    }
}
