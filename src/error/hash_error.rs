use crate::response::app_response::ErrorResponse;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// The credential hasher has exactly one failure mode: input that cannot
/// be decoded (malformed salt string, bcrypt rejecting the password bytes).
#[derive(Error, Debug)]
pub enum HashError {
    #[error("Password encoding is invalid: {0}")]
    Encoding(String),
}

impl HashError {
    pub fn code(&self) -> &'static str {
        "ENC-001"
    }
}

impl From<bcrypt::BcryptError> for HashError {
    fn from(e: bcrypt::BcryptError) -> Self {
        HashError::Encoding(e.to_string())
    }
}

impl IntoResponse for HashError {
    fn into_response(self) -> Response {
        ErrorResponse::send(self.code(), self.to_string())
            .with_status(StatusCode::INTERNAL_SERVER_ERROR)
            .into_response()
    }
}
