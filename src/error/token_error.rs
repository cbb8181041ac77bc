use crate::response::app_response::ErrorResponse;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Token error: {0}")]
    TokenCreation(String),
    #[error("Token has expired")]
    TokenExpired,
    #[error("Missing Bearer token")]
    MissingToken,
    #[error("Invalid token")]
    InvalidToken,
}

impl TokenError {
    pub fn code(&self) -> &'static str {
        match self {
            TokenError::TokenCreation(_) => "TKN-001",
            TokenError::TokenExpired => "ATH-003",
            TokenError::MissingToken => "ATH-004",
            TokenError::InvalidToken => "ATH-005",
        }
    }
}

impl IntoResponse for TokenError {
    fn into_response(self) -> Response {
        let status_code = match self {
            TokenError::TokenCreation(_) => StatusCode::INTERNAL_SERVER_ERROR,
            TokenError::TokenExpired | TokenError::MissingToken | TokenError::InvalidToken => {
                StatusCode::UNAUTHORIZED
            }
        };

        ErrorResponse::send(self.code(), self.to_string())
            .with_status(status_code)
            .into_response()
    }
}
