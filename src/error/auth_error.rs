use crate::response::app_response::ErrorResponse;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Expected business outcomes of signup/signin/signout. Each carries a
/// stable short code the transport adapter surfaces alongside the message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Try any other Username, this Username has already been taken")]
    UsernameTaken,
    #[error("This user has already been registered, try with any other emailId")]
    EmailTaken,
    #[error("This username does not exist")]
    UnknownUser,
    #[error("Password failed")]
    BadCredentials,
    #[error("User is not Signed in")]
    SessionNotFound,
}

impl AuthError {
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::UsernameTaken => "SGR-001",
            AuthError::EmailTaken => "SGR-002",
            AuthError::UnknownUser => "ATH-001",
            AuthError::BadCredentials => "ATH-002",
            // The original system reuses SGR-001 for signout on an unknown
            // token; kept for compatible behavior.
            AuthError::SessionNotFound => "SGR-001",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status_code = match self {
            AuthError::UsernameTaken | AuthError::EmailTaken => StatusCode::CONFLICT,
            AuthError::UnknownUser | AuthError::BadCredentials | AuthError::SessionNotFound => {
                StatusCode::UNAUTHORIZED
            }
        };

        ErrorResponse::send(self.code(), self.to_string())
            .with_status(status_code)
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stable_codes() {
        assert_eq!(AuthError::UsernameTaken.code(), "SGR-001");
        assert_eq!(AuthError::EmailTaken.code(), "SGR-002");
        assert_eq!(AuthError::UnknownUser.code(), "ATH-001");
        assert_eq!(AuthError::BadCredentials.code(), "ATH-002");
        assert_eq!(AuthError::SessionNotFound.code(), "SGR-001");
    }

    #[test]
    fn test_messages_are_stable() {
        assert_eq!(
            AuthError::UsernameTaken.to_string(),
            "Try any other Username, this Username has already been taken"
        );
        assert_eq!(AuthError::BadCredentials.to_string(), "Password failed");
        assert_eq!(AuthError::SessionNotFound.to_string(), "User is not Signed in");
    }
}
