use crate::dto::session_dto::{SigninResponseDto, SignoutResponseDto};
use crate::dto::user_dto::UserSigninDto;
use crate::error::{request_error::ValidatedRequest, token_error::TokenError, ApiError};
use crate::state::auth_state::AuthState;
use axum::{extract::State, http, http::HeaderMap, Json};
use tracing::info;

pub async fn signin(
    State(state): State<AuthState>,
    ValidatedRequest(payload): ValidatedRequest<UserSigninDto>,
) -> Result<Json<SigninResponseDto>, ApiError> {
    info!("Signin attempt for username: {}", payload.username);

    let session = state
        .auth_service
        .signin(&payload.username, &payload.password)
        .await?;

    Ok(Json(SigninResponseDto::from(session)))
}

pub async fn signout(
    State(state): State<AuthState>,
    headers: HeaderMap,
) -> Result<Json<SignoutResponseDto>, ApiError> {
    let access_token = bearer_token(&headers)?;

    let user = state.auth_service.signout(access_token).await?;

    Ok(Json(SignoutResponseDto {
        id: user.id,
        message: "SIGNED OUT SUCCESSFULLY".to_string(),
    }))
}

pub(crate) fn bearer_token(headers: &HeaderMap) -> Result<&str, TokenError> {
    let token = headers
        .get(http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .ok_or(TokenError::MissingToken)?;

    if token.is_empty() {
        return Err(TokenError::MissingToken);
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        headers.insert(
            http::header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc.def.ghi"),
        );
        assert_eq!(bearer_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_missing_or_malformed_header_is_rejected() {
        let headers = HeaderMap::new();
        assert!(matches!(bearer_token(&headers), Err(TokenError::MissingToken)));

        let mut headers = HeaderMap::new();
        headers.insert(
            http::header::AUTHORIZATION,
            HeaderValue::from_static("Basic dXNlcjpwdw=="),
        );
        assert!(matches!(bearer_token(&headers), Err(TokenError::MissingToken)));

        let mut headers = HeaderMap::new();
        headers.insert(http::header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert!(matches!(bearer_token(&headers), Err(TokenError::MissingToken)));
    }
}
