use crate::config::logging::secure_log;
use crate::dto::user_dto::{SignupResponseDto, UserSignupDto};
use crate::error::{request_error::ValidatedRequest, ApiError};
use crate::state::auth_state::AuthState;
use axum::{extract::State, http::StatusCode, Json};

pub async fn signup(
    State(state): State<AuthState>,
    ValidatedRequest(payload): ValidatedRequest<UserSignupDto>,
) -> Result<(StatusCode, Json<SignupResponseDto>), ApiError> {
    secure_log::sensitive_debug!("Signup attempt for username: {}", payload.username);

    let user = state.auth_service.signup(payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(SignupResponseDto {
            id: user.id,
            status: "created".to_string(),
        }),
    ))
}
