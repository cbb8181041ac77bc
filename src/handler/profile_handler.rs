use crate::dto::user_dto::UserReadDto;
use crate::entity::user::User;
use crate::error::ApiError;
use axum::{Extension, Json};

/// Returns the authenticated user's own record. The bearer-session
/// middleware has already resolved and injected the `User`.
pub async fn profile(Extension(user): Extension<User>) -> Result<Json<UserReadDto>, ApiError> {
    Ok(Json(UserReadDto::from(user)))
}
