use crate::config::logging::secure_log;
use crate::error::ApiError;
use crate::handler::auth_handler::bearer_token;
use crate::state::auth_state::AuthState;
use axum::extract::State;
use axum::{http::Request, middleware::Next, response::IntoResponse};
use tracing::info;

/// Bearer-session middleware for protected routes. Resolves the token to
/// its session, rejecting ended and expired ones, and injects the owning
/// user into request extensions. Expiry is checked here, at consumption
/// time; it never mutates the session.
pub async fn auth(
    State(state): State<AuthState>,
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Result<impl IntoResponse, ApiError> {
    let token = bearer_token(req.headers())?.to_string();

    match state.auth_service.resolve_session(&token).await {
        Ok((session, user)) => {
            info!("Session {} resolved for user: {}", session.id, user.id);
            req.extensions_mut().insert(user);
            req.extensions_mut().insert(session);
            Ok(next.run(req).await)
        }
        Err(e) => {
            secure_log::secure_error!(format!("Bearer session rejected ({})", e.code()), e);
            Err(e)
        }
    }
}
