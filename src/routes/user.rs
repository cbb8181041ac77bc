use crate::handler::{auth_handler, signup_handler};
use crate::state::auth_state::AuthState;
use axum::{routing::post, Router};

pub fn routes() -> Router<AuthState> {
    Router::<AuthState>::new()
        .route("/user/signup", post(signup_handler::signup))
        .route("/user/signin", post(auth_handler::signin))
        .route("/user/signout", post(auth_handler::signout))
}
