use crate::handler::profile_handler;
use axum::{routing::get, Router};

pub fn routes() -> Router {
    Router::new().route("/user/profile", get(profile_handler::profile))
}
