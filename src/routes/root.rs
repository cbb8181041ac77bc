use crate::config::database::Database;
use crate::middleware::auth as auth_middleware;
use crate::routes::{health, profile, user};
use crate::state::auth_state::AuthState;
use axum::{middleware, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

pub fn routes(db_conn: Arc<Database>) -> Router {
    let auth_state = AuthState::new(&db_conn);

    let merged_router = user::routes()
        .with_state(auth_state.clone())
        .merge(profile::routes().layer(ServiceBuilder::new().layer(
            middleware::from_fn_with_state(auth_state, auth_middleware::auth),
        )))
        .merge(health::routes().with_state(db_conn));

    Router::new()
        .nest("/api", merged_router)
        .layer(TraceLayer::new_for_http())
}
