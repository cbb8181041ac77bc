use crate::config::database::Database;
use crate::repository::postgres::PgBackend;
use crate::service::auth_service::AuthService;
use crate::service::password_service::PasswordService;
use crate::service::token_service::TokenService;
use std::sync::Arc;

/// Shared handler state: the one authentication service instance for the
/// process, with its collaborators injected at construction.
#[derive(Clone)]
pub struct AuthState {
    pub auth_service: AuthService<PgBackend>,
}

impl AuthState {
    pub fn new(db_conn: &Arc<Database>) -> Self {
        Self {
            auth_service: AuthService::new(
                PgBackend::new(db_conn),
                PasswordService::from_config(),
                TokenService::from_config(),
            ),
        }
    }
}
