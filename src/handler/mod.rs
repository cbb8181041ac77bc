pub(crate) mod auth_handler;
pub(crate) mod health_handler;
pub(crate) mod profile_handler;
pub(crate) mod signup_handler;
