pub(crate) mod auth_service;
pub(crate) mod password_service;
pub(crate) mod token_service;
