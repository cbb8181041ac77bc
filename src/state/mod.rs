pub(crate) mod auth_state;
