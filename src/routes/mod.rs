pub(crate) mod health;
pub(crate) mod profile;
pub(crate) mod root;
pub(crate) mod user;
