pub(crate) mod session_dto;
pub(crate) mod user_dto;
