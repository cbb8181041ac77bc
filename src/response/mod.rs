pub(crate) mod app_response;
