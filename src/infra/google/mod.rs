pub mod calendar_client;
pub mod oauth_client;
