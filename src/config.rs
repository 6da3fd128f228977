use std::env;

/// Google OAuth client settings, injected explicitly so the token
/// lifecycle can run against fakes in tests instead of reading the
/// environment at call sites.
#[derive(Clone)]
pub struct GoogleOAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub auth_uri: String,
    pub token_uri: String,
    pub scopes: Vec<String>,
}

impl GoogleOAuthConfig {
    pub fn from_env() -> Self {
        Self {
            client_id: env::var("GOOGLE_CLIENT_ID").expect("GOOGLE_CLIENT_ID must be set"),
            client_secret: env::var("GOOGLE_CLIENT_SECRET").expect("GOOGLE_CLIENT_SECRET must be set"),
            redirect_uri: env::var("GOOGLE_REDIRECT_URI")
                .unwrap_or_else(|_| "http://127.0.0.1:8000/api/v1/integrations/google/callback".to_string()),
            auth_uri: "https://accounts.google.com/o/oauth2/auth".to_string(),
            token_uri: "https://oauth2.googleapis.com/token".to_string(),
            scopes: vec!["https://www.googleapis.com/auth/calendar".to_string()],
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub google_oauth: GoogleOAuthConfig,
    /// Slot length handed to the resolution engine. The engine only
    /// supports whole-hour multiples of this at the API surface.
    pub slot_duration_min: i64,
    /// Default lookahead window when the caller does not pass one.
    pub default_lookahead_days: i64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            google_oauth: GoogleOAuthConfig::from_env(),
            slot_duration_min: 60,
            default_lookahead_days: env::var("LOOKAHEAD_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
        }
    }
}
