use crate::config::GoogleOAuthConfig;
use crate::domain::ports::{OAuthError, OAuthErrorKind, OAuthTokenClient, TokenGrant};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{error, info};

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
    scope: Option<String>,
}

#[derive(Deserialize, Default)]
struct TokenErrorResponse {
    #[serde(default)]
    error: String,
    #[serde(default)]
    error_description: String,
}

/// Talks to Google's OAuth token endpoint. Single attempt per call: a
/// failure surfaces to the lifecycle manager for classification instead
/// of being retried here.
pub struct HttpOAuthClient {
    client: Client,
    config: GoogleOAuthConfig,
}

impl HttpOAuthClient {
    pub fn new(config: GoogleOAuthConfig) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| Client::new()),
            config,
        }
    }

    async fn token_request(&self, form: &[(&str, &str)]) -> Result<TokenGrant, OAuthError> {
        let res = self
            .client
            .post(&self.config.token_uri)
            .form(form)
            .send()
            .await
            .map_err(|e| OAuthError {
                kind: OAuthErrorKind::Other,
                message: format!("Token endpoint unreachable: {}", e),
            })?;

        let status = res.status();
        if !status.is_success() {
            let body: TokenErrorResponse = res.json().await.unwrap_or_default();
            let kind = match body.error.as_str() {
                "invalid_grant" => OAuthErrorKind::InvalidGrant,
                "invalid_client" => OAuthErrorKind::InvalidClient,
                _ => OAuthErrorKind::Other,
            };
            error!("Token endpoint returned {}: {} {}", status, body.error, body.error_description);
            return Err(OAuthError {
                kind,
                message: format!("{} ({}: {})", status, body.error, body.error_description),
            });
        }

        let body: TokenResponse = res.json().await.map_err(|e| OAuthError {
            kind: OAuthErrorKind::Other,
            message: format!("Malformed token response: {}", e),
        })?;

        info!("Token endpoint call succeeded (refresh_token present: {})", body.refresh_token.is_some());

        Ok(TokenGrant {
            access_token: body.access_token,
            refresh_token: body.refresh_token,
            scopes: body
                .scope
                .map(|s| s.split_whitespace().map(str::to_string).collect())
                .unwrap_or_default(),
            expires_in_secs: body.expires_in,
        })
    }
}

#[async_trait]
impl OAuthTokenClient for HttpOAuthClient {
    async fn exchange_code(&self, code: &str) -> Result<TokenGrant, OAuthError> {
        self.token_request(&[
            ("code", code),
            ("client_id", &self.config.client_id),
            ("client_secret", &self.config.client_secret),
            ("redirect_uri", &self.config.redirect_uri),
            ("grant_type", "authorization_code"),
        ])
        .await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenGrant, OAuthError> {
        self.token_request(&[
            ("refresh_token", refresh_token),
            ("client_id", &self.config.client_id),
            ("client_secret", &self.config.client_secret),
            ("grant_type", "refresh_token"),
        ])
        .await
    }
}
