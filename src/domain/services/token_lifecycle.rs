use crate::domain::models::connection::{CalendarConnection, ConnectionHealth, Credentials, TokenStatus};
use crate::domain::ports::{ConnectionRepository, OAuthTokenClient, OAuthErrorKind, TokenGrant};
use crate::error::AppError;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Refresh this many minutes before the recorded expiry.
const REFRESH_BUFFER_MINUTES: i64 = 5;

/// Owns the access/refresh token state machine. Refresh is proactive:
/// checked before every use rather than reacting to a 401, so a token
/// cannot expire midway through a multi-call resolution request. All
/// refresh failures are terminal (fail-closed) and flip the connection
/// to `needs_reauth`.
pub struct TokenLifecycleService {
    connection_repo: Arc<dyn ConnectionRepository>,
    oauth_client: Arc<dyn OAuthTokenClient>,
}

impl TokenLifecycleService {
    pub fn new(
        connection_repo: Arc<dyn ConnectionRepository>,
        oauth_client: Arc<dyn OAuthTokenClient>,
    ) -> Self {
        Self { connection_repo, oauth_client }
    }

    /// Returns credentials vouched fresh enough for immediate use,
    /// refreshing and persisting first when needed.
    pub async fn get_valid_credentials(&self, firm_id: &str) -> Result<Credentials, AppError> {
        let connection = self
            .connection_repo
            .find_by_firm(firm_id)
            .await?
            .ok_or(AppError::NotConnected)?;

        // Terminal state: no network call can recover it, only a new
        // consent flow replacing the record.
        if connection.token_status == TokenStatus::NeedsReauth {
            warn!("Connection for firm {} is marked as needing re-authentication", firm_id);
            return Err(AppError::NeedsReauth(
                connection
                    .last_refresh_error
                    .unwrap_or_else(|| "connection marked needs_reauth".to_string()),
            ));
        }

        let now = Utc::now();

        let Some(refresh_token) = connection.refresh_token.clone() else {
            // Some consent flows omit the refresh token on re-consent.
            // Degraded but valid: the access token works until it expires.
            if is_known_expired(connection.token_expiry, now) {
                let msg = "Access token expired and no refresh token is available";
                self.connection_repo.mark_needs_reauth(firm_id, msg).await?;
                return Err(AppError::NeedsReauth(msg.to_string()));
            }
            info!("No refresh token for firm {}, using stored access token as-is", firm_id);
            return Ok(credentials_from(&connection));
        };

        if !needs_refresh(connection.token_expiry, now) {
            return Ok(credentials_from(&connection));
        }

        info!("Token refresh needed for firm {}", firm_id);
        match self.oauth_client.refresh(&refresh_token).await {
            Ok(grant) => {
                let expiry = grant.expires_in_secs.map(|s| now + Duration::seconds(s));
                self.connection_repo
                    .update_tokens(firm_id, &grant.access_token, expiry)
                    .await?;
                info!("Successfully refreshed and updated tokens for firm {}", firm_id);
                Ok(apply_grant(&connection, grant))
            }
            Err(e) => {
                let message = match e.kind {
                    OAuthErrorKind::InvalidGrant => {
                        format!("Refresh token expired or revoked: {}", e.message)
                    }
                    OAuthErrorKind::InvalidClient => {
                        format!("OAuth client configuration error: {}", e.message)
                    }
                    OAuthErrorKind::Other => format!("Token refresh failed: {}", e.message),
                };
                error!("Token refresh failed for firm {}: {}", firm_id, message);
                self.connection_repo.mark_needs_reauth(firm_id, &message).await?;
                Err(AppError::NeedsReauth(message))
            }
        }
    }

    /// Read-only health projection. Never triggers a refresh attempt.
    pub async fn connection_health(&self, firm_id: &str) -> Result<ConnectionHealth, AppError> {
        let Some(connection) = self.connection_repo.find_by_firm(firm_id).await? else {
            return Ok(ConnectionHealth::disconnected());
        };

        Ok(ConnectionHealth {
            connected: true,
            status: connection.token_status.as_str().to_string(),
            needs_reauth: connection.token_status == TokenStatus::NeedsReauth,
            error_count: connection.refresh_error_count,
            last_error: connection.last_refresh_error,
            has_refresh_token: connection.refresh_token.is_some(),
        })
    }
}

fn credentials_from(connection: &CalendarConnection) -> Credentials {
    Credentials {
        access_token: connection.access_token.clone(),
        refresh_token: connection.refresh_token.clone(),
        scopes: connection.scope_list(),
    }
}

fn apply_grant(connection: &CalendarConnection, grant: TokenGrant) -> Credentials {
    Credentials {
        access_token: grant.access_token,
        refresh_token: connection.refresh_token.clone(),
        scopes: connection.scope_list(),
    }
}

fn is_known_expired(expiry: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    matches!(expiry, Some(e) if e <= now)
}

/// Unknown freshness counts as stale: with no recorded expiry we refresh
/// rather than hand out a token that may already be dead.
fn needs_refresh(expiry: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    match expiry {
        None => true,
        Some(e) => e <= now + Duration::minutes(REFRESH_BUFFER_MINUTES),
    }
}
