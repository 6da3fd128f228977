use crate::config::GoogleOAuthConfig;
use crate::domain::models::connection::{CalendarConnection, Credentials, NewConnectionParams};
use crate::domain::ports::{CalendarDirectory, CalendarInfo, ConnectionRepository, OAuthTokenClient};
use crate::domain::services::token_lifecycle::TokenLifecycleService;
use crate::error::AppError;
use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::{info, warn};

/// Initial-connection and calendar-selection flow. Steady-state token
/// handling lives in `TokenLifecycleService`; this service only runs at
/// consent time and for explicit calendar management actions.
pub struct GoogleIntegrationService {
    connection_repo: Arc<dyn ConnectionRepository>,
    oauth_client: Arc<dyn OAuthTokenClient>,
    directory: Arc<dyn CalendarDirectory>,
    lifecycle: Arc<TokenLifecycleService>,
    oauth_config: GoogleOAuthConfig,
}

impl GoogleIntegrationService {
    pub fn new(
        connection_repo: Arc<dyn ConnectionRepository>,
        oauth_client: Arc<dyn OAuthTokenClient>,
        directory: Arc<dyn CalendarDirectory>,
        lifecycle: Arc<TokenLifecycleService>,
        oauth_config: GoogleOAuthConfig,
    ) -> Self {
        Self { connection_repo, oauth_client, directory, lifecycle, oauth_config }
    }

    /// Consent URL with offline access and a forced consent screen, so
    /// Google returns a refresh token even on re-connection.
    pub fn auth_url(&self, state: &str) -> String {
        format!(
            "{}?response_type=code&client_id={}&redirect_uri={}&scope={}&access_type=offline&include_granted_scopes=true&prompt=consent&state={}",
            self.oauth_config.auth_uri,
            urlencoding::encode(&self.oauth_config.client_id),
            urlencoding::encode(&self.oauth_config.redirect_uri),
            urlencoding::encode(&self.oauth_config.scopes.join(" ")),
            urlencoding::encode(state),
        )
    }

    /// Exchanges the authorization code and upserts the connection,
    /// fully replacing any prior record for the firm.
    pub async fn complete_connection(
        &self,
        firm_id: &str,
        code: &str,
    ) -> Result<CalendarConnection, AppError> {
        let grant = self
            .oauth_client
            .exchange_code(code)
            .await
            .map_err(|e| AppError::CalendarUnavailable(format!("Code exchange failed: {}", e.message)))?;

        if grant.refresh_token.is_none() {
            warn!("Token exchange for firm {} returned no refresh token", firm_id);
        }

        let credentials = Credentials {
            access_token: grant.access_token.clone(),
            refresh_token: grant.refresh_token.clone(),
            scopes: grant.scopes.clone(),
        };
        let (calendar_id, calendar_name) = self.auto_select_calendar(&credentials).await;

        let scopes = if grant.scopes.is_empty() {
            self.oauth_config.scopes.clone()
        } else {
            grant.scopes
        };

        let connection = CalendarConnection::new(NewConnectionParams {
            firm_id: firm_id.to_string(),
            access_token: grant.access_token,
            refresh_token: grant.refresh_token,
            scopes,
            calendar_id,
            calendar_name,
            token_expiry: grant.expires_in_secs.map(|s| Utc::now() + Duration::seconds(s)),
        });

        let stored = self.connection_repo.upsert(&connection).await?;
        info!("Stored calendar connection for firm {} (calendar: {})", firm_id, stored.calendar_name);
        Ok(stored)
    }

    /// Primary calendar if marked, otherwise the first listed, otherwise
    /// Google's literal "primary" alias. Listing failure falls back to
    /// the alias rather than failing the connect flow.
    async fn auto_select_calendar(&self, credentials: &Credentials) -> (String, String) {
        match self.directory.list_calendars(credentials).await {
            Ok(calendars) => {
                if let Some(primary) = calendars.iter().find(|c| c.primary) {
                    return (primary.id.clone(), primary.summary.clone());
                }
                if let Some(first) = calendars.first() {
                    return (first.id.clone(), first.summary.clone());
                }
                ("primary".to_string(), "Primary Calendar".to_string())
            }
            Err(e) => {
                warn!("Failed to auto-select calendar, using default: {:?}", e);
                ("primary".to_string(), "Primary Calendar".to_string())
            }
        }
    }

    pub async fn list_calendars(&self, firm_id: &str) -> Result<Vec<CalendarInfo>, AppError> {
        let credentials = self.lifecycle.get_valid_credentials(firm_id).await?;
        self.directory.list_calendars(&credentials).await
    }

    pub async fn select_calendar(
        &self,
        firm_id: &str,
        calendar_id: &str,
        calendar_name: &str,
    ) -> Result<(), AppError> {
        let updated = self
            .connection_repo
            .update_selected_calendar(firm_id, calendar_id, calendar_name)
            .await?;
        if !updated {
            return Err(AppError::NotConnected);
        }
        Ok(())
    }

    pub async fn disconnect(&self, firm_id: &str) -> Result<bool, AppError> {
        self.connection_repo.delete_by_firm(firm_id).await
    }

    pub async fn connection(&self, firm_id: &str) -> Result<Option<CalendarConnection>, AppError> {
        self.connection_repo.find_by_firm(firm_id).await
    }
}
