use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Lifecycle state of the stored token pair. `NeedsReauth` is terminal:
/// only a brand-new consent flow (which replaces the whole record)
/// returns the connection to `Active`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TokenStatus {
    Active,
    NeedsReauth,
}

impl TokenStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenStatus::Active => "active",
            TokenStatus::NeedsReauth => "needs_reauth",
        }
    }
}

/// One Google Calendar connection per firm. Reconnecting upserts and
/// fully replaces the token material.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct CalendarConnection {
    pub id: String,
    pub firm_id: String,
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// Space-joined OAuth scopes as granted at consent time.
    pub scopes: String,
    pub calendar_id: String,
    pub calendar_name: String,
    pub token_status: TokenStatus,
    pub token_expiry: Option<DateTime<Utc>>,
    pub refresh_error_count: i64,
    pub last_refresh_error: Option<String>,
    pub last_refresh_attempt: Option<DateTime<Utc>>,
    pub connected_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewConnectionParams {
    pub firm_id: String,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub scopes: Vec<String>,
    pub calendar_id: String,
    pub calendar_name: String,
    pub token_expiry: Option<DateTime<Utc>>,
}

impl CalendarConnection {
    pub fn new(params: NewConnectionParams) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            firm_id: params.firm_id,
            access_token: params.access_token,
            refresh_token: params.refresh_token,
            scopes: params.scopes.join(" "),
            calendar_id: params.calendar_id,
            calendar_name: params.calendar_name,
            token_status: TokenStatus::Active,
            token_expiry: params.token_expiry,
            refresh_error_count: 0,
            last_refresh_error: None,
            last_refresh_attempt: None,
            connected_at: now,
            updated_at: now,
        }
    }

    pub fn scope_list(&self) -> Vec<String> {
        self.scopes.split_whitespace().map(str::to_string).collect()
    }
}

/// Capability handed to calendar clients once the lifecycle manager has
/// vouched for token freshness. Never constructed from a `needs_reauth`
/// connection.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub scopes: Vec<String>,
}

/// Read-only projection of connection health for status reporting.
#[derive(Debug, Serialize, Clone)]
pub struct ConnectionHealth {
    pub connected: bool,
    pub status: String,
    pub needs_reauth: bool,
    pub error_count: i64,
    pub last_error: Option<String>,
    pub has_refresh_token: bool,
}

impl ConnectionHealth {
    /// An unconnected firm also needs the consent flow, so it reports
    /// `needs_reauth` alongside `connected: false`.
    pub fn disconnected() -> Self {
        Self {
            connected: false,
            status: "not_connected".to_string(),
            needs_reauth: true,
            error_count: 0,
            last_error: None,
            has_refresh_token: false,
        }
    }
}
