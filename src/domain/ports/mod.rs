use crate::domain::models::{
    appointment::Appointment,
    availability::{BlockedDate, FirmAvailability},
    connection::{CalendarConnection, Credentials},
    slot::BusyInterval,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait AvailabilityRepository: Send + Sync {
    async fn find_by_firm(&self, firm_id: &str) -> Result<Option<FirmAvailability>, AppError>;
    async fn upsert(&self, availability: &FirmAvailability) -> Result<FirmAvailability, AppError>;
    async fn list_blocked_dates(&self, firm_id: &str) -> Result<Vec<BlockedDate>, AppError>;
    async fn create_blocked_date(&self, blocked: &BlockedDate) -> Result<BlockedDate, AppError>;
    async fn delete_blocked_date(&self, firm_id: &str, id: &str) -> Result<bool, AppError>;
}

#[async_trait]
pub trait ConnectionRepository: Send + Sync {
    async fn find_by_firm(&self, firm_id: &str) -> Result<Option<CalendarConnection>, AppError>;
    async fn upsert(&self, connection: &CalendarConnection) -> Result<CalendarConnection, AppError>;
    async fn update_tokens(
        &self,
        firm_id: &str,
        access_token: &str,
        token_expiry: Option<DateTime<Utc>>,
    ) -> Result<(), AppError>;
    async fn mark_needs_reauth(&self, firm_id: &str, error_message: &str) -> Result<(), AppError>;
    async fn update_selected_calendar(
        &self,
        firm_id: &str,
        calendar_id: &str,
        calendar_name: &str,
    ) -> Result<bool, AppError>;
    async fn delete_by_firm(&self, firm_id: &str) -> Result<bool, AppError>;
}

#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    async fn create(&self, appointment: &Appointment) -> Result<Appointment, AppError>;
    async fn list_by_range(
        &self,
        firm_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Appointment>, AppError>;
}

/// Fresh token material handed back by the OAuth endpoint.
#[derive(Debug, Clone)]
pub struct TokenGrant {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub scopes: Vec<String>,
    pub expires_in_secs: Option<i64>,
}

/// Classified OAuth failure. `InvalidGrant` and `InvalidClient` match the
/// error codes the token endpoint returns for revoked refresh tokens and
/// misconfigured clients; everything else lands in `Other`. All three are
/// treated as terminal by the lifecycle manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OAuthErrorKind {
    InvalidGrant,
    InvalidClient,
    Other,
}

#[derive(Debug, Clone)]
pub struct OAuthError {
    pub kind: OAuthErrorKind,
    pub message: String,
}

#[async_trait]
pub trait OAuthTokenClient: Send + Sync {
    async fn exchange_code(&self, code: &str) -> Result<TokenGrant, OAuthError>;
    async fn refresh(&self, refresh_token: &str) -> Result<TokenGrant, OAuthError>;
}

#[async_trait]
pub trait BusyTimeClient: Send + Sync {
    async fn list_busy(
        &self,
        credentials: &Credentials,
        calendar_id: &str,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> Result<Vec<BusyInterval>, AppError>;
}

#[derive(Debug, Clone)]
pub struct EventDraft {
    pub summary: String,
    pub description: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub timezone: String,
    pub attendee_name: String,
    pub attendee_email: String,
    /// Idempotency key for the conference create request.
    pub request_id: String,
}

#[derive(Debug, Clone)]
pub struct CreatedEvent {
    pub event_id: String,
    pub meeting_link: Option<String>,
}

#[async_trait]
pub trait CalendarEventWriter: Send + Sync {
    async fn create_event(
        &self,
        credentials: &Credentials,
        calendar_id: &str,
        draft: &EventDraft,
    ) -> Result<CreatedEvent, AppError>;
}

#[derive(Debug, Clone)]
pub struct CalendarInfo {
    pub id: String,
    pub summary: String,
    pub primary: bool,
}

#[async_trait]
pub trait CalendarDirectory: Send + Sync {
    async fn list_calendars(&self, credentials: &Credentials) -> Result<Vec<CalendarInfo>, AppError>;
}

/// Fire-and-forget case timeline fact. Failures are logged by the caller
/// and never abort the surrounding operation.
#[async_trait]
pub trait TimelineRecorder: Send + Sync {
    async fn record(
        &self,
        case_id: &str,
        firm_id: &str,
        event_type: &str,
        content: &str,
    ) -> Result<(), AppError>;
}
