use crate::domain::models::appointment::ConflictWarning;
use crate::domain::models::availability::{BlockedDate, WeeklySchedule};
use serde::Serialize;

#[derive(Serialize)]
pub struct AvailabilityResponse {
    pub firm_id: String,
    pub timezone: String,
    pub weekly_schedule: WeeklySchedule,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Serialize)]
pub struct BlockedDatesListResponse {
    pub blocked_dates: Vec<BlockedDate>,
    pub total: usize,
}

#[derive(Serialize)]
pub struct BlockedDateCreatedResponse {
    pub blocked_date: BlockedDate,
    pub conflicts: Vec<ConflictWarning>,
}

#[derive(Serialize, Clone)]
pub struct TimezoneOption {
    pub value: &'static str,
    pub label: &'static str,
    pub offset: &'static str,
}

#[derive(Serialize)]
pub struct TimezonesResponse {
    pub timezones: Vec<TimezoneOption>,
}

#[derive(Serialize)]
pub struct AuthUrlResponse {
    pub auth_url: String,
}

#[derive(Serialize)]
pub struct ConnectionStatusResponse {
    pub connected: bool,
    pub calendar_id: Option<String>,
    pub calendar_name: Option<String>,
    pub connected_at: Option<String>,
    pub token_status: String,
    pub needs_reauth: bool,
    pub error_count: i64,
    pub last_error: Option<String>,
    pub has_refresh_token: bool,
}

#[derive(Serialize)]
pub struct CalendarEntry {
    pub id: String,
    pub summary: String,
    pub primary: bool,
}

#[derive(Serialize)]
pub struct CalendarsResponse {
    pub calendars: Vec<CalendarEntry>,
}

#[derive(Serialize)]
pub struct BookingResponse {
    pub appointment_id: String,
    pub calendar_event_id: String,
    pub meeting_link: Option<String>,
}
