use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Confirmed consultation backed by a real remote calendar event. Only
/// created after the remote write has succeeded.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Appointment {
    pub id: String,
    pub firm_id: String,
    pub case_id: String,
    pub client_name: String,
    pub client_email: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub calendar_event_id: String,
    pub meeting_link: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub struct NewAppointmentParams {
    pub firm_id: String,
    pub case_id: String,
    pub client_name: String,
    pub client_email: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub calendar_event_id: String,
    pub meeting_link: Option<String>,
}

impl Appointment {
    pub fn new(params: NewAppointmentParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            firm_id: params.firm_id,
            case_id: params.case_id,
            client_name: params.client_name,
            client_email: params.client_email,
            start_time: params.start_time,
            end_time: params.end_time,
            calendar_event_id: params.calendar_event_id,
            meeting_link: params.meeting_link,
            created_at: Utc::now(),
        }
    }
}

/// Non-fatal warning attached to blocked-date creation when existing
/// appointments fall inside the blocked range.
#[derive(Debug, Serialize, Clone)]
pub struct ConflictWarning {
    pub appointment_id: String,
    pub client_name: String,
    pub date: String,
    pub time: String,
}
