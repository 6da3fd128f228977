use crate::domain::models::availability::WeeklySchedule;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct UpdateAvailabilityRequest {
    pub timezone: String,
    pub weekly_schedule: WeeklySchedule,
}

#[derive(Deserialize)]
pub struct CreateBlockedDateRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: Option<String>,
}

#[derive(Deserialize)]
pub struct GoogleCallbackRequest {
    pub firm_id: String,
    pub code: String,
}

#[derive(Deserialize)]
pub struct SelectCalendarRequest {
    pub calendar_id: String,
    pub calendar_name: String,
}

#[derive(Deserialize)]
pub struct SlotsQuery {
    pub days: Option<i64>,
}

#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub case_id: String,
    pub start_time: DateTime<Utc>,
    pub attendee_name: String,
    pub attendee_email: String,
}
