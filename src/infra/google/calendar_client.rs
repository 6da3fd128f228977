use crate::domain::models::connection::Credentials;
use crate::domain::models::slot::BusyInterval;
use crate::domain::ports::{
    BusyTimeClient, CalendarDirectory, CalendarEventWriter, CalendarInfo, CreatedEvent, EventDraft,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{error, info};

const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Google Calendar REST client covering free/busy queries, event
/// creation and calendar listing. Calls are single-attempt with a
/// bounded timeout; failures surface as `CalendarUnavailable` rather
/// than degrading to "assume everything is free".
pub struct GoogleCalendarClient {
    client: Client,
}

impl Default for GoogleCalendarClient {
    fn default() -> Self {
        Self::new()
    }
}

impl GoogleCalendarClient {
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    async fn parse_or_unavailable(&self, res: reqwest::Response, context: &str) -> Result<Value, AppError> {
        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            error!("{} failed with {}: {}", context, status, body);
            return Err(AppError::CalendarUnavailable(format!("{} returned {}", context, status)));
        }
        res.json()
            .await
            .map_err(|e| AppError::CalendarUnavailable(format!("{} returned malformed JSON: {}", context, e)))
    }
}

#[async_trait]
impl BusyTimeClient for GoogleCalendarClient {
    async fn list_busy(
        &self,
        credentials: &Credentials,
        calendar_id: &str,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> Result<Vec<BusyInterval>, AppError> {
        let payload = json!({
            "timeMin": time_min.to_rfc3339(),
            "timeMax": time_max.to_rfc3339(),
            "items": [{ "id": calendar_id }]
        });

        let res = self
            .client
            .post(format!("{}/freeBusy", CALENDAR_API_BASE))
            .bearer_auth(&credentials.access_token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::CalendarUnavailable(format!("freeBusy request failed: {}", e)))?;

        let body = self.parse_or_unavailable(res, "freeBusy query").await?;

        let busy_entries = body
            .get("calendars")
            .and_then(|c| c.get(calendar_id))
            .and_then(|c| c.get("busy"))
            .and_then(|b| b.as_array())
            .cloned()
            .unwrap_or_default();

        let mut intervals = Vec::with_capacity(busy_entries.len());
        for entry in busy_entries {
            let (Some(start), Some(end)) = (
                entry.get("start").and_then(|v| v.as_str()),
                entry.get("end").and_then(|v| v.as_str()),
            ) else {
                continue;
            };
            let start = DateTime::parse_from_rfc3339(start)
                .map_err(|e| AppError::CalendarUnavailable(format!("Bad busy interval start: {}", e)))?
                .with_timezone(&Utc);
            let end = DateTime::parse_from_rfc3339(end)
                .map_err(|e| AppError::CalendarUnavailable(format!("Bad busy interval end: {}", e)))?
                .with_timezone(&Utc);
            intervals.push(BusyInterval { start, end });
        }

        info!("freeBusy query returned {} busy interval(s)", intervals.len());
        Ok(intervals)
    }
}

#[async_trait]
impl CalendarEventWriter for GoogleCalendarClient {
    async fn create_event(
        &self,
        credentials: &Credentials,
        calendar_id: &str,
        draft: &EventDraft,
    ) -> Result<CreatedEvent, AppError> {
        let payload = json!({
            "summary": draft.summary,
            "description": draft.description,
            "start": {
                "dateTime": draft.start.to_rfc3339(),
                "timeZone": draft.timezone,
            },
            "end": {
                "dateTime": draft.end.to_rfc3339(),
                "timeZone": draft.timezone,
            },
            "attendees": [
                { "email": draft.attendee_email, "displayName": draft.attendee_name }
            ],
            "conferenceData": {
                "createRequest": {
                    "requestId": draft.request_id,
                    "conferenceSolutionKey": { "type": "hangoutsMeet" }
                }
            },
            "reminders": {
                "useDefault": false,
                "overrides": [
                    { "method": "email", "minutes": 24 * 60 },
                    { "method": "popup", "minutes": 30 }
                ]
            }
        });

        let res = self
            .client
            .post(format!(
                "{}/calendars/{}/events?conferenceDataVersion=1&sendUpdates=all",
                CALENDAR_API_BASE,
                urlencoding::encode(calendar_id)
            ))
            .bearer_auth(&credentials.access_token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::CalendarUnavailable(format!("Event insert failed: {}", e)))?;

        let body = self.parse_or_unavailable(res, "event insert").await?;

        let event_id = body
            .get("id")
            .and_then(|v| v.as_str())
            .ok_or_else(|| AppError::CalendarUnavailable("Event insert response missing id".into()))?
            .to_string();

        let meeting_link = body
            .get("conferenceData")
            .and_then(|c| c.get("entryPoints"))
            .and_then(|e| e.as_array())
            .and_then(|entries| {
                entries.iter().find(|e| {
                    e.get("entryPointType").and_then(|t| t.as_str()) == Some("video")
                })
            })
            .and_then(|e| e.get("uri"))
            .and_then(|u| u.as_str())
            .map(str::to_string);

        info!("Created calendar event {} (meet link: {})", event_id, meeting_link.is_some());
        Ok(CreatedEvent { event_id, meeting_link })
    }
}

#[async_trait]
impl CalendarDirectory for GoogleCalendarClient {
    async fn list_calendars(&self, credentials: &Credentials) -> Result<Vec<CalendarInfo>, AppError> {
        let res = self
            .client
            .get(format!("{}/users/me/calendarList", CALENDAR_API_BASE))
            .bearer_auth(&credentials.access_token)
            .send()
            .await
            .map_err(|e| AppError::CalendarUnavailable(format!("calendarList request failed: {}", e)))?;

        let body = self.parse_or_unavailable(res, "calendarList").await?;

        let calendars = body
            .get("items")
            .and_then(|i| i.as_array())
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| {
                        Some(CalendarInfo {
                            id: item.get("id")?.as_str()?.to_string(),
                            summary: item
                                .get("summary")
                                .and_then(|s| s.as_str())
                                .unwrap_or("")
                                .to_string(),
                            primary: item.get("primary").and_then(|p| p.as_bool()).unwrap_or(false),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(calendars)
    }
}
