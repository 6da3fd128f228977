use crate::domain::models::appointment::{Appointment, NewAppointmentParams};
use crate::domain::ports::{
    AppointmentRepository, CalendarEventWriter, ConnectionRepository, EventDraft, TimelineRecorder,
};
use crate::domain::services::schedule::ScheduleService;
use crate::domain::services::token_lifecycle::TokenLifecycleService;
use crate::error::AppError;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::{error, info};

pub struct BookingRequest {
    pub firm_id: String,
    pub case_id: String,
    pub start_time: DateTime<Utc>,
    pub client_name: String,
    pub client_email: String,
}

/// Converts a chosen slot into a remote calendar event plus a local
/// appointment record. The remote write goes first: a failed event
/// insert aborts the booking so no orphaned local appointment can exist
/// without a real calendar event behind it.
pub struct BookingService {
    schedule_service: Arc<ScheduleService>,
    lifecycle: Arc<TokenLifecycleService>,
    connection_repo: Arc<dyn ConnectionRepository>,
    appointment_repo: Arc<dyn AppointmentRepository>,
    event_writer: Arc<dyn CalendarEventWriter>,
    timeline: Arc<dyn TimelineRecorder>,
    slot_minutes: i64,
}

impl BookingService {
    pub fn new(
        schedule_service: Arc<ScheduleService>,
        lifecycle: Arc<TokenLifecycleService>,
        connection_repo: Arc<dyn ConnectionRepository>,
        appointment_repo: Arc<dyn AppointmentRepository>,
        event_writer: Arc<dyn CalendarEventWriter>,
        timeline: Arc<dyn TimelineRecorder>,
        slot_minutes: i64,
    ) -> Self {
        Self {
            schedule_service,
            lifecycle,
            connection_repo,
            appointment_repo,
            event_writer,
            timeline,
            slot_minutes,
        }
    }

    pub async fn book(&self, request: BookingRequest) -> Result<Appointment, AppError> {
        if request.start_time <= Utc::now() {
            return Err(AppError::Validation("Cannot book in the past".into()));
        }

        let connection = self
            .connection_repo
            .find_by_firm(&request.firm_id)
            .await?
            .ok_or(AppError::NotConnected)?;
        let credentials = self.lifecycle.get_valid_credentials(&request.firm_id).await?;

        let availability = self.schedule_service.get_or_default(&request.firm_id).await?;
        let end_time = request.start_time + Duration::minutes(self.slot_minutes);

        let draft = EventDraft {
            summary: format!("Consultation - {}", request.client_name),
            description: format!(
                "Consultation with {} ({})\nCase ID: {}",
                request.client_name, request.client_email, request.case_id
            ),
            start: request.start_time,
            end: end_time,
            timezone: availability.timezone.clone(),
            attendee_name: request.client_name.clone(),
            attendee_email: request.client_email.clone(),
            request_id: format!("meet-{}-{}", request.case_id, request.start_time.timestamp()),
        };

        let created = self
            .event_writer
            .create_event(&credentials, &connection.calendar_id, &draft)
            .await?;

        info!(
            "Calendar event {} created for case {} (firm {})",
            created.event_id, request.case_id, request.firm_id
        );

        let appointment = Appointment::new(NewAppointmentParams {
            firm_id: request.firm_id.clone(),
            case_id: request.case_id.clone(),
            client_name: request.client_name.clone(),
            client_email: request.client_email,
            start_time: request.start_time,
            end_time,
            calendar_event_id: created.event_id,
            meeting_link: created.meeting_link,
        });
        let stored = self.appointment_repo.create(&appointment).await?;

        // Timeline recording is best-effort; its failure never unwinds
        // a booking that already has a real calendar event.
        if let Err(e) = self
            .timeline
            .record(
                &request.case_id,
                &request.firm_id,
                "meeting_scheduled",
                &format!(
                    "Meeting scheduled with {} for {}",
                    request.client_name,
                    request.start_time.format("%B %-d, %Y at %-I:%M %p")
                ),
            )
            .await
        {
            error!("Failed to record timeline event for appointment {}: {:?}", stored.id, e);
        }

        Ok(stored)
    }
}
