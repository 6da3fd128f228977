use crate::domain::models::appointment::ConflictWarning;
use crate::domain::models::availability::{BlockedDate, FirmAvailability, WeeklySchedule};
use crate::domain::ports::{AppointmentRepository, AvailabilityRepository};
use crate::error::AppError;
use chrono::NaiveDate;
use chrono_tz::Tz;
use std::sync::Arc;
use tracing::{info, warn};

pub const DEFAULT_TIMEZONE: &str = "America/Los_Angeles";

/// Per-firm weekly template and blocked-date exceptions, with
/// default-on-first-read semantics.
pub struct ScheduleService {
    availability_repo: Arc<dyn AvailabilityRepository>,
    appointment_repo: Arc<dyn AppointmentRepository>,
}

impl ScheduleService {
    pub fn new(
        availability_repo: Arc<dyn AvailabilityRepository>,
        appointment_repo: Arc<dyn AppointmentRepository>,
    ) -> Self {
        Self { availability_repo, appointment_repo }
    }

    /// Returns the stored availability document, synthesizing and
    /// persisting the default template (Mon-Fri 09:00-17:00) if the firm
    /// has none yet.
    pub async fn get_or_default(&self, firm_id: &str) -> Result<FirmAvailability, AppError> {
        if let Some(existing) = self.availability_repo.find_by_firm(firm_id).await? {
            return Ok(existing);
        }

        let default = FirmAvailability::new(
            firm_id.to_string(),
            DEFAULT_TIMEZONE.to_string(),
            &WeeklySchedule::default(),
        );
        let created = self.availability_repo.upsert(&default).await?;
        info!("Created default availability for firm {}", firm_id);
        Ok(created)
    }

    pub async fn update(
        &self,
        firm_id: &str,
        timezone: &str,
        schedule: &WeeklySchedule,
    ) -> Result<FirmAvailability, AppError> {
        validate_schedule(timezone, schedule)?;

        let mut record = match self.availability_repo.find_by_firm(firm_id).await? {
            Some(existing) => existing,
            None => FirmAvailability::new(firm_id.to_string(), timezone.to_string(), schedule),
        };
        record.timezone = timezone.to_string();
        record.schedule_json =
            serde_json::to_string(schedule).map_err(|e| AppError::InternalWithMsg(e.to_string()))?;
        record.updated_at = chrono::Utc::now();

        self.availability_repo.upsert(&record).await
    }

    pub async fn list_blocked(&self, firm_id: &str) -> Result<Vec<BlockedDate>, AppError> {
        self.availability_repo.list_blocked_dates(firm_id).await
    }

    /// Creates the blocked range and reports existing appointments inside
    /// it as non-fatal warnings. Creation proceeds regardless of
    /// conflicts; the caller decides what to do with the warnings.
    pub async fn add_blocked(
        &self,
        firm_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        reason: Option<String>,
    ) -> Result<(BlockedDate, Vec<ConflictWarning>), AppError> {
        if end_date < start_date {
            return Err(AppError::Validation("end_date must not be before start_date".into()));
        }

        let conflicts = self.appointment_conflicts(firm_id, start_date, end_date).await?;
        if !conflicts.is_empty() {
            warn!(
                "Blocking {}..{} for firm {} overlaps {} existing appointment(s)",
                start_date, end_date, firm_id, conflicts.len()
            );
        }

        let blocked = BlockedDate::new(firm_id.to_string(), start_date, end_date, reason);
        let created = self.availability_repo.create_blocked_date(&blocked).await?;
        Ok((created, conflicts))
    }

    pub async fn delete_blocked(&self, firm_id: &str, id: &str) -> Result<bool, AppError> {
        self.availability_repo.delete_blocked_date(firm_id, id).await
    }

    async fn appointment_conflicts(
        &self,
        firm_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<ConflictWarning>, AppError> {
        let range_start = start_date
            .and_hms_opt(0, 0, 0)
            .ok_or(AppError::Internal)?
            .and_utc();
        let range_end = end_date
            .and_hms_opt(23, 59, 59)
            .ok_or(AppError::Internal)?
            .and_utc();

        let appointments = self
            .appointment_repo
            .list_by_range(firm_id, range_start, range_end)
            .await?;

        Ok(appointments
            .into_iter()
            .map(|a| ConflictWarning {
                appointment_id: a.id,
                client_name: a.client_name,
                date: a.start_time.format("%Y-%m-%d").to_string(),
                time: a.start_time.format("%I:%M %p").to_string(),
            })
            .collect())
    }
}

pub fn validate_schedule(timezone: &str, schedule: &WeeklySchedule) -> Result<(), AppError> {
    if timezone.parse::<Tz>().is_err() {
        return Err(AppError::Validation(format!("Invalid timezone: {}", timezone)));
    }

    for name in WeeklySchedule::days() {
        let day = schedule
            .day_by_name(name)
            .ok_or(AppError::Internal)?;

        if !day.enabled {
            continue;
        }

        let (start, end) = day.parse_times().ok_or_else(|| {
            AppError::Validation(format!("Invalid time format for {} (expected HH:MM)", name))
        })?;

        if start >= end {
            return Err(AppError::Validation(format!(
                "Start time must be before end time for {}",
                name
            )));
        }
    }

    Ok(())
}
