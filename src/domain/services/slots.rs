use crate::domain::models::availability::{BlockedDate, WeeklySchedule};
use crate::domain::models::slot::{AvailableSlot, BusyInterval};
use crate::domain::ports::BusyTimeClient;
use crate::domain::services::schedule::ScheduleService;
use crate::domain::services::token_lifecycle::TokenLifecycleService;
use crate::error::AppError;
use chrono::{DateTime, Datelike, Duration, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use std::sync::Arc;
use tracing::info;

/// Combines the weekly template, blocked dates and remote busy time
/// into an ordered list of open slots. Credential or calendar failure
/// fails the whole call: an unreachable calendar means no safe slot can
/// be asserted.
pub struct AvailabilityResolver {
    schedule_service: Arc<ScheduleService>,
    lifecycle: Arc<TokenLifecycleService>,
    connection_repo: Arc<dyn crate::domain::ports::ConnectionRepository>,
    busy_client: Arc<dyn BusyTimeClient>,
    slot_minutes: i64,
}

impl AvailabilityResolver {
    pub fn new(
        schedule_service: Arc<ScheduleService>,
        lifecycle: Arc<TokenLifecycleService>,
        connection_repo: Arc<dyn crate::domain::ports::ConnectionRepository>,
        busy_client: Arc<dyn BusyTimeClient>,
        slot_minutes: i64,
    ) -> Self {
        Self { schedule_service, lifecycle, connection_repo, busy_client, slot_minutes }
    }

    pub async fn resolve(
        &self,
        firm_id: &str,
        lookahead_days: i64,
    ) -> Result<Vec<AvailableSlot>, AppError> {
        let availability = self.schedule_service.get_or_default(firm_id).await?;
        let blocked = self.schedule_service.list_blocked(firm_id).await?;

        let connection = self
            .connection_repo
            .find_by_firm(firm_id)
            .await?
            .ok_or(AppError::NotConnected)?;
        let credentials = self.lifecycle.get_valid_credentials(firm_id).await?;

        let now = Utc::now();
        let window_end = now + Duration::days(lookahead_days);
        let busy = self
            .busy_client
            .list_busy(&credentials, &connection.calendar_id, now, window_end)
            .await?;

        // Stored timezones pass validation on write, so a parse failure
        // here means a corrupted row and must not silently shift slots.
        let tz: Tz = availability.timezone.parse().map_err(|_| {
            AppError::InternalWithMsg(format!(
                "Stored timezone {:?} for firm {} is not a valid IANA zone",
                availability.timezone, firm_id
            ))
        })?;
        let slots = calculate_open_slots(
            &availability.schedule(),
            tz,
            &blocked,
            &busy,
            now,
            lookahead_days,
            self.slot_minutes,
        );

        info!(
            "Resolved {} open slot(s) for firm {} over {} day(s)",
            slots.len(),
            firm_id,
            lookahead_days
        );
        Ok(slots)
    }
}

/// Pure slot computation over the lookahead window. Each day is handled
/// independently in the firm's local wall-clock time, which absorbs DST
/// transitions without special-casing. Slot boundaries align to the
/// day's start time, so 09:30 yields 09:30, 10:30, and so on.
pub fn calculate_open_slots(
    schedule: &WeeklySchedule,
    tz: Tz,
    blocked: &[BlockedDate],
    busy: &[BusyInterval],
    now: DateTime<Utc>,
    lookahead_days: i64,
    slot_minutes: i64,
) -> Vec<AvailableSlot> {
    let mut slots = Vec::new();
    if slot_minutes <= 0 {
        return slots;
    }

    let today = now.with_timezone(&tz).date_naive();

    for day_offset in 0..lookahead_days {
        let Some(date) = today.checked_add_signed(Duration::days(day_offset)) else {
            break;
        };

        // Any covering range excludes the day; overlapping ranges need
        // no precedence since the effect is identical.
        if blocked.iter().any(|b| b.covers(date)) {
            continue;
        }

        let day = schedule.day(date.weekday());
        if !day.enabled {
            continue;
        }
        let Some((day_start, day_end)) = day.parse_times() else {
            continue;
        };

        let start_idx = (day_start.hour() * 60 + day_start.minute()) as i64;
        let end_idx = (day_end.hour() * 60 + day_end.minute()) as i64;

        let mut cursor = start_idx;
        while cursor + slot_minutes <= end_idx {
            let hour = (cursor / 60) as u32;
            let minute = (cursor % 60) as u32;

            if let Some(naive_time) = chrono::NaiveTime::from_hms_opt(hour, minute, 0) {
                // Skipped or ambiguous local times around a DST jump
                // produce no slot for that boundary.
                if let Some(slot_local) = tz.from_local_datetime(&date.and_time(naive_time)).single() {
                    let slot_start = slot_local.with_timezone(&Utc);
                    let slot_end = slot_start + Duration::minutes(slot_minutes);

                    let in_past = slot_start <= now;
                    let conflicts = busy.iter().any(|b| b.overlaps(slot_start, slot_end));

                    if !in_past && !conflicts {
                        slots.push(AvailableSlot {
                            start_time: slot_start,
                            end_time: slot_end,
                            formatted_time: format_slot_label(slot_start, tz),
                        });
                    }
                }
            }
            cursor += slot_minutes;
        }
    }

    slots
}

/// Human-readable label in the firm's timezone, e.g.
/// "Tuesday, June 3 at 2:00 PM".
fn format_slot_label(start: DateTime<Utc>, tz: Tz) -> String {
    start.with_timezone(&tz).format("%A, %B %-d at %-I:%M %p").to_string()
}
