use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Open hours for one weekday of the recurring template.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DaySlot {
    pub enabled: bool,
    pub start_time: String,
    pub end_time: String,
}

impl DaySlot {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            start_time: "09:00".to_string(),
            end_time: "17:00".to_string(),
        }
    }

    pub fn parse_times(&self) -> Option<(NaiveTime, NaiveTime)> {
        let start = NaiveTime::parse_from_str(&self.start_time, "%H:%M").ok()?;
        let end = NaiveTime::parse_from_str(&self.end_time, "%H:%M").ok()?;
        Some((start, end))
    }
}

/// Recurring weekly availability template. Reused every week until
/// explicitly changed.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeeklySchedule {
    pub monday: DaySlot,
    pub tuesday: DaySlot,
    pub wednesday: DaySlot,
    pub thursday: DaySlot,
    pub friday: DaySlot,
    pub saturday: DaySlot,
    pub sunday: DaySlot,
}

impl Default for WeeklySchedule {
    fn default() -> Self {
        Self {
            monday: DaySlot::new(true),
            tuesday: DaySlot::new(true),
            wednesday: DaySlot::new(true),
            thursday: DaySlot::new(true),
            friday: DaySlot::new(true),
            saturday: DaySlot::new(false),
            sunday: DaySlot::new(false),
        }
    }
}

impl WeeklySchedule {
    pub fn day(&self, weekday: chrono::Weekday) -> &DaySlot {
        match weekday {
            chrono::Weekday::Mon => &self.monday,
            chrono::Weekday::Tue => &self.tuesday,
            chrono::Weekday::Wed => &self.wednesday,
            chrono::Weekday::Thu => &self.thursday,
            chrono::Weekday::Fri => &self.friday,
            chrono::Weekday::Sat => &self.saturday,
            chrono::Weekday::Sun => &self.sunday,
        }
    }

    pub fn days() -> [&'static str; 7] {
        ["monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday"]
    }

    pub fn day_by_name(&self, name: &str) -> Option<&DaySlot> {
        match name {
            "monday" => Some(&self.monday),
            "tuesday" => Some(&self.tuesday),
            "wednesday" => Some(&self.wednesday),
            "thursday" => Some(&self.thursday),
            "friday" => Some(&self.friday),
            "saturday" => Some(&self.saturday),
            "sunday" => Some(&self.sunday),
            _ => None,
        }
    }
}

/// One availability document per firm. The schedule is stored as JSON
/// text alongside the firm timezone.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct FirmAvailability {
    pub id: String,
    pub firm_id: String,
    pub timezone: String,
    pub schedule_json: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FirmAvailability {
    pub fn new(firm_id: String, timezone: String, schedule: &WeeklySchedule) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            firm_id,
            timezone,
            schedule_json: serde_json::to_string(schedule).unwrap_or_else(|_| "{}".to_string()),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn schedule(&self) -> WeeklySchedule {
        serde_json::from_str(&self.schedule_json).unwrap_or_default()
    }
}

/// Ad-hoc exception overriding the weekly template for a date range.
/// Ranges may overlap; any covering range excludes the day.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct BlockedDate {
    pub id: String,
    pub firm_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl BlockedDate {
    pub fn new(firm_id: String, start_date: NaiveDate, end_date: NaiveDate, reason: Option<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            firm_id,
            start_date,
            end_date,
            reason,
            created_at: Utc::now(),
        }
    }

    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}
