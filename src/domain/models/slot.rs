use chrono::{DateTime, Utc};
use serde::Serialize;

/// Busy range reported by the remote calendar. Request-scoped, never
/// persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct BusyInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl BusyInterval {
    /// Half-open overlap check shared by the resolution engine.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        start < self.end && end > self.start
    }
}

/// Candidate open appointment window, computed fresh on every request.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct AvailableSlot {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub formatted_time: String,
}
