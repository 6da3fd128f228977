use crate::domain::models::appointment::Appointment;
use crate::domain::ports::AppointmentRepository;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

pub struct SqliteAppointmentRepo {
    pool: SqlitePool,
}

impl SqliteAppointmentRepo {
    pub fn new(pool: SqlitePool) -> Self { Self { pool } }
}

#[async_trait]
impl AppointmentRepository for SqliteAppointmentRepo {
    async fn create(&self, appointment: &Appointment) -> Result<Appointment, AppError> {
        sqlx::query_as::<_, Appointment>(
            r#"INSERT INTO appointments
               (id, firm_id, case_id, client_name, client_email, start_time, end_time,
                calendar_event_id, meeting_link, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
               RETURNING *"#
        )
            .bind(&appointment.id)
            .bind(&appointment.firm_id)
            .bind(&appointment.case_id)
            .bind(&appointment.client_name)
            .bind(&appointment.client_email)
            .bind(appointment.start_time)
            .bind(appointment.end_time)
            .bind(&appointment.calendar_event_id)
            .bind(&appointment.meeting_link)
            .bind(appointment.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_range(
        &self,
        firm_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments WHERE firm_id = ? AND start_time >= ? AND start_time <= ? ORDER BY start_time ASC"
        )
            .bind(firm_id)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
