use crate::domain::models::availability::{BlockedDate, FirmAvailability};
use crate::domain::ports::AvailabilityRepository;
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteAvailabilityRepo {
    pool: SqlitePool,
}

impl SqliteAvailabilityRepo {
    pub fn new(pool: SqlitePool) -> Self { Self { pool } }
}

#[async_trait]
impl AvailabilityRepository for SqliteAvailabilityRepo {
    async fn find_by_firm(&self, firm_id: &str) -> Result<Option<FirmAvailability>, AppError> {
        sqlx::query_as::<_, FirmAvailability>(
            "SELECT * FROM firm_availability WHERE firm_id = ?"
        )
            .bind(firm_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn upsert(&self, availability: &FirmAvailability) -> Result<FirmAvailability, AppError> {
        sqlx::query_as::<_, FirmAvailability>(
            r#"INSERT INTO firm_availability (id, firm_id, timezone, schedule_json, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?)
               ON CONFLICT(firm_id) DO UPDATE SET
               timezone=excluded.timezone,
               schedule_json=excluded.schedule_json,
               updated_at=excluded.updated_at
               RETURNING *"#
        )
            .bind(&availability.id)
            .bind(&availability.firm_id)
            .bind(&availability.timezone)
            .bind(&availability.schedule_json)
            .bind(availability.created_at)
            .bind(availability.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_blocked_dates(&self, firm_id: &str) -> Result<Vec<BlockedDate>, AppError> {
        sqlx::query_as::<_, BlockedDate>(
            "SELECT * FROM blocked_dates WHERE firm_id = ? ORDER BY start_date ASC"
        )
            .bind(firm_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn create_blocked_date(&self, blocked: &BlockedDate) -> Result<BlockedDate, AppError> {
        sqlx::query_as::<_, BlockedDate>(
            r#"INSERT INTO blocked_dates (id, firm_id, start_date, end_date, reason, created_at)
               VALUES (?, ?, ?, ?, ?, ?)
               RETURNING *"#
        )
            .bind(&blocked.id)
            .bind(&blocked.firm_id)
            .bind(blocked.start_date)
            .bind(blocked.end_date)
            .bind(&blocked.reason)
            .bind(blocked.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete_blocked_date(&self, firm_id: &str, id: &str) -> Result<bool, AppError> {
        let res = sqlx::query("DELETE FROM blocked_dates WHERE id = ? AND firm_id = ?")
            .bind(id)
            .bind(firm_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(res.rows_affected() > 0)
    }
}
