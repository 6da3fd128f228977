use crate::domain::ports::TimelineRecorder;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Minimal timeline sink: one normalized `event_type` column, written
/// once at the storage boundary. The full case timeline lives in an
/// external service; this table only captures the facts this engine
/// emits.
pub struct SqliteTimelineRepo {
    pool: SqlitePool,
}

impl SqliteTimelineRepo {
    pub fn new(pool: SqlitePool) -> Self { Self { pool } }
}

#[async_trait]
impl TimelineRecorder for SqliteTimelineRepo {
    async fn record(
        &self,
        case_id: &str,
        firm_id: &str,
        event_type: &str,
        content: &str,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"INSERT INTO case_timeline (id, case_id, firm_id, event_type, content, created_at)
               VALUES (?, ?, ?, ?, ?, ?)"#
        )
            .bind(Uuid::new_v4().to_string())
            .bind(case_id)
            .bind(firm_id)
            .bind(event_type)
            .bind(content)
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(())
    }
}
