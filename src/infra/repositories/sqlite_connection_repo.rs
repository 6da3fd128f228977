use crate::domain::models::connection::CalendarConnection;
use crate::domain::ports::ConnectionRepository;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

pub struct SqliteConnectionRepo {
    pool: SqlitePool,
}

impl SqliteConnectionRepo {
    pub fn new(pool: SqlitePool) -> Self { Self { pool } }
}

#[async_trait]
impl ConnectionRepository for SqliteConnectionRepo {
    async fn find_by_firm(&self, firm_id: &str) -> Result<Option<CalendarConnection>, AppError> {
        sqlx::query_as::<_, CalendarConnection>(
            "SELECT * FROM calendar_connections WHERE firm_id = ?"
        )
            .bind(firm_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn upsert(&self, connection: &CalendarConnection) -> Result<CalendarConnection, AppError> {
        // Reconnecting fully replaces token material and resets the
        // error state.
        sqlx::query_as::<_, CalendarConnection>(
            r#"INSERT INTO calendar_connections
               (id, firm_id, access_token, refresh_token, scopes, calendar_id, calendar_name,
                token_status, token_expiry, refresh_error_count, last_refresh_error,
                last_refresh_attempt, connected_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
               ON CONFLICT(firm_id) DO UPDATE SET
               access_token=excluded.access_token,
               refresh_token=excluded.refresh_token,
               scopes=excluded.scopes,
               calendar_id=excluded.calendar_id,
               calendar_name=excluded.calendar_name,
               token_status=excluded.token_status,
               token_expiry=excluded.token_expiry,
               refresh_error_count=excluded.refresh_error_count,
               last_refresh_error=excluded.last_refresh_error,
               last_refresh_attempt=excluded.last_refresh_attempt,
               connected_at=excluded.connected_at,
               updated_at=excluded.updated_at
               RETURNING *"#
        )
            .bind(&connection.id)
            .bind(&connection.firm_id)
            .bind(&connection.access_token)
            .bind(&connection.refresh_token)
            .bind(&connection.scopes)
            .bind(&connection.calendar_id)
            .bind(&connection.calendar_name)
            .bind(connection.token_status)
            .bind(connection.token_expiry)
            .bind(connection.refresh_error_count)
            .bind(&connection.last_refresh_error)
            .bind(connection.last_refresh_attempt)
            .bind(connection.connected_at)
            .bind(connection.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update_tokens(
        &self,
        firm_id: &str,
        access_token: &str,
        token_expiry: Option<DateTime<Utc>>,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"UPDATE calendar_connections SET
               access_token = ?,
               token_expiry = ?,
               token_status = 'active',
               refresh_error_count = 0,
               last_refresh_attempt = ?,
               updated_at = ?
               WHERE firm_id = ?"#
        )
            .bind(access_token)
            .bind(token_expiry)
            .bind(Utc::now())
            .bind(Utc::now())
            .bind(firm_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(())
    }

    async fn mark_needs_reauth(&self, firm_id: &str, error_message: &str) -> Result<(), AppError> {
        sqlx::query(
            r#"UPDATE calendar_connections SET
               token_status = 'needs_reauth',
               refresh_error_count = refresh_error_count + 1,
               last_refresh_error = ?,
               last_refresh_attempt = ?,
               updated_at = ?
               WHERE firm_id = ?"#
        )
            .bind(error_message)
            .bind(Utc::now())
            .bind(Utc::now())
            .bind(firm_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(())
    }

    async fn update_selected_calendar(
        &self,
        firm_id: &str,
        calendar_id: &str,
        calendar_name: &str,
    ) -> Result<bool, AppError> {
        let res = sqlx::query(
            "UPDATE calendar_connections SET calendar_id = ?, calendar_name = ?, updated_at = ? WHERE firm_id = ?"
        )
            .bind(calendar_id)
            .bind(calendar_name)
            .bind(Utc::now())
            .bind(firm_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(res.rows_affected() > 0)
    }

    async fn delete_by_firm(&self, firm_id: &str) -> Result<bool, AppError> {
        let res = sqlx::query("DELETE FROM calendar_connections WHERE firm_id = ?")
            .bind(firm_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(res.rows_affected() > 0)
    }
}
