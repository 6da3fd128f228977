use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{ConnectOptions, SqlitePool};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::infra::google::calendar_client::GoogleCalendarClient;
use crate::infra::google::oauth_client::HttpOAuthClient;
use crate::infra::repositories::{
    sqlite_appointment_repo::SqliteAppointmentRepo,
    sqlite_availability_repo::SqliteAvailabilityRepo,
    sqlite_connection_repo::SqliteConnectionRepo,
    sqlite_timeline_repo::SqliteTimelineRepo,
};
use crate::state::{AppState, Ports};

pub async fn bootstrap_state(config: &Config) -> AppState {
    info!("Initializing SQLite connection with WAL Mode...");

    let opts = SqliteConnectOptions::from_str(&config.database_url)
        .expect("Invalid SQLite connection string")
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5))
        .log_statements(LevelFilter::Debug)
        .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(opts)
        .await
        .expect("Failed to connect to SQLite");

    run_migrations(&pool).await;

    let calendar_client = Arc::new(GoogleCalendarClient::new());

    AppState::assemble(
        config.clone(),
        Ports {
            availability_repo: Arc::new(SqliteAvailabilityRepo::new(pool.clone())),
            connection_repo: Arc::new(SqliteConnectionRepo::new(pool.clone())),
            appointment_repo: Arc::new(SqliteAppointmentRepo::new(pool.clone())),
            oauth_client: Arc::new(HttpOAuthClient::new(config.google_oauth.clone())),
            busy_client: calendar_client.clone(),
            event_writer: calendar_client.clone(),
            directory: calendar_client,
            timeline: Arc::new(SqliteTimelineRepo::new(pool)),
        },
    )
}

async fn run_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
