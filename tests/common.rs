use scheduling_backend::{
    api::router::create_router,
    config::{Config, GoogleOAuthConfig},
    domain::models::connection::{CalendarConnection, Credentials, TokenStatus},
    domain::models::slot::BusyInterval,
    domain::ports::{
        BusyTimeClient, CalendarDirectory, CalendarEventWriter, CalendarInfo, ConnectionRepository,
        CreatedEvent, EventDraft, OAuthError, OAuthErrorKind, OAuthTokenClient, TimelineRecorder,
        TokenGrant,
    },
    error::AppError,
    infra::repositories::{
        sqlite_appointment_repo::SqliteAppointmentRepo,
        sqlite_availability_repo::SqliteAvailabilityRepo,
        sqlite_connection_repo::SqliteConnectionRepo,
    },
    state::{AppState, Ports},
};
use async_trait::async_trait;
use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

pub struct MockOAuthClient {
    pub refresh_result: Mutex<Result<TokenGrant, OAuthError>>,
    pub exchange_result: Mutex<Result<TokenGrant, OAuthError>>,
    pub refresh_calls: AtomicUsize,
    pub exchange_calls: AtomicUsize,
}

impl MockOAuthClient {
    pub fn new() -> Self {
        Self {
            refresh_result: Mutex::new(Ok(Self::grant("refreshed-access-token"))),
            exchange_result: Mutex::new(Ok(Self::grant("exchanged-access-token"))),
            refresh_calls: AtomicUsize::new(0),
            exchange_calls: AtomicUsize::new(0),
        }
    }

    pub fn grant(access_token: &str) -> TokenGrant {
        TokenGrant {
            access_token: access_token.to_string(),
            refresh_token: Some("grant-refresh-token".to_string()),
            scopes: vec!["https://www.googleapis.com/auth/calendar".to_string()],
            expires_in_secs: Some(3600),
        }
    }

    pub fn fail_refresh(&self, kind: OAuthErrorKind, message: &str) {
        *self.refresh_result.lock().unwrap() = Err(OAuthError { kind, message: message.to_string() });
    }

    pub fn refresh_call_count(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OAuthTokenClient for MockOAuthClient {
    async fn exchange_code(&self, _code: &str) -> Result<TokenGrant, OAuthError> {
        self.exchange_calls.fetch_add(1, Ordering::SeqCst);
        self.exchange_result.lock().unwrap().clone()
    }

    async fn refresh(&self, _refresh_token: &str) -> Result<TokenGrant, OAuthError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        self.refresh_result.lock().unwrap().clone()
    }
}

pub struct MockBusyClient {
    pub busy: Mutex<Vec<BusyInterval>>,
    pub fail: AtomicBool,
    pub calls: AtomicUsize,
}

impl MockBusyClient {
    pub fn new() -> Self {
        Self {
            busy: Mutex::new(Vec::new()),
            fail: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set_busy(&self, intervals: Vec<BusyInterval>) {
        *self.busy.lock().unwrap() = intervals;
    }
}

#[async_trait]
impl BusyTimeClient for MockBusyClient {
    async fn list_busy(
        &self,
        _credentials: &Credentials,
        _calendar_id: &str,
        _time_min: DateTime<Utc>,
        _time_max: DateTime<Utc>,
    ) -> Result<Vec<BusyInterval>, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::CalendarUnavailable("freeBusy query returned 500".into()));
        }
        Ok(self.busy.lock().unwrap().clone())
    }
}

pub struct MockEventWriter {
    pub fail: AtomicBool,
    pub created: Mutex<Vec<EventDraft>>,
}

impl MockEventWriter {
    pub fn new() -> Self {
        Self { fail: AtomicBool::new(false), created: Mutex::new(Vec::new()) }
    }
}

#[async_trait]
impl CalendarEventWriter for MockEventWriter {
    async fn create_event(
        &self,
        _credentials: &Credentials,
        _calendar_id: &str,
        draft: &EventDraft,
    ) -> Result<CreatedEvent, AppError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::CalendarUnavailable("event insert returned 503".into()));
        }
        self.created.lock().unwrap().push(draft.clone());
        Ok(CreatedEvent {
            event_id: "evt-mock-1".to_string(),
            meeting_link: Some("https://meet.google.com/mock-link".to_string()),
        })
    }
}

pub struct MockDirectory {
    pub calendars: Mutex<Vec<CalendarInfo>>,
}

impl MockDirectory {
    pub fn new() -> Self {
        Self {
            calendars: Mutex::new(vec![
                CalendarInfo {
                    id: "work@example.com".to_string(),
                    summary: "Work".to_string(),
                    primary: false,
                },
                CalendarInfo {
                    id: "primary@example.com".to_string(),
                    summary: "Primary Calendar".to_string(),
                    primary: true,
                },
            ]),
        }
    }
}

#[async_trait]
impl CalendarDirectory for MockDirectory {
    async fn list_calendars(&self, _credentials: &Credentials) -> Result<Vec<CalendarInfo>, AppError> {
        Ok(self.calendars.lock().unwrap().clone())
    }
}

pub struct MockTimeline {
    pub fail: AtomicBool,
    pub records: Mutex<Vec<(String, String, String, String)>>,
}

impl MockTimeline {
    pub fn new() -> Self {
        Self { fail: AtomicBool::new(false), records: Mutex::new(Vec::new()) }
    }
}

#[async_trait]
impl TimelineRecorder for MockTimeline {
    async fn record(
        &self,
        case_id: &str,
        firm_id: &str,
        event_type: &str,
        content: &str,
    ) -> Result<(), AppError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::InternalWithMsg("timeline sink down".into()));
        }
        self.records.lock().unwrap().push((
            case_id.to_string(),
            firm_id.to_string(),
            event_type.to_string(),
            content.to_string(),
        ));
        Ok(())
    }
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
    pub connection_repo: Arc<SqliteConnectionRepo>,
    pub oauth: Arc<MockOAuthClient>,
    pub busy: Arc<MockBusyClient>,
    pub writer: Arc<MockEventWriter>,
    pub directory: Arc<MockDirectory>,
    pub timeline: Arc<MockTimeline>,
}

impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            google_oauth: GoogleOAuthConfig {
                client_id: "test-client-id".to_string(),
                client_secret: "test-client-secret".to_string(),
                redirect_uri: "http://localhost/callback".to_string(),
                auth_uri: "https://accounts.google.com/o/oauth2/auth".to_string(),
                token_uri: "https://oauth2.googleapis.com/token".to_string(),
                scopes: vec!["https://www.googleapis.com/auth/calendar".to_string()],
            },
            slot_duration_min: 60,
            default_lookahead_days: 14,
        };

        let connection_repo = Arc::new(SqliteConnectionRepo::new(pool.clone()));
        let oauth = Arc::new(MockOAuthClient::new());
        let busy = Arc::new(MockBusyClient::new());
        let writer = Arc::new(MockEventWriter::new());
        let directory = Arc::new(MockDirectory::new());
        let timeline = Arc::new(MockTimeline::new());

        let state = Arc::new(AppState::assemble(
            config,
            Ports {
                availability_repo: Arc::new(SqliteAvailabilityRepo::new(pool.clone())),
                connection_repo: connection_repo.clone(),
                appointment_repo: Arc::new(SqliteAppointmentRepo::new(pool.clone())),
                oauth_client: oauth.clone(),
                busy_client: busy.clone(),
                event_writer: writer.clone(),
                directory: directory.clone(),
                timeline: timeline.clone(),
            },
        ));

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
            connection_repo,
            oauth,
            busy,
            writer,
            directory,
            timeline,
        }
    }

    pub fn directory_calendars(&self, calendars: Vec<CalendarInfo>) {
        *self.directory.calendars.lock().unwrap() = calendars;
    }

    /// Inserts a connection row directly, bypassing the consent flow.
    pub async fn seed_connection(
        &self,
        firm_id: &str,
        status: TokenStatus,
        refresh_token: Option<&str>,
        token_expiry: Option<DateTime<Utc>>,
    ) -> CalendarConnection {
        let now = Utc::now();
        let connection = CalendarConnection {
            id: Uuid::new_v4().to_string(),
            firm_id: firm_id.to_string(),
            access_token: "seeded-access-token".to_string(),
            refresh_token: refresh_token.map(str::to_string),
            scopes: "https://www.googleapis.com/auth/calendar".to_string(),
            calendar_id: "primary".to_string(),
            calendar_name: "Primary Calendar".to_string(),
            token_status: status,
            token_expiry,
            refresh_error_count: 0,
            last_refresh_error: None,
            last_refresh_attempt: None,
            connected_at: now,
            updated_at: now,
        };

        self.connection_repo
            .upsert(&connection)
            .await
            .expect("Failed to seed connection")
    }
}
