use axum::{extract::{Path, State}, http::StatusCode, response::IntoResponse, Json};
use crate::api::dtos::requests::{GoogleCallbackRequest, SelectCalendarRequest};
use crate::api::dtos::responses::{
    AuthUrlResponse, CalendarEntry, CalendarsResponse, ConnectionStatusResponse,
};
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tracing::info;

pub async fn connect_url(
    State(state): State<Arc<AppState>>,
    Path(firm_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let auth_url = state.integration.auth_url(&firm_id);
    Ok(Json(AuthUrlResponse { auth_url }))
}

pub async fn oauth_callback(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<GoogleCallbackRequest>,
) -> Result<impl IntoResponse, AppError> {
    info!("Completing Google Calendar connection for firm {}", payload.firm_id);

    let connection = state
        .integration
        .complete_connection(&payload.firm_id, &payload.code)
        .await?;

    Ok(Json(serde_json::json!({
        "connected": true,
        "calendar_id": connection.calendar_id,
        "calendar_name": connection.calendar_name,
    })))
}

pub async fn connection_status(
    State(state): State<Arc<AppState>>,
    Path(firm_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let health = state.lifecycle.connection_health(&firm_id).await?;
    let connection = state.integration.connection(&firm_id).await?;

    Ok(Json(ConnectionStatusResponse {
        connected: health.connected,
        calendar_id: connection.as_ref().map(|c| c.calendar_id.clone()),
        calendar_name: connection.as_ref().map(|c| c.calendar_name.clone()),
        connected_at: connection.as_ref().map(|c| c.connected_at.to_rfc3339()),
        token_status: health.status,
        needs_reauth: health.needs_reauth,
        error_count: health.error_count,
        last_error: health.last_error,
        has_refresh_token: health.has_refresh_token,
    }))
}

pub async fn list_calendars(
    State(state): State<Arc<AppState>>,
    Path(firm_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let calendars = state
        .integration
        .list_calendars(&firm_id)
        .await?
        .into_iter()
        .map(|c| CalendarEntry { id: c.id, summary: c.summary, primary: c.primary })
        .collect();

    Ok(Json(CalendarsResponse { calendars }))
}

pub async fn select_calendar(
    State(state): State<Arc<AppState>>,
    Path(firm_id): Path<String>,
    Json(payload): Json<SelectCalendarRequest>,
) -> Result<impl IntoResponse, AppError> {
    state
        .integration
        .select_calendar(&firm_id, &payload.calendar_id, &payload.calendar_name)
        .await?;

    Ok(Json(serde_json::json!({ "updated": true })))
}

pub async fn disconnect(
    State(state): State<Arc<AppState>>,
    Path(firm_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if !state.integration.disconnect(&firm_id).await? {
        return Err(AppError::NotConnected);
    }
    Ok(StatusCode::NO_CONTENT)
}
