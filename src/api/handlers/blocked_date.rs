use axum::{extract::{Path, State}, http::StatusCode, response::IntoResponse, Json};
use crate::api::dtos::requests::CreateBlockedDateRequest;
use crate::api::dtos::responses::{BlockedDateCreatedResponse, BlockedDatesListResponse};
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tracing::info;

pub async fn list_blocked_dates(
    State(state): State<Arc<AppState>>,
    Path(firm_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let blocked_dates = state.schedule_service.list_blocked(&firm_id).await?;
    let total = blocked_dates.len();

    Ok(Json(BlockedDatesListResponse { blocked_dates, total }))
}

pub async fn create_blocked_date(
    State(state): State<Arc<AppState>>,
    Path(firm_id): Path<String>,
    Json(payload): Json<CreateBlockedDateRequest>,
) -> Result<impl IntoResponse, AppError> {
    info!(
        "Blocking {} to {} for firm {}",
        payload.start_date, payload.end_date, firm_id
    );

    let (blocked_date, conflicts) = state
        .schedule_service
        .add_blocked(&firm_id, payload.start_date, payload.end_date, payload.reason)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(BlockedDateCreatedResponse { blocked_date, conflicts }),
    ))
}

pub async fn delete_blocked_date(
    State(state): State<Arc<AppState>>,
    Path((firm_id, id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let deleted = state.schedule_service.delete_blocked(&firm_id, &id).await?;
    if !deleted {
        return Err(AppError::NotFound("Blocked date not found".into()));
    }
    Ok(StatusCode::NO_CONTENT)
}
