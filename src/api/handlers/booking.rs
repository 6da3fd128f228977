use axum::{extract::{Path, State}, http::StatusCode, response::IntoResponse, Json};
use crate::api::dtos::requests::CreateBookingRequest;
use crate::api::dtos::responses::BookingResponse;
use crate::domain::services::booking::BookingRequest;
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tracing::info;

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Path(firm_id): Path<String>,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    info!(
        "create_booking: case {} at {} for firm {}",
        payload.case_id, payload.start_time, firm_id
    );

    let appointment = state
        .booking
        .book(BookingRequest {
            firm_id,
            case_id: payload.case_id,
            start_time: payload.start_time,
            client_name: payload.attendee_name,
            client_email: payload.attendee_email,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(BookingResponse {
            appointment_id: appointment.id,
            calendar_event_id: appointment.calendar_event_id,
            meeting_link: appointment.meeting_link,
        }),
    ))
}
