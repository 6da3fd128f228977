use axum::{extract::{Path, State}, response::IntoResponse, Json};
use crate::api::dtos::requests::UpdateAvailabilityRequest;
use crate::api::dtos::responses::{AvailabilityResponse, TimezoneOption, TimezonesResponse};
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tracing::info;

/// Supported US timezone options offered to firms.
const US_TIMEZONES: [TimezoneOption; 7] = [
    TimezoneOption { value: "America/Los_Angeles", label: "Pacific Time (PT)", offset: "UTC-8/-7" },
    TimezoneOption { value: "America/Denver", label: "Mountain Time (MT)", offset: "UTC-7/-6" },
    TimezoneOption { value: "America/Chicago", label: "Central Time (CT)", offset: "UTC-6/-5" },
    TimezoneOption { value: "America/New_York", label: "Eastern Time (ET)", offset: "UTC-5/-4" },
    TimezoneOption { value: "America/Phoenix", label: "Arizona Time (MST)", offset: "UTC-7" },
    TimezoneOption { value: "America/Anchorage", label: "Alaska Time (AKST)", offset: "UTC-9/-8" },
    TimezoneOption { value: "Pacific/Honolulu", label: "Hawaii Time (HST)", offset: "UTC-10" },
];

pub async fn get_timezones() -> impl IntoResponse {
    Json(TimezonesResponse { timezones: US_TIMEZONES.to_vec() })
}

pub async fn get_availability(
    State(state): State<Arc<AppState>>,
    Path(firm_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let availability = state.schedule_service.get_or_default(&firm_id).await?;

    Ok(Json(AvailabilityResponse {
        firm_id: availability.firm_id.clone(),
        timezone: availability.timezone.clone(),
        weekly_schedule: availability.schedule(),
        created_at: availability.created_at.to_rfc3339(),
        updated_at: availability.updated_at.to_rfc3339(),
    }))
}

pub async fn update_availability(
    State(state): State<Arc<AppState>>,
    Path(firm_id): Path<String>,
    Json(payload): Json<UpdateAvailabilityRequest>,
) -> Result<impl IntoResponse, AppError> {
    info!("Updating availability settings for firm {}", firm_id);

    let updated = state
        .schedule_service
        .update(&firm_id, &payload.timezone, &payload.weekly_schedule)
        .await?;

    Ok(Json(AvailabilityResponse {
        firm_id: updated.firm_id.clone(),
        timezone: updated.timezone.clone(),
        weekly_schedule: updated.schedule(),
        created_at: updated.created_at.to_rfc3339(),
        updated_at: updated.updated_at.to_rfc3339(),
    }))
}
