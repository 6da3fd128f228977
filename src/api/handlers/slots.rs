use axum::{extract::{Path, Query, State}, response::IntoResponse, Json};
use crate::api::dtos::requests::SlotsQuery;
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tracing::info;

/// Public availability endpoint backing the booking widget.
pub async fn get_public_slots(
    State(state): State<Arc<AppState>>,
    Path(firm_id): Path<String>,
    Query(query): Query<SlotsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let days = query.days.unwrap_or(state.config.default_lookahead_days);
    if days <= 0 || days > 365 {
        return Err(AppError::Validation("days must be between 1 and 365".into()));
    }

    info!("Resolving availability for firm {} over {} day(s)", firm_id, days);
    let slots = state.resolver.resolve(&firm_id, days).await?;

    Ok(Json(slots))
}
