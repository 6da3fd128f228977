use axum::{
    body::Body,
    extract::Request,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::api::handlers::{availability, blocked_date, booking, health, integration, slots};
use crate::state::AppState;
use tower_http::{
    classify::ServerErrorsFailureClass,
    trace::TraceLayer,
};
use tracing::{error, info, info_span, Span};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Availability settings
        .route("/api/v1/availability/timezones", get(availability::get_timezones))
        .route("/api/v1/{firm_id}/availability", get(availability::get_availability).put(availability::update_availability))

        // Blocked dates
        .route("/api/v1/{firm_id}/blocked-dates", get(blocked_date::list_blocked_dates).post(blocked_date::create_blocked_date))
        .route("/api/v1/{firm_id}/blocked-dates/{id}", delete(blocked_date::delete_blocked_date))

        // Google Calendar integration
        .route("/api/v1/{firm_id}/integrations/google/connect", get(integration::connect_url))
        .route("/api/v1/integrations/google/callback", post(integration::oauth_callback))
        .route("/api/v1/{firm_id}/integrations/google/status", get(integration::connection_status))
        .route("/api/v1/{firm_id}/integrations/google/calendars", get(integration::list_calendars))
        .route("/api/v1/{firm_id}/integrations/google/calendar", put(integration::select_calendar))
        .route("/api/v1/{firm_id}/integrations/google", delete(integration::disconnect))

        // Public booking flow
        .route("/api/v1/public/{firm_id}/slots", get(slots::get_public_slots))
        .route("/api/v1/public/{firm_id}/book", post(booking::create_booking))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        firm_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
