mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{DateTime, Duration, Utc};
use common::TestApp;
use scheduling_backend::domain::models::connection::TokenStatus;
use scheduling_backend::domain::models::slot::BusyInterval;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Opens every day of the week 09:00-17:00 in UTC so assertions do not
/// depend on which weekday the test runs on.
async fn open_every_day_utc(app: &TestApp, firm_id: &str) {
    let mut schedule = json!({});
    for day in ["monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday"] {
        schedule[day] = json!({ "enabled": true, "start_time": "09:00", "end_time": "17:00" });
    }
    let res = app.router.clone().oneshot(
        Request::builder().method("PUT").uri(format!("/api/v1/{}/availability", firm_id))
            .header("Content-Type", "application/json")
            .body(Body::from(json!({ "timezone": "UTC", "weekly_schedule": schedule }).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

async fn fetch_slots(app: &TestApp, firm_id: &str, days: i64) -> axum::response::Response {
    app.router.clone().oneshot(
        Request::builder().uri(format!("/api/v1/public/{}/slots?days={}", firm_id, days))
            .body(Body::empty()).unwrap()
    ).await.unwrap()
}

#[tokio::test]
async fn test_slots_require_a_calendar_connection() {
    let app = TestApp::new().await;
    open_every_day_utc(&app, "firm-1").await;

    let res = fetch_slots(&app, "firm-1", 7).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let data = parse_body(res).await;
    assert_eq!(data["code"], "not_connected");
}

#[tokio::test]
async fn test_slots_propagate_needs_reauth() {
    let app = TestApp::new().await;
    open_every_day_utc(&app, "firm-1").await;
    app.seed_connection("firm-1", TokenStatus::NeedsReauth, Some("rt-1"), None).await;

    let res = fetch_slots(&app, "firm-1", 7).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let data = parse_body(res).await;
    assert_eq!(data["code"], "needs_reauth");
}

#[tokio::test]
async fn test_busy_lookup_failure_fails_the_whole_call() {
    let app = TestApp::new().await;
    open_every_day_utc(&app, "firm-1").await;
    app.seed_connection(
        "firm-1",
        TokenStatus::Active,
        Some("rt-1"),
        Some(Utc::now() + Duration::hours(1)),
    ).await;
    app.busy.fail.store(true, std::sync::atomic::Ordering::SeqCst);

    let res = fetch_slots(&app, "firm-1", 7).await;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    let data = parse_body(res).await;
    assert_eq!(data["code"], "calendar_unavailable");
}

#[tokio::test]
async fn test_resolved_slots_are_future_sorted_and_hour_long() {
    let app = TestApp::new().await;
    open_every_day_utc(&app, "firm-1").await;
    app.seed_connection(
        "firm-1",
        TokenStatus::Active,
        Some("rt-1"),
        Some(Utc::now() + Duration::hours(1)),
    ).await;

    let res = fetch_slots(&app, "firm-1", 7).await;
    assert_eq!(res.status(), StatusCode::OK);
    let slots = parse_body(res).await;
    let slots = slots.as_array().unwrap();
    assert!(!slots.is_empty());

    let now = Utc::now();
    let mut previous: Option<DateTime<Utc>> = None;
    for slot in slots {
        let start: DateTime<Utc> = slot["start_time"].as_str().unwrap().parse().unwrap();
        let end: DateTime<Utc> = slot["end_time"].as_str().unwrap().parse().unwrap();
        assert!(start > now, "slot {} is not in the future", start);
        assert_eq!(end - start, Duration::minutes(60));
        assert!(!slot["formatted_time"].as_str().unwrap().is_empty());
        if let Some(prev) = previous {
            assert!(start > prev, "slots out of order: {} after {}", start, prev);
        }
        previous = Some(start);
    }
}

#[tokio::test]
async fn test_busy_interval_removes_only_overlapping_slots() {
    let app = TestApp::new().await;
    open_every_day_utc(&app, "firm-1").await;
    app.seed_connection(
        "firm-1",
        TokenStatus::Active,
        Some("rt-1"),
        Some(Utc::now() + Duration::hours(1)),
    ).await;

    let all = parse_body(fetch_slots(&app, "firm-1", 7).await).await;
    let all = all.as_array().unwrap().clone();
    assert!(all.len() >= 3);

    // Mark the second open slot busy on the remote calendar.
    let target_start: DateTime<Utc> = all[1]["start_time"].as_str().unwrap().parse().unwrap();
    let target_end: DateTime<Utc> = all[1]["end_time"].as_str().unwrap().parse().unwrap();
    app.busy.set_busy(vec![BusyInterval { start: target_start, end: target_end }]);

    let remaining = parse_body(fetch_slots(&app, "firm-1", 7).await).await;
    let remaining = remaining.as_array().unwrap().clone();
    assert_eq!(remaining.len(), all.len() - 1);

    let starts: Vec<&str> = remaining.iter().map(|s| s["start_time"].as_str().unwrap()).collect();
    assert!(!starts.contains(&all[1]["start_time"].as_str().unwrap()));
    // Adjacent neighbours survive: the overlap test is half-open.
    assert!(starts.contains(&all[0]["start_time"].as_str().unwrap()));
    assert!(starts.contains(&all[2]["start_time"].as_str().unwrap()));
}

#[tokio::test]
async fn test_blocked_date_removes_every_slot_on_that_day() {
    let app = TestApp::new().await;
    open_every_day_utc(&app, "firm-1").await;
    app.seed_connection(
        "firm-1",
        TokenStatus::Active,
        Some("rt-1"),
        Some(Utc::now() + Duration::hours(1)),
    ).await;

    let tomorrow = (Utc::now() + Duration::days(1)).format("%Y-%m-%d").to_string();
    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/firm-1/blocked-dates")
            .header("Content-Type", "application/json")
            .body(Body::from(json!({
                "start_date": tomorrow, "end_date": tomorrow, "reason": null,
            }).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let slots = parse_body(fetch_slots(&app, "firm-1", 7).await).await;
    for slot in slots.as_array().unwrap() {
        let start = slot["start_time"].as_str().unwrap();
        assert!(!start.starts_with(&tomorrow), "slot {} falls on a blocked date", start);
    }
}

#[tokio::test]
async fn test_disabled_days_yield_no_slots() {
    let app = TestApp::new().await;

    // Every day disabled.
    let mut schedule = json!({});
    for day in ["monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday"] {
        schedule[day] = json!({ "enabled": false, "start_time": "09:00", "end_time": "17:00" });
    }
    app.router.clone().oneshot(
        Request::builder().method("PUT").uri("/api/v1/firm-1/availability")
            .header("Content-Type", "application/json")
            .body(Body::from(json!({ "timezone": "UTC", "weekly_schedule": schedule }).to_string())).unwrap()
    ).await.unwrap();

    app.seed_connection(
        "firm-1",
        TokenStatus::Active,
        Some("rt-1"),
        Some(Utc::now() + Duration::hours(1)),
    ).await;

    let slots = parse_body(fetch_slots(&app, "firm-1", 7).await).await;
    assert_eq!(slots.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_corrupted_stored_timezone_errors_instead_of_shifting_slots() {
    let app = TestApp::new().await;
    app.seed_connection(
        "firm-1",
        TokenStatus::Active,
        Some("rt-1"),
        Some(Utc::now() + Duration::hours(1)),
    ).await;

    // Bypass update validation to plant an unparsable zone.
    sqlx::query(
        "INSERT INTO firm_availability (id, firm_id, timezone, schedule_json, created_at, updated_at)
         VALUES ('av-1', 'firm-1', 'Not/AZone', ?1, ?2, ?2)"
    )
    .bind(serde_json::to_string(&json!({
        "monday": { "enabled": true, "start_time": "09:00", "end_time": "17:00" },
        "tuesday": { "enabled": true, "start_time": "09:00", "end_time": "17:00" },
        "wednesday": { "enabled": true, "start_time": "09:00", "end_time": "17:00" },
        "thursday": { "enabled": true, "start_time": "09:00", "end_time": "17:00" },
        "friday": { "enabled": true, "start_time": "09:00", "end_time": "17:00" },
        "saturday": { "enabled": false, "start_time": "09:00", "end_time": "17:00" },
        "sunday": { "enabled": false, "start_time": "09:00", "end_time": "17:00" }
    })).unwrap())
    .bind(Utc::now())
    .execute(&app.pool)
    .await
    .unwrap();

    let res = fetch_slots(&app, "firm-1", 7).await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let data = parse_body(res).await;
    assert_eq!(data["code"], "internal");
}

#[tokio::test]
async fn test_lookahead_bounds_are_validated() {
    let app = TestApp::new().await;

    for days in [0, -1, 366] {
        let res = app.router.clone().oneshot(
            Request::builder().uri(format!("/api/v1/public/firm-1/slots?days={}", days))
                .body(Body::empty()).unwrap()
        ).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "days={} should be rejected", days);
    }
}

#[tokio::test]
async fn test_missing_days_parameter_uses_the_configured_default() {
    let app = TestApp::new().await;
    open_every_day_utc(&app, "firm-1").await;
    app.seed_connection(
        "firm-1",
        TokenStatus::Active,
        Some("rt-1"),
        Some(Utc::now() + Duration::hours(1)),
    ).await;

    let res = app.router.clone().oneshot(
        Request::builder().uri("/api/v1/public/firm-1/slots")
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // 14-day default window, 8 slots per open day. The first and last
    // partial days can shrink the count but never exceed the ceiling.
    let slots = parse_body(res).await;
    let count = slots.as_array().unwrap().len();
    assert!(count > 8 * 10, "expected a multi-day window, got {} slots", count);
    assert!(count <= 8 * 14);
}
