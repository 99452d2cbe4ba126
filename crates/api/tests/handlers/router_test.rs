//! Drives the real router. Only requests that are answered before any
//! database access are exercised here; the pool never connects.

use axum::http::StatusCode;
use axum_test::TestServer;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use swimbook_api::app;

use crate::test_utils::lazy_state;

fn server() -> TestServer {
    TestServer::new(app(lazy_state())).unwrap()
}

fn schedule(start: &str, end: &str, days: &[&str], from: &str, to: &str) -> Value {
    json!({
        "start_date": start,
        "end_date": end,
        "meeting_days": days,
        "start_time": from,
        "end_time": to,
    })
}

#[tokio::test]
async fn test_health_and_version() {
    let server = server();

    let response = server.get("/health").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["status"], "ok");

    let response = server.get("/version").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["service"], "swimbook-api");
}

#[tokio::test]
async fn test_conflict_check_overlapping_schedules() {
    let response = server()
        .post("/api/lessons/conflicts")
        .json(&json!({
            "first": schedule("2025-06-01", "2025-06-30", &["Mon", "Wed"], "08:00:00", "09:00:00"),
            "second": schedule("2025-06-15", "2025-07-15", &["wed"], "08:30:00", "09:30:00"),
        }))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!({ "conflict": true }));
}

#[tokio::test]
async fn test_conflict_check_back_to_back_times() {
    let response = server()
        .post("/api/lessons/conflicts")
        .json(&json!({
            "first": schedule("2025-06-01", "2025-06-30", &["Mon"], "08:00:00", "09:00:00"),
            "second": schedule("2025-06-01", "2025-06-30", &["Mon"], "09:00:00", "10:00:00"),
        }))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!({ "conflict": false }));
}

#[tokio::test]
async fn test_conflict_check_disjoint_days() {
    let response = server()
        .post("/api/lessons/conflicts")
        .json(&json!({
            "first": schedule("2025-06-01", "2025-06-30", &["Mon", "Wed"], "08:00:00", "09:00:00"),
            "second": schedule("2025-06-01", "2025-06-30", &["Tue", "Thu"], "08:00:00", "09:00:00"),
        }))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!({ "conflict": false }));
}

#[tokio::test]
async fn test_conflict_check_missing_time_is_rejected() {
    let response = server()
        .post("/api/lessons/conflicts")
        .json(&json!({
            "first": {
                "start_date": "2025-06-01",
                "end_date": "2025-06-30",
                "meeting_days": ["Mon"],
                "start_time": "08:00:00",
            },
            "second": schedule("2025-06-01", "2025-06-30", &["Mon"], "08:00:00", "09:00:00"),
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let message = response.json::<Value>()["error"].as_str().unwrap().to_string();
    assert!(message.contains("end_time"));
}

#[tokio::test]
async fn test_create_lesson_rejects_zero_capacity() {
    let response = server()
        .post("/api/lessons")
        .json(&json!({ "name": "Guppies", "level": 1, "capacity": 0 }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_lesson_rejects_inverted_times() {
    let mut body = schedule("2025-06-01", "2025-06-30", &["Mon"], "10:00:00", "09:00:00");
    body["name"] = json!("Guppies");
    body["level"] = json!(1);
    body["capacity"] = json!(6);

    let response = server().post("/api/lessons").json(&body).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_lesson_rejects_partial_schedule() {
    let response = server()
        .post("/api/lessons")
        .json(&json!({
            "name": "Guppies",
            "level": 1,
            "capacity": 6,
            "start_date": "2025-06-01",
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_lesson_id_is_rejected() {
    let response = server().get("/api/lessons/not-a-uuid/waitlist").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}
