// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Event scheduling, overlap detection and participation.

use axum::http::StatusCode;
use facility_hub::models::UserType;
use serde_json::{json, Value};

mod common;
use common::{create_test_app, future_date, json_body, seed_event, seed_user, send};

fn event_request(location: &str, start: &str, end: &str) -> Value {
    json!({
        "title": "Yoga in the park",
        "date": future_date().to_string(),
        "startTime": start,
        "endTime": end,
        "location": location,
        "maxParticipants": 20,
    })
}

#[tokio::test]
async fn test_create_event_requires_staff() {
    let (app, state) = create_test_app();
    let resident = seed_user(&state, "resident", UserType::Resident).await;
    let staff = seed_user(&state, "staff", UserType::Staff).await;

    let response = send(
        &app,
        "POST",
        "/api/events",
        Some(&resident),
        Some(event_request("Hall", "10:00", "11:00")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send(
        &app,
        "POST",
        "/api/events",
        Some(&staff),
        Some(event_request("Hall", "10:00", "11:00")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(body["status"], "active");
    assert_eq!(body["startTime"], "10:00");
    assert_eq!(body["createdBy"], "staff");
}

#[tokio::test]
async fn test_overlapping_event_rejected() {
    let (app, state) = create_test_app();
    let staff = seed_user(&state, "staff", UserType::Staff).await;
    seed_event(&state, "e1", "Hall", (10, 0), (12, 0), 10).await;

    let response = send(
        &app,
        "POST",
        "/api/events",
        Some(&staff),
        Some(event_request("Hall", "11:30", "13:00")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Same time, different location
    let response = send(
        &app,
        "POST",
        "/api/events",
        Some(&staff),
        Some(event_request("Pool", "11:30", "13:00")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_touching_events_allowed() {
    let (app, state) = create_test_app();
    let staff = seed_user(&state, "staff", UserType::Staff).await;
    seed_event(&state, "e1", "Hall", (10, 0), (12, 0), 10).await;

    let response = send(
        &app,
        "POST",
        "/api/events",
        Some(&staff),
        Some(event_request("Hall", "12:00", "13:00")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = send(
        &app,
        "POST",
        "/api/events",
        Some(&staff),
        Some(event_request("Hall", "09:00", "10:00")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_invalid_event_times() {
    let (app, state) = create_test_app();
    let staff = seed_user(&state, "staff", UserType::Staff).await;

    let response = send(
        &app,
        "POST",
        "/api/events",
        Some(&staff),
        Some(event_request("Hall", "14:00", "13:00")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Malformed times fail deserialization
    let response = send(
        &app,
        "POST",
        "/api/events",
        Some(&staff),
        Some(event_request("Hall", "25:00", "26:00")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], "bad_request");
    assert!(body["details"].as_str().unwrap().contains("25:00"));
}

#[tokio::test]
async fn test_sub_minute_times_rejected() {
    let (app, state) = create_test_app();
    let staff = seed_user(&state, "staff", UserType::Staff).await;

    // Stored times have minute precision; this would become 10:00-10:00.
    let response = send(
        &app,
        "POST",
        "/api/events",
        Some(&staff),
        Some(event_request("Hall", "10:00", "10:00:30")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "bad_request");

    let events = json_body(send(&app, "GET", "/api/events", Some(&staff), None).await).await;
    assert!(events.as_array().unwrap().is_empty());

    // Whole-minute seconds are still accepted
    let response = send(
        &app,
        "POST",
        "/api/events",
        Some(&staff),
        Some(event_request("Hall", "10:00:00", "11:00:00")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(body["startTime"], "10:00");
    assert_eq!(body["endTime"], "11:00");
}

#[tokio::test]
async fn test_overlap_ignores_location_case_and_spacing() {
    let (app, state) = create_test_app();
    let staff = seed_user(&state, "staff", UserType::Staff).await;
    seed_event(&state, "e1", "Hall", (10, 0), (12, 0), 10).await;

    let response = send(
        &app,
        "POST",
        "/api/events",
        Some(&staff),
        Some(event_request("hall ", "11:00", "13:00")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Stored locations are trimmed
    let response = send(
        &app,
        "POST",
        "/api/events",
        Some(&staff),
        Some(event_request("  Hall B ", "11:00", "13:00")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(json_body(response).await["location"], "Hall B");

    let listed = json_body(
        send(&app, "GET", "/api/events?location=hall%20b", Some(&staff), None).await,
    )
    .await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_cancelled_event_does_not_block() {
    let (app, state) = create_test_app();
    let staff = seed_user(&state, "staff", UserType::Staff).await;
    seed_event(&state, "e1", "Hall", (10, 0), (12, 0), 10).await;

    let response = send(
        &app,
        "PUT",
        "/api/events/e1/status",
        Some(&staff),
        Some(json!({"status": "cancelled"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(
        &app,
        "POST",
        "/api/events",
        Some(&staff),
        Some(event_request("Hall", "10:00", "11:00")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // Reactivating now overlaps the new event
    let response = send(
        &app,
        "PUT",
        "/api/events/e1/status",
        Some(&staff),
        Some(json!({"status": "active"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_join_and_leave() {
    let (app, state) = create_test_app();
    let alice = seed_user(&state, "alice", UserType::Resident).await;
    let bob = seed_user(&state, "bob", UserType::Resident).await;
    seed_event(&state, "e1", "Hall", (10, 0), (12, 0), 1).await;

    let response = send(&app, "POST", "/api/events/e1/join", Some(&alice), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["participants"], json!(["alice"]));

    // Joining twice is a no-op
    let response = send(&app, "POST", "/api/events/e1/join", Some(&alice), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["participants"], json!(["alice"]));

    let response = send(&app, "POST", "/api/events/e1/join", Some(&bob), None).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = send(&app, "POST", "/api/events/e1/leave", Some(&alice), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["participants"], json!([]));

    let response = send(&app, "POST", "/api/events/e1/join", Some(&bob), None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_cannot_join_cancelled_event() {
    let (app, state) = create_test_app();
    let alice = seed_user(&state, "alice", UserType::Resident).await;
    let staff = seed_user(&state, "staff", UserType::Staff).await;
    seed_event(&state, "e1", "Hall", (10, 0), (12, 0), 10).await;

    send(
        &app,
        "PUT",
        "/api/events/e1/status",
        Some(&staff),
        Some(json!({"status": "cancelled"})),
    )
    .await;

    let response = send(&app, "POST", "/api/events/e1/join", Some(&alice), None).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_list_and_delete_events() {
    let (app, state) = create_test_app();
    let resident = seed_user(&state, "resident", UserType::Resident).await;
    let staff = seed_user(&state, "staff", UserType::Staff).await;
    let admin = seed_user(&state, "admin", UserType::Admin).await;
    seed_event(&state, "late", "Hall", (15, 0), (16, 0), 10).await;
    seed_event(&state, "early", "Hall", (8, 0), (9, 0), 10).await;
    seed_event(&state, "pool", "Pool", (8, 0), (9, 0), 10).await;

    let body = json_body(send(&app, "GET", "/api/events?location=hall", Some(&resident), None).await).await;
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["eventID"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["early", "late"]);

    let legacy = json_body(send(&app, "GET", "/get-all-events", Some(&resident), None).await).await;
    assert_eq!(legacy.as_array().unwrap().len(), 3);

    let response = send(&app, "DELETE", "/api/events/late", Some(&staff), None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send(&app, "DELETE", "/api/events/late", Some(&admin), None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, "GET", "/api/events/late", Some(&resident), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
