// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Issue reporting, visibility and staff triage.

use axum::http::StatusCode;
use facility_hub::models::UserType;
use serde_json::{json, Value};

mod common;
use common::{create_test_app, json_body, seed_facility, seed_user, send};

fn issue_request(title: &str) -> Value {
    json!({
        "issueTitle": title,
        "issueDescription": "Water everywhere",
        "category": "plumbing",
    })
}

async fn report(app: &axum::Router, token: &str, body: Value) -> Value {
    let response = send(app, "POST", "/api/issues", Some(token), Some(body)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response).await
}

#[tokio::test]
async fn test_report_issue_defaults() {
    let (app, state) = create_test_app();
    let alice = seed_user(&state, "alice", UserType::Resident).await;

    let issue = report(&app, &alice, issue_request("Leaking tap")).await;
    assert_eq!(issue["issueStatus"], "open");
    assert_eq!(issue["priority"], "medium");
    assert_eq!(issue["reporter"], "alice");

    let logs = state.db.list_logs(None, None).await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].event_type.as_str(), "issue");
}

#[tokio::test]
async fn test_report_issue_validation() {
    let (app, state) = create_test_app();
    let alice = seed_user(&state, "alice", UserType::Resident).await;
    seed_facility(&state, "court", &[9]).await;

    let mut body = issue_request("Broken net");
    body["relatedFacility"] = json!("court");
    body["images"] = json!(["https://cdn.example.com/net.jpg"]);
    let issue = report(&app, &alice, body).await;
    assert_eq!(issue["relatedFacility"], "court");

    let mut body = issue_request("Broken net");
    body["relatedFacility"] = json!("missing");
    let response = send(&app, "POST", "/api/issues", Some(&alice), Some(body)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let mut body = issue_request("Too many pictures");
    body["images"] = json!(vec!["https://cdn.example.com/x.jpg"; 6]);
    let response = send(&app, "POST", "/api/issues", Some(&alice), Some(body)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(
        &app,
        "POST",
        "/api/issues",
        Some(&alice),
        Some(issue_request("")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_residents_only_see_own_issues() {
    let (app, state) = create_test_app();
    let alice = seed_user(&state, "alice", UserType::Resident).await;
    let bob = seed_user(&state, "bob", UserType::Resident).await;
    let staff = seed_user(&state, "staff", UserType::Staff).await;

    let alices = report(&app, &alice, issue_request("Leaking tap")).await;
    report(&app, &bob, issue_request("Broken light")).await;

    let mine = json_body(send(&app, "GET", "/api/issues", Some(&alice), None).await).await;
    assert_eq!(mine.as_array().unwrap().len(), 1);
    assert_eq!(mine[0]["issueTitle"], "Leaking tap");

    let all = json_body(send(&app, "GET", "/api/issues", Some(&staff), None).await).await;
    assert_eq!(all.as_array().unwrap().len(), 2);

    let legacy = json_body(send(&app, "GET", "/fetch-issues", Some(&staff), None).await).await;
    assert_eq!(legacy.as_array().unwrap().len(), 2);

    let uri = format!("/api/issues/{}", alices["issueID"].as_str().unwrap());
    let response = send(&app, "GET", &uri, Some(&bob), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, "GET", &uri, Some(&alice), None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_issue_filters() {
    let (app, state) = create_test_app();
    let alice = seed_user(&state, "alice", UserType::Resident).await;
    let staff = seed_user(&state, "staff", UserType::Staff).await;

    let mut urgent = issue_request("Gas smell");
    urgent["priority"] = json!("urgent");
    report(&app, &alice, urgent).await;
    report(&app, &alice, issue_request("Leaking tap")).await;

    let body = json_body(
        send(&app, "GET", "/api/issues?priority=urgent", Some(&staff), None).await,
    )
    .await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["issueTitle"], "Gas smell");

    let body = json_body(send(&app, "GET", "/api/issues?search=TAP", Some(&staff), None).await).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_staff_triage() {
    let (app, state) = create_test_app();
    let alice = seed_user(&state, "alice", UserType::Resident).await;
    let staff = seed_user(&state, "staff", UserType::Staff).await;

    let issue = report(&app, &alice, issue_request("Leaking tap")).await;
    let uri = format!("/api/issues/{}", issue["issueID"].as_str().unwrap());

    let response = send(
        &app,
        "PUT",
        &uri,
        Some(&alice),
        Some(json!({"issueStatus": "resolved"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Assignee must be staff
    let response = send(
        &app,
        "PUT",
        &uri,
        Some(&staff),
        Some(json!({"assignedTo": "alice"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(
        &app,
        "PUT",
        &uri,
        Some(&staff),
        Some(json!({
            "issueStatus": "in_progress",
            "assignedTo": "staff",
            "feedback": "Plumber booked for Monday",
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["issueStatus"], "in_progress");
    assert_eq!(body["assignedTo"], "staff");
    assert_eq!(body["feedback"], "Plumber booked for Monday");
    // Untouched fields survive
    assert_eq!(body["priority"], "medium");

    // Leaving the assignee out keeps it
    let response = send(&app, "PUT", &uri, Some(&staff), Some(json!({"priority": "high"}))).await;
    assert_eq!(json_body(response).await["assignedTo"], "staff");

    // An explicit null unassigns
    let response = send(&app, "PUT", &uri, Some(&staff), Some(json!({"assignedTo": null}))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert!(body["assignedTo"].is_null());
    assert_eq!(body["issueStatus"], "in_progress");
    assert_eq!(body["priority"], "high");
}
