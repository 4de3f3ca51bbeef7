// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request, Response};
use chrono::{NaiveDate, NaiveTime, Utc};
use facility_hub::config::Config;
use facility_hub::db::FirestoreDb;
use facility_hub::middleware::auth::create_jwt;
use facility_hub::models::{
    Event, EventStatus, Facility, FacilityStatus, User, UserType,
};
use facility_hub::routes::create_router;
use facility_hub::AppState;
use std::collections::BTreeSet;
use std::sync::Arc;
use tower::ServiceExt;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a test app backed by the in-memory store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let db = FirestoreDb::new_in_memory();
    let state = Arc::new(AppState::new(config, db));

    (create_router(state.clone()), state)
}

/// A far-future date so "no bookings in the past" never trips.
#[allow(dead_code)]
pub fn future_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2099, 6, 15).unwrap()
}

#[allow(dead_code)]
pub fn test_jwt(state: &AppState, uid: &str, email: Option<&str>) -> String {
    create_jwt(uid, email, &state.config.jwt_signing_key).unwrap()
}

/// Store a profile with the given role and return a bearer token for it.
#[allow(dead_code)]
pub async fn seed_user(state: &AppState, uid: &str, user_type: UserType) -> String {
    let email = format!("{}@example.com", uid);
    let now = Utc::now();
    let user = User {
        uid: uid.to_string(),
        email: email.clone(),
        display_name: Some(format!("User {}", uid)),
        photo_url: None,
        phone_number: None,
        provider_id: Some("password".to_string()),
        email_verified: true,
        pending_sign_in: false,
        user_type,
        created_at: now,
        updated_at: now,
    };
    state.db.upsert_user(&user).await.unwrap();
    test_jwt(state, uid, Some(&email))
}

#[allow(dead_code)]
pub async fn seed_facility(state: &AppState, id: &str, slots: &[u8]) -> Facility {
    let now = Utc::now();
    let facility = Facility {
        facility_id: id.to_string(),
        name: format!("Facility {}", id),
        category: "tennis".to_string(),
        location: "North Park".to_string(),
        description: String::new(),
        capacity: Some(4),
        slots: slots.iter().copied().collect::<BTreeSet<u8>>(),
        status: FacilityStatus::Open,
        created_at: now,
        updated_at: now,
    };
    state.db.set_facility(&facility).await.unwrap();
    facility
}

#[allow(dead_code)]
pub async fn seed_event(
    state: &AppState,
    id: &str,
    location: &str,
    start: (u32, u32),
    end: (u32, u32),
    max_participants: u32,
) -> Event {
    let event = Event {
        event_id: id.to_string(),
        title: format!("Event {}", id),
        description: String::new(),
        date: future_date(),
        start_time: NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap(),
        location: location.to_string(),
        max_participants,
        participants: vec![],
        status: EventStatus::Active,
        created_by: "staff".to_string(),
        created_at: Utc::now(),
    };
    state.db.set_event(&event).await.unwrap();
    event
}

/// Send a request with an optional bearer token and JSON body.
#[allow(dead_code)]
pub async fn send(
    app: &axum::Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    app.clone().oneshot(request).await.unwrap()
}

#[allow(dead_code)]
pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
