// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Function-style endpoints kept for older clients.
//!
//! Each path delegates to the same handler as its REST counterpart.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::{Booking, BookingStatus, UserType};
use crate::routes::{bookings, events, issues, reports, ApiJson};
use crate::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/get-all-bookings", get(bookings::list_all_bookings))
        .route("/update-booking-status", post(update_booking_status))
        .route("/fetch-issues", get(issues::list_issues))
        .route("/create-issue", post(issues::create_issue))
        .route("/create-event", post(events::create_event))
        .route("/get-all-events", get(events::list_events))
        .route("/get-all-logs", get(reports::get_logs))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateBookingStatusRequest {
    #[serde(alias = "bookingID")]
    booking_id: String,
    status: BookingStatus,
}

/// Booking id travels in the body rather than the path.
async fn update_booking_status(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    WithRejection(Json(request), _): ApiJson<UpdateBookingStatusRequest>,
) -> Result<Json<Booking>> {
    let reviewer = state.users.require(&auth, UserType::Staff).await?;
    Ok(Json(
        state
            .bookings
            .update_status(&reviewer, &request.booking_id, request.status)
            .await?,
    ))
}
