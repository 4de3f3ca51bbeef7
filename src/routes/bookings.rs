// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Booking routes for residents and staff review.

use crate::db::BookingQuery;
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::{Booking, BookingStatus, UserType};
use crate::services::bookings::NewBooking;
use crate::routes::{ApiJson, ApiQuery};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, put},
    Extension, Json, Router,
};
use axum_extra::extract::WithRejection;
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/bookings", get(list_my_bookings).post(create_booking))
        .route("/api/bookings/{id}", delete(cancel_booking))
        .route("/api/admin/bookings", get(list_all_bookings))
        .route("/api/admin/bookings/{id}/status", put(update_booking_status))
}

async fn create_booking(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    WithRejection(Json(request), _): ApiJson<NewBooking>,
) -> Result<(StatusCode, Json<Booking>)> {
    let user = state.users.require(&auth, UserType::Resident).await?;
    let booking = state.bookings.create(&user, request).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

async fn list_my_bookings(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<Booking>>> {
    let user = state.users.require(&auth, UserType::Resident).await?;
    Ok(Json(state.bookings.list_for_user(&user.uid).await?))
}

async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Booking>> {
    let user = state.users.require(&auth, UserType::Resident).await?;
    Ok(Json(state.bookings.cancel(&user, &id).await?))
}

/// Staff booking listing filters.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct AllBookingsQuery {
    status: Option<BookingStatus>,
    facility: Option<String>,
    date: Option<NaiveDate>,
    user: Option<String>,
}

pub(crate) async fn list_all_bookings(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    WithRejection(Query(params), _): ApiQuery<AllBookingsQuery>,
) -> Result<Json<Vec<Booking>>> {
    state.users.require(&auth, UserType::Staff).await?;

    let query = BookingQuery {
        status: params.status,
        facility_id: params.facility,
        date: params.date,
        user_id: params.user,
    };
    Ok(Json(state.bookings.list_all(&query).await?))
}

#[derive(Deserialize)]
struct StatusRequest {
    status: BookingStatus,
}

async fn update_booking_status(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
    WithRejection(Json(request), _): ApiJson<StatusRequest>,
) -> Result<Json<Booking>> {
    let reviewer = state.users.require(&auth, UserType::Staff).await?;
    Ok(Json(
        state
            .bookings
            .update_status(&reviewer, &id, request.status)
            .await?,
    ))
}
