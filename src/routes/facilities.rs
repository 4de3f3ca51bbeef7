// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Facility catalogue and slot availability routes.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::{Facility, UserType};
use crate::routes::{ApiJson, ApiQuery, DeleteResponse};
use crate::services::bookings::SlotAvailability;
use crate::services::facilities::{FacilityFilter, FacilityUpdate, NewFacility};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use axum_extra::extract::WithRejection;
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/facilities",
            get(list_facilities).post(create_facility),
        )
        .route(
            "/api/facilities/{id}",
            get(get_facility)
                .put(update_facility)
                .delete(delete_facility),
        )
        .route("/api/facilities/{id}/slots", get(get_available_slots))
}

async fn list_facilities(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    WithRejection(Query(filter), _): ApiQuery<FacilityFilter>,
) -> Result<Json<Vec<Facility>>> {
    state.users.require(&auth, UserType::Resident).await?;
    Ok(Json(state.facilities.list(&filter).await?))
}

async fn get_facility(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Facility>> {
    state.users.require(&auth, UserType::Resident).await?;
    Ok(Json(state.facilities.get(&id).await?))
}

async fn create_facility(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    WithRejection(Json(request), _): ApiJson<NewFacility>,
) -> Result<(StatusCode, Json<Facility>)> {
    state.users.require(&auth, UserType::Admin).await?;
    let facility = state.facilities.create(request).await?;
    Ok((StatusCode::CREATED, Json(facility)))
}

async fn update_facility(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
    WithRejection(Json(update), _): ApiJson<FacilityUpdate>,
) -> Result<Json<Facility>> {
    state.users.require(&auth, UserType::Admin).await?;
    Ok(Json(state.facilities.update(&id, update).await?))
}

async fn delete_facility(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>> {
    state.users.require(&auth, UserType::Admin).await?;
    let bookings_removed = state.facilities.delete(&id).await?;

    Ok(Json(DeleteResponse {
        success: true,
        message: format!(
            "Facility {} deleted ({} booking(s) removed)",
            id, bookings_removed
        ),
    }))
}

#[derive(Deserialize)]
struct SlotsQuery {
    date: NaiveDate,
}

async fn get_available_slots(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
    WithRejection(Query(params), _): ApiQuery<SlotsQuery>,
) -> Result<Json<SlotAvailability>> {
    let user = state.users.require(&auth, UserType::Resident).await?;

    tracing::debug!(facility_id = %id, date = %params.date, "Fetching available slots");

    Ok(Json(
        state
            .bookings
            .availability(&id, params.date, &user.uid)
            .await?,
    ))
}
