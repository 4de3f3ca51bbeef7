// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Community event routes.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::{Event, EventStatus, UserType};
use crate::routes::{ApiJson, ApiQuery, DeleteResponse};
use crate::services::events::{EventFilter, NewEvent};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Extension, Json, Router,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/events", get(list_events).post(create_event))
        .route("/api/events/{id}", get(get_event).delete(delete_event))
        .route("/api/events/{id}/join", post(join_event))
        .route("/api/events/{id}/leave", post(leave_event))
        .route("/api/events/{id}/status", put(set_event_status))
}

pub(crate) async fn create_event(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    WithRejection(Json(request), _): ApiJson<NewEvent>,
) -> Result<(StatusCode, Json<Event>)> {
    let creator = state.users.require(&auth, UserType::Staff).await?;
    let event = state.events.create(&creator, request).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

pub(crate) async fn list_events(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    WithRejection(Query(filter), _): ApiQuery<EventFilter>,
) -> Result<Json<Vec<Event>>> {
    state.users.require(&auth, UserType::Resident).await?;
    Ok(Json(state.events.list(&filter).await?))
}

async fn get_event(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Event>> {
    state.users.require(&auth, UserType::Resident).await?;
    Ok(Json(state.events.get(&id).await?))
}

async fn join_event(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Event>> {
    let user = state.users.require(&auth, UserType::Resident).await?;
    Ok(Json(state.events.join(&user, &id).await?))
}

async fn leave_event(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Event>> {
    let user = state.users.require(&auth, UserType::Resident).await?;
    Ok(Json(state.events.leave(&user, &id).await?))
}

#[derive(Deserialize)]
struct EventStatusRequest {
    status: EventStatus,
}

async fn set_event_status(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
    WithRejection(Json(request), _): ApiJson<EventStatusRequest>,
) -> Result<Json<Event>> {
    state.users.require(&auth, UserType::Staff).await?;
    Ok(Json(state.events.set_status(&id, request.status).await?))
}

async fn delete_event(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>> {
    state.users.require(&auth, UserType::Admin).await?;
    state.events.delete(&id).await?;

    Ok(Json(DeleteResponse {
        success: true,
        message: format!("Event {} deleted", id),
    }))
}
