// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User profile and account administration routes.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::{User, UserType};
use crate::routes::{ApiJson, ApiQuery, DeleteResponse};
use crate::services::users::{NewAccount, ProfileUpdate, SignInProfile, UserFilter};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/create-account", post(create_account))
        .route("/api/me", get(get_me).post(sync_me).put(update_me))
        .route("/api/users", get(list_users))
        .route("/api/users/{uid}/role", put(set_role))
        .route("/api/users/{uid}", delete(delete_user))
}

// ─── Own Profile ─────────────────────────────────────────────

async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<User>> {
    Ok(Json(state.users.get(&auth.uid).await?))
}

/// Called by the client after every sign-in.
async fn sync_me(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    WithRejection(Json(profile), _): ApiJson<SignInProfile>,
) -> Result<Json<User>> {
    Ok(Json(state.users.sync_profile(&auth, profile).await?))
}

async fn update_me(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    WithRejection(Json(update), _): ApiJson<ProfileUpdate>,
) -> Result<Json<User>> {
    Ok(Json(state.users.update_self(&auth.uid, update).await?))
}

// ─── Administration ──────────────────────────────────────────

async fn create_account(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    WithRejection(Json(request), _): ApiJson<NewAccount>,
) -> Result<(StatusCode, Json<User>)> {
    state.users.require(&auth, UserType::Admin).await?;
    let user = state.users.create_account(request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn list_users(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    WithRejection(Query(filter), _): ApiQuery<UserFilter>,
) -> Result<Json<Vec<User>>> {
    state.users.require(&auth, UserType::Admin).await?;
    Ok(Json(state.users.list(&filter).await?))
}

#[derive(Deserialize)]
struct RoleRequest {
    user_type: UserType,
}

async fn set_role(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(uid): Path<String>,
    WithRejection(Json(request), _): ApiJson<RoleRequest>,
) -> Result<Json<User>> {
    let admin = state.users.require(&auth, UserType::Admin).await?;
    Ok(Json(
        state
            .users
            .set_role(&admin, &uid, request.user_type)
            .await?,
    ))
}

async fn delete_user(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(uid): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let admin = state.users.require(&auth, UserType::Admin).await?;
    let bookings_removed = state.users.delete(&admin, &uid).await?;

    Ok(Json(DeleteResponse {
        success: true,
        message: format!(
            "User {} deleted ({} booking(s) removed)",
            uid, bookings_removed
        ),
    }))
}
