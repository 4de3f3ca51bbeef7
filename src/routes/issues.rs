// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Maintenance issue routes.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::{Issue, UserType};
use crate::services::issues::{IssueFilter, IssueUpdate, NewIssue};
use crate::routes::{ApiJson, ApiQuery};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use axum_extra::extract::WithRejection;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/issues", get(list_issues).post(create_issue))
        .route("/api/issues/{id}", get(get_issue).put(update_issue))
}

pub(crate) async fn create_issue(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    WithRejection(Json(request), _): ApiJson<NewIssue>,
) -> Result<(StatusCode, Json<Issue>)> {
    let reporter = state.users.require(&auth, UserType::Resident).await?;
    let issue = state.issues.create(&reporter, request).await?;
    Ok((StatusCode::CREATED, Json(issue)))
}

pub(crate) async fn list_issues(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    WithRejection(Query(filter), _): ApiQuery<IssueFilter>,
) -> Result<Json<Vec<Issue>>> {
    let caller = state.users.require(&auth, UserType::Resident).await?;
    Ok(Json(state.issues.list(&caller, &filter).await?))
}

async fn get_issue(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Issue>> {
    let caller = state.users.require(&auth, UserType::Resident).await?;
    Ok(Json(state.issues.get(&caller, &id).await?))
}

async fn update_issue(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
    WithRejection(Json(update), _): ApiJson<IssueUpdate>,
) -> Result<Json<Issue>> {
    let staff = state.users.require(&auth, UserType::Staff).await?;
    Ok(Json(state.issues.update(&staff, &id, update).await?))
}
