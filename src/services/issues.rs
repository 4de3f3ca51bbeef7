// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Maintenance issue reporting and triage.

use crate::db::{new_document_id, FirestoreDb};
use crate::error::{AppError, Result};
use crate::models::{Issue, IssuePriority, IssueStatus, LogEventType, User, UserType};
use crate::services::audit;
use crate::services::filters::text_matches;
use chrono::Utc;
use serde::{Deserialize, Deserializer};
use validator::Validate;

/// Maximum number of images attached to one issue.
pub const MAX_IMAGES: usize = 5;

/// Issue report from a resident.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewIssue {
    #[validate(length(min = 1, max = 200))]
    pub issue_title: String,
    #[validate(length(min = 1, max = 5000))]
    pub issue_description: String,
    #[validate(length(min = 1, max = 50))]
    pub category: String,
    #[serde(default = "default_priority")]
    pub priority: IssuePriority,
    pub related_facility: Option<String>,
    #[validate(length(max = 200))]
    pub location: Option<String>,
    #[serde(default)]
    #[validate(length(max = 5))]
    pub images: Vec<String>,
}

fn default_priority() -> IssuePriority {
    IssuePriority::Medium
}

/// Staff triage update; absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct IssueUpdate {
    pub issue_status: Option<IssueStatus>,
    #[validate(length(max = 5000))]
    pub feedback: Option<String>,
    /// `Some(None)` (JSON `null`) clears the assignee
    #[serde(default, deserialize_with = "present")]
    pub assigned_to: Option<Option<String>>,
    pub priority: Option<IssuePriority>,
}

/// Wrap any present value, `null` included, so it differs from an absent field.
fn present<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Default, Deserialize)]
pub struct IssueFilter {
    pub status: Option<IssueStatus>,
    pub priority: Option<IssuePriority>,
    pub category: Option<String>,
    pub assigned_to: Option<String>,
    pub search: Option<String>,
}

fn validate_image_urls(images: &[String]) -> Result<()> {
    for url in images {
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(AppError::BadRequest(format!(
                "Image must be an http(s) URL: {}",
                url
            )));
        }
    }
    Ok(())
}

fn is_staff(user: &User) -> bool {
    user.user_type.at_least(UserType::Staff)
}

#[derive(Clone)]
pub struct IssueService {
    db: FirestoreDb,
}

impl IssueService {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    pub async fn create(&self, reporter: &User, request: NewIssue) -> Result<Issue> {
        request.validate()?;
        validate_image_urls(&request.images)?;

        if let Some(facility_id) = request.related_facility.as_deref() {
            if self.db.get_facility(facility_id).await?.is_none() {
                return Err(AppError::BadRequest(format!(
                    "Unknown facility {}",
                    facility_id
                )));
            }
        }

        let now = Utc::now();
        let issue = Issue {
            issue_id: new_document_id(),
            issue_title: request.issue_title,
            issue_description: request.issue_description,
            reporter: reporter.uid.clone(),
            reported_at: now,
            issue_status: IssueStatus::Open,
            priority: request.priority,
            category: request.category,
            related_facility: request.related_facility,
            location: request.location,
            assigned_to: None,
            feedback: None,
            images: request.images,
            updated_at: now,
        };

        self.db.set_issue(&issue).await?;
        tracing::info!(
            issue_id = %issue.issue_id,
            priority = issue.priority.as_str(),
            reporter = %reporter.uid,
            "Issue reported"
        );

        audit::record(
            &self.db,
            LogEventType::Issue,
            issue.related_facility.clone(),
            &issue.issue_id,
            &reporter.uid,
            format!("Reported '{}' ({})", issue.issue_title, issue.category),
        )
        .await;

        Ok(issue)
    }

    /// Residents see their own issues; staff see all. Newest first.
    pub async fn list(&self, caller: &User, filter: &IssueFilter) -> Result<Vec<Issue>> {
        let reporter = if is_staff(caller) {
            None
        } else {
            Some(caller.uid.as_str())
        };
        let mut issues = self.db.list_issues(reporter).await?;

        issues.retain(|i| {
            filter.status.is_none_or(|s| i.issue_status == s)
                && filter.priority.is_none_or(|p| i.priority == p)
                && filter
                    .category
                    .as_deref()
                    .is_none_or(|c| i.category.eq_ignore_ascii_case(c))
                && filter
                    .assigned_to
                    .as_deref()
                    .is_none_or(|a| i.assigned_to.as_deref() == Some(a))
                && filter.search.as_deref().is_none_or(|s| {
                    text_matches(
                        s,
                        [
                            i.issue_title.as_str(),
                            i.issue_description.as_str(),
                            i.location.as_deref().unwrap_or(""),
                        ],
                    )
                })
        });
        issues.sort_by(|a, b| b.reported_at.cmp(&a.reported_at));

        Ok(issues)
    }

    pub async fn get(&self, caller: &User, issue_id: &str) -> Result<Issue> {
        let issue = self
            .db
            .get_issue(issue_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Issue {} not found", issue_id)))?;

        if issue.reporter != caller.uid && !is_staff(caller) {
            // Hide existence from other residents
            return Err(AppError::NotFound(format!("Issue {} not found", issue_id)));
        }
        Ok(issue)
    }

    pub async fn update(&self, staff: &User, issue_id: &str, update: IssueUpdate) -> Result<Issue> {
        update.validate()?;
        let mut issue = self.get(staff, issue_id).await?;

        if let Some(Some(assignee)) = update.assigned_to.as_ref() {
            let assignee_user = self.db.get_user(assignee).await?.ok_or_else(|| {
                AppError::BadRequest(format!("Unknown assignee {}", assignee))
            })?;
            if !is_staff(&assignee_user) {
                return Err(AppError::BadRequest(
                    "Issues can only be assigned to staff".to_string(),
                ));
            }
        }

        if let Some(status) = update.issue_status {
            issue.issue_status = status;
        }
        if update.feedback.is_some() {
            issue.feedback = update.feedback;
        }
        if let Some(assigned_to) = update.assigned_to {
            issue.assigned_to = assigned_to;
        }
        if let Some(priority) = update.priority {
            issue.priority = priority;
        }
        issue.updated_at = Utc::now();

        self.db.set_issue(&issue).await?;
        tracing::info!(
            issue_id,
            status = issue.issue_status.as_str(),
            staff = %staff.uid,
            "Issue updated"
        );

        Ok(issue)
    }
}
