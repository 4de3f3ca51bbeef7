// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Audit log listing and aggregate reports.

use crate::db::{BookingQuery, FirestoreDb};
use crate::error::{AppError, Result};
use crate::models::{LogEntry, ReportSummary};
use crate::services::filters::in_date_range;
use chrono::NaiveDate;

pub use crate::db::{LogCursor, LogQuery};

pub const DEFAULT_LOG_LIMIT: u32 = 50;
pub const MAX_LOG_LIMIT: u32 = 200;

/// One page of log entries.
#[derive(Debug)]
pub struct LogPage {
    pub entries: Vec<LogEntry>,
    pub next_cursor: Option<LogCursor>,
}

#[derive(Clone)]
pub struct ReportService {
    db: FirestoreDb,
}

impl ReportService {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// Logs newest first, paginated by cursor.
    pub async fn logs(&self, query: &LogQuery) -> Result<LogPage> {
        let limit = query.limit.clamp(1, MAX_LOG_LIMIT);

        // One extra entry tells whether another page follows.
        let mut entries = self.db.logs_page(query, limit + 1).await?;

        let has_more = entries.len() > limit as usize;
        entries.truncate(limit as usize);

        let next_cursor = if has_more {
            entries.last().map(|e| LogCursor {
                timestamp: e.timestamp,
                log_id: e.log_id.clone(),
            })
        } else {
            None
        };

        Ok(LogPage {
            entries,
            next_cursor,
        })
    }

    /// Aggregate logs, bookings and issues within an optional date window.
    pub async fn summary(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<ReportSummary> {
        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(AppError::BadRequest(
                    "'from' must not be after 'to'".to_string(),
                ));
            }
        }

        let booking_query = BookingQuery::default();
        let (logs, bookings, issues) = tokio::try_join!(
            self.db.list_logs(None, None),
            self.db.list_bookings(&booking_query),
            self.db.list_issues(None),
        )?;

        let mut summary = ReportSummary::default();
        for entry in logs
            .iter()
            .filter(|e| in_date_range(e.timestamp.date_naive(), from, to))
        {
            summary.add_log(entry);
        }
        for booking in bookings.iter().filter(|b| in_date_range(b.date, from, to)) {
            summary.add_booking(booking);
        }
        for issue in issues
            .iter()
            .filter(|i| in_date_range(i.reported_at.date_naive(), from, to))
        {
            summary.add_issue(issue);
        }

        tracing::debug!(
            logs = logs.len(),
            bookings = bookings.len(),
            issues = issues.len(),
            "Report summary computed"
        );

        Ok(summary.finish())
    }
}
