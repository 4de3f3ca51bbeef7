// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Audit log and summary report routes (staff only).

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{LogEntry, LogEventType, ReportSummary, UserType};
use crate::routes::ApiQuery;
use crate::services::reports::{LogCursor, LogQuery, DEFAULT_LOG_LIMIT};
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Extension, Json, Router,
};
use axum_extra::extract::WithRejection;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/logs", get(get_logs))
        .route("/api/reports/summary", get(get_summary))
}

#[derive(Debug, Deserialize)]
pub(crate) struct LogsQuery {
    event_type: Option<LogEventType>,
    facility: Option<String>,
    /// RFC 3339 lower bound on entry timestamps
    since: Option<String>,
    #[serde(default = "default_limit")]
    limit: u32,
    /// Opaque token from a previous page's `next_cursor`
    cursor: Option<String>,
}

fn default_limit() -> u32 {
    DEFAULT_LOG_LIMIT
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LogsResponse {
    pub logs: Vec<LogEntry>,
    pub next_cursor: Option<String>,
}

const CURSOR_PARTS: usize = 3;

fn parse_since(since: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    since
        .map(|raw| {
            DateTime::parse_from_rfc3339(raw)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|_| {
                    AppError::BadRequest(
                        "Invalid 'since' parameter; expected RFC 3339 timestamp".to_string(),
                    )
                })
        })
        .transpose()
}

fn parse_cursor(cursor: Option<&str>) -> Result<Option<LogCursor>> {
    cursor
        .map(|raw| {
            let invalid_cursor = || AppError::BadRequest("Invalid 'cursor' parameter".to_string());

            let decoded = URL_SAFE_NO_PAD.decode(raw).map_err(|_| invalid_cursor())?;
            let decoded_str = std::str::from_utf8(&decoded).map_err(|_| invalid_cursor())?;

            let parts: Vec<&str> = decoded_str.splitn(CURSOR_PARTS, ':').collect();
            if parts.len() != CURSOR_PARTS || parts[2].is_empty() {
                return Err(invalid_cursor());
            }

            let seconds = parts[0].parse::<i64>().map_err(|_| invalid_cursor())?;
            let nanos = parts[1].parse::<u32>().map_err(|_| invalid_cursor())?;
            let timestamp = DateTime::from_timestamp(seconds, nanos).ok_or_else(invalid_cursor)?;

            Ok(LogCursor {
                timestamp,
                log_id: parts[2].to_string(),
            })
        })
        .transpose()
}

fn encode_cursor(cursor: &LogCursor) -> String {
    let payload = format!(
        "{}:{}:{}",
        cursor.timestamp.timestamp(),
        cursor.timestamp.timestamp_subsec_nanos(),
        cursor.log_id
    );
    URL_SAFE_NO_PAD.encode(payload)
}

pub(crate) async fn get_logs(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    WithRejection(Query(params), _): ApiQuery<LogsQuery>,
) -> Result<Json<LogsResponse>> {
    state.users.require(&auth, UserType::Staff).await?;

    tracing::debug!(
        event_type = ?params.event_type,
        facility = ?params.facility,
        cursor = ?params.cursor,
        limit = params.limit,
        "Fetching logs"
    );

    let query = LogQuery {
        event_type: params.event_type,
        facility_id: params.facility,
        since: parse_since(params.since.as_deref())?,
        limit: params.limit,
        cursor: parse_cursor(params.cursor.as_deref())?,
    };

    let page = state.reports.logs(&query).await?;

    Ok(Json(LogsResponse {
        logs: page.entries,
        next_cursor: page.next_cursor.as_ref().map(encode_cursor),
    }))
}

#[derive(Debug, Deserialize)]
struct SummaryQuery {
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
}

async fn get_summary(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    WithRejection(Query(params), _): ApiQuery<SummaryQuery>,
) -> Result<Json<ReportSummary>> {
    state.users.require(&auth, UserType::Staff).await?;
    Ok(Json(state.reports.summary(params.from, params.to).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_encode_parse() {
        let cursor = LogCursor {
            timestamp: DateTime::from_timestamp(1_900_000_000, 123_456_789).unwrap(),
            log_id: "abc123".to_string(),
        };
        let encoded = encode_cursor(&cursor);
        let parsed = parse_cursor(Some(&encoded)).unwrap().unwrap();
        assert_eq!(parsed, cursor);
    }

    #[test]
    fn test_parse_cursor_rejects_garbage() {
        assert!(parse_cursor(None).unwrap().is_none());
        assert!(matches!(
            parse_cursor(Some("not base64!")),
            Err(AppError::BadRequest(_))
        ));

        let missing_id = URL_SAFE_NO_PAD.encode("100:0:");
        assert!(parse_cursor(Some(&missing_id)).is_err());

        let bad_secs = URL_SAFE_NO_PAD.encode("abc:0:log1");
        assert!(parse_cursor(Some(&bad_secs)).is_err());
    }

    #[test]
    fn test_parse_since() {
        assert!(parse_since(None).unwrap().is_none());
        let since = parse_since(Some("2099-01-01T00:00:00Z")).unwrap().unwrap();
        assert_eq!(since.timestamp(), 4_070_908_800);
        assert!(parse_since(Some("yesterday")).is_err());
    }
}
