// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Audit trail writer.

use crate::db::{new_document_id, FirestoreDb};
use crate::models::{LogEntry, LogEventType};

/// Append a log entry. Failures are logged and do not fail the caller.
pub async fn record(
    db: &FirestoreDb,
    event_type: LogEventType,
    facility_id: Option<String>,
    event_doc_id: &str,
    user_id: &str,
    details: String,
) {
    let entry = LogEntry {
        log_id: new_document_id(),
        event_type,
        facility_id,
        event_doc_id: event_doc_id.to_string(),
        user_id: user_id.to_string(),
        timestamp: chrono::Utc::now(),
        details,
    };

    if let Err(e) = db.append_log(&entry).await {
        tracing::warn!(
            error = %e,
            event_type = event_type.as_str(),
            event_doc_id,
            "Failed to append audit log"
        );
    }
}
