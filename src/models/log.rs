// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Append-only audit log entries used for reporting.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum LogEventType {
    Booking,
    Cancellation,
    Issue,
}

impl LogEventType {
    pub fn as_str(self) -> &'static str {
        match self {
            LogEventType::Booking => "booking",
            LogEventType::Cancellation => "cancellation",
            LogEventType::Issue => "issue",
        }
    }
}

/// One audit trail record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    #[serde(rename = "logID")]
    pub log_id: String,
    pub event_type: LogEventType,
    /// Facility concerned (issues may have none)
    #[serde(default)]
    pub facility_id: Option<String>,
    /// ID of the booking/issue document that triggered the entry
    pub event_doc_id: String,
    pub user_id: String,
    /// Stored as a Firestore timestamp so log pages can be ordered by it
    #[serde(with = "firestore::serialize_as_timestamp")]
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub details: String,
}
