// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Community event model.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Active,
    Cancelled,
    Completed,
}

impl EventStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            EventStatus::Active => "active",
            EventStatus::Cancelled => "cancelled",
            EventStatus::Completed => "completed",
        }
    }
}

/// Stored event record (document ID is `eventID`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(rename = "eventID")]
    pub event_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub date: NaiveDate,
    #[serde(with = "hh_mm")]
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub start_time: NaiveTime,
    #[serde(with = "hh_mm")]
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub end_time: NaiveTime,
    pub location: String,
    pub max_participants: u32,
    /// UIDs of users who joined
    #[serde(default)]
    pub participants: Vec<String>,
    pub status: EventStatus,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl Event {
    pub fn is_full(&self) -> bool {
        self.participants.len() >= self.max_participants as usize
    }
}

/// Canonical form of a location for schedule lookups ("Hall A " and "hall a" match).
pub fn location_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Serialize times as "HH:MM", accepting "HH:MM" or "HH:MM:00" on input.
///
/// Stored times have minute precision, so non-zero seconds are rejected.
pub mod hh_mm {
    use chrono::{NaiveTime, Timelike};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid time '{}'", raw)))
    }

    pub fn parse(raw: &str) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(raw, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
            .ok()
            .filter(|t| t.second() == 0 && t.nanosecond() == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_format_round_trip() {
        let json = serde_json::json!({
            "eventID": "e1",
            "title": "Yoga",
            "date": "2026-06-01",
            "startTime": "09:30",
            "endTime": "10:45:00",
            "location": "Hall A",
            "maxParticipants": 2,
            "status": "active",
            "createdBy": "staff1",
            "createdAt": "2026-05-01T00:00:00Z"
        });

        let event: Event = serde_json::from_value(json).unwrap();
        assert_eq!(event.end_time, NaiveTime::from_hms_opt(10, 45, 0).unwrap());
        assert!(event.participants.is_empty());

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["startTime"], "09:30");
        assert_eq!(value["endTime"], "10:45");
    }

    #[test]
    fn test_time_with_seconds_rejected() {
        assert_eq!(
            hh_mm::parse("10:00:00"),
            NaiveTime::from_hms_opt(10, 0, 0)
        );
        assert!(hh_mm::parse("10:00:30").is_none());
        assert!(hh_mm::parse("25:00").is_none());

        let err = serde_json::from_value::<Event>(serde_json::json!({
            "eventID": "e1",
            "title": "Yoga",
            "date": "2026-06-01",
            "startTime": "10:00",
            "endTime": "10:00:30",
            "location": "Hall A",
            "maxParticipants": 2,
            "status": "active",
            "createdBy": "staff1",
            "createdAt": "2026-05-01T00:00:00Z"
        }))
        .unwrap_err();
        assert!(err.to_string().contains("invalid time '10:00:30'"));
    }

    #[test]
    fn test_location_key() {
        assert_eq!(location_key("  Hall A "), "hall a");
        assert_eq!(location_key("hall a"), location_key("HALL A"));
    }

    #[test]
    fn test_is_full() {
        let mut event: Event = serde_json::from_value(serde_json::json!({
            "eventID": "e1",
            "title": "Chess",
            "date": "2026-06-01",
            "startTime": "18:00",
            "endTime": "20:00",
            "location": "Library",
            "maxParticipants": 1,
            "status": "active",
            "createdBy": "staff1",
            "createdAt": "2026-05-01T00:00:00Z"
        }))
        .unwrap();

        assert!(!event.is_full());
        event.participants.push("u1".to_string());
        assert!(event.is_full());
    }
}
