// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Facility booking model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Review state of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Approved,
    Declined,
}

impl BookingStatus {
    /// Whether a booking in this state occupies its slots.
    pub fn holds_slots(self) -> bool {
        !matches!(self, BookingStatus::Declined)
    }

    /// Allowed review transitions: only pending bookings can be decided.
    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (BookingStatus::Pending, BookingStatus::Approved)
                | (BookingStatus::Pending, BookingStatus::Declined)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Approved => "approved",
            BookingStatus::Declined => "declined",
        }
    }
}

/// Stored booking record (document ID is `bookingID`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(rename = "bookingID")]
    pub booking_id: String,
    #[serde(rename = "facilityID")]
    pub facility_id: String,
    /// Calendar date of the booking (YYYY-MM-DD)
    pub date: NaiveDate,
    /// Booked hour slots
    pub booked_slots: BTreeSet<u8>,
    #[serde(rename = "userID")]
    pub user_id: String,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_transitions() {
        use BookingStatus::*;
        assert!(Pending.can_transition_to(Approved));
        assert!(Pending.can_transition_to(Declined));
        assert!(!Approved.can_transition_to(Declined));
        assert!(!Declined.can_transition_to(Approved));
        assert!(!Pending.can_transition_to(Pending));
    }

    #[test]
    fn test_booking_document_shape() {
        let json = serde_json::json!({
            "bookingID": "b1",
            "facilityID": "f1",
            "date": "2026-05-01",
            "bookedSlots": [10, 9],
            "userID": "u1",
            "status": "pending",
            "createdAt": "2026-04-01T10:00:00Z",
            "updatedAt": "2026-04-01T10:00:00Z"
        });

        let booking: Booking = serde_json::from_value(json).unwrap();
        assert_eq!(booking.date, NaiveDate::from_ymd_opt(2026, 5, 1).unwrap());
        assert_eq!(booking.booked_slots.iter().copied().collect::<Vec<_>>(), vec![9, 10]);
        assert!(booking.status.holds_slots());
    }
}
