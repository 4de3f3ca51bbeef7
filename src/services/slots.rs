// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Slot availability and per-day booking limits.
//!
//! A slot is a one-hour interval identified by its starting hour
//! (9 = 09:00-10:00). Declined bookings release their slots.

use crate::error::AppError;
use crate::models::Booking;
use std::collections::BTreeSet;

/// Maximum slots a user may hold per facility per day.
pub const MAX_SLOTS_PER_DAY: usize = 3;

/// Last valid slot hour.
pub const MAX_SLOT_HOUR: u8 = 23;

/// Slots currently held by the given bookings.
pub fn booked_slots<'a, I>(bookings: I) -> BTreeSet<u8>
where
    I: IntoIterator<Item = &'a Booking>,
{
    bookings
        .into_iter()
        .filter(|b| b.status.holds_slots())
        .flat_map(|b| b.booked_slots.iter().copied())
        .collect()
}

/// Facility slots minus those held by existing bookings for the same date.
pub fn available_slots<'a, I>(facility_slots: &BTreeSet<u8>, bookings: I) -> BTreeSet<u8>
where
    I: IntoIterator<Item = &'a Booking>,
{
    let taken = booked_slots(bookings);
    facility_slots.difference(&taken).copied().collect()
}

/// Number of slots `user_id` holds among `bookings` (same facility and date).
pub fn slots_held_by<'a, I>(user_id: &str, bookings: I) -> usize
where
    I: IntoIterator<Item = &'a Booking>,
{
    bookings
        .into_iter()
        .filter(|b| b.user_id == user_id && b.status.holds_slots())
        .map(|b| b.booked_slots.len())
        .sum()
}

/// Check a request for `requested` more slots against the daily limit.
///
/// Returns the allowance left after the request.
pub fn check_daily_limit(held: usize, requested: usize) -> Result<usize, AppError> {
    let total = held.saturating_add(requested);
    if total > MAX_SLOTS_PER_DAY {
        return Err(AppError::LimitExceeded {
            held,
            requested,
            limit: MAX_SLOTS_PER_DAY,
        });
    }
    Ok(MAX_SLOTS_PER_DAY - total)
}

/// Allowance left for a user who already holds `held` slots.
pub fn remaining_allowance(held: usize) -> usize {
    MAX_SLOTS_PER_DAY.saturating_sub(held)
}

/// Validate a requested slot set against the facility's slot list.
pub fn validate_request(
    requested: &BTreeSet<u8>,
    facility_slots: &BTreeSet<u8>,
) -> Result<(), AppError> {
    if requested.is_empty() {
        return Err(AppError::BadRequest(
            "At least one slot must be requested".to_string(),
        ));
    }

    let unknown: Vec<u8> = requested.difference(facility_slots).copied().collect();
    if !unknown.is_empty() {
        return Err(AppError::BadRequest(format!(
            "Slots not offered by this facility: {:?}",
            unknown
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookingStatus;
    use chrono::{NaiveDate, Utc};

    fn booking(user: &str, slots: &[u8], status: BookingStatus) -> Booking {
        Booking {
            booking_id: format!("{}-{:?}", user, slots),
            facility_id: "court-1".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 7, 1).unwrap(),
            booked_slots: slots.iter().copied().collect(),
            user_id: user.to_string(),
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn set(slots: &[u8]) -> BTreeSet<u8> {
        slots.iter().copied().collect()
    }

    #[test]
    fn test_available_is_set_difference() {
        let facility = set(&[8, 9, 10, 11, 12]);
        let bookings = vec![
            booking("a", &[9, 10], BookingStatus::Pending),
            booking("b", &[12], BookingStatus::Approved),
        ];

        assert_eq!(available_slots(&facility, &bookings), set(&[8, 11]));
    }

    #[test]
    fn test_declined_bookings_release_slots() {
        let facility = set(&[9, 10]);
        let bookings = vec![booking("a", &[9], BookingStatus::Declined)];

        assert_eq!(available_slots(&facility, &bookings), set(&[9, 10]));
    }

    #[test]
    fn test_booked_slots_outside_facility_are_ignored() {
        // Facility hours shrank after a booking was made.
        let facility = set(&[9]);
        let bookings = vec![booking("a", &[20], BookingStatus::Approved)];

        assert_eq!(available_slots(&facility, &bookings), set(&[9]));
    }

    #[test]
    fn test_no_bookings_means_everything_free() {
        let facility = set(&[6, 7]);
        let none: Vec<Booking> = vec![];
        assert_eq!(available_slots(&facility, &none), facility);
    }

    #[test]
    fn test_slots_held_by_user() {
        let bookings = vec![
            booking("a", &[9, 10], BookingStatus::Approved),
            booking("a", &[14], BookingStatus::Declined),
            booking("a", &[15], BookingStatus::Pending),
            booking("b", &[11], BookingStatus::Pending),
        ];

        assert_eq!(slots_held_by("a", &bookings), 3);
        assert_eq!(slots_held_by("b", &bookings), 1);
        assert_eq!(slots_held_by("c", &bookings), 0);
    }

    #[test]
    fn test_daily_limit() {
        assert_eq!(check_daily_limit(0, 3).unwrap(), 0);
        assert_eq!(check_daily_limit(1, 1).unwrap(), 1);

        let err = check_daily_limit(2, 2).unwrap_err();
        assert!(matches!(
            err,
            AppError::LimitExceeded {
                held: 2,
                requested: 2,
                limit: 3
            }
        ));

        assert_eq!(remaining_allowance(5), 0);
        assert_eq!(remaining_allowance(1), 2);
    }

    #[test]
    fn test_validate_request() {
        let facility = set(&[9, 10]);
        assert!(validate_request(&set(&[9]), &facility).is_ok());
        assert!(matches!(
            validate_request(&set(&[]), &facility),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            validate_request(&set(&[9, 22]), &facility),
            Err(AppError::BadRequest(_))
        ));
    }
}
