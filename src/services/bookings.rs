// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Facility booking workflow.
//!
//! Handles:
//! 1. Available-slot lookup for a facility and date
//! 2. Booking creation (slot conflicts + per-day limit)
//! 3. Cancellation by the owner or staff
//! 4. Staff review (approve / decline)
//!
//! Creation holds the booker's user lock and the facility lock, then re-reads
//! the profile, the facility and its bookings. Two requests on one instance
//! cannot both pass the checks, and a booking cannot outlive a cascade delete
//! of its user or facility.

use crate::db::{new_document_id, BookingQuery, FirestoreDb};
use crate::error::{AppError, Result};
use crate::models::{Booking, BookingStatus, FacilityStatus, LogEventType, User, UserType};
use crate::services::locks::{facility_key, user_key, KeyedLocks};
use crate::services::{audit, slots};
use crate::time_utils::today_utc;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Booking request from a resident.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    #[serde(rename = "facilityID")]
    pub facility_id: String,
    pub date: NaiveDate,
    #[serde(alias = "slots")]
    pub booked_slots: BTreeSet<u8>,
}

/// Slot availability for one facility on one date.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct SlotAvailability {
    #[serde(rename = "facilityID")]
    pub facility_id: String,
    pub date: NaiveDate,
    /// Every slot the facility offers
    pub all_slots: BTreeSet<u8>,
    pub available_slots: BTreeSet<u8>,
    /// Slots the caller already holds on this date
    pub your_slots: BTreeSet<u8>,
    /// How many more slots the caller may book on this date
    pub remaining_allowance: usize,
}

/// Sort newest date first, then most recently created.
fn sort_newest_first(bookings: &mut [Booking]) {
    bookings.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
}

#[derive(Clone)]
pub struct BookingService {
    db: FirestoreDb,
    locks: KeyedLocks,
}

impl BookingService {
    pub fn new(db: FirestoreDb, locks: KeyedLocks) -> Self {
        Self { db, locks }
    }

    pub async fn get(&self, booking_id: &str) -> Result<Booking> {
        self.db
            .get_booking(booking_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", booking_id)))
    }

    /// Available slots for a facility/date, plus the caller's allowance.
    pub async fn availability(
        &self,
        facility_id: &str,
        date: NaiveDate,
        user_id: &str,
    ) -> Result<SlotAvailability> {
        let facility = self
            .db
            .get_facility(facility_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Facility {} not found", facility_id)))?;

        let bookings = self.db.bookings_for_facility_date(facility_id, date).await?;

        let available = if facility.status == FacilityStatus::Open {
            slots::available_slots(&facility.slots, &bookings)
        } else {
            BTreeSet::new()
        };

        let own: Vec<&Booking> = bookings.iter().filter(|b| b.user_id == user_id).collect();
        let held = slots::slots_held_by(user_id, own.iter().copied());

        Ok(SlotAvailability {
            facility_id: facility.facility_id,
            date,
            all_slots: facility.slots,
            available_slots: available,
            your_slots: slots::booked_slots(own),
            remaining_allowance: slots::remaining_allowance(held),
        })
    }

    /// Create a pending booking after checking slots and the daily limit.
    pub async fn create(&self, user: &User, request: NewBooking) -> Result<Booking> {
        if request.date < today_utc() {
            return Err(AppError::BadRequest(
                "Cannot book a date in the past".to_string(),
            ));
        }

        let _user_guard = self.locks.acquire(user_key(&user.uid)).await;
        let _facility_guard = self
            .locks
            .acquire(facility_key(&request.facility_id))
            .await;

        // The profile may have been deleted since the caller's role check.
        if self.db.get_user(&user.uid).await?.is_none() {
            return Err(AppError::Forbidden(
                "No profile for this account; sign in first".to_string(),
            ));
        }

        let facility = self
            .db
            .get_facility(&request.facility_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Facility {} not found", request.facility_id))
            })?;

        if facility.status != FacilityStatus::Open {
            return Err(AppError::Conflict(format!(
                "Facility {} is closed for bookings",
                facility.name
            )));
        }

        slots::validate_request(&request.booked_slots, &facility.slots)?;

        let existing = self
            .db
            .bookings_for_facility_date(&facility.facility_id, request.date)
            .await?;

        let taken = slots::booked_slots(&existing);
        let clashes: Vec<u8> = request.booked_slots.intersection(&taken).copied().collect();
        if !clashes.is_empty() {
            return Err(AppError::Conflict(format!(
                "Slots already booked: {:?}",
                clashes
            )));
        }

        let held = slots::slots_held_by(&user.uid, &existing);
        slots::check_daily_limit(held, request.booked_slots.len())?;

        let now = Utc::now();
        let booking = Booking {
            booking_id: new_document_id(),
            facility_id: facility.facility_id.clone(),
            date: request.date,
            booked_slots: request.booked_slots,
            user_id: user.uid.clone(),
            status: BookingStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        self.db.set_booking(&booking).await?;

        tracing::info!(
            booking_id = %booking.booking_id,
            facility_id = %booking.facility_id,
            date = %booking.date,
            slots = ?booking.booked_slots,
            uid = %user.uid,
            "Booking created"
        );

        audit::record(
            &self.db,
            LogEventType::Booking,
            Some(booking.facility_id.clone()),
            &booking.booking_id,
            &user.uid,
            format!(
                "Booked {} slot(s) on {} at {}",
                booking.booked_slots.len(),
                booking.date,
                facility.name
            ),
        )
        .await;

        Ok(booking)
    }

    /// The user's own bookings, newest date first.
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<Booking>> {
        let mut bookings = self
            .db
            .list_bookings(&BookingQuery {
                user_id: Some(user_id.to_string()),
                ..Default::default()
            })
            .await?;
        sort_newest_first(&mut bookings);
        Ok(bookings)
    }

    /// All bookings matching the query, newest date first.
    pub async fn list_all(&self, query: &BookingQuery) -> Result<Vec<Booking>> {
        let mut bookings = self.db.list_bookings(query).await?;
        sort_newest_first(&mut bookings);
        Ok(bookings)
    }

    /// Cancel (delete) a booking. Owners may cancel their own; staff any.
    pub async fn cancel(&self, caller: &User, booking_id: &str) -> Result<Booking> {
        let booking = self.get(booking_id).await?;

        if booking.user_id != caller.uid && !caller.user_type.at_least(UserType::Staff) {
            return Err(AppError::Forbidden(
                "Only the owner or staff can cancel this booking".to_string(),
            ));
        }

        let _guard = self.locks.acquire(facility_key(&booking.facility_id)).await;

        self.db.delete_booking(booking_id).await?;

        tracing::info!(
            booking_id,
            facility_id = %booking.facility_id,
            uid = %caller.uid,
            "Booking cancelled"
        );

        audit::record(
            &self.db,
            LogEventType::Cancellation,
            Some(booking.facility_id.clone()),
            booking_id,
            &caller.uid,
            format!(
                "Cancelled {} slot(s) on {}",
                booking.booked_slots.len(),
                booking.date
            ),
        )
        .await;

        Ok(booking)
    }

    /// Staff review: approve or decline a pending booking.
    pub async fn update_status(
        &self,
        reviewer: &User,
        booking_id: &str,
        status: BookingStatus,
    ) -> Result<Booking> {
        let mut booking = self.get(booking_id).await?;

        if !booking.status.can_transition_to(status) {
            return Err(AppError::Conflict(format!(
                "Cannot change booking from {} to {}",
                booking.status.as_str(),
                status.as_str()
            )));
        }

        booking.status = status;
        booking.updated_at = Utc::now();
        self.db.set_booking(&booking).await?;

        tracing::info!(
            booking_id,
            status = status.as_str(),
            reviewer = %reviewer.uid,
            "Booking status updated"
        );

        Ok(booking)
    }
}
