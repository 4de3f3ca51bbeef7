// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Facility catalogue management.

use crate::db::{new_document_id, BookingQuery, FirestoreDb};
use crate::error::{AppError, Result};
use crate::models::{Facility, FacilityStatus};
use crate::services::locks::{facility_key, KeyedLocks};
use crate::services::slots::MAX_SLOT_HOUR;
use chrono::Utc;
use serde::Deserialize;
use std::collections::BTreeSet;
use validator::Validate;

/// Admin request to create a facility.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewFacility {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 50))]
    pub category: String,
    #[validate(length(min = 1, max = 200))]
    pub location: String,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: String,
    #[validate(range(min = 1))]
    pub capacity: Option<u32>,
    pub slots: BTreeSet<u8>,
    pub status: Option<FacilityStatus>,
}

/// Partial facility update.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FacilityUpdate {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub category: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub location: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(range(min = 1))]
    pub capacity: Option<u32>,
    pub slots: Option<BTreeSet<u8>>,
    pub status: Option<FacilityStatus>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FacilityFilter {
    pub category: Option<String>,
    pub status: Option<FacilityStatus>,
}

fn validate_slots(slots: &BTreeSet<u8>) -> Result<()> {
    if slots.is_empty() {
        return Err(AppError::BadRequest(
            "A facility needs at least one slot".to_string(),
        ));
    }
    if let Some(&hour) = slots.iter().find(|&&h| h > MAX_SLOT_HOUR) {
        return Err(AppError::BadRequest(format!(
            "Slot hour {} is out of range (0-{})",
            hour, MAX_SLOT_HOUR
        )));
    }
    Ok(())
}

#[derive(Clone)]
pub struct FacilityService {
    db: FirestoreDb,
    locks: KeyedLocks,
}

impl FacilityService {
    pub fn new(db: FirestoreDb, locks: KeyedLocks) -> Self {
        Self { db, locks }
    }

    pub async fn get(&self, facility_id: &str) -> Result<Facility> {
        self.db
            .get_facility(facility_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Facility {} not found", facility_id)))
    }

    /// List facilities sorted by name.
    pub async fn list(&self, filter: &FacilityFilter) -> Result<Vec<Facility>> {
        let mut facilities = self.db.list_facilities().await?;

        facilities.retain(|f| {
            filter
                .category
                .as_deref()
                .is_none_or(|c| f.category.eq_ignore_ascii_case(c))
                && filter.status.is_none_or(|s| f.status == s)
        });
        facilities.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(facilities)
    }

    pub async fn create(&self, request: NewFacility) -> Result<Facility> {
        request.validate()?;
        validate_slots(&request.slots)?;

        let now = Utc::now();
        let facility = Facility {
            facility_id: new_document_id(),
            name: request.name,
            category: request.category,
            location: request.location,
            description: request.description,
            capacity: request.capacity,
            slots: request.slots,
            status: request.status.unwrap_or(FacilityStatus::Open),
            created_at: now,
            updated_at: now,
        };

        self.db.set_facility(&facility).await?;
        tracing::info!(
            facility_id = %facility.facility_id,
            name = %facility.name,
            slots = facility.slots.len(),
            "Facility created"
        );

        Ok(facility)
    }

    pub async fn update(&self, facility_id: &str, update: FacilityUpdate) -> Result<Facility> {
        update.validate()?;
        let mut facility = self.get(facility_id).await?;

        if let Some(slots) = update.slots {
            validate_slots(&slots)?;
            facility.slots = slots;
        }
        if let Some(name) = update.name {
            facility.name = name;
        }
        if let Some(category) = update.category {
            facility.category = category;
        }
        if let Some(location) = update.location {
            facility.location = location;
        }
        if let Some(description) = update.description {
            facility.description = description;
        }
        if update.capacity.is_some() {
            facility.capacity = update.capacity;
        }
        if let Some(status) = update.status {
            facility.status = status;
        }
        facility.updated_at = Utc::now();

        self.db.set_facility(&facility).await?;
        Ok(facility)
    }

    /// Delete a facility and all of its bookings. Returns bookings removed.
    pub async fn delete(&self, facility_id: &str) -> Result<usize> {
        let _guard = self.locks.acquire(facility_key(facility_id)).await;
        self.get(facility_id).await?;

        let bookings_removed = self
            .db
            .delete_bookings(&BookingQuery {
                facility_id: Some(facility_id.to_string()),
                ..Default::default()
            })
            .await?;
        self.db.delete_facility(facility_id).await?;

        tracing::info!(facility_id, bookings_removed, "Facility deleted");
        Ok(bookings_removed)
    }
}
