// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Facility-Hub: community facility booking and management backend
//!
//! This crate provides the HTTP API for residents booking community
//! facilities, reporting maintenance issues and joining events, and for
//! staff and admins managing them.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;
use services::locks::KeyedLocks;
use services::{
    BookingService, EventService, FacilityService, IssueService, ReportService, UserService,
};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    /// Lock table shared by every service
    pub locks: KeyedLocks,
    pub users: UserService,
    pub facilities: FacilityService,
    pub bookings: BookingService,
    pub events: EventService,
    pub issues: IssueService,
    pub reports: ReportService,
}

impl AppState {
    /// Build the state and its services around a store handle.
    pub fn new(config: Config, db: FirestoreDb) -> Self {
        let locks = KeyedLocks::new();
        Self {
            users: UserService::new(db.clone(), locks.clone(), config.admin_emails.clone()),
            facilities: FacilityService::new(db.clone(), locks.clone()),
            bookings: BookingService::new(db.clone(), locks.clone()),
            events: EventService::new(db.clone(), locks.clone()),
            issues: IssueService::new(db.clone()),
            reports: ReportService::new(db.clone()),
            config,
            db,
            locks,
        }
    }
}
