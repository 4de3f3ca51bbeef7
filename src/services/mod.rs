// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod audit;
pub mod bookings;
pub mod events;
pub mod facilities;
pub mod filters;
pub mod issues;
pub mod locks;
pub mod reports;
pub mod schedule;
pub mod slots;
pub mod users;

pub use bookings::BookingService;
pub use events::EventService;
pub use facilities::FacilityService;
pub use issues::IssueService;
pub use reports::ReportService;
pub use users::UserService;
