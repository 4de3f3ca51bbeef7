// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod booking;
pub mod event;
pub mod facility;
pub mod issue;
pub mod log;
pub mod report;
pub mod user;

pub use booking::{Booking, BookingStatus};
pub use event::{Event, EventStatus};
pub use facility::{Facility, FacilityStatus};
pub use issue::{Issue, IssuePriority, IssueStatus};
pub use log::{LogEntry, LogEventType};
pub use report::ReportSummary;
pub use user::{User, UserType};
