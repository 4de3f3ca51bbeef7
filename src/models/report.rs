//! Aggregate report over the audit log, bookings and issues.
//!
//! Built in one pass per source; counts only, no rendering.

use serde::Serialize;
use std::collections::BTreeMap;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::{Booking, Issue, LogEntry, LogEventType};

/// Per-event-type counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct EventCounts {
    pub bookings: u32,
    pub cancellations: u32,
    pub issues: u32,
}

impl EventCounts {
    fn add(&mut self, event_type: LogEventType) {
        match event_type {
            LogEventType::Booking => self.bookings += 1,
            LogEventType::Cancellation => self.cancellations += 1,
            LogEventType::Issue => self.issues += 1,
        }
    }
}

/// Facility with the most booking log entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct BusiestFacility {
    pub facility_id: String,
    pub bookings: u32,
}

/// Dashboard summary for staff and admins.
#[derive(Debug, Clone, Default, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ReportSummary {
    // ─── Audit Log ───────────────────────────────────────────────
    pub totals: EventCounts,
    pub by_facility: BTreeMap<String, EventCounts>,
    /// Counts per month ("YYYY-MM")
    pub by_month: BTreeMap<String, EventCounts>,
    pub busiest_facility: Option<BusiestFacility>,

    // ─── Current State ───────────────────────────────────────────
    /// Booking count per status ("pending", "approved", "declined")
    pub bookings_by_status: BTreeMap<String, u32>,
    pub issues_by_status: BTreeMap<String, u32>,
    pub issues_by_priority: BTreeMap<String, u32>,
    /// Booked slot-hours per facility
    pub slot_hours_by_facility: BTreeMap<String, u32>,
}

impl ReportSummary {
    pub fn add_log(&mut self, entry: &LogEntry) {
        self.totals.add(entry.event_type);

        if let Some(facility_id) = &entry.facility_id {
            self.by_facility
                .entry(facility_id.clone())
                .or_default()
                .add(entry.event_type);
        }

        self.by_month
            .entry(crate::time_utils::month_key(entry.timestamp))
            .or_default()
            .add(entry.event_type);
    }

    pub fn add_booking(&mut self, booking: &Booking) {
        *self
            .bookings_by_status
            .entry(booking.status.as_str().to_string())
            .or_insert(0) += 1;

        if booking.status.holds_slots() {
            *self
                .slot_hours_by_facility
                .entry(booking.facility_id.clone())
                .or_insert(0) += booking.booked_slots.len() as u32;
        }
    }

    pub fn add_issue(&mut self, issue: &Issue) {
        *self
            .issues_by_status
            .entry(issue.issue_status.as_str().to_string())
            .or_insert(0) += 1;
        *self
            .issues_by_priority
            .entry(issue.priority.as_str().to_string())
            .or_insert(0) += 1;
    }

    /// Pick the busiest facility. Ties go to the smallest facility ID.
    pub fn finish(mut self) -> Self {
        self.busiest_facility = self
            .by_facility
            .iter()
            .filter(|(_, counts)| counts.bookings > 0)
            .max_by(|(a_id, a), (b_id, b)| {
                a.bookings.cmp(&b.bookings).then_with(|| b_id.cmp(a_id))
            })
            .map(|(facility_id, counts)| BusiestFacility {
                facility_id: facility_id.clone(),
                bookings: counts.bookings,
            });
        self
    }
}
