// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Event time-window overlap checks.

use crate::error::AppError;
use crate::models::{Event, EventStatus};
use chrono::NaiveTime;

/// Half-open time window `[start, end)` on a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeWindow {
    /// Build a window, rejecting empty or inverted ranges.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, AppError> {
        if start >= end {
            return Err(AppError::BadRequest(format!(
                "Start time {} must be before end time {}",
                start.format("%H:%M"),
                end.format("%H:%M")
            )));
        }
        Ok(Self { start, end })
    }

    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.start < other.end && self.end > other.start
    }
}

/// Active events among `existing` whose window overlaps `candidate`.
///
/// Callers pass events already narrowed to the same date and location;
/// `exclude_id` skips the event being re-validated.
pub fn find_conflicts<'a>(
    candidate: &TimeWindow,
    existing: &'a [Event],
    exclude_id: Option<&str>,
) -> Vec<&'a Event> {
    existing
        .iter()
        .filter(|e| e.status == EventStatus::Active)
        .filter(|e| Some(e.event_id.as_str()) != exclude_id)
        .filter(|e| {
            let window = TimeWindow {
                start: e.start_time,
                end: e.end_time,
            };
            candidate.overlaps(&window)
        })
        .collect()
}
