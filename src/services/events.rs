// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Community events: scheduling with overlap checks and participation.

use crate::db::{new_document_id, FirestoreDb};
use crate::error::{AppError, Result};
use crate::models::event::location_key;
use crate::models::{Event, EventStatus, User};
use crate::services::filters::in_date_range;
use crate::services::locks::KeyedLocks;
use crate::services::schedule::{find_conflicts, TimeWindow};
use crate::time_utils::today_utc;
use chrono::{NaiveDate, NaiveTime, Utc};
use serde::Deserialize;
use validator::Validate;

/// Staff request to create an event.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 5000))]
    pub description: String,
    pub date: NaiveDate,
    #[serde(with = "crate::models::event::hh_mm")]
    pub start_time: NaiveTime,
    #[serde(with = "crate::models::event::hh_mm")]
    pub end_time: NaiveTime,
    #[validate(length(min = 1, max = 200))]
    pub location: String,
    #[validate(range(min = 1, max = 10000))]
    pub max_participants: u32,
}

#[derive(Debug, Default, Deserialize)]
pub struct EventFilter {
    pub status: Option<EventStatus>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub location: Option<String>,
}

fn schedule_key(location: &str, date: NaiveDate) -> String {
    format!("schedule/{}/{}", location_key(location), date)
}

fn participants_key(event_id: &str) -> String {
    format!("participants/{}", event_id)
}

#[derive(Clone)]
pub struct EventService {
    db: FirestoreDb,
    locks: KeyedLocks,
}

impl EventService {
    pub fn new(db: FirestoreDb, locks: KeyedLocks) -> Self {
        Self { db, locks }
    }

    pub async fn get(&self, event_id: &str) -> Result<Event> {
        self.db
            .get_event(event_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Event {} not found", event_id)))
    }

    /// Reject `window` if it overlaps an active event at the same place and day.
    async fn ensure_no_overlap(
        &self,
        location: &str,
        date: NaiveDate,
        window: &TimeWindow,
        exclude_id: Option<&str>,
    ) -> Result<()> {
        let existing = self.db.active_events_at(location, date).await?;
        let conflicts = find_conflicts(window, &existing, exclude_id);

        if let Some(first) = conflicts.first() {
            return Err(AppError::Conflict(format!(
                "Overlaps '{}' ({}-{}) at {} on {}",
                first.title,
                first.start_time.format("%H:%M"),
                first.end_time.format("%H:%M"),
                location,
                date
            )));
        }
        Ok(())
    }

    pub async fn create(&self, creator: &User, mut request: NewEvent) -> Result<Event> {
        request.location = request.location.trim().to_string();
        request.validate()?;
        let window = TimeWindow::new(request.start_time, request.end_time)?;

        if request.date < today_utc() {
            return Err(AppError::BadRequest(
                "Cannot schedule an event in the past".to_string(),
            ));
        }

        let _guard = self
            .locks
            .acquire(schedule_key(&request.location, request.date))
            .await;

        self.ensure_no_overlap(&request.location, request.date, &window, None)
            .await?;

        let event = Event {
            event_id: new_document_id(),
            title: request.title,
            description: request.description,
            date: request.date,
            start_time: window.start,
            end_time: window.end,
            location: request.location,
            max_participants: request.max_participants,
            participants: vec![],
            status: EventStatus::Active,
            created_by: creator.uid.clone(),
            created_at: Utc::now(),
        };

        self.db.set_event(&event).await?;
        tracing::info!(
            event_id = %event.event_id,
            location = %event.location,
            date = %event.date,
            creator = %creator.uid,
            "Event created"
        );

        Ok(event)
    }

    /// List events sorted by date then start time.
    pub async fn list(&self, filter: &EventFilter) -> Result<Vec<Event>> {
        let mut events = self.db.list_events(filter.status).await?;

        events.retain(|e| {
            in_date_range(e.date, filter.from, filter.to)
                && filter
                    .location
                    .as_deref()
                    .is_none_or(|l| location_key(&e.location) == location_key(l))
        });
        events.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then_with(|| a.start_time.cmp(&b.start_time))
        });

        Ok(events)
    }

    /// Add the user to an active event. Joining twice is a no-op.
    pub async fn join(&self, user: &User, event_id: &str) -> Result<Event> {
        let _guard = self.locks.acquire(participants_key(event_id)).await;
        let mut event = self.get(event_id).await?;

        if event.status != EventStatus::Active {
            return Err(AppError::Conflict(format!(
                "Event is {}",
                event.status.as_str()
            )));
        }
        if event.participants.contains(&user.uid) {
            return Ok(event);
        }
        if event.is_full() {
            return Err(AppError::Conflict(format!(
                "Event is full ({} participants)",
                event.max_participants
            )));
        }

        event.participants.push(user.uid.clone());
        self.db.set_event(&event).await?;

        tracing::info!(
            event_id,
            uid = %user.uid,
            participants = event.participants.len(),
            "Joined event"
        );
        Ok(event)
    }

    /// Remove the user from an event. Leaving when not joined is a no-op.
    pub async fn leave(&self, user: &User, event_id: &str) -> Result<Event> {
        let _guard = self.locks.acquire(participants_key(event_id)).await;
        let mut event = self.get(event_id).await?;

        let before = event.participants.len();
        event.participants.retain(|p| p != &user.uid);

        if event.participants.len() != before {
            self.db.set_event(&event).await?;
            tracing::info!(event_id, uid = %user.uid, "Left event");
        }
        Ok(event)
    }

    /// Change an event's status. Reactivation re-checks for overlaps.
    pub async fn set_status(&self, event_id: &str, status: EventStatus) -> Result<Event> {
        let event = self.get(event_id).await?;

        let _schedule_guard = self
            .locks
            .acquire(schedule_key(&event.location, event.date))
            .await;
        let _participants_guard = self.locks.acquire(participants_key(event_id)).await;

        // Re-read under the locks; participants may have changed.
        let mut event = self.get(event_id).await?;

        if status == EventStatus::Active && event.status != EventStatus::Active {
            let window = TimeWindow::new(event.start_time, event.end_time)?;
            self.ensure_no_overlap(&event.location, event.date, &window, Some(event_id))
                .await?;
        }

        event.status = status;
        self.db.set_event(&event).await?;

        tracing::info!(event_id, status = status.as_str(), "Event status updated");
        Ok(event)
    }

    pub async fn delete(&self, event_id: &str) -> Result<()> {
        self.get(event_id).await?;
        self.db.delete_event(event_id).await?;
        tracing::info!(event_id, "Event deleted");
        Ok(())
    }
}
