// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (profile documents)
//! - Facilities (bookable slot lists)
//! - Bookings, events and issues
//! - Logs (append-only audit trail)
//!
//! The same operations run against an in-memory store when configured
//! for local development, or fail fast in offline mode.

use crate::db::{collections, FieldFilter, MemoryStore};
use crate::error::AppError;
use crate::models::event::location_key;
use crate::models::{
    Booking, BookingStatus, Event, EventStatus, Facility, Issue, LogEntry, LogEventType, User,
    UserType,
};
use chrono::{DateTime, NaiveDate, Utc};
use futures_util::{stream, StreamExt};
use serde::{de::DeserializeOwned, Serialize};

const MAX_CONCURRENT_DB_OPS: usize = 50;

#[derive(Clone)]
enum Backend {
    Firestore(firestore::FirestoreDb),
    Memory(MemoryStore),
    Offline,
}

/// Document database client.
#[derive(Clone)]
pub struct FirestoreDb {
    backend: Backend,
}

/// Optional equality filters for booking listings.
#[derive(Debug, Default, Clone)]
pub struct BookingQuery {
    pub status: Option<BookingStatus>,
    pub facility_id: Option<String>,
    pub date: Option<NaiveDate>,
    pub user_id: Option<String>,
}

impl BookingQuery {
    fn filters(&self) -> Vec<FieldFilter> {
        let mut filters = Vec::new();
        if let Some(status) = self.status {
            filters.push(("status", status.as_str().to_string()));
        }
        if let Some(facility_id) = &self.facility_id {
            filters.push(("facilityID", facility_id.clone()));
        }
        if let Some(date) = self.date {
            filters.push(("date", date.to_string()));
        }
        if let Some(user_id) = &self.user_id {
            filters.push(("userID", user_id.clone()));
        }
        filters
    }
}

/// Position after the last entry of a log page (ordering is newest first).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogCursor {
    pub timestamp: DateTime<Utc>,
    pub log_id: String,
}

impl LogCursor {
    /// Whether `entry` sorts after this position, i.e. belongs to a later page.
    pub fn is_before(&self, entry: &LogEntry) -> bool {
        entry.timestamp < self.timestamp
            || (entry.timestamp == self.timestamp && entry.log_id < self.log_id)
    }
}

/// Filters and position for one page of logs.
#[derive(Debug, Default, Clone)]
pub struct LogQuery {
    pub event_type: Option<LogEventType>,
    pub facility_id: Option<String>,
    pub since: Option<DateTime<Utc>>,
    pub limit: u32,
    pub cursor: Option<LogCursor>,
}

impl LogQuery {
    fn filters(&self) -> Vec<FieldFilter> {
        let mut filters = Vec::new();
        if let Some(event_type) = self.event_type {
            filters.push(("eventType", event_type.as_str().to_string()));
        }
        if let Some(facility_id) = &self.facility_id {
            filters.push(("facilityId", facility_id.clone()));
        }
        filters
    }
}

fn db_err(e: impl std::fmt::Display) -> AppError {
    AppError::Database(e.to_string())
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            backend: Backend::Firestore(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            backend: Backend::Firestore(client),
        })
    }

    /// Create a client backed by a fresh in-memory store.
    pub fn new_in_memory() -> Self {
        tracing::info!("Using in-memory document store");
        Self {
            backend: Backend::Memory(MemoryStore::new()),
        }
    }

    /// Create a mock client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self {
            backend: Backend::Offline,
        }
    }

    fn offline() -> AppError {
        AppError::Database("Database not connected (offline mode)".to_string())
    }

    // ─── Generic Document Operations ─────────────────────────────

    async fn get_doc<T>(&self, collection: &str, id: &str) -> Result<Option<T>, AppError>
    where
        T: DeserializeOwned + Send,
    {
        match &self.backend {
            Backend::Firestore(client) => client
                .fluent()
                .select()
                .by_id_in(collection)
                .obj()
                .one(id)
                .await
                .map_err(db_err),
            Backend::Memory(store) => store.get(collection, id),
            Backend::Offline => Err(Self::offline()),
        }
    }

    async fn set_doc<T>(&self, collection: &str, id: &str, doc: &T) -> Result<(), AppError>
    where
        T: Serialize + DeserializeOwned + Sync + Send,
    {
        match &self.backend {
            Backend::Firestore(client) => {
                let _: () = client
                    .fluent()
                    .update()
                    .in_col(collection)
                    .document_id(id)
                    .object(doc)
                    .execute()
                    .await
                    .map_err(db_err)?;
                Ok(())
            }
            Backend::Memory(store) => store.set(collection, id, doc),
            Backend::Offline => Err(Self::offline()),
        }
    }

    async fn delete_doc(&self, collection: &str, id: &str) -> Result<(), AppError> {
        match &self.backend {
            Backend::Firestore(client) => {
                client
                    .fluent()
                    .delete()
                    .from(collection)
                    .document_id(id)
                    .execute()
                    .await
                    .map_err(db_err)?;
                Ok(())
            }
            Backend::Memory(store) => {
                store.delete(collection, id);
                Ok(())
            }
            Backend::Offline => Err(Self::offline()),
        }
    }

    /// Query documents matching all equality filters (whole collection if none).
    async fn query_docs<T>(
        &self,
        collection: &str,
        filters: Vec<FieldFilter>,
    ) -> Result<Vec<T>, AppError>
    where
        T: DeserializeOwned + Send,
    {
        match &self.backend {
            Backend::Firestore(client) => {
                let query = client.fluent().select().from(collection);

                if filters.is_empty() {
                    query.obj().query().await.map_err(db_err)
                } else {
                    query
                        .filter(move |q| {
                            let conditions: Vec<_> = filters
                                .iter()
                                .map(|(field, value)| q.field(*field).eq(value.clone()))
                                .collect();
                            q.for_all(conditions)
                        })
                        .obj()
                        .query()
                        .await
                        .map_err(db_err)
                }
            }
            Backend::Memory(store) => store.query(collection, &filters),
            Backend::Offline => Err(Self::offline()),
        }
    }

    /// Delete many documents with bounded concurrency.
    async fn delete_docs(&self, collection: &str, ids: Vec<String>) -> Result<usize, AppError> {
        let count = ids.len();

        stream::iter(ids)
            .map(|id| async move { self.delete_doc(collection, &id).await })
            .buffer_unordered(MAX_CONCURRENT_DB_OPS)
            .collect::<Vec<Result<(), AppError>>>()
            .await
            .into_iter()
            .collect::<Result<Vec<()>, AppError>>()?;

        Ok(count)
    }

    // ─── User Operations ─────────────────────────────────────────

    pub async fn get_user(&self, uid: &str) -> Result<Option<User>, AppError> {
        self.get_doc(collections::USERS, uid).await
    }

    /// Create or update a user profile.
    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        self.set_doc(collections::USERS, &user.uid, user).await
    }

    pub async fn delete_user(&self, uid: &str) -> Result<(), AppError> {
        self.delete_doc(collections::USERS, uid).await
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users: Vec<User> = self
            .query_docs(collections::USERS, vec![("email", email.to_string())])
            .await?;
        Ok(users.into_iter().next())
    }

    pub async fn list_users(&self, user_type: Option<UserType>) -> Result<Vec<User>, AppError> {
        let filters = user_type
            .map(|t| vec![("user_type", t.as_str().to_string())])
            .unwrap_or_default();
        self.query_docs(collections::USERS, filters).await
    }

    // ─── Facility Operations ─────────────────────────────────────

    pub async fn get_facility(&self, facility_id: &str) -> Result<Option<Facility>, AppError> {
        self.get_doc(collections::FACILITIES, facility_id).await
    }

    pub async fn set_facility(&self, facility: &Facility) -> Result<(), AppError> {
        self.set_doc(collections::FACILITIES, &facility.facility_id, facility)
            .await
    }

    pub async fn delete_facility(&self, facility_id: &str) -> Result<(), AppError> {
        self.delete_doc(collections::FACILITIES, facility_id).await
    }

    pub async fn list_facilities(&self) -> Result<Vec<Facility>, AppError> {
        self.query_docs(collections::FACILITIES, vec![]).await
    }

    // ─── Booking Operations ──────────────────────────────────────

    pub async fn get_booking(&self, booking_id: &str) -> Result<Option<Booking>, AppError> {
        self.get_doc(collections::BOOKINGS, booking_id).await
    }

    pub async fn set_booking(&self, booking: &Booking) -> Result<(), AppError> {
        self.set_doc(collections::BOOKINGS, &booking.booking_id, booking)
            .await
    }

    pub async fn delete_booking(&self, booking_id: &str) -> Result<(), AppError> {
        self.delete_doc(collections::BOOKINGS, booking_id).await
    }

    /// All bookings (any status) for a facility on a date.
    pub async fn bookings_for_facility_date(
        &self,
        facility_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<Booking>, AppError> {
        self.list_bookings(&BookingQuery {
            facility_id: Some(facility_id.to_string()),
            date: Some(date),
            ..Default::default()
        })
        .await
    }

    pub async fn list_bookings(&self, query: &BookingQuery) -> Result<Vec<Booking>, AppError> {
        self.query_docs(collections::BOOKINGS, query.filters()).await
    }

    /// Remove every booking matching the query. Returns the number removed.
    pub async fn delete_bookings(&self, query: &BookingQuery) -> Result<usize, AppError> {
        let ids = self
            .list_bookings(query)
            .await?
            .into_iter()
            .map(|b| b.booking_id)
            .collect();
        self.delete_docs(collections::BOOKINGS, ids).await
    }

    // ─── Event Operations ────────────────────────────────────────

    pub async fn get_event(&self, event_id: &str) -> Result<Option<Event>, AppError> {
        self.get_doc(collections::EVENTS, event_id).await
    }

    pub async fn set_event(&self, event: &Event) -> Result<(), AppError> {
        self.set_doc(collections::EVENTS, &event.event_id, event)
            .await
    }

    pub async fn delete_event(&self, event_id: &str) -> Result<(), AppError> {
        self.delete_doc(collections::EVENTS, event_id).await
    }

    /// Active events at a location on a date. Locations match after trimming,
    /// ignoring case.
    pub async fn active_events_at(
        &self,
        location: &str,
        date: NaiveDate,
    ) -> Result<Vec<Event>, AppError> {
        let mut events: Vec<Event> = self
            .query_docs(
                collections::EVENTS,
                vec![
                    ("date", date.to_string()),
                    ("status", EventStatus::Active.as_str().to_string()),
                ],
            )
            .await?;

        let wanted = location_key(location);
        events.retain(|e| location_key(&e.location) == wanted);
        Ok(events)
    }

    pub async fn list_events(&self, status: Option<EventStatus>) -> Result<Vec<Event>, AppError> {
        let filters = status
            .map(|s| vec![("status", s.as_str().to_string())])
            .unwrap_or_default();
        self.query_docs(collections::EVENTS, filters).await
    }

    // ─── Issue Operations ────────────────────────────────────────

    pub async fn get_issue(&self, issue_id: &str) -> Result<Option<Issue>, AppError> {
        self.get_doc(collections::ISSUES, issue_id).await
    }

    pub async fn set_issue(&self, issue: &Issue) -> Result<(), AppError> {
        self.set_doc(collections::ISSUES, &issue.issue_id, issue)
            .await
    }

    /// Issues, optionally restricted to one reporter.
    pub async fn list_issues(&self, reporter: Option<&str>) -> Result<Vec<Issue>, AppError> {
        let filters = reporter
            .map(|r| vec![("reporter", r.to_string())])
            .unwrap_or_default();
        self.query_docs(collections::ISSUES, filters).await
    }

    // ─── Log Operations ──────────────────────────────────────────

    pub async fn append_log(&self, entry: &LogEntry) -> Result<(), AppError> {
        self.set_doc(collections::LOGS, &entry.log_id, entry).await
    }

    pub async fn list_logs(
        &self,
        event_type: Option<LogEventType>,
        facility_id: Option<&str>,
    ) -> Result<Vec<LogEntry>, AppError> {
        let query = LogQuery {
            event_type,
            facility_id: facility_id.map(str::to_string),
            ..Default::default()
        };
        self.query_docs(collections::LOGS, query.filters()).await
    }

    /// Up to `fetch` entries matching `query`, newest first, starting after
    /// its cursor. Ordering and the limit run in the store.
    pub async fn logs_page(&self, query: &LogQuery, fetch: u32) -> Result<Vec<LogEntry>, AppError> {
        match &self.backend {
            Backend::Firestore(client) => {
                let filters = query.filters();
                let since = query.since;

                let mut select = client
                    .fluent()
                    .select()
                    .from(collections::LOGS)
                    .filter(move |q| {
                        let mut conditions: Vec<_> = filters
                            .iter()
                            .map(|(field, value)| q.field(*field).eq(value.clone()))
                            .collect();
                        conditions.push(since.and_then(|since| {
                            q.field("timestamp")
                                .greater_than_or_equal(firestore::FirestoreTimestamp(since))
                        }));
                        q.for_all(conditions)
                    })
                    .order_by([
                        ("timestamp", firestore::FirestoreQueryDirection::Descending),
                        ("logID", firestore::FirestoreQueryDirection::Descending),
                    ])
                    .limit(fetch);

                if let Some(cursor) = &query.cursor {
                    select = select.start_at(firestore::FirestoreQueryCursor::AfterValue(vec![
                        firestore::FirestoreTimestamp(cursor.timestamp).into(),
                        cursor.log_id.clone().into(),
                    ]));
                }

                select.obj().query().await.map_err(db_err)
            }
            Backend::Memory(store) => {
                let mut entries: Vec<LogEntry> = store.query(collections::LOGS, &query.filters())?;

                entries.retain(|e| {
                    query.since.is_none_or(|since| e.timestamp >= since)
                        && query.cursor.as_ref().is_none_or(|c| c.is_before(e))
                });
                entries.sort_by(|a, b| {
                    b.timestamp
                        .cmp(&a.timestamp)
                        .then_with(|| b.log_id.cmp(&a.log_id))
                });
                entries.truncate(fetch as usize);
                Ok(entries)
            }
            Backend::Offline => Err(Self::offline()),
        }
    }
}
