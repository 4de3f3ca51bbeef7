//! Database layer (Firestore, with an in-memory backend for local runs).

pub mod firestore;
pub mod memory;

pub use firestore::{BookingQuery, FirestoreDb, LogCursor, LogQuery};
pub use memory::MemoryStore;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const FACILITIES: &str = "facilities";
    pub const BOOKINGS: &str = "bookings";
    pub const EVENTS: &str = "events";
    pub const ISSUES: &str = "issues";
    /// Append-only audit trail
    pub const LOGS: &str = "logs";
}

/// Equality filter on a top-level document field.
pub type FieldFilter = (&'static str, String);

/// Generate a new random document ID.
pub fn new_document_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
