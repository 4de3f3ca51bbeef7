// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-key async locks for check-then-write sequences.
//!
//! Serializes writers within one instance only; concurrent instances can
//! still interleave.
//!
//! One table is shared by all services. Code that takes more than one lock
//! acquires a `user_key` before a `facility_key`.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Table size above which idle entries are dropped on the next acquire.
const PRUNE_THRESHOLD: usize = 1024;

/// Lock table keyed by resource (e.g. "facility/court-1").
#[derive(Clone, Default)]
pub struct KeyedLocks {
    locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `key`.
    pub async fn acquire(&self, key: String) -> OwnedMutexGuard<()> {
        if self.locks.len() > PRUNE_THRESHOLD {
            self.prune();
        }

        let lock = self
            .locks
            .entry(key)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        lock.lock_owned().await
    }

    /// Drop entries nobody is holding or waiting on.
    pub fn prune(&self) {
        self.locks.retain(|_, lock| Arc::strong_count(lock) > 1);
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

/// Guards a facility's bookings against concurrent creation and cascade deletes.
pub fn facility_key(facility_id: &str) -> String {
    format!("facility/{}", facility_id)
}

/// Guards a user's profile and the bookings created in their name.
pub fn user_key(uid: &str) -> String {
    format!("user/{}", uid)
}
