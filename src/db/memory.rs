// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Process-local document store.
//!
//! Documents are kept as JSON values grouped by collection, so the same
//! serde shapes are exercised as with Firestore.

use crate::db::FieldFilter;
use crate::error::AppError;
use dashmap::DashMap;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// In-memory collections keyed by document ID.
#[derive(Clone, Default)]
pub struct MemoryStore {
    collections: Arc<DashMap<String, BTreeMap<String, Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<T>, AppError> {
        let Some(docs) = self.collections.get(collection) else {
            return Ok(None);
        };

        docs.get(id)
            .map(|value| decode(collection, id, value))
            .transpose()
    }

    pub fn set<T: Serialize>(&self, collection: &str, id: &str, doc: &T) -> Result<(), AppError> {
        let value = serde_json::to_value(doc).map_err(|e| {
            AppError::Database(format!("Failed to encode {}/{}: {}", collection, id, e))
        })?;

        self.collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), value);
        Ok(())
    }

    /// Remove a document. Returns whether it existed.
    pub fn delete(&self, collection: &str, id: &str) -> bool {
        self.collections
            .get_mut(collection)
            .map(|mut docs| docs.remove(id).is_some())
            .unwrap_or(false)
    }

    /// All documents whose string fields equal every filter value.
    pub fn query<T: DeserializeOwned>(
        &self,
        collection: &str,
        filters: &[FieldFilter],
    ) -> Result<Vec<T>, AppError> {
        let Some(docs) = self.collections.get(collection) else {
            return Ok(vec![]);
        };

        docs.iter()
            .filter(|(_, value)| matches_filters(value, filters))
            .map(|(id, value)| decode(collection, id, value))
            .collect()
    }
}

fn matches_filters(value: &Value, filters: &[FieldFilter]) -> bool {
    filters.iter().all(|(field, expected)| {
        value.get(*field).and_then(Value::as_str) == Some(expected.as_str())
    })
}

fn decode<T: DeserializeOwned>(collection: &str, id: &str, value: &Value) -> Result<T, AppError> {
    serde_json::from_value(value.clone()).map_err(|e| {
        AppError::Database(format!("Failed to decode {}/{}: {}", collection, id, e))
    })
}
