// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared date/time helpers.

use chrono::{DateTime, NaiveDate, Utc};

/// Today's date in UTC.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// Month bucket key ("YYYY-MM") for a timestamp.
pub fn month_key(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m").to_string()
}
