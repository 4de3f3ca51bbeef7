// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared list filtering helpers.

use chrono::NaiveDate;

/// Case-insensitive substring match of `needle` against any of `fields`.
///
/// An empty or whitespace-only needle matches everything.
pub fn text_matches<'a, I>(needle: &str, fields: I) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    fields
        .into_iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Whether `date` falls in the inclusive `[from, to]` range (open ends allowed).
pub fn in_date_range(date: NaiveDate, from: Option<NaiveDate>, to: Option<NaiveDate>) -> bool {
    from.is_none_or(|from| date >= from) && to.is_none_or(|to| date <= to)
}
