// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Date helpers for gateway date fields.

use chrono::{DateTime, NaiveDate, Utc};

/// Parse a gateway date field.
///
/// Accepts a plain `YYYY-MM-DD` date or a full RFC3339 timestamp, in which
/// case the UTC calendar day is returned.
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc).date_naive())
}

/// Format a calendar day the way the gateway expects it.
pub fn format_day(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
