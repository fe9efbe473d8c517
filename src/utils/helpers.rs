//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the application.

use chrono::{NaiveDate, NaiveTime};

use crate::utils::errors::{EventBoardError, Result};

/// Parse a `HH:MM` (or `HH:MM:SS`) string into a `NaiveTime`
pub fn parse_hhmm(value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| EventBoardError::InvalidInput(format!("Invalid time: {}", value)))
}

/// Parse a `YYYY-MM-DD` string into a `NaiveDate`
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| EventBoardError::InvalidInput(format!("Invalid date: {}", value)))
}

/// Format a time for API payloads (`HH:MM`)
pub fn format_hhmm(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Format a date for API payloads (`YYYY-MM-DD`)
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Decode a comma-delimited id column into a numeric list.
///
/// NULL and empty strings decode to an empty list; non-numeric fragments
/// are skipped.
pub fn parse_id_list(value: Option<&str>) -> Vec<i64> {
    match value {
        None => Vec::new(),
        Some(s) if s.is_empty() => Vec::new(),
        Some(s) => s.split(',').filter_map(|part| part.trim().parse().ok()).collect(),
    }
}

/// Encode a numeric list into the comma-delimited column form.
///
/// Empty lists encode to NULL so the column stays distinguishable from a
/// present-but-empty value.
pub fn join_id_list(ids: &[i64]) -> Option<String> {
    if ids.is_empty() {
        return None;
    }
    Some(ids.iter().map(|id| id.to_string()).collect::<Vec<_>>().join(","))
}

/// Decode a comma-delimited label column into a string list
pub fn parse_label_list(value: Option<&str>) -> Vec<String> {
    match value {
        None => Vec::new(),
        Some(s) if s.is_empty() => Vec::new(),
        Some(s) => s.split(',').map(|part| part.trim().to_string()).collect(),
    }
}

/// Encode a label list into the comma-delimited column form
pub fn join_label_list(labels: &[String]) -> Option<String> {
    if labels.is_empty() {
        return None;
    }
    Some(labels.join(","))
}

/// Derive the primary department id from a list, falling back to a scalar.
///
/// The scalar cache must always equal the first element of the list, or be
/// None when the list is empty.
pub fn primary_department_id(ids: &[i64], fallback: Option<i64>) -> Option<i64> {
    ids.first().copied().or(fallback)
}
