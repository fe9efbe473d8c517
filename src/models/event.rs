//! Published event model

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::helpers;

/// Lifecycle status of a published event.
///
/// Only `planned` events participate in conflict detection; `canceled`
/// events are excluded from calendar listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "event_status", rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub enum EventStatus {
    Planned,
    Active,
    Completed,
    Canceled,
}

/// Event attendance format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "event_format", rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub enum EventFormat {
    Open,
    Closed,
}

/// The published, calendar-visible record.
///
/// An event may exist without any request (admin-authored); `request_id`
/// is a soft back-reference that can be cleared without deleting the event.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub date_start: NaiveDate,
    pub date_end: NaiveDate,
    pub time_start: NaiveTime,
    pub time_end: NaiveTime,
    pub place: String,
    pub format: EventFormat,
    pub department_id: Option<i64>,
    pub department_ids: Option<String>,
    pub labels: Option<String>,
    pub limit_participants: Option<i32>,
    pub description: String,
    pub post_link: Option<String>,
    pub reg_link: Option<String>,
    pub responsible_link: Option<String>,
    pub repeat: Option<serde_json::Value>,
    pub status: EventStatus,
    pub request_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Resolved department id list (delimited column form decoded)
    pub fn department_id_list(&self) -> Vec<i64> {
        helpers::parse_id_list(self.department_ids.as_deref())
    }

    /// Resolved label list
    pub fn label_list(&self) -> Vec<String> {
        helpers::parse_label_list(self.labels.as_deref())
    }
}

/// The event-field snapshot shared between a request and its event.
///
/// Requests duplicate all event fields; this value object is the single
/// conversion point between the two record types. Department fields are
/// carried in column form (`department_ids` delimited, `department_id`
/// derived primary) so both sides stay consistent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFields {
    pub title: String,
    pub date_start: NaiveDate,
    pub date_end: NaiveDate,
    pub time_start: NaiveTime,
    pub time_end: NaiveTime,
    pub place: String,
    pub format: EventFormat,
    pub department_id: Option<i64>,
    pub department_ids: Option<String>,
    pub labels: Option<String>,
    pub limit_participants: Option<i32>,
    pub description: String,
    pub post_link: Option<String>,
    pub reg_link: Option<String>,
    pub responsible_link: Option<String>,
    pub repeat: Option<serde_json::Value>,
}

/// Payload for creating a published event.
///
/// The status is always forced to `planned` by the store regardless of
/// the caller.
#[derive(Debug, Clone)]
pub struct CreateEventData {
    pub fields: EventFields,
    pub request_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_department_id_list_decoding() {
        let event = sample_event(Some("3,7".to_string()));
        assert_eq!(event.department_id_list(), vec![3, 7]);

        let event = sample_event(None);
        assert!(event.department_id_list().is_empty());
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&EventStatus::Planned).unwrap(),
            "\"planned\""
        );
        assert_eq!(
            serde_json::to_string(&EventStatus::Canceled).unwrap(),
            "\"canceled\""
        );
    }

    fn sample_event(department_ids: Option<String>) -> Event {
        Event {
            id: 1,
            title: "Board games night".to_string(),
            date_start: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            date_end: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            time_start: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            time_end: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            place: "Main hall".to_string(),
            format: EventFormat::Open,
            department_id: department_ids
                .as_deref()
                .and_then(|s| s.split(',').next())
                .and_then(|s| s.parse().ok()),
            department_ids,
            labels: None,
            limit_participants: None,
            description: "An evening of board games".to_string(),
            post_link: None,
            reg_link: None,
            responsible_link: None,
            repeat: None,
            status: EventStatus::Planned,
            request_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}
