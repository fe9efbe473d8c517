//! Event request model
//!
//! An `EventRequest` is the proposal form of an event: it carries a full
//! duplicate snapshot of the event fields plus the moderation workflow
//! state, and an optional soft link to the event it materialized into.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::event::{EventFields, EventFormat};
use crate::utils::helpers;

/// Moderation status of an event request.
///
/// Transitions: `draft -> pending -> {approved | needsWork | rejected}`,
/// `needsWork -> pending` on resubmit, `approved -> pending` when a
/// non-admin edit reopens the request. Admin-authored requests may start
/// directly at `approved`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "event_request_status", rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub enum RequestStatus {
    Draft,
    Pending,
    NeedsWork,
    Rejected,
    Approved,
}

impl RequestStatus {
    /// Whether `submit` moves this request to `pending`.
    ///
    /// Any other status makes submit a no-op returning the current state.
    pub fn can_submit(self) -> bool {
        matches!(self, RequestStatus::Draft | RequestStatus::NeedsWork)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RequestStatus::Draft => "draft",
            RequestStatus::Pending => "pending",
            RequestStatus::NeedsWork => "needsWork",
            RequestStatus::Rejected => "rejected",
            RequestStatus::Approved => "approved",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct EventRequest {
    pub id: i64,
    pub event_id: Option<i64>,
    pub status: RequestStatus,
    pub comments: Option<String>,
    pub revision_snapshot: Option<serde_json::Value>,
    pub organizer_id: i64,
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
    pub has_conflict: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EventRequest {
    /// Resolved department id list (delimited column form decoded)
    pub fn department_id_list(&self) -> Vec<i64> {
        helpers::parse_id_list(self.department_ids.as_deref())
    }

    /// Extract the event-field snapshot for materializing or syncing the
    /// linked event
    pub fn event_fields(&self) -> EventFields {
        EventFields {
            title: self.title.clone(),
            date_start: self.date_start,
            date_end: self.date_end,
            time_start: self.time_start,
            time_end: self.time_end,
            place: self.place.clone(),
            format: self.format,
            department_id: helpers::primary_department_id(
                &self.department_id_list(),
                self.department_id,
            ),
            department_ids: self.department_ids.clone(),
            labels: self.labels.clone(),
            limit_participants: self.limit_participants,
            description: self.description.clone(),
            post_link: self.post_link.clone(),
            reg_link: self.reg_link.clone(),
            responsible_link: self.responsible_link.clone(),
            repeat: self.repeat.clone(),
        }
    }
}

/// Payload for creating an event request
#[derive(Debug, Clone)]
pub struct CreateEventRequestData {
    pub organizer_id: i64,
    pub title: String,
    pub date_start: NaiveDate,
    pub date_end: NaiveDate,
    pub time_start: NaiveTime,
    pub time_end: NaiveTime,
    pub place: String,
    pub format: EventFormat,
    pub department_id: Option<i64>,
    pub department_ids: Option<Vec<i64>>,
    pub labels: Vec<String>,
    pub limit_participants: Option<i32>,
    pub description: String,
    pub post_link: Option<String>,
    pub reg_link: Option<String>,
    pub responsible_link: Option<String>,
    pub repeat: Option<serde_json::Value>,
}

impl CreateEventRequestData {
    /// Normalize the department pair: the scalar cache is the first list
    /// element, or the provided scalar when no list was given.
    pub fn normalized_departments(&self) -> (Option<i64>, Option<String>) {
        match &self.department_ids {
            Some(ids) => (
                helpers::primary_department_id(ids, self.department_id),
                helpers::join_id_list(ids),
            ),
            None => (
                self.department_id,
                self.department_id.map(|id| id.to_string()),
            ),
        }
    }
}

/// Partial patch for an event request.
///
/// Absent fields are left untouched. `department_ids` carries explicit
/// clear semantics: an empty list nulls both department columns.
#[derive(Debug, Clone, Default)]
pub struct UpdateEventRequestData {
    pub status: Option<RequestStatus>,
    pub title: Option<String>,
    pub date_start: Option<NaiveDate>,
    pub date_end: Option<NaiveDate>,
    pub time_start: Option<NaiveTime>,
    pub time_end: Option<NaiveTime>,
    pub place: Option<String>,
    pub format: Option<EventFormat>,
    pub department_ids: Option<Vec<i64>>,
    pub labels: Option<Vec<String>>,
    pub limit_participants: Option<i32>,
    pub description: Option<String>,
    pub post_link: Option<String>,
    pub reg_link: Option<String>,
    pub responsible_link: Option<String>,
    pub repeat: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_submit() {
        assert!(RequestStatus::Draft.can_submit());
        assert!(RequestStatus::NeedsWork.can_submit());
        assert!(!RequestStatus::Pending.can_submit());
        assert!(!RequestStatus::Approved.can_submit());
        assert!(!RequestStatus::Rejected.can_submit());
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&RequestStatus::NeedsWork).unwrap(),
            "\"needsWork\""
        );
        assert_eq!(
            serde_json::from_str::<RequestStatus>("\"approved\"").unwrap(),
            RequestStatus::Approved
        );
    }

    #[test]
    fn test_department_normalization_from_list() {
        let data = sample_create(Some(vec![3, 7]), None);
        assert_eq!(data.normalized_departments(), (Some(3), Some("3,7".to_string())));
    }

    #[test]
    fn test_department_normalization_from_scalar() {
        let data = sample_create(None, Some(5));
        assert_eq!(data.normalized_departments(), (Some(5), Some("5".to_string())));
    }

    #[test]
    fn test_department_normalization_empty_list() {
        let data = sample_create(Some(vec![]), None);
        assert_eq!(data.normalized_departments(), (None, None));
    }

    fn sample_create(
        department_ids: Option<Vec<i64>>,
        department_id: Option<i64>,
    ) -> CreateEventRequestData {
        CreateEventRequestData {
            organizer_id: 1,
            title: "Chess tournament".to_string(),
            date_start: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            date_end: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            time_start: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            time_end: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            place: "Room 101".to_string(),
            format: EventFormat::Open,
            department_id,
            department_ids,
            labels: vec![],
            limit_participants: None,
            description: "Open chess tournament".to_string(),
            post_link: None,
            reg_link: None,
            responsible_link: None,
            repeat: None,
        }
    }
}
