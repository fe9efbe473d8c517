//! Subscription and change-log models
//!
//! Both hang off a published event and are deleted ahead of it in the
//! remove cascade.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: i64,
    pub user_id: i64,
    pub event_id: i64,
    pub subscribed_at: DateTime<Utc>,
}

/// Audit record of a change applied to a published event.
///
/// `changes` is an opaque `{field: {old, new}}` blob.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct EventChangeLog {
    pub id: i64,
    pub event_id: i64,
    pub changes: serde_json::Value,
    pub user_id: Option<i64>,
    pub timestamp: DateTime<Utc>,
}
