//! Notification service implementation
//!
//! Thin wrapper over the notifications table: the lifecycle engine calls
//! it after moderation decisions, and the API exposes per-user queries.
//! Delivery is storage-only; there is no push channel.

use serde_json::json;
use tracing::{debug, info};

use crate::database::DatabaseService;
use crate::models::notification::{Notification, NotificationType};
use crate::models::request::RequestStatus;
use crate::utils::errors::Result;

#[derive(Debug, Clone)]
pub struct NotificationService {
    db: DatabaseService,
}

impl NotificationService {
    pub fn new(db: DatabaseService) -> Self {
        Self { db }
    }

    /// Create a notification for a user
    pub async fn create(
        &self,
        user_id: i64,
        kind: NotificationType,
        message: &str,
        metadata: Option<&serde_json::Value>,
    ) -> Result<Notification> {
        let notification = self.db.notifications.create(user_id, kind, message, metadata).await?;
        debug!(user_id = user_id, notification_id = notification.id, "Notification created");

        Ok(notification)
    }

    /// Notify an organizer about a moderation outcome.
    ///
    /// Statuses without a user-facing outcome produce no notification.
    pub async fn notify_moderation(
        &self,
        organizer_id: i64,
        request_id: i64,
        status: RequestStatus,
        comments: Option<&str>,
    ) -> Result<Option<Notification>> {
        let (kind, message) = match status {
            RequestStatus::Approved => (
                NotificationType::Approval,
                "Your event request has been approved".to_string(),
            ),
            RequestStatus::Rejected => (
                NotificationType::Rejection,
                match comments {
                    Some(reason) => format!("Your event request was rejected: {}", reason),
                    None => "Your event request was rejected".to_string(),
                },
            ),
            RequestStatus::NeedsWork => (
                NotificationType::Comment,
                match comments {
                    Some(comment) => format!("Your event request needs work: {}", comment),
                    None => "Your event request needs work".to_string(),
                },
            ),
            _ => return Ok(None),
        };

        let metadata = json!({ "requestId": request_id });
        let notification = self
            .create(organizer_id, kind, &message, Some(&metadata))
            .await?;
        info!(
            organizer_id = organizer_id,
            request_id = request_id,
            status = status.as_str(),
            "Moderation notification sent"
        );

        Ok(Some(notification))
    }

    /// List a user's notifications, newest first
    pub async fn find_for_user(&self, user_id: i64) -> Result<Vec<Notification>> {
        self.db.notifications.find_by_user(user_id).await
    }

    /// Count a user's unread notifications
    pub async fn unread_count(&self, user_id: i64) -> Result<i64> {
        self.db.notifications.unread_count(user_id).await
    }

    /// Mark one notification as read
    pub async fn mark_read(&self, id: i64) -> Result<()> {
        self.db.notifications.mark_read(id).await
    }

    /// Mark all of a user's notifications as read
    pub async fn mark_all_read(&self, user_id: i64) -> Result<()> {
        self.db.notifications.mark_all_read(user_id).await
    }
}
