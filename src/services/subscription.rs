//! Subscription service implementation
//!
//! Thin wrapper over subscription bookkeeping. The interesting part of
//! the subscription lifecycle is its cascade deletion, which belongs to
//! the event store.

use tracing::info;

use crate::database::DatabaseService;
use crate::models::subscription::Subscription;
use crate::utils::errors::Result;

#[derive(Debug, Clone)]
pub struct SubscriptionService {
    db: DatabaseService,
}

impl SubscriptionService {
    pub fn new(db: DatabaseService) -> Self {
        Self { db }
    }

    /// Subscribe a user to an event (idempotent)
    pub async fn subscribe(&self, user_id: i64, event_id: i64) -> Result<Subscription> {
        let subscription = self.db.subscriptions.subscribe(user_id, event_id).await?;
        info!(user_id = user_id, event_id = event_id, "User subscribed to event");

        Ok(subscription)
    }

    /// Remove a user's subscription
    pub async fn unsubscribe(&self, user_id: i64, event_id: i64) -> Result<()> {
        self.db.subscriptions.unsubscribe(user_id, event_id).await?;
        info!(user_id = user_id, event_id = event_id, "User unsubscribed from event");

        Ok(())
    }

    /// List a user's subscriptions
    pub async fn find_for_user(&self, user_id: i64) -> Result<Vec<Subscription>> {
        self.db.subscriptions.find_by_user(user_id).await
    }
}
