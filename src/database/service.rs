//! Database service layer
//!
//! This module aggregates the repositories behind a single handle shared
//! across services and handlers.

use crate::database::{
    DatabasePool, DepartmentRepository, EventChangeLogRepository, EventRepository,
    EventRequestRepository, NotificationRepository, SubscriptionRepository,
};

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pub requests: EventRequestRepository,
    pub events: EventRepository,
    pub departments: DepartmentRepository,
    pub subscriptions: SubscriptionRepository,
    pub change_logs: EventChangeLogRepository,
    pub notifications: NotificationRepository,
    pool: DatabasePool,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            requests: EventRequestRepository::new(pool.clone()),
            events: EventRepository::new(pool.clone()),
            departments: DepartmentRepository::new(pool.clone()),
            subscriptions: SubscriptionRepository::new(pool.clone()),
            change_logs: EventChangeLogRepository::new(pool.clone()),
            notifications: NotificationRepository::new(pool.clone()),
            pool,
        }
    }

    /// Begin a transaction for multi-step workflows
    pub async fn begin(
        &self,
    ) -> Result<sqlx::Transaction<'static, sqlx::Postgres>, crate::utils::errors::EventBoardError>
    {
        Ok(self.pool.begin().await?)
    }
}
