//! Services module
//!
//! This module contains business logic services

pub mod conflict;
pub mod department;
pub mod event;
pub mod notification;
pub mod request;
pub mod subscription;

// Re-export commonly used services
pub use department::DepartmentService;
pub use event::{EventService, EventWithDepartments};
pub use notification::NotificationService;
pub use request::{
    ConflictingEvent, CreatedRequest, ModerationOutcome, RequestService, RequestView,
    SubmitOutcome,
};
pub use subscription::SubscriptionService;

use crate::database::DatabaseService;

/// Service factory for creating and managing all services
#[derive(Debug, Clone)]
pub struct ServiceFactory {
    pub request_service: RequestService,
    pub event_service: EventService,
    pub department_service: DepartmentService,
    pub notification_service: NotificationService,
    pub subscription_service: SubscriptionService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(db: DatabaseService) -> Self {
        let department_service = DepartmentService::new(db.clone());
        let event_service = EventService::new(db.clone(), department_service.clone());
        let notification_service = NotificationService::new(db.clone());
        let subscription_service = SubscriptionService::new(db.clone());
        let request_service = RequestService::new(
            db,
            event_service.clone(),
            department_service.clone(),
            notification_service.clone(),
        );

        Self {
            request_service,
            event_service,
            department_service,
            notification_service,
            subscription_service,
        }
    }
}
