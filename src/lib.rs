//! EventBoard
//!
//! An event calendar and approval workflow service for an organization's
//! departments. Organizers submit event requests, admins moderate them,
//! and approved requests become published calendar events with
//! time-conflict detection, subscriptions, and notifications.

#![allow(non_snake_case)]

pub mod api;
pub mod config;
pub mod database;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{EventBoardError, Result};

// Re-export main components for easy access
pub use database::DatabaseService;
pub use middleware::auth::{AuthGuard, AuthUser};
pub use services::ServiceFactory;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
