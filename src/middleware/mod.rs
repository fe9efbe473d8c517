//! Middleware module
//!
//! Request-level concerns applied ahead of the handlers

pub mod auth;

pub use auth::{AuthGuard, AuthUser};
