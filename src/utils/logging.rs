//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the EventBoard application.

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;
use crate::utils::errors::Result;

/// Initialize logging based on configuration
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let file_appender = tracing_appender::rolling::daily(&config.file_path, "eventboard.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking))
        .init();

    info!("Logging initialized with level: {}", config.level);
    Ok(())
}

/// Log request lifecycle actions with structured data
pub fn log_request_action(request_id: i64, action: &str, user_id: Option<i64>, details: Option<&str>) {
    info!(
        request_id = request_id,
        action = action,
        user_id = user_id,
        details = details,
        "Request action performed"
    );
}

/// Log event store actions
pub fn log_event_action(event_id: i64, action: &str, details: Option<&str>) {
    info!(
        event_id = event_id,
        action = action,
        details = details,
        "Event action performed"
    );
}

/// Log moderation decisions
pub fn log_moderation(request_id: i64, status: &str, has_comments: bool) {
    warn!(
        request_id = request_id,
        status = status,
        has_comments = has_comments,
        "Moderation decision applied"
    );
}
