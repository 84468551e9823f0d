//! Shared logging utilities for consistent tracing across the agent

use crate::types::AgentId;
use chrono::{DateTime, Utc};
use tracing::{error, info};

/// Crates whose events are shown at the requested level
const AGENT_TARGETS: &[&str] = &["monkey", "pod_chaos_monkey", "shared"];

/// Build the filter directive for the given base level
pub fn filter_directive(log_level: Option<&str>) -> String {
    let base_level = log_level.unwrap_or("info");

    let mut directives: Vec<String> = AGENT_TARGETS
        .iter()
        .map(|target| format!("{target}={base_level}"))
        .collect();
    directives.push("reqwest=warn".to_string());
    directives.push("hyper=warn".to_string());
    directives.join(",")
}

/// Initialize tracing subscriber with an optional log level.
///
/// `RUST_LOG` takes precedence over the level when it is set.
pub fn init_tracing_with_level(log_level: Option<&str>) {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(log_level)));

    fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}

/// Get formatted timestamp for consistent logging
pub fn format_timestamp() -> String {
    let now: DateTime<Utc> = Utc::now();
    now.format("%H:%M:%S%.3f").to_string()
}

/// Macro for agent-aware info logging
#[macro_export]
macro_rules! agent_info {
    ($agent_id:expr, $($arg:tt)*) => {
        tracing::info!(
            agent = %$agent_id,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for agent-aware warning logging
#[macro_export]
macro_rules! agent_warn {
    ($agent_id:expr, $($arg:tt)*) => {
        tracing::warn!(
            agent = %$agent_id,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for agent-aware error logging
#[macro_export]
macro_rules! agent_error {
    ($agent_id:expr, $($arg:tt)*) => {
        tracing::error!(
            agent = %$agent_id,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for agent-aware debug logging
#[macro_export]
macro_rules! agent_debug {
    ($agent_id:expr, $($arg:tt)*) => {
        tracing::debug!(
            agent = %$agent_id,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Contextual logging helper for startup messages
pub fn log_startup(agent_id: &AgentId, details: &str) {
    info!(
        agent = %agent_id,
        timestamp = format_timestamp(),
        "🚀 Starting {}",
        details
    );
}

/// Contextual logging helper for shutdown messages
pub fn log_shutdown(agent_id: &AgentId, reason: &str) {
    info!(
        agent = %agent_id,
        timestamp = format_timestamp(),
        "🛑 Shutting down: {}",
        reason
    );
}

/// Contextual logging helper for error conditions
pub fn log_error(agent_id: &AgentId, context: &str, error: &dyn std::fmt::Display) {
    error!(
        agent = %agent_id,
        timestamp = format_timestamp(),
        error = %error,
        "❌ {} failed: {}",
        context,
        error
    );
}

/// Contextual logging helper for success conditions
pub fn log_success(agent_id: &AgentId, message: &str) {
    info!(
        agent = %agent_id,
        timestamp = format_timestamp(),
        "✅ {}",
        message
    );
}
