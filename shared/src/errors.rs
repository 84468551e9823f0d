//! Shared error types for the chaos monkey workspace

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SharedError {
    #[error("Invalid duration '{input}': {reason}")]
    InvalidDuration { input: String, reason: String },
}
