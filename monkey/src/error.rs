//! Chaos monkey error types

use shared::Period;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MonkeyError {
    #[error("period cannot be negative: {period}")]
    NegativePeriod { period: Period },

    #[error("cannot {operation} pods: {message}")]
    Directory { operation: String, message: String },

    #[error("cannot delete pod: {name} not found")]
    NotFound { name: String },

    #[error("directory call cancelled")]
    Cancelled,

    #[error("Cluster configuration error: {message}")]
    ClusterConfig { message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Task join error: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl MonkeyError {
    pub fn config(message: impl Into<String>) -> Self {
        MonkeyError::ClusterConfig {
            message: message.into(),
        }
    }

    pub fn directory(operation: impl Into<String>, message: impl Into<String>) -> Self {
        MonkeyError::Directory {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// True when a directory call gave up because its cancellation token fired
    pub fn is_cancelled(&self) -> bool {
        matches!(self, MonkeyError::Cancelled)
    }
}

pub type MonkeyResult<T> = Result<T, MonkeyError>;
