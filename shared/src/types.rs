//! Core shared types and identifiers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::errors::SharedError;

/// Global agent identity - set once at startup
static AGENT_ID: OnceLock<AgentId> = OnceLock::new();

/// Identity of the running chaos agent, used to tag every log line
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentId {
    namespace: Option<String>,
}

impl AgentId {
    /// Initialize the global agent identity for the namespace under test
    pub fn init(namespace: &str) -> &'static AgentId {
        AGENT_ID.get_or_init(|| AgentId {
            namespace: Some(namespace.to_string()),
        })
    }

    /// Get the global agent identity; unscoped until `init` has run
    pub fn current() -> &'static AgentId {
        AGENT_ID.get_or_init(|| AgentId { namespace: None })
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(namespace) => write!(f, "chaos-monkey@{namespace}"),
            None => write!(f, "chaos-monkey"),
        }
    }
}

/// Signed wait duration between disruption attempts.
///
/// Parses human-readable durations (`10s`, `1m30s`, `250ms`) with an optional
/// leading `-`. Negative values parse successfully so that whoever consumes
/// the period gets to decide whether to reject them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Period(chrono::Duration);

impl Period {
    pub fn new(duration: chrono::Duration) -> Self {
        Self(duration)
    }

    pub fn as_duration(&self) -> chrono::Duration {
        self.0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < chrono::Duration::zero()
    }
}

impl From<Period> for chrono::Duration {
    fn from(period: Period) -> Self {
        period.0
    }
}

impl FromStr for Period {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        let (negative, magnitude) = match input.strip_prefix('-') {
            Some(rest) => (true, rest.trim_start()),
            None => (false, input),
        };

        let parsed = humantime::parse_duration(magnitude).map_err(|e| SharedError::InvalidDuration {
            input: s.to_string(),
            reason: e.to_string(),
        })?;
        let duration = chrono::Duration::from_std(parsed).map_err(|e| SharedError::InvalidDuration {
            input: s.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self(if negative { -duration } else { duration }))
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (sign, magnitude) = if self.is_negative() { ("-", -self.0) } else { ("", self.0) };
        match magnitude.to_std() {
            Ok(std) => write!(f, "{sign}{}", humantime::format_duration(std)),
            Err(_) => write!(f, "{sign}{}ms", magnitude.num_milliseconds()),
        }
    }
}
