//! In-memory pod directory
//!
//! Holds a labelled pod pool and answers equality-based label selectors the
//! way the Kubernetes API does (`app=nginx,env!=prod,tier,!canary`). Useful
//! as a test double and for dry runs without a cluster.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use crate::error::{MonkeyError, MonkeyResult};
use crate::traits::Directory;

/// A pod as seen by the in-memory directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryPod {
    pub name: String,
    pub labels: BTreeMap<String, String>,
}

impl MemoryPod {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            labels: BTreeMap::new(),
        }
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Requirement {
    Equals(String, String),
    NotEquals(String, String),
    Exists(String),
    DoesNotExist(String),
}

impl Requirement {
    fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
        match self {
            Requirement::Equals(key, value) => labels.get(key) == Some(value),
            Requirement::NotEquals(key, value) => labels.get(key) != Some(value),
            Requirement::Exists(key) => labels.contains_key(key),
            Requirement::DoesNotExist(key) => !labels.contains_key(key),
        }
    }
}

/// Parse an equality-based label selector; set-based syntax is rejected
fn parse_selector(selector: &str) -> MonkeyResult<Vec<Requirement>> {
    let invalid = |term: &str| MonkeyError::directory("list", format!("invalid label selector term '{term}'"));

    if selector.contains('(') {
        return Err(MonkeyError::directory(
            "list",
            format!("set-based label selectors are not supported: '{selector}'"),
        ));
    }

    let mut requirements = Vec::new();
    for term in selector.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let requirement = if let Some((key, value)) = term.split_once("!=") {
            Requirement::NotEquals(key.trim().to_string(), value.trim().to_string())
        } else if let Some((key, value)) = term.split_once("==") {
            Requirement::Equals(key.trim().to_string(), value.trim().to_string())
        } else if let Some((key, value)) = term.split_once('=') {
            Requirement::Equals(key.trim().to_string(), value.trim().to_string())
        } else if let Some(key) = term.strip_prefix('!') {
            Requirement::DoesNotExist(key.trim().to_string())
        } else {
            Requirement::Exists(term.to_string())
        };

        let key = match &requirement {
            Requirement::Equals(key, _)
            | Requirement::NotEquals(key, _)
            | Requirement::Exists(key)
            | Requirement::DoesNotExist(key) => key,
        };
        if key.is_empty() || key.contains(char::is_whitespace) {
            return Err(invalid(term));
        }
        requirements.push(requirement);
    }

    Ok(requirements)
}

/// Directory over a pod pool kept in process memory
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    pods: RwLock<Vec<MemoryPod>>,
    removed: RwLock<Vec<String>>,
}

impl InMemoryDirectory {
    pub fn new(pods: Vec<MemoryPod>) -> Self {
        Self {
            pods: RwLock::new(pods),
            removed: RwLock::new(Vec::new()),
        }
    }

    /// Add a pod to the pool, e.g. to simulate the orchestrator replacing a victim
    pub async fn insert(&self, pod: MemoryPod) {
        self.pods.write().await.push(pod);
    }

    /// Names of the pods currently in the pool
    pub async fn names(&self) -> Vec<String> {
        self.pods.read().await.iter().map(|p| p.name.clone()).collect()
    }

    /// Names removed so far, oldest first
    pub async fn removed(&self) -> Vec<String> {
        self.removed.read().await.clone()
    }
}

#[async_trait]
impl Directory for InMemoryDirectory {
    async fn list(&self, _cancel: &CancellationToken, selector: &str) -> MonkeyResult<Vec<String>> {
        let requirements = parse_selector(selector)?;
        let pods = self.pods.read().await;

        Ok(pods
            .iter()
            .filter(|pod| requirements.iter().all(|r| r.matches(&pod.labels)))
            .map(|pod| pod.name.clone())
            .collect())
    }

    async fn remove(&self, _cancel: &CancellationToken, name: &str) -> MonkeyResult<()> {
        let mut pods = self.pods.write().await;
        let index = pods
            .iter()
            .position(|pod| pod.name == name)
            .ok_or_else(|| MonkeyError::NotFound {
                name: name.to_string(),
            })?;

        pods.remove(index);
        self.removed.write().await.push(name.to_string());
        Ok(())
    }
}
