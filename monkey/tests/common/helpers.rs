//! Test helpers and scripted doubles for disruptor tests

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use monkey::{Directory, Disruptor, MonkeyError, MonkeyResult, VictimPicker};

use super::fixtures::TestFixtures;

/// A directory call as observed by [`ScriptedDirectory`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List(String),
    Remove(String),
}

#[derive(Debug, Default)]
struct Script {
    lists: VecDeque<MonkeyResult<Vec<String>>>,
    removals: VecDeque<MonkeyResult<()>>,
    calls: Vec<Call>,
}

/// Directory double that replays scripted answers.
///
/// Once the list script runs out, `list` blocks until the caller's token is
/// cancelled and then reports [`MonkeyError::Cancelled`], like a watch on a
/// real cluster would. Removals default to success. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDirectory {
    script: Arc<Mutex<Script>>,
}

impl ScriptedDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then_list(self, result: MonkeyResult<Vec<String>>) -> Self {
        self.script.lock().unwrap().lists.push_back(result);
        self
    }

    pub fn then_remove(self, result: MonkeyResult<()>) -> Self {
        self.script.lock().unwrap().removals.push_back(result);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.script.lock().unwrap().calls.clone()
    }

    pub fn removals(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Remove(name) => Some(name),
                Call::List(_) => None,
            })
            .collect()
    }
}

#[async_trait]
impl Directory for ScriptedDirectory {
    async fn list(&self, cancel: &CancellationToken, selector: &str) -> MonkeyResult<Vec<String>> {
        let next = {
            let mut script = self.script.lock().unwrap();
            script.calls.push(Call::List(selector.to_string()));
            script.lists.pop_front()
        };

        match next {
            Some(result) => result,
            None => {
                cancel.cancelled().await;
                Err(MonkeyError::Cancelled)
            }
        }
    }

    async fn remove(&self, _cancel: &CancellationToken, name: &str) -> MonkeyResult<()> {
        let mut script = self.script.lock().unwrap();
        script.calls.push(Call::Remove(name.to_string()));
        script.removals.pop_front().unwrap_or(Ok(()))
    }
}

/// Common helpers to cut test boilerplate
pub struct TestHelpers;

impl TestHelpers {
    /// Disruptor with a fixed seed so selection is reproducible
    pub fn seeded_disruptor<D: Directory + 'static>(directory: D, period: chrono::Duration) -> Disruptor<D> {
        Disruptor::new(directory, period)
            .expect("non-negative period")
            .with_picker(VictimPicker::seeded(TestFixtures::SEED))
    }

    /// Poll `condition` every millisecond until it holds or five seconds pass
    pub async fn wait_until<F>(mut condition: F)
    where
        F: FnMut() -> bool,
    {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        while !condition() {
            assert!(tokio::time::Instant::now() < deadline, "condition not met within 5s");
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    }
}
