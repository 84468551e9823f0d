//! The disruption loop
//!
//! On every period the disruptor lists the candidate pods, picks one victim
//! uniformly at random and removes it. Cancellation is checked before each
//! wait; a failed directory call ends the loop.

use std::time::Duration;

use shared::{agent_debug, agent_info, AgentId, Period};
use tokio_util::sync::CancellationToken;

use crate::core::selection::VictimPicker;
use crate::error::{MonkeyError, MonkeyResult};
use crate::traits::Directory;

/// Deletes a single victim from the directory's candidate set at a regular interval
#[derive(Debug)]
pub struct Disruptor<D>
where
    D: Directory + 'static,
{
    directory: D,
    period: Duration,
    picker: VictimPicker,
}

impl<D> Disruptor<D>
where
    D: Directory + 'static,
{
    /// Create a disruptor bound to a directory and a fixed period.
    ///
    /// A zero period is valid; negative periods are rejected.
    pub fn new(directory: D, period: chrono::Duration) -> MonkeyResult<Self> {
        let period = period.to_std().map_err(|_| MonkeyError::NegativePeriod {
            period: Period::new(period),
        })?;

        Ok(Self {
            directory,
            period,
            picker: VictimPicker::from_entropy(),
        })
    }

    /// Replace the selection policy, typically with a seeded one
    pub fn with_picker(mut self, picker: VictimPicker) -> Self {
        self.picker = picker;
        self
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    /// Run the disruption loop until `cancel` fires or a directory call fails.
    ///
    /// Returns `Ok(())` on cancellation. Errors from `list` or `remove` are
    /// returned as-is; there is no retry.
    pub async fn run(&mut self, cancel: &CancellationToken, selector: &str) -> MonkeyResult<()> {
        agent_info!(
            AgentId::current(),
            "🐒 Disrupting pods matching '{}' every {:?}",
            selector,
            self.period
        );

        loop {
            tokio::select! {
                // Cancellation is polled first so a simultaneous tick never
                // buys one more disruption.
                biased;

                _ = cancel.cancelled() => {
                    agent_debug!(AgentId::current(), "🛑 Disruption loop cancelled");
                    return Ok(());
                }
                _ = tokio::time::sleep(self.period) => {}
            }

            match self.disrupt_once(cancel, selector).await {
                Ok(()) => {}
                Err(e) if e.is_cancelled() && cancel.is_cancelled() => {
                    agent_debug!(AgentId::current(), "🛑 In-flight directory call aborted by cancellation");
                    return Ok(());
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// One Listing → Selecting → Removing pass
    async fn disrupt_once(&mut self, cancel: &CancellationToken, selector: &str) -> MonkeyResult<()> {
        let candidates = self.directory.list(cancel, selector).await?;

        let Some(victim) = self.picker.pick(&candidates) else {
            agent_debug!(AgentId::current(), "🔍 No pods match '{}', nothing to disrupt", selector);
            return Ok(());
        };

        agent_info!(
            AgentId::current(),
            "💀 Deleting pod {} ({} candidates)",
            victim,
            candidates.len()
        );
        self.directory.remove(cancel, victim).await?;
        agent_debug!(AgentId::current(), "✅ Pod {} deleted", victim);

        Ok(())
    }
}
