//! Trait definitions with mockall annotations for testing
//!
//! The disruptor never talks to an orchestration platform directly. It goes
//! through [`Directory`], which any backend (a real cluster, an in-memory
//! pool, a scripted fake) can implement.

use tokio_util::sync::CancellationToken;

use crate::error::MonkeyResult;

/// Workload directory abstraction for dependency injection
///
/// Exposes the pool of currently running units that may be disrupted. Both
/// calls receive the disruptor's cancellation token so a backend whose I/O is
/// cancellable can abort early once shutdown has been requested.
#[mockall::automock]
#[async_trait::async_trait]
pub trait Directory: Send + Sync {
    /// List every eligible unit matching an opaque selector
    ///
    /// # Parameters
    /// - `cancel`: Cancellation token of the calling loop
    /// - `selector`: Filter expression, passed through untouched
    ///
    /// # Returns
    /// Identifiers in backend order; an empty vector is a valid answer
    async fn list(&self, cancel: &CancellationToken, selector: &str) -> MonkeyResult<Vec<String>>;

    /// Remove exactly the named unit
    ///
    /// Removal of a unit that is already gone may fail; callers must not
    /// assume idempotency.
    async fn remove(&self, cancel: &CancellationToken, name: &str) -> MonkeyResult<()>;
}
