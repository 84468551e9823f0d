//! Service-specific tests
//!
//! Each directory backend and the cluster configuration loader has its own
//! test file.

mod kubernetes;

// Common test utilities for services
pub mod common {
    use std::time::Duration;
    use tokio::time::timeout;

    /// Standard timeout for async operations in tests
    pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

    /// Helper to run async operations with timeout
    pub async fn with_timeout<T, F>(future: F) -> Result<T, tokio::time::error::Elapsed>
    where
        F: std::future::Future<Output = T>,
    {
        timeout(TEST_TIMEOUT, future).await
    }
}
