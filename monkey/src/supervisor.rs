//! Runs a disruptor on its own task until shutdown is requested
//!
//! The process entry point hands over a shutdown future (OS signals in
//! production, anything in tests). Whichever finishes first wins: a shutdown
//! cancels the loop and waits for it to wind down, a loop failure is
//! returned to the caller.

use std::future::Future;

use shared::{agent_warn, logging, AgentId};
use tokio_util::sync::CancellationToken;

use crate::core::Disruptor;
use crate::error::MonkeyResult;
use crate::traits::Directory;

/// Drive `disruptor` against `selector` until `shutdown` resolves or the loop fails.
///
/// Shutdown is a normal exit and yields `Ok(())` even when the loop reports
/// an error while winding down.
pub async fn run_until_shutdown<D, S>(mut disruptor: Disruptor<D>, selector: String, shutdown: S) -> MonkeyResult<()>
where
    D: Directory + 'static,
    S: Future<Output = String>,
{
    let cancel = CancellationToken::new();
    let loop_cancel = cancel.clone();
    let mut handle = tokio::spawn(async move { disruptor.run(&loop_cancel, &selector).await });

    tokio::select! {
        reason = shutdown => {
            logging::log_shutdown(AgentId::current(), &reason);
            cancel.cancel();

            match handle.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    agent_warn!(AgentId::current(), "⚠️ Disruption loop failed while shutting down: {}", e);
                }
                Err(e) => {
                    agent_warn!(AgentId::current(), "⚠️ Disruption task did not finish cleanly: {}", e);
                }
            }

            logging::log_success(AgentId::current(), "Pod chaos monkey stopped gracefully");
            Ok(())
        }
        result = &mut handle => {
            result?
        }
    }
}

/// Resolve on SIGINT or SIGTERM, yielding a description of the signal
pub async fn shutdown_signal() -> String {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    result = tokio::signal::ctrl_c() => interrupted(result).await,
                    _ = terminate.recv() => "Received SIGTERM".to_string(),
                }
            }
            Err(e) => {
                logging::log_error(AgentId::current(), "Installing SIGTERM handler", &e);
                interrupted(tokio::signal::ctrl_c().await).await
            }
        }
    }

    #[cfg(not(unix))]
    {
        interrupted(tokio::signal::ctrl_c().await).await
    }
}

async fn interrupted(result: std::io::Result<()>) -> String {
    match result {
        Ok(()) => "Received Ctrl+C signal".to_string(),
        Err(e) => {
            // Without a working signal handler only a loop failure can end the run
            logging::log_error(AgentId::current(), "Signal handling", &e);
            std::future::pending::<String>().await
        }
    }
}
