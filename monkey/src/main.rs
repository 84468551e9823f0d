//! Entry point for the pod-chaos-monkey binary
//!
//! Wires the Kubernetes directory into a disruptor and runs it until SIGINT
//! or SIGTERM arrives (exit 0) or the loop fails (exit 1).

use std::process::ExitCode;

use clap::Parser;

use monkey::{run_until_shutdown, shutdown_signal, Args, Disruptor, KubernetesDirectory, MonkeyResult};
use shared::{agent_debug, agent_error, logging, AgentId};

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine
    let _ = dotenv::dotenv();

    let args = Args::parse();

    AgentId::init(&args.namespace);
    logging::init_tracing_with_level(Some(&args.log_level));

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            agent_error!(AgentId::current(), error = %e, "❌ Pod chaos monkey stopped: {}", e);
            // Logs go to stdout
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> MonkeyResult<()> {
    logging::log_startup(
        AgentId::current(),
        &format!("pod chaos monkey for namespace '{}'", args.namespace),
    );

    let backend = args.backend()?;
    agent_debug!(AgentId::current(), "🔌 Cluster backend: {:?}", backend);

    let cluster = backend.cluster_config()?;
    let directory = KubernetesDirectory::new(&cluster, args.namespace.clone())?;
    let disruptor = Disruptor::new(directory, args.interval.into())?.with_picker(args.picker());

    run_until_shutdown(disruptor, args.selector, shutdown_signal()).await
}
