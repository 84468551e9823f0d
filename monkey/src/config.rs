//! Command-line configuration
//!
//! Flags can also come from the environment (and therefore from a `.env`
//! file loaded at startup).

use std::path::PathBuf;

use clap::Parser;
use shared::Period;

use crate::core::VictimPicker;
use crate::error::MonkeyResult;
use crate::services::cluster::{resolve_kubeconfig_path, ClusterConfig};

/// Runs the pod resiliency tests
#[derive(Parser, Debug, Clone)]
#[command(name = "pod-chaos-monkey")]
#[command(about = "Runs the pod resiliency tests")]
#[command(after_help = "Example: pod-chaos-monkey workloads --local --selector app=nginx,env=dev --interval 10s")]
pub struct Args {
    /// Namespace whose pods may be deleted
    pub namespace: String,

    /// Flags whether this program is running locally (kubeconfig instead of in-cluster credentials)
    #[arg(long, env = "CHAOS_LOCAL")]
    pub local: bool,

    /// Restricts the test scope to the pods matching the selector
    #[arg(long, env = "CHAOS_SELECTOR", default_value = "")]
    pub selector: String,

    /// Time interval between pod deletions
    #[arg(long, env = "CHAOS_INTERVAL", default_value = "10s", allow_hyphen_values = true)]
    pub interval: Period,

    /// Kubeconfig to use when running locally (defaults to $KUBECONFIG or ~/.kube/config)
    #[arg(long, env = "CHAOS_KUBECONFIG", requires = "local")]
    pub kubeconfig: Option<PathBuf>,

    /// Talk to this API server without credentials, e.g. a `kubectl proxy` endpoint
    #[arg(long, env = "CHAOS_API_SERVER", requires = "local")]
    pub api_server: Option<String>,

    /// Seed for victim selection, for reproducible runs
    #[arg(long, env = "CHAOS_SEED")]
    pub seed: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// Where the cluster connection comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    /// Service account of the pod we run in
    InCluster,
    /// Local kubeconfig file
    Kubeconfig(PathBuf),
    /// Bare API server URL
    ApiServer(String),
}

impl Backend {
    pub fn cluster_config(&self) -> MonkeyResult<ClusterConfig> {
        match self {
            Backend::InCluster => ClusterConfig::in_cluster(),
            Backend::Kubeconfig(path) => ClusterConfig::from_kubeconfig(path),
            Backend::ApiServer(url) => ClusterConfig::from_api_server(url),
        }
    }
}

impl Args {
    /// Pick the directory backend from `--local` and its companions
    pub fn backend(&self) -> MonkeyResult<Backend> {
        if !self.local {
            return Ok(Backend::InCluster);
        }

        match &self.api_server {
            Some(url) => Ok(Backend::ApiServer(url.clone())),
            None => Ok(Backend::Kubeconfig(resolve_kubeconfig_path(self.kubeconfig.as_deref())?)),
        }
    }

    /// Victim picker honoring `--seed`
    pub fn picker(&self) -> VictimPicker {
        match self.seed {
            Some(seed) => VictimPicker::seeded(seed),
            None => VictimPicker::from_entropy(),
        }
    }
}
