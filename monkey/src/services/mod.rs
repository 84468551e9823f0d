//! Directory implementations
//!
//! `KubernetesDirectory` is the production backend; `InMemoryDirectory`
//! serves tests and offline runs.

pub mod cluster;
pub mod kubernetes;
pub mod memory;

#[cfg(test)]
mod tests;

// Re-export all service implementations
pub use cluster::{resolve_kubeconfig_path, ClusterConfig, SERVICE_ACCOUNT_DIR};
pub use kubernetes::KubernetesDirectory;
pub use memory::{InMemoryDirectory, MemoryPod};
