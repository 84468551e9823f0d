//! Test fixtures and data for disruptor tests

use monkey::{MemoryPod, MonkeyError};

/// Standard test data and fixtures
pub struct TestFixtures;

impl TestFixtures {
    pub const NAMESPACE: &'static str = "workloads";
    pub const SELECTOR: &'static str = "app=nginx";
    pub const DEV_SELECTOR: &'static str = "app=nginx,env=dev";
    pub const SEED: u64 = 0x5eed;

    pub fn pods(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    /// Three dev nginx pods, one prod nginx pod and an unrelated redis pod
    pub fn nginx_fleet() -> Vec<MemoryPod> {
        vec![
            MemoryPod::new("nginx-dev-1").with_label("app", "nginx").with_label("env", "dev"),
            MemoryPod::new("nginx-dev-2").with_label("app", "nginx").with_label("env", "dev"),
            MemoryPod::new("nginx-dev-3").with_label("app", "nginx").with_label("env", "dev"),
            MemoryPod::new("nginx-prod-1").with_label("app", "nginx").with_label("env", "prod"),
            MemoryPod::new("redis-dev-1").with_label("app", "redis").with_label("env", "dev"),
        ]
    }

    pub fn list_error() -> MonkeyError {
        MonkeyError::directory("list", "HTTP 500 Internal Server Error: etcd unavailable")
    }

    pub fn delete_error() -> MonkeyError {
        MonkeyError::directory("delete", "HTTP 403 Forbidden: pods is forbidden")
    }
}
