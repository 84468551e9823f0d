//! Common test utilities and infrastructure
//!
//! Shared fixtures and helpers used across the monkey integration suites.

#![allow(dead_code)]

pub mod fixtures;
pub mod helpers;

// Re-export commonly used items for convenience
pub use fixtures::TestFixtures;
pub use helpers::{Call, ScriptedDirectory, TestHelpers};
