//! Shared building blocks for the pod chaos monkey
//!
//! Holds the pieces every crate in the workspace leans on: agent identity,
//! the signed `Period` type, shared errors and tracing setup.

pub mod errors;
pub mod logging;
pub mod types;

pub use errors::*;
pub use types::*;
