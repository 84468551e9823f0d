//! Pod chaos monkey library
//!
//! Periodically deletes one randomly chosen pod from the set matching a label
//! selector, so the surrounding orchestration can prove it recovers from
//! unplanned losses. The loop lives in [`Disruptor`]; the platform is reached
//! through the [`Directory`] trait.

pub mod config;
pub mod core;
pub mod error;
pub mod services;
pub mod supervisor;
pub mod traits;

// Re-export commonly used types
pub use crate::core::{Disruptor, VictimPicker};
pub use config::{Args, Backend};
pub use error::{MonkeyError, MonkeyResult};
pub use services::{ClusterConfig, InMemoryDirectory, KubernetesDirectory, MemoryPod};
pub use supervisor::{run_until_shutdown, shutdown_signal};
pub use traits::{Directory, MockDirectory};
