//! mac-sweeper - A macOS disk cleanup and maintenance utility
//!
//! This crate provides functionality for:
//! - Emptying caches, logs and the trash without touching protected paths
//! - Reporting large and long-unmodified files
//! - Removing leftovers of uninstalled applications
//! - Small maintenance tasks (purge memory, flush DNS, disk usage)

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod menu;
pub mod sweep;
pub mod system;

// Re-export commonly used types
pub use config::Config;
pub use error::{Result, SweeperError};
pub use sweep::{sweep, ExclusionSet, SweepResult, SweepTarget};
