//! CLI tool for inspecting batchlog replica placement.
//!
//! Provides commands for:
//! - Choosing batchlog replicas for a topology snapshot
//! - Sampling many placements to see how load spreads over racks
//! - Inspecting the candidate pool a coordinator would see

pub mod commands;
pub mod config;

pub use commands::{Command, CommandResult, TopologyFile};
pub use config::CliConfig;
