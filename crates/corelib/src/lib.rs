//! Core library for topology-aware replica placement.
//!
//! This crate provides the fundamental abstractions shared by placement code:
//! - Endpoint identity of peers
//! - Node metadata (data center, rack)
//! - Candidate pools grouped by failure domain
//! - Cluster topology snapshots

pub mod error;
pub mod network;
pub mod node;
pub mod topology;

pub use error::{Error, Result};
pub use network::Endpoint;
pub use node::Node;
pub use topology::{CandidatePool, FailureDomain, Topology};
