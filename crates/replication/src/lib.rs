//! Replica placement for batchlog entries.
//!
//! This crate chooses which peers hold a coordinator's batchlog entry:
//! - How many replicas to write (a small fixed target)
//! - Which racks to spread them over
//! - What to do when there are not enough live peers
//!
//! Liveness and randomness are injected through the [`Validity`] and
//! [`RandomSource`] traits so placements can be reproduced in tests.

pub mod batchlog;
pub mod config;
pub mod error;
pub mod random;
pub mod selection;
pub mod validity;

pub use batchlog::{select_replicas, ReplicaSelector};
pub use config::{SelectorConfig, DEFAULT_BATCHLOG_REPLICAS};
pub use error::{ReplicationError, Result};
pub use random::{RandomSource, ReversingRandom, SeededRandom, ThreadRandom};
pub use selection::Selection;
pub use validity::{AlwaysValid, LivenessFilter, Validity};
