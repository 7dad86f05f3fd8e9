//! Selector configuration.

use serde::{Deserialize, Serialize};

use crate::error::{ReplicationError, Result};

/// Number of batchlog replicas written per batch.
pub const DEFAULT_BATCHLOG_REPLICAS: usize = 2;

/// Configuration for [`ReplicaSelector`](crate::ReplicaSelector).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Desired number of replicas.
    pub target: usize,
    /// Randomize the order in which non-local domains are visited when there
    /// are more of them than `target`. Off by default, in which case domains
    /// are visited in pool order.
    pub shuffle_domains: bool,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            target: DEFAULT_BATCHLOG_REPLICAS,
            shuffle_domains: false,
        }
    }
}

impl SelectorConfig {
    pub fn with_target(target: usize) -> Self {
        Self {
            target,
            ..Self::default()
        }
    }

    pub fn shuffle_domains(mut self, enabled: bool) -> Self {
        self.shuffle_domains = enabled;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.target == 0 {
            return Err(ReplicationError::InvalidConfig(
                "target must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
