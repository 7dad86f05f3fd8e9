//! Node abstractions for cluster topology.
//!
//! A `Node` pairs an [`Endpoint`] with the labels that place it in the
//! physical layout of the cluster. Keep this struct small and cheap to clone.

use serde::{Deserialize, Serialize};

use crate::network::Endpoint;

/// Logical node participating in the cluster.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub endpoint: Endpoint,
    /// Data center label.
    pub datacenter: String,
    /// Rack label; the failure domain used for replica spreading.
    pub rack: String,
}

impl Node {
    pub fn new(
        endpoint: Endpoint,
        datacenter: impl Into<String>,
        rack: impl Into<String>,
    ) -> Self {
        Self {
            endpoint,
            datacenter: datacenter.into(),
            rack: rack.into(),
        }
    }
}
