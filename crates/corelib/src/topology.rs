//! Topology views used for replica placement.
//!
//! A [`CandidatePool`] maps each failure domain (rack) to the endpoints that
//! live in it. Domains keep the order in which they were first inserted;
//! placement code relies on that order being stable.
//!
//! [`Topology`] is a flat snapshot of the cluster from which pools are built
//! per data center.

use std::collections::HashMap;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::network::Endpoint;
use crate::node::Node;

/// Identifier of a failure domain, e.g. a rack name.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FailureDomain(String);

impl FailureDomain {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FailureDomain {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for FailureDomain {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for FailureDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Candidate endpoints grouped by failure domain.
///
/// # Invariants
///
/// - Every endpoint appears under exactly one domain
/// - No domain lists the same endpoint twice
/// - Domains iterate in first-insertion order
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CandidatePool {
    domains: IndexMap<FailureDomain, Vec<Endpoint>>,
    owners: HashMap<Endpoint, FailureDomain>,
}

impl CandidatePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a pool from `(domain, endpoint)` pairs, in order.
    pub fn from_pairs<I, D>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (D, Endpoint)>,
        D: Into<FailureDomain>,
    {
        let mut pool = Self::new();
        for (domain, endpoint) in pairs {
            pool.insert(domain, endpoint)?;
        }
        Ok(pool)
    }

    /// Add an endpoint to a domain.
    ///
    /// Re-adding an endpoint to the domain it already belongs to is a no-op.
    /// Adding it to a different domain fails with
    /// [`Error::DuplicateEndpoint`].
    pub fn insert(&mut self, domain: impl Into<FailureDomain>, endpoint: Endpoint) -> Result<()> {
        let domain = domain.into();
        if let Some(existing) = self.owners.get(&endpoint) {
            if *existing == domain {
                return Ok(());
            }
            return Err(Error::DuplicateEndpoint {
                endpoint,
                existing: existing.to_string(),
                requested: domain.to_string(),
            });
        }
        self.owners.insert(endpoint, domain.clone());
        self.domains.entry(domain).or_default().push(endpoint);
        Ok(())
    }

    /// Endpoints registered under `domain`, in insertion order.
    pub fn get(&self, domain: &FailureDomain) -> Option<&[Endpoint]> {
        self.domains.get(domain).map(Vec::as_slice)
    }

    pub fn contains_domain(&self, domain: &FailureDomain) -> bool {
        self.domains.contains_key(domain)
    }

    /// Domain an endpoint belongs to, if any.
    pub fn domain_of(&self, endpoint: &Endpoint) -> Option<&FailureDomain> {
        self.owners.get(endpoint)
    }

    /// Iterate `(domain, endpoints)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&FailureDomain, &[Endpoint])> {
        self.domains.iter().map(|(d, eps)| (d, eps.as_slice()))
    }

    pub fn domains(&self) -> impl Iterator<Item = &FailureDomain> {
        self.domains.keys()
    }

    /// Number of domains.
    pub fn domain_count(&self) -> usize {
        self.domains.len()
    }

    /// Total number of endpoints across all domains.
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

/// Flat snapshot of the cluster layout.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Topology {
    nodes: Vec<Node>,
}

impl Topology {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_nodes(nodes: impl IntoIterator<Item = Node>) -> Self {
        Self {
            nodes: nodes.into_iter().collect(),
        }
    }

    pub fn add_node(&mut self, node: Node) {
        self.nodes.push(node);
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, endpoint: &Endpoint) -> Option<&Node> {
        self.nodes.iter().find(|n| n.endpoint == *endpoint)
    }

    /// Group the nodes of one data center by rack.
    ///
    /// Racks appear in the order their first node appears in the snapshot.
    /// Returns an empty pool if the data center has no nodes.
    pub fn candidate_pool(&self, datacenter: &str) -> Result<CandidatePool> {
        CandidatePool::from_pairs(
            self.nodes
                .iter()
                .filter(|n| n.datacenter == datacenter)
                .map(|n| (FailureDomain::new(n.rack.as_str()), n.endpoint)),
        )
    }
}
