//! Result of a replica placement.

use std::slice;

use corelib::Endpoint;
use serde::Serialize;

/// Endpoints chosen to hold a batchlog replica, in the order they were picked.
///
/// A selection holds at most `target` distinct endpoints. It holds fewer only
/// when the pool did not have enough valid candidates; callers decide whether
/// such a degraded placement is acceptable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    endpoints: Vec<Endpoint>,
    target: usize,
}

impl Selection {
    pub(crate) fn new(endpoints: Vec<Endpoint>, target: usize) -> Self {
        debug_assert!(endpoints.len() <= target);
        Self { endpoints, target }
    }

    /// Replica count that was asked for.
    pub fn target(&self) -> usize {
        self.target
    }

    /// True if fewer than `target` endpoints were found.
    pub fn is_degraded(&self) -> bool {
        self.endpoints.len() < self.target
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    pub fn contains(&self, endpoint: &Endpoint) -> bool {
        self.endpoints.contains(endpoint)
    }

    pub fn as_slice(&self) -> &[Endpoint] {
        &self.endpoints
    }

    pub fn iter(&self) -> slice::Iter<'_, Endpoint> {
        self.endpoints.iter()
    }

    pub fn into_endpoints(self) -> Vec<Endpoint> {
        self.endpoints
    }
}

impl IntoIterator for Selection {
    type Item = Endpoint;
    type IntoIter = std::vec::IntoIter<Endpoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.endpoints.into_iter()
    }
}

impl<'a> IntoIterator for &'a Selection {
    type Item = &'a Endpoint;
    type IntoIter = slice::Iter<'a, Endpoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.endpoints.iter()
    }
}
