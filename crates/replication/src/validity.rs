//! Validity predicate injected into the replica selector.

use std::collections::HashSet;

use corelib::Endpoint;

/// Decides whether an endpoint may receive a replica right now.
pub trait Validity {
    fn is_valid(&self, endpoint: &Endpoint) -> bool;
}

impl<F> Validity for F
where
    F: Fn(&Endpoint) -> bool,
{
    fn is_valid(&self, endpoint: &Endpoint) -> bool {
        self(endpoint)
    }
}

/// Accepts every endpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysValid;

impl Validity for AlwaysValid {
    fn is_valid(&self, _endpoint: &Endpoint) -> bool {
        true
    }
}

/// Live endpoints other than the local one.
///
/// Built from a liveness snapshot; the snapshot is not refreshed.
#[derive(Debug, Clone)]
pub struct LivenessFilter {
    local: Endpoint,
    live: HashSet<Endpoint>,
}

impl LivenessFilter {
    pub fn new(local: Endpoint, live: impl IntoIterator<Item = Endpoint>) -> Self {
        Self {
            local,
            live: live.into_iter().collect(),
        }
    }

    pub fn local(&self) -> Endpoint {
        self.local
    }
}

impl Validity for LivenessFilter {
    fn is_valid(&self, endpoint: &Endpoint) -> bool {
        *endpoint != self.local && self.live.contains(endpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ep(s: &str) -> Endpoint {
        s.parse().unwrap()
    }

    #[test]
    fn test_liveness_filter_excludes_self_and_dead() {
        let local = ep("10.0.0.1");
        let filter = LivenessFilter::new(local, [local, ep("10.0.0.2")]);

        assert!(!filter.is_valid(&local));
        assert!(filter.is_valid(&ep("10.0.0.2")));
        assert!(!filter.is_valid(&ep("10.0.0.3")));
    }

    #[test]
    fn test_closure_is_validity() {
        let banned = ep("10.0.0.9");
        let check = move |e: &Endpoint| *e != banned;
        assert!(check.is_valid(&ep("10.0.0.1")));
        assert!(!check.is_valid(&banned));
        assert!(AlwaysValid.is_valid(&banned));
    }
}
