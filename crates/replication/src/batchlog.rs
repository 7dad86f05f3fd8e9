//! Batchlog replica selection.
//!
//! Before a coordinator applies a multi-partition batch it writes the batch
//! to a small number of peers so another node can replay it if the
//! coordinator dies. Those peers should not share the coordinator's rack, and
//! should not share a rack with each other when that can be avoided.
//!
//! # Algorithm
//!
//! Candidates arrive grouped by rack (failure domain). Selection runs three
//! passes and stops as soon as `target` endpoints are chosen:
//!
//! 1. **Diversity**: one valid endpoint from each non-local rack, racks
//!    visited in pool order.
//! 2. **Depth**: round-robin over the same racks again, one more endpoint
//!    per rack per round, until the racks run dry.
//! 3. **Local fallback**: the remainder from the local rack.
//!
//! Each draw shuffles the rack's unselected candidates and takes the first
//! valid one. Invalid candidates met along the way are dropped for the rest
//! of the call. If every pass comes up short, the smaller selection is
//! returned as a degraded placement rather than an error.

use corelib::{CandidatePool, Endpoint, FailureDomain};
use tracing::{debug, trace, warn};

use crate::config::SelectorConfig;
use crate::error::{ReplicationError, Result};
use crate::random::RandomSource;
use crate::selection::Selection;
use crate::validity::Validity;

/// Chooses the peers that will hold a batchlog entry.
///
/// # Example
///
/// ```rust
/// use corelib::{CandidatePool, FailureDomain};
/// use replication::{ReplicaSelector, SelectorConfig, AlwaysValid, SeededRandom};
///
/// let pool = CandidatePool::from_pairs([
///     ("rack1", "10.0.0.1".parse().unwrap()),
///     ("rack2", "10.0.0.2".parse().unwrap()),
///     ("rack3", "10.0.0.3".parse().unwrap()),
/// ]).unwrap();
///
/// let mut selector =
///     ReplicaSelector::new(SelectorConfig::default(), AlwaysValid, SeededRandom::new(1)).unwrap();
/// let selection = selector.select(&FailureDomain::new("rack1"), &pool).unwrap();
/// assert_eq!(selection.len(), 2);
/// assert!(!selection.contains(&"10.0.0.1".parse().unwrap()));
/// ```
#[derive(Debug, Clone)]
pub struct ReplicaSelector<V, R> {
    config: SelectorConfig,
    validity: V,
    random: R,
}

impl<V: Validity, R: RandomSource> ReplicaSelector<V, R> {
    pub fn new(config: SelectorConfig, validity: V, random: R) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            validity,
            random,
        })
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    /// Choose up to `target` endpoints from `pool` for a coordinator living
    /// in `local`.
    pub fn select(&mut self, local: &FailureDomain, pool: &CandidatePool) -> Result<Selection> {
        select_replicas(&self.config, local, pool, &self.validity, &mut self.random)
    }
}

/// Stateless form of [`ReplicaSelector::select`].
///
/// Fails with [`ReplicationError::EmptyPool`] if `pool` has no endpoints, or
/// [`ReplicationError::InvalidConfig`] if `config` does not validate.
pub fn select_replicas<V, R>(
    config: &SelectorConfig,
    local: &FailureDomain,
    pool: &CandidatePool,
    validity: &V,
    random: &mut R,
) -> Result<Selection>
where
    V: Validity + ?Sized,
    R: RandomSource + ?Sized,
{
    config.validate()?;
    if pool.is_empty() {
        return Err(ReplicationError::EmptyPool);
    }

    let target = config.target;
    let mut chosen: Vec<Endpoint> = Vec::with_capacity(target);

    let mut remote: Vec<DomainCandidates<'_>> = pool
        .iter()
        .filter(|(domain, _)| *domain != local)
        .map(|(domain, endpoints)| DomainCandidates::new(domain, endpoints))
        .collect();

    if config.shuffle_domains && remote.len() > target {
        random.shuffle(&mut remote);
    }

    for candidates in remote.iter_mut() {
        if chosen.len() == target {
            break;
        }
        if let Some(endpoint) = candidates.draw(validity, random) {
            chosen.push(endpoint);
        }
    }
    debug!(
        chosen = chosen.len(),
        target,
        remote_domains = remote.len(),
        "batchlog diversity pass done"
    );

    while chosen.len() < target {
        remote.retain(|c| !c.is_exhausted());
        if remote.is_empty() {
            break;
        }
        for candidates in remote.iter_mut() {
            if chosen.len() == target {
                break;
            }
            if let Some(endpoint) = candidates.draw(validity, random) {
                chosen.push(endpoint);
            }
        }
    }

    if chosen.len() < target {
        debug!(chosen = chosen.len(), target, "batchlog falling back to local domain");
        if let Some(endpoints) = pool.get(local) {
            let mut candidates = DomainCandidates::new(local, endpoints);
            while chosen.len() < target {
                match candidates.draw(validity, random) {
                    Some(endpoint) => chosen.push(endpoint),
                    None => break,
                }
            }
        }
    }

    metrics::counter!("batchlog_replica_selections_total").increment(1);
    metrics::histogram!("batchlog_replica_selection_size").record(chosen.len() as f64);

    let selection = Selection::new(chosen, target);
    if selection.is_degraded() {
        metrics::counter!("batchlog_replica_selections_degraded_total").increment(1);
        warn!(
            chosen = selection.len(),
            target,
            pool_size = pool.len(),
            local_domain = %local,
            "not enough valid batchlog candidates, placement is degraded"
        );
    }
    Ok(selection)
}

/// Unselected candidates of one domain, in pool order.
struct DomainCandidates<'a> {
    domain: &'a FailureDomain,
    endpoints: Vec<Endpoint>,
}

impl<'a> DomainCandidates<'a> {
    fn new(domain: &'a FailureDomain, endpoints: &[Endpoint]) -> Self {
        Self {
            domain,
            endpoints: endpoints.to_vec(),
        }
    }

    fn is_exhausted(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Shuffle the remaining candidates and take the first valid one.
    ///
    /// The chosen endpoint and every invalid endpoint scanned before it are
    /// removed; the rest keep their pool order for the next draw.
    fn draw<V, R>(&mut self, validity: &V, random: &mut R) -> Option<Endpoint>
    where
        V: Validity + ?Sized,
        R: RandomSource + ?Sized,
    {
        if self.endpoints.is_empty() {
            return None;
        }

        let mut order: Vec<usize> = (0..self.endpoints.len()).collect();
        random.shuffle(&mut order);

        let mut removed = vec![false; self.endpoints.len()];
        let mut picked = None;
        for idx in order {
            let endpoint = self.endpoints[idx];
            removed[idx] = true;
            if validity.is_valid(&endpoint) {
                picked = Some(endpoint);
                break;
            }
            trace!(%endpoint, domain = %self.domain, "skipping invalid batchlog candidate");
        }

        let mut idx = 0;
        self.endpoints.retain(|_| {
            let keep = !removed[idx];
            idx += 1;
            keep
        });
        picked
    }
}
