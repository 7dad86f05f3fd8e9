//! Placement tests for the batchlog replica selector.
//!
//! # Test Strategy
//!
//! 1. **Rack spreading**: one replica per non-local rack
//! 2. **Depth before local**: a lone remote rack supplies every replica
//! 3. **Local fallback**: the local rack fills whatever is missing
//! 4. **Degraded placement**: too few candidates is not an error
//! 5. **Validity**: dead or local endpoints are never chosen

use std::collections::HashSet;

use corelib::{CandidatePool, Endpoint, FailureDomain};
use replication::{
    select_replicas, AlwaysValid, LivenessFilter, ReplicaSelector, ReversingRandom, SeededRandom,
    SelectorConfig,
};

const LOCAL: &str = "local";

fn ep(s: &str) -> Endpoint {
    s.parse().unwrap()
}

fn pool(pairs: &[(&str, &str)]) -> CandidatePool {
    CandidatePool::from_pairs(pairs.iter().map(|(d, e)| (*d, ep(e)))).unwrap()
}

fn local() -> FailureDomain {
    FailureDomain::new(LOCAL)
}

fn reversing() -> ReplicaSelector<AlwaysValid, ReversingRandom> {
    ReplicaSelector::new(SelectorConfig::default(), AlwaysValid, ReversingRandom).unwrap()
}

fn set(endpoints: &[&str]) -> HashSet<Endpoint> {
    endpoints.iter().map(|e| ep(e)).collect()
}

// ============================================================================
// Deterministic placements (shuffle reverses, draws take the last index)
// ============================================================================

#[test]
fn test_selects_two_hosts_from_non_local_racks() {
    let pool = pool(&[
        (LOCAL, "10.0.0.1"),
        (LOCAL, "10.0.0.2"),
        ("1", "10.0.1.1"),
        ("1", "10.0.1.11"),
        ("2", "10.0.2.2"),
        ("2", "10.0.2.22"),
    ]);

    let selection = reversing().select(&local(), &pool).unwrap();

    assert_eq!(selection.len(), 2);
    assert!(selection.contains(&ep("10.0.1.11")));
    assert!(selection.contains(&ep("10.0.2.22")));
}

#[test]
fn test_selects_host_from_local_when_one_remote() {
    let pool = pool(&[(LOCAL, "10.0.0.1"), (LOCAL, "10.0.0.2"), ("1", "10.0.1.1")]);

    let selection = reversing().select(&local(), &pool).unwrap();

    assert_eq!(selection.len(), 2);
    assert_eq!(selection.as_slice()[0], ep("10.0.1.1"));
    assert!(selection.contains(&ep("10.0.0.2")));
}

#[test]
fn test_returns_as_is_if_not_enough_endpoints() {
    let pool = pool(&[(LOCAL, "10.0.0.1")]);

    let selection = reversing().select(&local(), &pool).unwrap();

    assert_eq!(selection.as_slice(), &[ep("10.0.0.1")]);
    assert!(selection.is_degraded());
}

#[test]
fn test_selects_two_hosts_from_single_other_rack() {
    let pool = pool(&[
        (LOCAL, "10.0.0.1"),
        (LOCAL, "10.0.0.2"),
        ("1", "10.0.1.1"),
        ("1", "10.0.1.11"),
        ("1", "10.0.1.111"),
    ]);

    let selection = reversing().select(&local(), &pool).unwrap();

    // Last two remote endpoints in pool order.
    assert_eq!(selection.as_slice(), &[ep("10.0.1.111"), ep("10.0.1.11")]);
}

#[test]
fn test_selects_two_hosts_from_local_only_rack() {
    let pool = pool(&[
        (LOCAL, "10.0.0.1"),
        (LOCAL, "10.0.0.11"),
        (LOCAL, "10.0.0.111"),
        (LOCAL, "10.0.0.254"),
    ]);

    let selection = reversing().select(&local(), &pool).unwrap();

    assert_eq!(selection.as_slice(), &[ep("10.0.0.254"), ep("10.0.0.111")]);
}

#[test]
fn test_remote_racks_visited_in_pool_order() {
    let pool = pool(&[
        ("c", "10.0.3.1"),
        (LOCAL, "10.0.0.1"),
        ("a", "10.0.1.1"),
        ("b", "10.0.2.1"),
    ]);

    let selection = reversing().select(&local(), &pool).unwrap();

    assert_eq!(selection.as_slice(), &[ep("10.0.3.1"), ep("10.0.1.1")]);
}

// ============================================================================
// Randomized scenarios
// ============================================================================

#[test]
fn test_scenario_one_per_remote_rack() {
    let pool = pool(&[
        (LOCAL, "10.0.0.1"),
        (LOCAL, "10.0.0.2"),
        ("rackX", "10.0.1.1"),
        ("rackX", "10.0.1.2"),
        ("rackY", "10.0.2.1"),
        ("rackY", "10.0.2.2"),
    ]);
    let rack_x = set(&["10.0.1.1", "10.0.1.2"]);
    let rack_y = set(&["10.0.2.1", "10.0.2.2"]);

    for seed in 0..64 {
        let mut selector =
            ReplicaSelector::new(SelectorConfig::default(), AlwaysValid, SeededRandom::new(seed)).unwrap();
        let selection = selector.select(&local(), &pool).unwrap();

        assert_eq!(selection.len(), 2);
        assert_eq!(selection.iter().filter(|e| rack_x.contains(e)).count(), 1);
        assert_eq!(selection.iter().filter(|e| rack_y.contains(e)).count(), 1);
    }
}

#[test]
fn test_scenario_remote_plus_local() {
    let pool = pool(&[(LOCAL, "10.0.0.1"), (LOCAL, "10.0.0.2"), ("rackX", "10.0.1.1")]);
    let locals = set(&["10.0.0.1", "10.0.0.2"]);

    for seed in 0..32 {
        let mut selector =
            ReplicaSelector::new(SelectorConfig::default(), AlwaysValid, SeededRandom::new(seed)).unwrap();
        let selection = selector.select(&local(), &pool).unwrap();

        assert_eq!(selection.len(), 2);
        assert!(selection.contains(&ep("10.0.1.1")));
        assert_eq!(selection.iter().filter(|e| locals.contains(e)).count(), 1);
    }
}

#[test]
fn test_scenario_depth_before_local() {
    let pool = pool(&[
        (LOCAL, "10.0.0.1"),
        (LOCAL, "10.0.0.2"),
        ("rackX", "10.0.1.1"),
        ("rackX", "10.0.1.2"),
        ("rackX", "10.0.1.3"),
    ]);
    let rack_x = set(&["10.0.1.1", "10.0.1.2", "10.0.1.3"]);

    for seed in 0..64 {
        let mut selector =
            ReplicaSelector::new(SelectorConfig::default(), AlwaysValid, SeededRandom::new(seed)).unwrap();
        let selection = selector.select(&local(), &pool).unwrap();

        assert_eq!(selection.len(), 2);
        assert!(selection.iter().all(|e| rack_x.contains(e)));
        assert_ne!(selection.as_slice()[0], selection.as_slice()[1]);
    }
}

#[test]
fn test_scenario_local_only() {
    let pool = pool(&[
        (LOCAL, "10.0.0.1"),
        (LOCAL, "10.0.0.2"),
        (LOCAL, "10.0.0.3"),
        (LOCAL, "10.0.0.4"),
    ]);

    for seed in 0..32 {
        let selection = select_replicas(
            &SelectorConfig::default(),
            &local(),
            &pool,
            &AlwaysValid,
            &mut SeededRandom::new(seed),
        )
        .unwrap();

        assert_eq!(selection.len(), 2);
        assert_ne!(selection.as_slice()[0], selection.as_slice()[1]);
    }
}

#[test]
fn test_local_domain_absent_from_pool() {
    let pool = pool(&[("rackX", "10.0.1.1")]);

    let selection = reversing().select(&local(), &pool).unwrap();

    assert_eq!(selection.as_slice(), &[ep("10.0.1.1")]);
    assert!(selection.is_degraded());
}

// ============================================================================
// Validity
// ============================================================================

#[test]
fn test_liveness_filter_skips_self_and_dead_nodes() {
    let me = ep("10.0.0.1");
    let pool = pool(&[
        (LOCAL, "10.0.0.1"),
        (LOCAL, "10.0.0.2"),
        ("rackX", "10.0.1.1"),
        ("rackX", "10.0.1.2"),
        ("rackY", "10.0.2.1"),
    ]);
    // rackY is entirely down, one rackX node is down.
    let live = [me, ep("10.0.0.2"), ep("10.0.1.2")];

    for seed in 0..32 {
        let mut selector = ReplicaSelector::new(
            SelectorConfig::default(),
            LivenessFilter::new(me, live),
            SeededRandom::new(seed),
        )
        .unwrap();
        let selection = selector.select(&local(), &pool).unwrap();

        assert_eq!(selection.as_slice(), &[ep("10.0.1.2"), ep("10.0.0.2")]);
    }
}

#[test]
fn test_invalid_remote_nodes_fall_through_to_local() {
    let pool = pool(&[
        (LOCAL, "10.0.0.1"),
        (LOCAL, "10.0.0.2"),
        (LOCAL, "10.0.0.3"),
        ("rackX", "10.0.1.1"),
        ("rackX", "10.0.1.2"),
    ]);
    let remote_down = |e: &Endpoint| e.to_string().starts_with("10.0.0.");

    let selection = select_replicas(
        &SelectorConfig::with_target(3),
        &local(),
        &pool,
        &remote_down,
        &mut SeededRandom::new(11),
    )
    .unwrap();

    assert_eq!(selection.len(), 3);
    assert_eq!(
        selection.iter().copied().collect::<HashSet<_>>(),
        set(&["10.0.0.1", "10.0.0.2", "10.0.0.3"])
    );
}

#[test]
fn test_larger_target_spreads_then_deepens() {
    let pool = pool(&[
        (LOCAL, "10.0.0.1"),
        ("a", "10.0.1.1"),
        ("a", "10.0.1.2"),
        ("a", "10.0.1.3"),
        ("b", "10.0.2.1"),
    ]);

    let mut selector =
        ReplicaSelector::new(SelectorConfig::with_target(4), AlwaysValid, ReversingRandom).unwrap();
    let selection = selector.select(&local(), &pool).unwrap();

    // Round 1: a, b. Round 2: a again (b is dry). Round 3: a again.
    assert_eq!(
        selection.as_slice(),
        &[ep("10.0.1.3"), ep("10.0.2.1"), ep("10.0.1.2"), ep("10.0.1.1")]
    );
    assert!(!selection.is_degraded());
}
