//! CLI commands.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Args, Subcommand};
use corelib::{CandidatePool, Endpoint, FailureDomain, Topology};
use replication::{
    LivenessFilter, RandomSource, ReplicaSelector, SeededRandom, Selection, SelectorConfig,
    ThreadRandom,
};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Topology snapshot as read from disk.
///
/// ```json
/// {
///   "local": "10.0.0.1",
///   "datacenter": "dc1",
///   "selector": { "target": 2 },
///   "nodes": [ { "endpoint": "10.0.0.1", "datacenter": "dc1", "rack": "r1" } ],
///   "down": [ "10.0.0.7" ]
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct TopologyFile {
    /// Endpoint of the coordinator doing the selection.
    pub local: Endpoint,
    /// Data center to draw candidates from. Defaults to the local node's.
    #[serde(default)]
    pub datacenter: Option<String>,
    #[serde(default)]
    pub selector: SelectorConfig,
    #[serde(flatten)]
    pub topology: Topology,
    /// Endpoints currently considered dead.
    #[serde(default)]
    pub down: Vec<Endpoint>,
}

impl TopologyFile {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read topology file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse topology file {}", path.display()))
    }

    /// Local rack and the candidate pool of the selected data center.
    pub fn local_view(&self) -> anyhow::Result<(FailureDomain, CandidatePool)> {
        let Some(node) = self.topology.node(&self.local) else {
            bail!("local endpoint {} is not part of the topology", self.local);
        };
        let datacenter = self.datacenter.as_deref().unwrap_or(&node.datacenter);
        let pool = self.topology.candidate_pool(datacenter)?;
        if pool.is_empty() {
            bail!("data center {datacenter} has no nodes");
        }
        Ok((FailureDomain::new(node.rack.as_str()), pool))
    }

    pub fn liveness(&self) -> LivenessFilter {
        let down: HashSet<_> = self.down.iter().collect();
        LivenessFilter::new(
            self.local,
            self.topology
                .nodes()
                .iter()
                .map(|n| n.endpoint)
                .filter(|e| !down.contains(e)),
        )
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Choose batchlog replicas for the local node.
    Select(SelectArgs),
    /// Show the candidate pool grouped by rack.
    Inspect(InspectArgs),
}

#[derive(Debug, Args)]
pub struct SelectArgs {
    /// Path to the topology JSON file.
    #[arg(short, long)]
    pub topology: PathBuf,
    /// Seed for reproducible placements.
    #[arg(short, long)]
    pub seed: Option<u64>,
    /// Number of placements to sample; above 1 prints per-rack counts.
    #[arg(short, long, default_value_t = 1)]
    pub rounds: usize,
    /// Override the replica target from the topology file.
    #[arg(long)]
    pub target: Option<usize>,
}

#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Path to the topology JSON file.
    #[arg(short, long)]
    pub topology: PathBuf,
}

/// Output of a command.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CommandResult {
    Selection {
        local_rack: String,
        selection: Selection,
    },
    Distribution {
        rounds: usize,
        degraded: usize,
        per_rack: BTreeMap<String, usize>,
    },
    Pool {
        local_rack: String,
        racks: Vec<RackView>,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct RackView {
    pub rack: String,
    pub endpoints: Vec<EndpointView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EndpointView {
    pub endpoint: Endpoint,
    pub valid: bool,
}

impl Command {
    pub fn execute(&self) -> anyhow::Result<CommandResult> {
        match self {
            Command::Select(args) => {
                let file = TopologyFile::load(&args.topology)?;
                match args.seed {
                    Some(seed) => select(&file, args, SeededRandom::new(seed)),
                    None => select(&file, args, ThreadRandom),
                }
            }
            Command::Inspect(args) => inspect(&TopologyFile::load(&args.topology)?),
        }
    }
}

pub fn select<R: RandomSource>(
    file: &TopologyFile,
    args: &SelectArgs,
    random: R,
) -> anyhow::Result<CommandResult> {
    let (local, pool) = file.local_view()?;
    let mut config = file.selector;
    if let Some(target) = args.target {
        config.target = target;
    }
    let mut selector = ReplicaSelector::new(config, file.liveness(), random)?;
    info!(local = %file.local, rack = %local, candidates = pool.len(), "selecting batchlog replicas");

    if args.rounds <= 1 {
        let selection = selector.select(&local, &pool)?;
        return Ok(CommandResult::Selection {
            local_rack: local.to_string(),
            selection,
        });
    }

    let mut per_rack = BTreeMap::new();
    let mut degraded = 0;
    for _ in 0..args.rounds {
        let selection = selector.select(&local, &pool)?;
        if selection.is_degraded() {
            degraded += 1;
        }
        for endpoint in &selection {
            if let Some(rack) = pool.domain_of(endpoint) {
                *per_rack.entry(rack.to_string()).or_insert(0) += 1;
            }
        }
    }
    Ok(CommandResult::Distribution {
        rounds: args.rounds,
        degraded,
        per_rack,
    })
}

pub fn inspect(file: &TopologyFile) -> anyhow::Result<CommandResult> {
    use replication::Validity;

    let (local, pool) = file.local_view()?;
    let liveness = file.liveness();
    let racks = pool
        .iter()
        .map(|(rack, endpoints)| RackView {
            rack: rack.to_string(),
            endpoints: endpoints
                .iter()
                .map(|e| EndpointView {
                    endpoint: *e,
                    valid: liveness.is_valid(e),
                })
                .collect(),
        })
        .collect();
    Ok(CommandResult::Pool {
        local_rack: local.to_string(),
        racks,
    })
}

impl fmt::Display for CommandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandResult::Selection {
                local_rack,
                selection,
            } => {
                writeln!(f, "local rack: {local_rack}")?;
                writeln!(f, "selected {}/{}:", selection.len(), selection.target())?;
                for endpoint in selection {
                    writeln!(f, "  {endpoint}")?;
                }
                if selection.is_degraded() {
                    writeln!(f, "warning: degraded placement")?;
                }
                Ok(())
            }
            CommandResult::Distribution {
                rounds,
                degraded,
                per_rack,
            } => {
                writeln!(f, "{rounds} rounds, {degraded} degraded")?;
                for (rack, count) in per_rack {
                    writeln!(f, "  {rack:<16} {count}")?;
                }
                Ok(())
            }
            CommandResult::Pool { local_rack, racks } => {
                for rack in racks {
                    let marker = if rack.rack == *local_rack { " (local)" } else { "" };
                    writeln!(f, "{}{marker}:", rack.rack)?;
                    for e in &rack.endpoints {
                        let state = if e.valid { "valid" } else { "skip" };
                        writeln!(f, "  {:<24} {state}", e.endpoint.to_string())?;
                    }
                }
                Ok(())
            }
        }
    }
}
