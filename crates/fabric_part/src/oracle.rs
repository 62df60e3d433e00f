//! The coarse partitioning oracle contract and the built-in greedy oracle.
//!
//! The oracle consumes the hypergraph, the pool topology and an imbalance
//! target, and returns an initial (possibly resource-infeasible) assignment
//! plus quality metrics. Deployments choose between an in-process
//! implementation of [`PartitionOracle`] and a file-mediated external one;
//! the refinement pipeline treats both as an opaque blocking call.

use crate::check::hop_report;
use fabric_model::{NetlistGraph, Placement, PoolSet, ResourceVec, Topology};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Objective the oracle optimizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    /// Steiner-tree-style hop cost over the target graph.
    SteinerTree,
    /// Connectivity (km1) cut metric, topology-blind.
    ConnectivityCut,
}

/// How the imbalance target is derived from the capacity headroom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImbalanceMode {
    /// Epsilon of the tightest resource dimension, shrunk by the dimension
    /// count. Conservative; leaves the most repair headroom.
    Tightest,
    /// Epsilon of the loosest dimension, grown by the dimension count.
    Loosest,
}

/// The request handed to the oracle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OracleRequest {
    /// Target imbalance fraction.
    pub imbalance: f64,
    /// Objective kind.
    pub objective: Objective,
    /// Parallelism hint for oracles that run multi-threaded internally.
    pub threads: usize,
    /// Seed for deterministic oracles.
    pub seed: u64,
}

impl Default for OracleRequest {
    fn default() -> Self {
        Self {
            imbalance: 0.03,
            objective: Objective::SteinerTree,
            threads: 4,
            seed: 0,
        }
    }
}

/// What the oracle returns: the raw assignment plus quality metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OracleOutcome {
    /// Per-unit pool assignment, indexed by unit ID. Entries are validated
    /// by the pipeline, not here; out-of-range values are fatal downstream.
    pub parts: Vec<i64>,
    /// Achieved imbalance metric.
    pub imbalance: f64,
    /// Achieved hop/Steiner-tree metric.
    pub hop_metric: f64,
    /// Total unit weight per pool.
    pub block_weights: Vec<i64>,
}

/// Errors from the oracle call.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    /// The oracle ran but reported failure.
    #[error("oracle failed: {0}")]
    Failed(String),

    /// The oracle returned an assignment of the wrong shape.
    #[error("oracle returned {found} assignment entries, expected {expected}")]
    BadShape {
        /// Unit count of the graph.
        expected: usize,
        /// Entries actually returned.
        found: usize,
    },

    /// I/O failure while exchanging files with an external oracle.
    #[error("oracle i/o failure: {0}")]
    Io(#[from] std::io::Error),
}

/// The coarse partitioning oracle.
///
/// Implementations must return one assignment entry per unit; the pipeline
/// rejects any other shape and validates every entry's range.
pub trait PartitionOracle {
    /// Produces an initial assignment for the given design.
    fn partition(
        &self,
        graph: &NetlistGraph,
        pools: &PoolSet,
        topology: &Topology,
        request: &OracleRequest,
    ) -> Result<OracleOutcome, OracleError>;
}

/// Derives the imbalance target from per-dimension capacity headroom.
///
/// For each dimension, epsilon is `(min_capacity - mean_demand) / mean_demand`
/// clamped at zero (a negative value means that dimension is tight even on
/// the smallest pool). `Tightest` takes the minimum epsilon and divides by
/// the dimension count; `Loosest` takes the maximum and multiplies by it.
pub fn derive_imbalance(graph: &NetlistGraph, pools: &PoolSet, mode: ImbalanceMode) -> f64 {
    let dims = pools.dims();
    if dims == 0 || pools.is_empty() {
        return 0.0;
    }
    let min_cap = pools.min_capacity();
    let total = graph.total_demand();
    let pool_count = pools.len() as f64;

    let mut eps = match mode {
        ImbalanceMode::Tightest => f64::MAX,
        ImbalanceMode::Loosest => 0.0,
    };
    for d in 0..dims {
        let mean = total.get(d) as f64 / pool_count;
        let dim_eps = if mean > 0.0 {
            ((min_cap.get(d) as f64 - mean) / mean).max(0.0)
        } else {
            0.0
        };
        eps = match mode {
            ImbalanceMode::Tightest => eps.min(dim_eps),
            ImbalanceMode::Loosest => eps.max(dim_eps),
        };
    }
    match mode {
        ImbalanceMode::Tightest => eps / dims as f64,
        ImbalanceMode::Loosest => eps * dims as f64,
    }
}

/// A deterministic in-process oracle: weight-ranked first-fit by utilization.
///
/// Units are considered heaviest-first (ties shuffled by the request seed)
/// and each lands on the pool whose maximum utilization ratio stays lowest
/// after the addition, preferring pools where it actually fits. Good enough
/// as a coarse starting point for refinement and for testing without an
/// external partitioner.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyOracle;

impl PartitionOracle for GreedyOracle {
    fn partition(
        &self,
        graph: &NetlistGraph,
        pools: &PoolSet,
        topology: &Topology,
        request: &OracleRequest,
    ) -> Result<OracleOutcome, OracleError> {
        if pools.is_empty() {
            return Err(OracleError::Failed("no pools to assign onto".into()));
        }

        let mut order: Vec<usize> = (0..graph.unit_count()).collect();
        let mut rng = rand::rngs::StdRng::seed_from_u64(request.seed);
        order.shuffle(&mut rng);
        order.sort_by_key(|&i| {
            std::cmp::Reverse(graph.unit(fabric_model::UnitId::from_raw(i as u32)).weight)
        });

        let mut required: Vec<ResourceVec> = pools
            .ids()
            .map(|_| ResourceVec::zeros(pools.dims()))
            .collect();
        let mut parts = vec![0_i64; graph.unit_count()];

        for &i in &order {
            let unit = graph.unit(fabric_model::UnitId::from_raw(i as u32));
            let (_, _, pool) = pools
                .ids()
                .map(|pool| {
                    let after = required[pool.index()].plus(&unit.demand);
                    // overfull pools sort after fitting ones, then by the
                    // utilization the addition would cause
                    (
                        !after.fits_within(pools.capacity(pool)),
                        after.max_utilization(pools.capacity(pool)),
                        pool,
                    )
                })
                .min_by(|a, b| a.0.cmp(&b.0).then(a.1.total_cmp(&b.1)))
                .ok_or_else(|| OracleError::Failed("no pools to assign onto".into()))?;
            required[pool.index()].add_assign(&unit.demand);
            parts[i] = pool.index() as i64;
        }

        let outcome = outcome_metrics(graph, pools, topology, parts);
        Ok(outcome)
    }
}

/// Computes the outcome metrics for a raw assignment.
///
/// Used by the built-in oracle; external oracles report their own metrics.
fn outcome_metrics(
    graph: &NetlistGraph,
    pools: &PoolSet,
    topology: &Topology,
    parts: Vec<i64>,
) -> OracleOutcome {
    let mut block_weights = vec![0_i64; pools.len()];
    for (i, &part) in parts.iter().enumerate() {
        if part >= 0 && (part as usize) < pools.len() {
            block_weights[part as usize] +=
                graph.unit(fabric_model::UnitId::from_raw(i as u32)).weight;
        }
    }
    let mean = block_weights.iter().sum::<i64>() as f64 / pools.len().max(1) as f64;
    let imbalance = if mean > 0.0 {
        block_weights
            .iter()
            .map(|&w| w as f64 / mean - 1.0)
            .fold(0.0, f64::max)
    } else {
        0.0
    };

    let hop_metric = match Placement::from_parts(&parts, graph, pools) {
        Ok(placement) => {
            hop_report(graph, placement.assignment(), topology, pools.hop_budget()).total_weighted
                as f64
        }
        Err(_) => f64::NAN,
    };

    OracleOutcome {
        parts,
        imbalance,
        hop_metric,
        block_weights,
    }
}
