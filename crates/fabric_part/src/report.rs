//! Run observability: per-stage feasibility metrics and the run report.

use crate::check::{hop_report, resource_violations};
use crate::pipeline::PipelineState;
use fabric_model::{NetlistGraph, Placement, PoolSet, Topology};
use serde::{Deserialize, Serialize};

/// Feasibility metrics captured at one point in the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageMetrics {
    /// Pools over capacity in at least one dimension.
    pub resource_violations: usize,
    /// Sum of weighted hop costs over all nets.
    pub total_weighted_hops: i64,
    /// Nets over the hop budget.
    pub hop_violations: usize,
    /// Whether every pool is within capacity.
    pub resource_feasible: bool,
    /// Whether every net is within the hop budget.
    pub hop_feasible: bool,
}

/// Captures the current placement's metrics.
pub fn collect_metrics(
    graph: &NetlistGraph,
    pools: &PoolSet,
    topology: &Topology,
    placement: &Placement,
) -> StageMetrics {
    let resource = resource_violations(pools, placement);
    let hops = hop_report(graph, placement.assignment(), topology, pools.hop_budget());
    StageMetrics {
        resource_violations: resource.len(),
        total_weighted_hops: hops.total_weighted,
        hop_violations: hops.violations.len(),
        resource_feasible: resource.is_empty(),
        hop_feasible: hops.violations.is_empty(),
    }
}

/// The full observability record of one refinement run.
///
/// Initial metrics are always present once the oracle assignment has been
/// validated; the repair fields are filled in as their stages run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Metrics straight after the oracle stage.
    pub initial: StageMetrics,
    /// Metrics after resource repair, if the stage ran.
    pub after_resource_repair: Option<StageMetrics>,
    /// Metrics after hop repair, if the stage ran.
    pub after_hop_repair: Option<StageMetrics>,
    /// Resource-repair moves committed.
    pub resource_moves: usize,
    /// Hop-repair moves committed.
    pub hop_moves: usize,
    /// Final metrics at the terminal state.
    pub final_metrics: StageMetrics,
    /// States the run passed through, in order.
    pub states: Vec<PipelineState>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use fabric_model::{PoolId, ResourceVec};

    fn rv(v: &[i64]) -> ResourceVec {
        ResourceVec::from_vec(v.to_vec())
    }

    fn p(i: u32) -> PoolId {
        PoolId::from_raw(i)
    }

    #[test]
    fn metrics_reflect_violations() {
        let mut pools = PoolSet::new(1);
        for _ in 0..4 {
            pools.add_pool(rv(&[10]), 16);
        }
        pools.set_hop_budget(2);
        let topo =
            Topology::from_edges(4, &[(p(0), p(1)), (p(1), p(2)), (p(2), p(3))]).unwrap();

        let mut graph = NetlistGraph::new(1);
        let a = graph.add_unit(rv(&[12]));
        let b = graph.add_unit(rv(&[1]));
        graph.add_net(2, vec![a, b]);
        graph.derive_weights(&pools);
        let placement = Placement::from_parts(&[0, 3], &graph, &pools).unwrap();

        let metrics = collect_metrics(&graph, &pools, &topo, &placement);
        assert_eq!(metrics.resource_violations, 1);
        assert!(!metrics.resource_feasible);
        assert_eq!(metrics.hop_violations, 1);
        assert!(!metrics.hop_feasible);
        assert_eq!(metrics.total_weighted_hops, 6);
    }

    #[test]
    fn clean_placement_is_feasible() {
        let mut pools = PoolSet::new(1);
        pools.add_pool(rv(&[10]), 16);
        pools.set_hop_budget(1);
        let topo = Topology::from_edges(1, &[]).unwrap();

        let mut graph = NetlistGraph::new(1);
        graph.add_unit(rv(&[5]));
        graph.derive_weights(&pools);
        let placement = Placement::from_parts(&[0], &graph, &pools).unwrap();

        let metrics = collect_metrics(&graph, &pools, &topo, &placement);
        assert!(metrics.resource_feasible);
        assert!(metrics.hop_feasible);
        assert_eq!(metrics.total_weighted_hops, 0);
    }
}
