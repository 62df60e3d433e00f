//! Constraint checking: resource feasibility per pool, hop cost per net.
//!
//! All functions here are pure queries over the current placement. They are
//! run before and after each repair stage to produce feasibility verdicts
//! and quality metrics, and cost O(pins) for a full-graph pass.

use fabric_model::{Net, NetId, NetlistGraph, Placement, PoolId, PoolSet, Topology, UnitId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A pool exceeding capacity, with the offending dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceViolation {
    /// The over-capacity pool.
    pub pool: PoolId,
    /// Resource dimensions in which required exceeds capacity.
    pub dims: Vec<usize>,
}

/// Flags every (pool, dimension) where required resource exceeds capacity.
pub fn resource_violations(pools: &PoolSet, placement: &Placement) -> Vec<ResourceViolation> {
    let mut violations = Vec::new();
    for pool in pools.ids() {
        let dims = placement.required(pool).exceeded_dims(pools.capacity(pool));
        if !dims.is_empty() {
            violations.push(ResourceViolation { pool, dims });
        }
    }
    violations
}

/// Computes the unweighted hop count of a single net.
///
/// Sums the source pool's distance to every *other* distinct pool the net
/// touches, once per destination pool rather than once per unit. A net whose
/// units all land in one pool costs zero. Distances to disconnected pools
/// saturate so the result stays past any budget.
pub fn net_hop_count(net: &Net, assignment: &[PoolId], topology: &Topology) -> u32 {
    net_hop_count_with(net, assignment, topology, None)
}

/// Computes a net's hop count with one unit hypothetically relocated.
///
/// `moved` overrides the assignment for a single unit without mutating it;
/// this is what makes gain probes side-effect free.
pub fn net_hop_count_with(
    net: &Net,
    assignment: &[PoolId],
    topology: &Topology,
    moved: Option<(UnitId, PoolId)>,
) -> u32 {
    let pool_for = |unit: UnitId| match moved {
        Some((moved_unit, target)) if moved_unit == unit => target,
        _ => assignment[unit.index()],
    };

    let source_pool = pool_for(net.source());
    let mut involved: HashSet<PoolId> = HashSet::new();
    let mut hops: u32 = 0;
    for &unit in &net.units {
        let pool = pool_for(unit);
        if involved.insert(pool) {
            hops = hops.saturating_add(topology.distance(source_pool, pool));
        }
    }
    hops
}

/// The weighted hop-cost total plus the list of budget-violating nets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HopReport {
    /// Sum of `hop_count * net.weight` over all nets (saturating).
    pub total_weighted: i64,
    /// Nets whose unweighted hop count exceeds the hop budget.
    pub violations: Vec<NetId>,
}

/// Computes the total weighted hop cost and the hop-budget violation list.
pub fn hop_report(
    graph: &NetlistGraph,
    assignment: &[PoolId],
    topology: &Topology,
    hop_budget: u32,
) -> HopReport {
    let mut total_weighted: i64 = 0;
    let mut violations = Vec::new();
    for net in graph.nets() {
        let hops = net_hop_count(net, assignment, topology);
        if hops > hop_budget {
            violations.push(net.id);
        }
        total_weighted = total_weighted.saturating_add((hops as i64).saturating_mul(net.weight));
    }
    HopReport {
        total_weighted,
        violations,
    }
}
