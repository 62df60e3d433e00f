//! Hop repair: bounded, best-effort relocation of units on over-budget nets.
//!
//! Detects nets whose hop count exceeds the budget, collects their touched
//! units, and attempts gain-guided relocation mirroring the resource
//! trimmer's commit discipline: a hop-driven move must strictly reduce the
//! violating net's hop count and must keep the target pool resource-feasible.
//! The pass is bounded by an explicit round cap and reports what remains;
//! hop infeasibility after the pass is not fatal.

use crate::check::{hop_report, net_hop_count, net_hop_count_with};
use crate::gain::move_gain;
use fabric_model::{NetId, NetlistGraph, Placement, PoolId, PoolSet, Topology};
use serde::{Deserialize, Serialize};

/// Policy for the hop-repair stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HopPolicy {
    /// Whether the stage runs at all.
    pub enabled: bool,
    /// Maximum detect-and-relocate rounds before giving up.
    pub max_rounds: u32,
}

impl Default for HopPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            max_rounds: 8,
        }
    }
}

/// Result of a hop-repair pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HopOutcome {
    /// Rounds actually run.
    pub rounds: u32,
    /// Hop-driven moves committed.
    pub moves_committed: usize,
    /// Nets still over budget when the pass ended.
    pub remaining: Vec<NetId>,
}

/// Runs a bounded hop-repair pass, mutating the placement in place.
///
/// Every committed move keeps all pools resource-feasible; a round that
/// commits nothing ends the pass early.
pub fn trim_hops(
    graph: &NetlistGraph,
    pools: &PoolSet,
    topology: &Topology,
    placement: &mut Placement,
    policy: &HopPolicy,
) -> HopOutcome {
    let budget = pools.hop_budget();
    let mut rounds = 0;
    let mut moves_committed = 0;

    while rounds < policy.max_rounds {
        let report = hop_report(graph, placement.assignment(), topology, budget);
        if report.violations.is_empty() {
            break;
        }
        rounds += 1;

        let mut progressed = false;
        for net_id in &report.violations {
            if repair_one_net(graph, pools, topology, placement, *net_id, budget) {
                moves_committed += 1;
                progressed = true;
            }
        }
        if !progressed {
            break;
        }
    }

    let report = hop_report(graph, placement.assignment(), topology, budget);
    HopOutcome {
        rounds,
        moves_committed,
        remaining: report.violations,
    }
}

/// Tries one relocation that strictly reduces the net's hop count.
///
/// Candidates are every touched unit crossed with every pool; among the
/// hop-reducing, resource-feasible options the one with the best overall
/// weighted gain is committed. Returns whether a move landed.
fn repair_one_net(
    graph: &NetlistGraph,
    pools: &PoolSet,
    topology: &Topology,
    placement: &mut Placement,
    net_id: NetId,
    budget: u32,
) -> bool {
    let net = graph.net(net_id);
    let current_hops = net_hop_count(net, placement.assignment(), topology);
    if current_hops <= budget {
        return false; // already fixed by an earlier move this round
    }

    let mut best: Option<(i64, fabric_model::UnitId, PoolId)> = None;
    for &unit in &net.units {
        let from = placement.pool_of(unit);
        for target in pools.ids() {
            if target == from {
                continue;
            }
            let hops_after =
                net_hop_count_with(net, placement.assignment(), topology, Some((unit, target)));
            if hops_after >= current_hops {
                continue;
            }
            let required_after = placement.required(target).plus(&graph.unit(unit).demand);
            if !required_after.fits_within(pools.capacity(target)) {
                continue;
            }
            let gain = move_gain(graph, placement, topology, unit, target);
            if best.map_or(true, |(best_gain, _, _)| gain > best_gain) {
                best = Some((gain, unit, target));
            }
        }
    }

    match best {
        Some((_, unit, target)) => {
            placement.move_unit(graph, unit, target);
            true
        }
        None => false,
    }
}
