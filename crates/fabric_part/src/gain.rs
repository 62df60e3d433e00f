//! Gain evaluation for hypothetical unit relocations.
//!
//! The gain of moving a unit to a candidate pool is the weighted hop cost of
//! the unit's incident nets under the current assignment minus the cost with
//! the unit hypothetically relocated. Only incident nets are touched, so one
//! probe costs O(unit degree), not O(graph). Positive gain means the move
//! reduces hop cost.

use crate::check::net_hop_count_with;
use fabric_model::{NetlistGraph, Placement, PoolId, Topology, UnitId};

/// Computes the weighted hop-cost gain of relocating `unit` to `target`.
///
/// The hypothetical relocation is expressed as an assignment override, so the
/// placement is never mutated and no revert step is needed. Moving a unit to
/// its current pool yields exactly 0 by construction.
pub fn move_gain(
    graph: &NetlistGraph,
    placement: &Placement,
    topology: &Topology,
    unit: UnitId,
    target: PoolId,
) -> i64 {
    let assignment = placement.assignment();
    let mut gain: i64 = 0;
    for &net_id in graph.incident(unit) {
        let net = graph.net(net_id);
        let before = net_hop_count_with(net, assignment, topology, None) as i64;
        let after = net_hop_count_with(net, assignment, topology, Some((unit, target))) as i64;
        gain = gain.saturating_add((before - after).saturating_mul(net.weight));
    }
    gain
}
