//! Mutable placement state: the unit-to-pool assignment plus derived tallies.
//!
//! [`Placement`] is the only state the refinement engine mutates. It keeps
//! the assignment array, each pool's member set, and each pool's required
//! resource vector, and updates all three incrementally on every committed
//! move so repeated feasibility probes never rescan the whole graph.

use crate::device::PoolSet;
use crate::error::ModelError;
use crate::graph::NetlistGraph;
use crate::ids::{PoolId, UnitId};
use crate::resources::ResourceVec;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The unit-to-pool assignment with incrementally maintained per-pool state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Placement {
    pool_of: Vec<PoolId>,
    members: Vec<HashSet<UnitId>>,
    required: Vec<ResourceVec>,
}

impl Placement {
    /// Builds a placement from a raw oracle assignment array.
    ///
    /// Every entry must lie in `[0, pool_count)`; an out-of-range entry
    /// (including a negative one) is a fatal input error, never clamped.
    pub fn from_parts(
        parts: &[i64],
        graph: &NetlistGraph,
        pools: &PoolSet,
    ) -> Result<Self, ModelError> {
        if parts.len() != graph.unit_count() {
            return Err(ModelError::AssignmentLengthMismatch {
                expected: graph.unit_count(),
                found: parts.len(),
            });
        }

        let pool_count = pools.len();
        let mut pool_of = Vec::with_capacity(parts.len());
        let mut members = vec![HashSet::new(); pool_count];
        let mut required = vec![ResourceVec::zeros(pools.dims()); pool_count];

        for (unit, &value) in parts.iter().enumerate() {
            if value < 0 || value as usize >= pool_count {
                return Err(ModelError::AssignmentOutOfRange {
                    unit,
                    value,
                    pool_count,
                });
            }
            let pool = PoolId::from_raw(value as u32);
            let unit_id = UnitId::from_raw(unit as u32);
            pool_of.push(pool);
            members[pool.index()].insert(unit_id);
            required[pool.index()].add_assign(&graph.unit(unit_id).demand);
        }

        Ok(Self {
            pool_of,
            members,
            required,
        })
    }

    /// Returns the pool the given unit is currently assigned to.
    pub fn pool_of(&self, unit: UnitId) -> PoolId {
        self.pool_of[unit.index()]
    }

    /// Returns the full assignment array, indexed by unit ID.
    pub fn assignment(&self) -> &[PoolId] {
        &self.pool_of
    }

    /// Returns the units currently assigned to the given pool.
    pub fn members(&self, pool: PoolId) -> &HashSet<UnitId> {
        &self.members[pool.index()]
    }

    /// Returns the summed resource demand of the given pool's members.
    pub fn required(&self, pool: PoolId) -> &ResourceVec {
        &self.required[pool.index()]
    }

    /// Returns the number of units.
    pub fn unit_count(&self) -> usize {
        self.pool_of.len()
    }

    /// Returns the number of pools.
    pub fn pool_count(&self) -> usize {
        self.members.len()
    }

    /// Moves a unit to another pool, updating all tallies incrementally.
    ///
    /// A move to the unit's current pool is a no-op.
    pub fn move_unit(&mut self, graph: &NetlistGraph, unit: UnitId, to: PoolId) {
        let from = self.pool_of[unit.index()];
        if from == to {
            return;
        }
        let demand = &graph.unit(unit).demand;
        self.required[from.index()].sub_assign(demand);
        self.required[to.index()].add_assign(demand);
        self.members[from.index()].remove(&unit);
        self.members[to.index()].insert(unit);
        self.pool_of[unit.index()] = to;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rv(v: &[i64]) -> ResourceVec {
        ResourceVec::from_vec(v.to_vec())
    }

    fn fixture() -> (NetlistGraph, PoolSet) {
        let mut graph = NetlistGraph::new(2);
        graph.add_unit(rv(&[3, 1]));
        graph.add_unit(rv(&[2, 2]));
        graph.add_unit(rv(&[1, 4]));
        let mut pools = PoolSet::new(2);
        pools.add_pool(rv(&[10, 10]), 16);
        pools.add_pool(rv(&[10, 10]), 16);
        (graph, pools)
    }

    #[test]
    fn from_parts_builds_tallies() {
        let (graph, pools) = fixture();
        let placement = Placement::from_parts(&[0, 0, 1], &graph, &pools).unwrap();
        assert_eq!(*placement.required(PoolId::from_raw(0)), rv(&[5, 3]));
        assert_eq!(*placement.required(PoolId::from_raw(1)), rv(&[1, 4]));
        assert_eq!(placement.members(PoolId::from_raw(0)).len(), 2);
        assert_eq!(placement.pool_of(UnitId::from_raw(2)), PoolId::from_raw(1));
    }

    #[test]
    fn negative_entry_is_fatal() {
        let (graph, pools) = fixture();
        let err = Placement::from_parts(&[0, -1, 1], &graph, &pools).unwrap_err();
        assert!(matches!(
            err,
            ModelError::AssignmentOutOfRange {
                unit: 1,
                value: -1,
                ..
            }
        ));
    }

    #[test]
    fn too_large_entry_is_fatal() {
        let (graph, pools) = fixture();
        let err = Placement::from_parts(&[0, 2, 1], &graph, &pools).unwrap_err();
        assert!(matches!(err, ModelError::AssignmentOutOfRange { .. }));
    }

    #[test]
    fn length_mismatch_is_fatal() {
        let (graph, pools) = fixture();
        let err = Placement::from_parts(&[0, 1], &graph, &pools).unwrap_err();
        assert!(matches!(err, ModelError::AssignmentLengthMismatch { .. }));
    }

    #[test]
    fn move_unit_updates_incrementally() {
        let (graph, pools) = fixture();
        let mut placement = Placement::from_parts(&[0, 0, 1], &graph, &pools).unwrap();
        let unit = UnitId::from_raw(0);
        placement.move_unit(&graph, unit, PoolId::from_raw(1));

        // Incremental state must match a from-scratch rebuild
        let rebuilt = Placement::from_parts(&[1, 0, 1], &graph, &pools).unwrap();
        assert_eq!(placement.assignment(), rebuilt.assignment());
        for pool in pools.ids() {
            assert_eq!(placement.required(pool), rebuilt.required(pool));
            assert_eq!(placement.members(pool), rebuilt.members(pool));
        }
    }

    #[test]
    fn self_move_is_noop() {
        let (graph, pools) = fixture();
        let mut placement = Placement::from_parts(&[0, 0, 1], &graph, &pools).unwrap();
        let before = placement.clone();
        placement.move_unit(&graph, UnitId::from_raw(0), PoolId::from_raw(0));
        assert_eq!(placement.assignment(), before.assignment());
        assert_eq!(
            placement.required(PoolId::from_raw(0)),
            before.required(PoolId::from_raw(0))
        );
    }
}
