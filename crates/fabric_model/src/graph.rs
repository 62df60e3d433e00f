//! The netlist hypergraph.
//!
//! [`Unit`]s are logic nodes with a K-dimensional resource demand; [`Net`]s
//! are multi-terminal hyperedges whose first terminal is the distinguished
//! source. The [`NetlistGraph`] owns both plus the derived per-unit incidence
//! lists and aggregate totals. It is built once from external input and is
//! read-only during refinement.

use crate::device::PoolSet;
use crate::ids::{NetId, UnitId};
use crate::resources::ResourceVec;
use serde::{Deserialize, Serialize};

/// A logic unit to be placed onto a pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    /// The unique ID of this unit.
    pub id: UnitId,
    /// Per-dimension resource demand.
    pub demand: ResourceVec,
    /// Scalar weight reflecting the most constrained resource dimension.
    ///
    /// Derived by [`NetlistGraph::derive_weights`]; zero until then.
    pub weight: i64,
}

/// A multi-terminal net (hyperedge) with one distinguished source terminal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Net {
    /// The unique ID of this net.
    pub id: NetId,
    /// Scalar net weight.
    pub weight: i64,
    /// The connected units; the first entry is the source.
    pub units: Vec<UnitId>,
}

impl Net {
    /// Returns the distinguished source unit of this net.
    pub fn source(&self) -> UnitId {
        self.units[0]
    }
}

/// The full netlist: all units, all nets, and the derived incidence lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetlistGraph {
    units: Vec<Unit>,
    nets: Vec<Net>,
    incident: Vec<Vec<NetId>>,
    pin_count: usize,
    total_demand: ResourceVec,
}

impl NetlistGraph {
    /// Creates an empty graph with the given resource dimensionality.
    pub fn new(dims: usize) -> Self {
        Self {
            units: Vec::new(),
            nets: Vec::new(),
            incident: Vec::new(),
            pin_count: 0,
            total_demand: ResourceVec::zeros(dims),
        }
    }

    /// Adds a unit with the given demand and returns its ID.
    pub fn add_unit(&mut self, demand: ResourceVec) -> UnitId {
        let id = UnitId::from_raw(self.units.len() as u32);
        self.total_demand.add_assign(&demand);
        self.units.push(Unit {
            id,
            demand,
            weight: 0,
        });
        self.incident.push(Vec::new());
        id
    }

    /// Adds a net and returns its ID.
    ///
    /// The first entry of `units` is the net's source terminal; `units` must
    /// not be empty.
    pub fn add_net(&mut self, weight: i64, units: Vec<UnitId>) -> NetId {
        debug_assert!(!units.is_empty(), "a net needs at least a source");
        let id = NetId::from_raw(self.nets.len() as u32);
        self.pin_count += units.len();
        for &unit in &units {
            self.incident[unit.index()].push(id);
        }
        self.nets.push(Net { id, weight, units });
        id
    }

    /// Returns the unit with the given ID.
    pub fn unit(&self, id: UnitId) -> &Unit {
        &self.units[id.index()]
    }

    /// Returns the net with the given ID.
    pub fn net(&self, id: NetId) -> &Net {
        &self.nets[id.index()]
    }

    /// Returns the nets incident to the given unit.
    pub fn incident(&self, unit: UnitId) -> &[NetId] {
        &self.incident[unit.index()]
    }

    /// Returns the number of units.
    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    /// Returns the number of nets.
    pub fn net_count(&self) -> usize {
        self.nets.len()
    }

    /// Returns the total pin count over all nets.
    pub fn pin_count(&self) -> usize {
        self.pin_count
    }

    /// Returns the componentwise sum of all unit demands.
    pub fn total_demand(&self) -> &ResourceVec {
        &self.total_demand
    }

    /// Iterates over all units in ID order.
    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter()
    }

    /// Iterates over all nets in ID order.
    pub fn nets(&self) -> impl Iterator<Item = &Net> {
        self.nets.iter()
    }

    /// Iterates over all unit IDs in order.
    pub fn unit_ids(&self) -> impl Iterator<Item = UnitId> {
        (0..self.units.len() as u32).map(UnitId::from_raw)
    }

    /// Derives each unit's scalar weight from the pool capacities.
    ///
    /// The weight is `max_d(demand[d] / total_capacity[d]) * capacity_sum`,
    /// so it reflects a unit's most constrained resource dimension rather
    /// than a plain demand sum.
    pub fn derive_weights(&mut self, pools: &PoolSet) {
        let total = pools.total_capacity();
        let capacity_sum = total.total();
        for unit in &mut self.units {
            let mut max_ratio = 0.0_f64;
            for (d, demand) in unit.demand.iter().enumerate() {
                let cap = total.get(d);
                if cap > 0 {
                    max_ratio = max_ratio.max(demand as f64 / cap as f64);
                }
            }
            unit.weight = (max_ratio * capacity_sum as f64).round() as i64;
        }
    }
}
