//! Device pool descriptions.
//!
//! A [`Pool`] is one physical device with a K-dimensional resource capacity
//! and an external-interconnect bound; the [`PoolSet`] collects all pools of
//! a design together with the per-net hop budget shared by every pool.

use crate::ids::PoolId;
use crate::resources::ResourceVec;
use serde::{Deserialize, Serialize};

/// One physical resource pool (an accelerator device).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pool {
    /// The unique ID of this pool.
    pub id: PoolId,
    /// Per-dimension resource capacity.
    pub capacity: ResourceVec,
    /// Maximum external interconnects (cut-degree bound) for this pool.
    pub max_interconnects: i64,
}

/// The fixed set of pools a design is mapped onto.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolSet {
    pools: Vec<Pool>,
    hop_budget: u32,
    dims: usize,
}

impl PoolSet {
    /// Creates an empty pool set with the given resource dimensionality.
    pub fn new(dims: usize) -> Self {
        Self {
            pools: Vec::new(),
            hop_budget: 0,
            dims,
        }
    }

    /// Adds a pool and returns its ID.
    pub fn add_pool(&mut self, capacity: ResourceVec, max_interconnects: i64) -> PoolId {
        debug_assert_eq!(capacity.dims(), self.dims);
        let id = PoolId::from_raw(self.pools.len() as u32);
        self.pools.push(Pool {
            id,
            capacity,
            max_interconnects,
        });
        id
    }

    /// Sets the maximum allowed hop cost for any single net.
    pub fn set_hop_budget(&mut self, budget: u32) {
        self.hop_budget = budget;
    }

    /// Returns the maximum allowed hop cost for any single net.
    pub fn hop_budget(&self) -> u32 {
        self.hop_budget
    }

    /// Returns the pool with the given ID.
    pub fn pool(&self, id: PoolId) -> &Pool {
        &self.pools[id.index()]
    }

    /// Returns the capacity vector of the given pool.
    pub fn capacity(&self, id: PoolId) -> &ResourceVec {
        &self.pools[id.index()].capacity
    }

    /// Returns the number of pools.
    pub fn len(&self) -> usize {
        self.pools.len()
    }

    /// Returns whether the set contains no pools.
    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    /// Returns the resource dimensionality shared by every pool.
    pub fn dims(&self) -> usize {
        self.dims
    }

    /// Iterates over all pools in ID order.
    pub fn iter(&self) -> impl Iterator<Item = &Pool> {
        self.pools.iter()
    }

    /// Iterates over all pool IDs in order.
    pub fn ids(&self) -> impl Iterator<Item = PoolId> {
        (0..self.pools.len() as u32).map(PoolId::from_raw)
    }

    /// Returns the componentwise sum of all pool capacities.
    pub fn total_capacity(&self) -> ResourceVec {
        let mut total = ResourceVec::zeros(self.dims);
        for pool in &self.pools {
            total.add_assign(&pool.capacity);
        }
        total
    }

    /// Returns the componentwise minimum over all pool capacities.
    ///
    /// Used as the per-dimension lower bound when deriving the oracle's
    /// imbalance target.
    pub fn min_capacity(&self) -> ResourceVec {
        let mut min = vec![i64::MAX; self.dims];
        for pool in &self.pools {
            for (d, slot) in min.iter_mut().enumerate() {
                *slot = (*slot).min(pool.capacity.get(d));
            }
        }
        ResourceVec::from_vec(min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rv(v: &[i64]) -> ResourceVec {
        ResourceVec::from_vec(v.to_vec())
    }

    #[test]
    fn add_pool_assigns_sequential_ids() {
        let mut pools = PoolSet::new(2);
        let a = pools.add_pool(rv(&[10, 10]), 16);
        let b = pools.add_pool(rv(&[20, 5]), 16);
        assert_eq!(a.as_raw(), 0);
        assert_eq!(b.as_raw(), 1);
        assert_eq!(pools.len(), 2);
        assert_eq!(pools.pool(b).capacity, rv(&[20, 5]));
    }

    #[test]
    fn total_and_min_capacity() {
        let mut pools = PoolSet::new(2);
        pools.add_pool(rv(&[10, 10]), 16);
        pools.add_pool(rv(&[20, 5]), 16);
        assert_eq!(pools.total_capacity(), rv(&[30, 15]));
        assert_eq!(pools.min_capacity(), rv(&[10, 5]));
    }

    #[test]
    fn hop_budget_roundtrip() {
        let mut pools = PoolSet::new(1);
        pools.set_hop_budget(3);
        assert_eq!(pools.hop_budget(), 3);
    }

    #[test]
    fn empty_set() {
        let pools = PoolSet::new(8);
        assert!(pools.is_empty());
        assert_eq!(pools.dims(), 8);
    }
}
