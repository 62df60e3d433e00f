//! The pool interconnect topology.
//!
//! Built once from the undirected pool adjacency list. Derives the all-pairs
//! hop distance matrix (BFS from every pool), each pool's eccentricity, and
//! the radius-indexed reachability sets `S[i][x]` = pools within distance
//! `x` of pool `i`. Disconnected pool pairs get the [`UNREACHABLE`] sentinel
//! so hop checks fail for them instead of silently passing.

use crate::error::ModelError;
use crate::ids::PoolId;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

/// Sentinel distance for disconnected pool pairs.
///
/// Larger than any achievable hop budget; cost sums involving it must
/// saturate rather than wrap.
pub const UNREACHABLE: u32 = u32::MAX;

/// All-pairs hop distances and reachability sets over the pool graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topology {
    dist: Vec<Vec<u32>>,
    eccentricity: Vec<u32>,
    reach: Vec<Vec<HashSet<PoolId>>>,
}

impl Topology {
    /// Builds the topology from an undirected pool adjacency edge list.
    ///
    /// Runs one BFS per pool; deterministic for deterministic input.
    pub fn from_edges(pool_count: usize, edges: &[(PoolId, PoolId)]) -> Result<Self, ModelError> {
        let mut adjacency = vec![Vec::new(); pool_count];
        for &(a, b) in edges {
            if a.index() >= pool_count {
                return Err(ModelError::UnknownPool { pool: a });
            }
            if b.index() >= pool_count {
                return Err(ModelError::UnknownPool { pool: b });
            }
            adjacency[a.index()].push(b.index());
            adjacency[b.index()].push(a.index());
        }

        let mut dist = vec![vec![UNREACHABLE; pool_count]; pool_count];
        let mut eccentricity = vec![0_u32; pool_count];
        for start in 0..pool_count {
            dist[start][start] = 0;
            let mut queue = VecDeque::new();
            queue.push_back(start);
            while let Some(cur) = queue.pop_front() {
                for &next in &adjacency[cur] {
                    if dist[start][next] == UNREACHABLE {
                        dist[start][next] = dist[start][cur] + 1;
                        eccentricity[start] = eccentricity[start].max(dist[start][next]);
                        queue.push_back(next);
                    }
                }
            }
        }

        // S[i][x]: pools within distance x, one set per radius up to the
        // pool's eccentricity. S[i][0] is {i}.
        let mut reach = Vec::with_capacity(pool_count);
        for i in 0..pool_count {
            let mut sets = Vec::with_capacity(eccentricity[i] as usize + 1);
            for x in 0..=eccentricity[i] {
                let set: HashSet<PoolId> = (0..pool_count)
                    .filter(|&j| dist[i][j] <= x)
                    .map(|j| PoolId::from_raw(j as u32))
                    .collect();
                sets.push(set);
            }
            reach.push(sets);
        }

        Ok(Self {
            dist,
            eccentricity,
            reach,
        })
    }

    /// Returns the hop distance between two pools.
    pub fn distance(&self, a: PoolId, b: PoolId) -> u32 {
        self.dist[a.index()][b.index()]
    }

    /// Returns the number of pools.
    pub fn pool_count(&self) -> usize {
        self.dist.len()
    }

    /// Returns the eccentricity (maximum finite distance) of a pool.
    pub fn eccentricity(&self, pool: PoolId) -> u32 {
        self.eccentricity[pool.index()]
    }

    /// Returns the set of pools within distance `radius` of `pool`.
    ///
    /// Radii beyond the pool's eccentricity saturate to the full reachable
    /// set, keeping the sets monotone in the radius.
    pub fn reachable_within(&self, pool: PoolId, radius: u32) -> &HashSet<PoolId> {
        let sets = &self.reach[pool.index()];
        let x = (radius as usize).min(sets.len() - 1);
        &sets[x]
    }

    /// Returns the neighbors of a pool (distance exactly 1).
    pub fn neighbors(&self, pool: PoolId) -> Vec<PoolId> {
        (0..self.pool_count())
            .map(|j| PoolId::from_raw(j as u32))
            .filter(|&j| self.dist[pool.index()][j.index()] == 1)
            .collect()
    }
}
