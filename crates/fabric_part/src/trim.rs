//! Resource repair: ranked, greedy, gain-guided migration of units.
//!
//! The trimmer eliminates per-pool resource violations by migrating units to
//! other pools, preferring the migrations with the least hop-cost damage
//! (highest gain). Its ranking and commit behavior are controlled by an
//! immutable [`TrimPolicy`] value: pool order, unit order, gain order, bulk
//! vs one-by-one granularity, and violators-only vs all-pools scope. A pool
//! that cannot be made feasible is a hard error, not a retryable condition.

use crate::check::resource_violations;
use crate::gain::move_gain;
use fabric_model::{NetlistGraph, Placement, PoolId, PoolSet, Topology, UnitId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Sort direction for a ranking key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankOrder {
    /// Smallest key first.
    Ascending,
    /// Largest key first.
    Descending,
}

/// How many moves are committed per candidate-generation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    /// Rank once, commit greedily down the list. Cheap; gains go stale as
    /// earlier commits change the assignment.
    Bulk,
    /// Re-generate and re-rank candidates after every committed move. Most
    /// accurate, most expensive.
    OneByOne,
}

/// Which pools get a trimming pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairScope {
    /// Only pools currently violating a resource constraint.
    ViolatorsOnly,
    /// Every pool, violating or not, to let the trimmer improve balance.
    AllPools,
}

/// Immutable policy configuring one resource-trimming pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrimPolicy {
    /// Pool processing order by maximum utilization ratio.
    pub pool_order: RankOrder,
    /// Unit ranking order by (weight, incident degree).
    pub unit_order: RankOrder,
    /// Candidate ordering by gain.
    pub gain_order: RankOrder,
    /// Bulk or one-by-one commit granularity.
    pub granularity: Granularity,
    /// Violators-only or all-pools scope.
    pub scope: RepairScope,
    /// Optional hop radius limiting candidate target pools to the
    /// reachability set of the pool under repair. `None` considers all
    /// pools.
    pub reach_radius: Option<u32>,
}

impl Default for TrimPolicy {
    fn default() -> Self {
        Self {
            pool_order: RankOrder::Descending,
            unit_order: RankOrder::Descending,
            gain_order: RankOrder::Descending,
            granularity: Granularity::Bulk,
            scope: RepairScope::ViolatorsOnly,
            reach_radius: None,
        }
    }
}

/// Counters from one trimming pass, kept for diagnosis and reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrimStats {
    /// Pools that received a trimming pass.
    pub pools_processed: usize,
    /// Moves actually committed.
    pub moves_committed: usize,
    /// Move candidates whose gain was evaluated.
    pub candidates_evaluated: usize,
}

/// Errors from a failed resource-trimming pass. All are fatal to the run.
#[derive(Debug, thiserror::Error)]
pub enum TrimError {
    /// The greedy migration could not make a pool resource-feasible.
    #[error(
        "pool {pool} still exceeds capacity in dimension(s) {dims:?} \
         after {moves_attempted} committed move(s)"
    )]
    PoolInfeasible {
        /// The pool left infeasible.
        pool: PoolId,
        /// Dimensions still over capacity.
        dims: Vec<usize>,
        /// Moves committed across the whole pass before failing.
        moves_attempted: usize,
    },

    /// The all-pools pass finished a pool without visiting every unit.
    ///
    /// This is an implementation invariant, never an expected outcome.
    #[error("all-pools pass left {remaining} unit(s) of pool {pool} unvisited")]
    UnitsUnvisited {
        /// The pool whose pass ended early.
        pool: PoolId,
        /// Units never considered.
        remaining: usize,
    },
}

/// A candidate relocation of one unit to one target pool.
#[derive(Debug, Clone, Copy)]
struct MoveCandidate {
    unit: UnitId,
    target: PoolId,
    gain: i64,
}

/// The resource repair engine.
#[derive(Debug, Clone)]
pub struct ResourceTrimmer {
    policy: TrimPolicy,
}

impl ResourceTrimmer {
    /// Creates a trimmer with the given policy.
    pub fn new(policy: TrimPolicy) -> Self {
        Self { policy }
    }

    /// Runs one repair pass, mutating the placement in place.
    ///
    /// On success every pool that got a pass is resource-feasible. Callers
    /// must not read the placement mid-pass; intermediate states may be
    /// infeasible for pools other than the one being fixed.
    pub fn trim_resources(
        &self,
        graph: &NetlistGraph,
        pools: &PoolSet,
        topology: &Topology,
        placement: &mut Placement,
    ) -> Result<TrimStats, TrimError> {
        let mut stats = TrimStats::default();

        let violating: HashSet<PoolId> = resource_violations(pools, placement)
            .into_iter()
            .map(|v| v.pool)
            .collect();

        for pool in self.ranked_pools(pools, placement) {
            let is_violator = violating.contains(&pool);
            if !is_violator && self.policy.scope == RepairScope::ViolatorsOnly {
                continue;
            }
            stats.pools_processed += 1;

            let initial_members = placement.members(pool).len();
            let visited = match self.policy.granularity {
                Granularity::Bulk => {
                    self.trim_pool_bulk(graph, pools, topology, placement, pool, &mut stats)
                }
                Granularity::OneByOne => {
                    self.trim_pool_stepwise(graph, pools, topology, placement, pool, &mut stats)
                }
            };

            let dims = placement.required(pool).exceeded_dims(pools.capacity(pool));
            if !dims.is_empty() {
                return Err(TrimError::PoolInfeasible {
                    pool,
                    dims,
                    moves_attempted: stats.moves_committed,
                });
            }
            if self.policy.scope == RepairScope::AllPools && visited < initial_members {
                return Err(TrimError::UnitsUnvisited {
                    pool,
                    remaining: initial_members - visited,
                });
            }
        }

        Ok(stats)
    }

    /// Ranks all pools by maximum per-dimension utilization ratio.
    fn ranked_pools(&self, pools: &PoolSet, placement: &Placement) -> Vec<PoolId> {
        let mut ranked: Vec<(f64, PoolId)> = pools
            .ids()
            .map(|pool| {
                (
                    placement.required(pool).max_utilization(pools.capacity(pool)),
                    pool,
                )
            })
            .collect();
        match self.policy.pool_order {
            RankOrder::Ascending => ranked.sort_by(|a, b| a.0.total_cmp(&b.0)),
            RankOrder::Descending => ranked.sort_by(|a, b| b.0.total_cmp(&a.0)),
        }
        ranked.into_iter().map(|(_, pool)| pool).collect()
    }

    /// Ranks a pool's units by (weight, incident degree), skipping `exclude`.
    fn ranked_units(
        &self,
        graph: &NetlistGraph,
        placement: &Placement,
        pool: PoolId,
        exclude: &HashSet<UnitId>,
    ) -> Vec<UnitId> {
        let mut units: Vec<UnitId> = placement
            .members(pool)
            .iter()
            .copied()
            .filter(|u| !exclude.contains(u))
            .collect();
        let key = |u: &UnitId| (graph.unit(*u).weight, graph.incident(*u).len());
        match self.policy.unit_order {
            RankOrder::Ascending => units.sort_by_key(key),
            RankOrder::Descending => {
                units.sort_by_key(key);
                units.reverse();
            }
        }
        units
    }

    /// Candidate target pools for units leaving `pool`.
    fn candidate_targets(&self, pools: &PoolSet, topology: &Topology, pool: PoolId) -> Vec<PoolId> {
        match self.policy.reach_radius {
            None => pools.ids().collect(),
            Some(radius) => {
                let mut targets: Vec<PoolId> = topology
                    .reachable_within(pool, radius)
                    .iter()
                    .copied()
                    .collect();
                targets.sort_by_key(|t| t.as_raw());
                targets
            }
        }
    }

    /// Generates gain-sorted move candidates for the given units.
    fn ranked_candidates(
        &self,
        graph: &NetlistGraph,
        topology: &Topology,
        placement: &Placement,
        units: &[UnitId],
        targets: &[PoolId],
        stats: &mut TrimStats,
    ) -> Vec<MoveCandidate> {
        let mut candidates = Vec::with_capacity(units.len() * targets.len());
        for &unit in units {
            for &target in targets {
                let gain = move_gain(graph, placement, topology, unit, target);
                stats.candidates_evaluated += 1;
                candidates.push(MoveCandidate { unit, target, gain });
            }
        }
        match self.policy.gain_order {
            RankOrder::Ascending => candidates.sort_by_key(|c| c.gain),
            RankOrder::Descending => candidates.sort_by_key(|c| std::cmp::Reverse(c.gain)),
        }
        candidates
    }

    /// Bulk mode: one candidate generation pass, commits straight down the
    /// sorted list. Gains go stale as moves land; that is the accepted
    /// trade-off of this mode.
    fn trim_pool_bulk(
        &self,
        graph: &NetlistGraph,
        pools: &PoolSet,
        topology: &Topology,
        placement: &mut Placement,
        pool: PoolId,
        stats: &mut TrimStats,
    ) -> usize {
        let initial_members = placement.members(pool).len();
        let units = self.ranked_units(graph, placement, pool, &HashSet::new());
        let targets = self.candidate_targets(pools, topology, pool);
        let candidates =
            self.ranked_candidates(graph, topology, placement, &units, &targets, stats);

        let mut visited: HashSet<UnitId> = HashSet::new();
        for candidate in candidates {
            if visited.contains(&candidate.unit) {
                continue;
            }
            match self.try_commit(graph, pools, placement, pool, &candidate) {
                Commit::PoolFixed => break,
                Commit::Rejected => continue,
                Commit::Stayed => {
                    visited.insert(candidate.unit);
                }
                Commit::Committed => {
                    visited.insert(candidate.unit);
                    stats.moves_committed += 1;
                }
            }
            if visited.len() == initial_members {
                break;
            }
            if self.policy.scope == RepairScope::ViolatorsOnly
                && placement.required(pool).fits_within(pools.capacity(pool))
            {
                break;
            }
        }
        visited.len()
    }

    /// One-by-one mode: re-derives the unit ranking and all gains after every
    /// committed move, since incident-net state changes under the move.
    fn trim_pool_stepwise(
        &self,
        graph: &NetlistGraph,
        pools: &PoolSet,
        topology: &Topology,
        placement: &mut Placement,
        pool: PoolId,
        stats: &mut TrimStats,
    ) -> usize {
        let initial_members = placement.members(pool).len();
        let targets = self.candidate_targets(pools, topology, pool);
        let mut visited: HashSet<UnitId> = HashSet::new();

        loop {
            if self.policy.scope == RepairScope::ViolatorsOnly
                && placement.required(pool).fits_within(pools.capacity(pool))
            {
                break;
            }
            if visited.len() == initial_members {
                break;
            }

            let units = self.ranked_units(graph, placement, pool, &visited);
            let candidates =
                self.ranked_candidates(graph, topology, placement, &units, &targets, stats);

            let mut committed = false;
            for candidate in candidates {
                match self.try_commit(graph, pools, placement, pool, &candidate) {
                    Commit::PoolFixed => return visited.len(),
                    Commit::Rejected => continue,
                    Commit::Stayed => {
                        visited.insert(candidate.unit);
                        committed = true;
                        break;
                    }
                    Commit::Committed => {
                        visited.insert(candidate.unit);
                        stats.moves_committed += 1;
                        committed = true;
                        break;
                    }
                }
            }
            if !committed {
                break;
            }
        }
        visited.len()
    }

    /// Attempts to commit one candidate under the feasibility rules.
    fn try_commit(
        &self,
        graph: &NetlistGraph,
        pools: &PoolSet,
        placement: &mut Placement,
        pool: PoolId,
        candidate: &MoveCandidate,
    ) -> Commit {
        let from = placement.pool_of(candidate.unit);
        if candidate.target == from {
            // A feasible stay signals the pool is fixed. In violators-only
            // scope that ends the round; in all-pools scope the unit still
            // counts as considered. An infeasible stay is just skipped.
            if placement.required(pool).fits_within(pools.capacity(pool)) {
                return match self.policy.scope {
                    RepairScope::ViolatorsOnly => Commit::PoolFixed,
                    RepairScope::AllPools => Commit::Stayed,
                };
            }
            return Commit::Rejected;
        }

        // Strict componentwise check: the target must stay within capacity in
        // every dimension after the hypothetical addition.
        let after = placement
            .required(candidate.target)
            .plus(&graph.unit(candidate.unit).demand);
        if !after.fits_within(pools.capacity(candidate.target)) {
            return Commit::Rejected;
        }

        placement.move_unit(graph, candidate.unit, candidate.target);
        Commit::Committed
    }
}

enum Commit {
    Committed,
    Stayed,
    Rejected,
    PoolFixed,
}
