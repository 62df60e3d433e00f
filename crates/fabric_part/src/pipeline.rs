//! The refinement pipeline: oracle call, checks, repair stages.
//!
//! Sequences the run as a small state machine: oracle assignment, feasibility
//! check, resource repair if needed, re-check, optional hop repair, final
//! validation. The pipeline owns the placement for the duration of the run;
//! no stage terminates the process, every failure propagates as an error for
//! the caller to handle.

use crate::hop::{trim_hops, HopPolicy};
use crate::oracle::{OracleError, OracleRequest, PartitionOracle};
use crate::report::{collect_metrics, RunReport};
use crate::trim::{RepairScope, ResourceTrimmer, TrimError, TrimPolicy};
use fabric_model::{ModelError, NetlistGraph, Placement, PoolSet, Topology};
use serde::{Deserialize, Serialize};

/// The pipeline's observable states, in run order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    /// Nothing has run yet.
    Initial,
    /// The oracle returned an assignment.
    OracleAssigned,
    /// Initial feasibility metrics are available.
    Checked,
    /// The resource trimmer is running or has run.
    ResourceRepair,
    /// Metrics were recomputed after a repair stage.
    Rechecked,
    /// The hop trimmer is running or has run.
    HopRepair,
    /// Terminal: the final placement is resource-feasible.
    Done,
    /// Terminal: a fatal error ended the run.
    Failed,
}

/// Options for one refinement run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefineOptions {
    /// Oracle request parameters.
    pub oracle: OracleRequest,
    /// Resource-trimming policy.
    pub trim: TrimPolicy,
    /// Hop-trimming policy.
    pub hop: HopPolicy,
}

/// Fatal errors from a refinement run, with the state they occurred in.
#[derive(Debug, thiserror::Error)]
pub enum PartitionError {
    /// The oracle call failed or returned a bad shape.
    #[error("oracle stage failed: {0}")]
    Oracle(#[from] OracleError),

    /// The oracle's assignment could not be validated.
    #[error("oracle assignment invalid: {0}")]
    Assignment(#[from] ModelError),

    /// The resource trimmer could not reach feasibility.
    #[error("resource repair failed: {0}")]
    Trim(#[from] TrimError),
}

/// Runs the full refinement pipeline.
///
/// Calls the oracle, validates the assignment (any entry outside the pool
/// range fails before any repair logic runs), collects initial metrics, runs
/// the resource trimmer when violations exist or the policy covers all pools,
/// re-checks, then runs the bounded hop trimmer if enabled. Returns the final
/// placement with the run report; hop infeasibility is reported, not fatal.
pub fn refine(
    graph: &NetlistGraph,
    pools: &PoolSet,
    topology: &Topology,
    oracle: &dyn PartitionOracle,
    options: &RefineOptions,
) -> Result<(Placement, RunReport), PartitionError> {
    let mut states = vec![PipelineState::Initial];

    let outcome = oracle.partition(graph, pools, topology, &options.oracle)?;
    if outcome.parts.len() != graph.unit_count() {
        return Err(OracleError::BadShape {
            expected: graph.unit_count(),
            found: outcome.parts.len(),
        }
        .into());
    }
    let mut placement = Placement::from_parts(&outcome.parts, graph, pools)?;
    states.push(PipelineState::OracleAssigned);

    let initial = collect_metrics(graph, pools, topology, &placement);
    states.push(PipelineState::Checked);
    let mut report = RunReport {
        initial: initial.clone(),
        after_resource_repair: None,
        after_hop_repair: None,
        resource_moves: 0,
        hop_moves: 0,
        final_metrics: initial.clone(),
        states: Vec::new(),
    };

    let needs_resource_repair =
        !initial.resource_feasible || options.trim.scope == RepairScope::AllPools;
    if needs_resource_repair {
        states.push(PipelineState::ResourceRepair);
        let trimmer = ResourceTrimmer::new(options.trim);
        let stats = trimmer.trim_resources(graph, pools, topology, &mut placement)?;
        report.resource_moves = stats.moves_committed;
        report.after_resource_repair = Some(collect_metrics(graph, pools, topology, &placement));
        states.push(PipelineState::Rechecked);
    }

    if options.hop.enabled {
        states.push(PipelineState::HopRepair);
        let outcome = trim_hops(graph, pools, topology, &mut placement, &options.hop);
        report.hop_moves = outcome.moves_committed;
        report.after_hop_repair = Some(collect_metrics(graph, pools, topology, &placement));
        states.push(PipelineState::Rechecked);
    }

    report.final_metrics = collect_metrics(graph, pools, topology, &placement);
    states.push(PipelineState::Done);
    report.states = states;
    Ok((placement, report))
}
