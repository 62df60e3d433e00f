//! Partition refinement engine for the Fabric multi-device mapper.
//!
//! This crate takes a coarse unit-to-pool assignment from a partitioning
//! oracle and repairs it against the device constraints: per-pool resource
//! capacity (hard) and per-net hop budget (best-effort). The stages are
//! sequenced by [`refine`]:
//!
//! 1. **Oracle** — obtain the initial assignment ([`PartitionOracle`])
//! 2. **Check** — resource and hop feasibility metrics ([`check`])
//! 3. **Resource repair** — ranked gain-guided migration ([`ResourceTrimmer`])
//! 4. **Hop repair** — bounded relocation of over-budget nets ([`trim_hops`])
//!
//! # Usage
//!
//! ```ignore
//! use fabric_part::{refine, GreedyOracle, RefineOptions};
//!
//! let (placement, report) =
//!     refine(&graph, &pools, &topology, &GreedyOracle, &RefineOptions::default())?;
//! assert!(report.final_metrics.resource_feasible);
//! ```

#![warn(missing_docs)]

pub mod check;
pub mod gain;
pub mod hop;
pub mod oracle;
pub mod pipeline;
pub mod report;
pub mod trim;

pub use check::{hop_report, net_hop_count, resource_violations, HopReport, ResourceViolation};
pub use gain::move_gain;
pub use hop::{trim_hops, HopOutcome, HopPolicy};
pub use oracle::{
    derive_imbalance, GreedyOracle, ImbalanceMode, Objective, OracleError, OracleOutcome,
    OracleRequest, PartitionOracle,
};
pub use pipeline::{refine, PartitionError, PipelineState, RefineOptions};
pub use report::{collect_metrics, RunReport, StageMetrics};
pub use trim::{
    Granularity, RankOrder, RepairScope, ResourceTrimmer, TrimError, TrimPolicy, TrimStats,
};
