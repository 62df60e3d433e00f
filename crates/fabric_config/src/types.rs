//! Configuration schema for a `fabric.toml` run configuration.

use fabric_part::{HopPolicy, ImbalanceMode, Objective, TrimPolicy};
use serde::{Deserialize, Serialize};

/// Which oracle implementation to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OracleKind {
    /// The in-process greedy oracle.
    Builtin,
    /// An external partitioner binary exchanging files.
    External,
}

/// The `[oracle]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleSection {
    /// Oracle implementation kind.
    pub kind: OracleKind,
    /// Path to the external partitioner binary (`kind = "external"` only).
    pub bin: Option<String>,
    /// Parallelism hint passed to the oracle.
    pub threads: usize,
    /// Seed for deterministic runs.
    pub seed: u64,
    /// Explicit imbalance target; derived from capacity headroom if absent.
    pub imbalance: Option<f64>,
    /// Headroom derivation mode when `imbalance` is absent.
    pub imbalance_mode: ImbalanceMode,
    /// Objective passed to the oracle.
    pub objective: Objective,
}

impl Default for OracleSection {
    fn default() -> Self {
        Self {
            kind: OracleKind::Builtin,
            bin: None,
            threads: 4,
            seed: 0,
            imbalance: None,
            imbalance_mode: ImbalanceMode::Tightest,
            objective: Objective::SteinerTree,
        }
    }
}

/// The complete run configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Oracle selection and parameters.
    pub oracle: OracleSection,
    /// Resource-trimming policy.
    pub trim: TrimPolicy,
    /// Hop-trimming policy.
    pub hop: HopPolicy,
}
