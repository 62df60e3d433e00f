//! File-mediated external oracle: spawns a partitioner binary.
//!
//! Writes the hypergraph (hMETIS) and target graph (METIS) exchange files
//! into a work directory, invokes the configured binary with
//! mt-kahypar-style arguments, and reads the partition file it leaves in the
//! work directory. The subprocess is an opaque blocking call; any failure
//! maps to an oracle error.

use fabric_model::{NetlistGraph, Placement, PoolSet, Topology};
use fabric_part::{
    hop_report, Objective, OracleError, OracleOutcome, OracleRequest, PartitionOracle,
};
use std::path::{Path, PathBuf};
use std::process::Command;

/// An external partitioner invoked as a subprocess.
pub struct ExternalOracle {
    bin: PathBuf,
    work_dir: PathBuf,
}

impl ExternalOracle {
    /// Creates an oracle that runs `bin` with exchange files in `work_dir`.
    pub fn new(bin: impl Into<PathBuf>, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            bin: bin.into(),
            work_dir: work_dir.into(),
        }
    }

    fn objective_flag(objective: Objective) -> &'static str {
        match objective {
            Objective::SteinerTree => "steiner_tree",
            Objective::ConnectivityCut => "km1",
        }
    }

    /// Finds the partition file the binary wrote into the output folder.
    ///
    /// The binary names its output after the input file plus run parameters,
    /// so the newest regular file in the folder is the result.
    fn newest_file(dir: &Path) -> Result<PathBuf, OracleError> {
        let mut newest: Option<(std::time::SystemTime, PathBuf)> = None;
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let modified = entry.metadata()?.modified()?;
            if newest.as_ref().map_or(true, |(t, _)| modified > *t) {
                newest = Some((modified, entry.path()));
            }
        }
        newest
            .map(|(_, path)| path)
            .ok_or_else(|| OracleError::Failed("partitioner wrote no output file".to_string()))
    }
}

impl PartitionOracle for ExternalOracle {
    fn partition(
        &self,
        graph: &NetlistGraph,
        pools: &PoolSet,
        topology: &Topology,
        request: &OracleRequest,
    ) -> Result<OracleOutcome, OracleError> {
        std::fs::create_dir_all(&self.work_dir)?;
        let hypergraph_file = self.work_dir.join("input_hypergraph.txt");
        let target_graph_file = self.work_dir.join("input_target_graph.txt");
        let out_dir = self.work_dir.join("parts");
        std::fs::create_dir_all(&out_dir)?;

        fabric_io::write_hypergraph_file(&hypergraph_file, graph)
            .map_err(|e| OracleError::Failed(e.to_string()))?;
        fabric_io::write_target_graph_file(&target_graph_file, topology)
            .map_err(|e| OracleError::Failed(e.to_string()))?;

        let status = Command::new(&self.bin)
            .arg("-h")
            .arg(&hypergraph_file)
            .arg("--preset-type=deterministic")
            .arg("-t")
            .arg(request.threads.to_string())
            .arg("-k")
            .arg(pools.len().to_string())
            .arg("-e")
            .arg(format!("{:.20}", request.imbalance))
            .arg("-g")
            .arg(&target_graph_file)
            .arg("-o")
            .arg(Self::objective_flag(request.objective))
            .arg("--write-partition-file=true")
            .arg("--partition-output-folder")
            .arg(&out_dir)
            .arg("--seed")
            .arg(request.seed.to_string())
            .status()?;
        if !status.success() {
            return Err(OracleError::Failed(format!(
                "partitioner exited with {status}"
            )));
        }

        let result_file = Self::newest_file(&out_dir)?;
        let parts = fabric_io::read_partition_file(&result_file, graph.unit_count())
            .map_err(|e| OracleError::Failed(e.to_string()))?;

        // The binary reports its own metrics on stdout; recompute here so the
        // outcome is self-contained.
        let mut block_weights = vec![0_i64; pools.len()];
        for (i, &part) in parts.iter().enumerate() {
            if part >= 0 && (part as usize) < pools.len() {
                block_weights[part as usize] +=
                    graph.unit(fabric_model::UnitId::from_raw(i as u32)).weight;
            }
        }
        let mean = block_weights.iter().sum::<i64>() as f64 / pools.len().max(1) as f64;
        let imbalance = if mean > 0.0 {
            block_weights
                .iter()
                .map(|&w| w as f64 / mean - 1.0)
                .fold(0.0, f64::max)
        } else {
            0.0
        };
        let hop_metric = match Placement::from_parts(&parts, graph, pools) {
            Ok(placement) => hop_report(
                graph,
                placement.assignment(),
                topology,
                pools.hop_budget(),
            )
            .total_weighted as f64,
            Err(_) => f64::NAN,
        };

        Ok(OracleOutcome {
            parts,
            imbalance,
            hop_metric,
            block_weights,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fabric_model::{PoolId, ResourceVec};

    fn rv(v: &[i64]) -> ResourceVec {
        ResourceVec::from_vec(v.to_vec())
    }

    fn fixture() -> (NetlistGraph, PoolSet, Topology) {
        let mut pools = PoolSet::new(1);
        pools.add_pool(rv(&[10]), 16);
        pools.add_pool(rv(&[10]), 16);
        pools.set_hop_budget(1);
        let topo =
            Topology::from_edges(2, &[(PoolId::from_raw(0), PoolId::from_raw(1))]).unwrap();
        let mut graph = NetlistGraph::new(1);
        graph.add_unit(rv(&[2]));
        graph.add_unit(rv(&[2]));
        graph.derive_weights(&pools);
        (graph, pools, topo)
    }

    #[test]
    fn missing_binary_is_oracle_error() {
        let (graph, pools, topo) = fixture();
        let dir = tempfile::tempdir().unwrap();
        let oracle = ExternalOracle::new("/nonexistent/partitioner", dir.path());
        let err = oracle
            .partition(&graph, &pools, &topo, &OracleRequest::default())
            .unwrap_err();
        assert!(matches!(err, OracleError::Io(_)));
    }

    #[cfg(unix)]
    #[test]
    fn fake_partitioner_round_trip() {
        use std::os::unix::fs::PermissionsExt;

        let (graph, pools, topo) = fixture();
        let dir = tempfile::tempdir().unwrap();

        // A stand-in partitioner that ignores its input and writes a fixed
        // partition into the output folder.
        let script = dir.path().join("fake_part.sh");
        let out_dir = dir.path().join("parts");
        std::fs::write(
            &script,
            "#!/bin/sh\nmkdir -p \"$(dirname \"$0\")/parts\"\nprintf '1\\n0\\n' > \"$(dirname \"$0\")/parts/result.txt\"\n",
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let oracle = ExternalOracle::new(&script, dir.path());
        let outcome = oracle
            .partition(&graph, &pools, &topo, &OracleRequest::default())
            .unwrap();
        assert_eq!(outcome.parts, vec![1, 0]);
        assert_eq!(outcome.block_weights.len(), 2);
        assert!(out_dir.exists());
    }

    #[test]
    fn failing_binary_is_oracle_error() {
        let (graph, pools, topo) = fixture();
        let dir = tempfile::tempdir().unwrap();
        let oracle = ExternalOracle::new("/bin/false", dir.path());
        let err = oracle
            .partition(&graph, &pools, &topo, &OracleRequest::default())
            .unwrap_err();
        assert!(matches!(err, OracleError::Failed(_)));
    }
}
