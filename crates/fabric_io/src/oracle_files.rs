//! Exchange files for a file-mediated external oracle.
//!
//! The hypergraph goes out in hMETIS format (weighted nets and weighted
//! vertices, 1-based ids), the pool interconnect in METIS graph format, and
//! the oracle's partition comes back as one pool index per line.

use crate::error::IoError;
use fabric_model::{NetlistGraph, Topology};
use std::io::Write;
use std::path::Path;

/// Writes the hypergraph in hMETIS format.
///
/// Header: net count, unit count, `11` (both net and vertex weights
/// present). One line per net: weight then 1-based unit ids, source first.
/// Then one weight line per unit.
pub fn write_hypergraph(writer: &mut impl Write, graph: &NetlistGraph) -> Result<(), IoError> {
    writeln!(writer, "{} {} 11", graph.net_count(), graph.unit_count())?;
    for net in graph.nets() {
        write!(writer, "{}", net.weight)?;
        for &unit in &net.units {
            write!(writer, " {}", unit.index() + 1)?;
        }
        writeln!(writer)?;
    }
    for unit in graph.units() {
        writeln!(writer, "{}", unit.weight)?;
    }
    Ok(())
}

/// Writes the hypergraph file.
pub fn write_hypergraph_file(path: &Path, graph: &NetlistGraph) -> Result<(), IoError> {
    let mut file = std::fs::File::create(path)?;
    write_hypergraph(&mut file, graph)
}

/// Writes the pool interconnect in METIS graph format.
///
/// Header: pool count and undirected edge count; then one line per pool
/// listing its 1-based neighbors.
pub fn write_target_graph(writer: &mut impl Write, topology: &Topology) -> Result<(), IoError> {
    let pool_count = topology.pool_count();
    let edge_count: usize = (0..pool_count as u32)
        .map(|i| topology.neighbors(fabric_model::PoolId::from_raw(i)).len())
        .sum::<usize>()
        / 2;
    writeln!(writer, "{pool_count} {edge_count}")?;
    for i in 0..pool_count as u32 {
        let neighbors = topology.neighbors(fabric_model::PoolId::from_raw(i));
        let line: Vec<String> = neighbors
            .iter()
            .map(|p| (p.index() + 1).to_string())
            .collect();
        writeln!(writer, "{}", line.join(" "))?;
    }
    Ok(())
}

/// Writes the target graph file.
pub fn write_target_graph_file(path: &Path, topology: &Topology) -> Result<(), IoError> {
    let mut file = std::fs::File::create(path)?;
    write_target_graph(&mut file, topology)
}

/// Reads an oracle partition file: one pool index per line, unit order.
pub fn read_partition(content: &str, unit_count: usize) -> Result<Vec<i64>, IoError> {
    let mut parts = Vec::with_capacity(unit_count);
    for (line_no, line) in content.lines().enumerate().map(|(i, l)| (i + 1, l)) {
        if line.trim().is_empty() {
            continue;
        }
        let part: i64 = line.trim().parse().map_err(|_| IoError::Malformed {
            file: "partition".to_string(),
            line: line_no,
            message: format!("invalid pool index '{}'", line.trim()),
        })?;
        parts.push(part);
    }
    if parts.len() != unit_count {
        return Err(IoError::Malformed {
            file: "partition".to_string(),
            line: 0,
            message: format!("expected {unit_count} entries, found {}", parts.len()),
        });
    }
    Ok(parts)
}

/// Reads an oracle partition file from disk.
pub fn read_partition_file(path: &Path, unit_count: usize) -> Result<Vec<i64>, IoError> {
    let content = std::fs::read_to_string(path)?;
    read_partition(&content, unit_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fabric_model::{PoolId, PoolSet, ResourceVec};

    fn rv(v: &[i64]) -> ResourceVec {
        ResourceVec::from_vec(v.to_vec())
    }

    fn p(i: u32) -> PoolId {
        PoolId::from_raw(i)
    }

    #[test]
    fn hypergraph_format() {
        let mut pools = PoolSet::new(1);
        for _ in 0..2 {
            pools.add_pool(rv(&[20]), 16);
        }
        let mut graph = NetlistGraph::new(1);
        let a = graph.add_unit(rv(&[2]));
        let b = graph.add_unit(rv(&[2]));
        let c = graph.add_unit(rv(&[2]));
        graph.add_net(3, vec![a, b, c]);
        graph.add_net(1, vec![b, c]);
        graph.derive_weights(&pools);

        let mut out = Vec::new();
        write_hypergraph(&mut out, &graph).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("2 3 11"));
        assert_eq!(lines.next(), Some("3 1 2 3"));
        assert_eq!(lines.next(), Some("1 2 3"));
        // 3 unit weight lines follow
        assert_eq!(lines.clone().count(), 3);
        let w = graph.unit(a).weight.to_string();
        assert_eq!(lines.next(), Some(w.as_str()));
    }

    #[test]
    fn target_graph_format() {
        let topo =
            Topology::from_edges(4, &[(p(0), p(1)), (p(1), p(2)), (p(2), p(3))]).unwrap();
        let mut out = Vec::new();
        write_target_graph(&mut out, &topo).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "4 3\n2\n1 3\n2 4\n3\n");
    }

    #[test]
    fn partition_round_trip() {
        let parts = read_partition("0\n1\n\n2\n", 3).unwrap();
        assert_eq!(parts, vec![0, 1, 2]);
    }

    #[test]
    fn partition_wrong_count_fails() {
        let err = read_partition("0\n1\n", 3).unwrap_err();
        assert!(matches!(err, IoError::Malformed { .. }));
    }

    #[test]
    fn partition_bad_entry_fails() {
        let err = read_partition("0\nx\n", 2).unwrap_err();
        assert!(matches!(err, IoError::Malformed { line: 2, .. }));
    }

    #[test]
    fn files_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let topo = Topology::from_edges(2, &[(p(0), p(1))]).unwrap();
        let path = dir.path().join("target.graph");
        write_target_graph_file(&path, &topo).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "2 1\n2\n1\n");

        let ppath = dir.path().join("parts.txt");
        std::fs::write(&ppath, "1\n0\n").unwrap();
        assert_eq!(read_partition_file(&ppath, 2).unwrap(), vec![1, 0]);
    }
}
