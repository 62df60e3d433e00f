//! The persisted assignment format: one line per pool, external names.
//!
//! Each line is the pool's external name, a colon, and the external names of
//! every unit assigned to it, in pool index order.

use crate::error::IoError;
use crate::names::NameTable;
use std::io::Write;
use std::path::Path;

/// Writes the assignment to `writer`, one pool per line.
///
/// Units are listed in unit-index order within each pool so output is
/// deterministic.
pub fn write_assignment(
    writer: &mut impl Write,
    parts: &[i64],
    pool_names: &NameTable,
    unit_names: &NameTable,
) -> Result<(), IoError> {
    let mut members: Vec<Vec<usize>> = vec![Vec::new(); pool_names.len()];
    for (unit, &part) in parts.iter().enumerate() {
        if part >= 0 && (part as usize) < members.len() {
            members[part as usize].push(unit);
        }
    }

    for (pool, units) in members.iter().enumerate() {
        write!(writer, "{}:", pool_names.name_of(pool as u32).unwrap_or(""))?;
        for &unit in units {
            write!(writer, " {}", unit_names.name_of(unit as u32).unwrap_or(""))?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Writes the assignment to a file.
pub fn write_assignment_file(
    path: &Path,
    parts: &[i64],
    pool_names: &NameTable,
    unit_names: &NameTable,
) -> Result<(), IoError> {
    let mut file = std::fs::File::create(path)?;
    write_assignment(&mut file, parts, pool_names, unit_names)
}

/// Reads an assignment file back into a per-unit pool index vector.
///
/// Used by the standalone checking path; every unit must appear exactly once.
pub fn read_assignment(
    content: &str,
    pool_names: &NameTable,
    unit_names: &NameTable,
) -> Result<Vec<i64>, IoError> {
    let mut parts = vec![-1_i64; unit_names.len()];

    for (line_no, line) in content.lines().enumerate().map(|(i, l)| (i + 1, l)) {
        if line.trim().is_empty() {
            continue;
        }
        let (pool_name, rest) = line.split_once(':').ok_or_else(|| IoError::Malformed {
            file: "assignment".to_string(),
            line: line_no,
            message: "expected 'pool: units...'".to_string(),
        })?;
        let pool = pool_names
            .index_of(pool_name.trim())
            .ok_or_else(|| IoError::UnknownName {
                file: "assignment".to_string(),
                line: line_no,
                name: pool_name.trim().to_string(),
            })?;
        for unit_name in rest.split_whitespace() {
            let unit = unit_names
                .index_of(unit_name)
                .ok_or_else(|| IoError::UnknownName {
                    file: "assignment".to_string(),
                    line: line_no,
                    name: unit_name.to_string(),
                })?;
            if parts[unit as usize] >= 0 {
                return Err(IoError::Malformed {
                    file: "assignment".to_string(),
                    line: line_no,
                    message: format!("unit '{unit_name}' assigned twice"),
                });
            }
            parts[unit as usize] = pool as i64;
        }
    }

    if let Some(unit) = parts.iter().position(|&p| p < 0) {
        return Err(IoError::Malformed {
            file: "assignment".to_string(),
            line: 0,
            message: format!(
                "unit '{}' has no assignment",
                unit_names.name_of(unit as u32).unwrap_or("")
            ),
        });
    }
    Ok(parts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables() -> (NameTable, NameTable) {
        let mut pools = NameTable::new();
        pools.intern("fpga01");
        pools.intern("fpga02");
        let mut units = NameTable::new();
        units.intern("u1");
        units.intern("u2");
        units.intern("u3");
        (pools, units)
    }

    #[test]
    fn writes_pool_per_line() {
        let (pools, units) = tables();
        let mut out = Vec::new();
        write_assignment(&mut out, &[0, 1, 0], &pools, &units).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "fpga01: u1 u3\nfpga02: u2\n"
        );
    }

    #[test]
    fn empty_pool_still_gets_a_line() {
        let (pools, units) = tables();
        let mut out = Vec::new();
        write_assignment(&mut out, &[0, 0, 0], &pools, &units).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "fpga01: u1 u2 u3\nfpga02:\n"
        );
    }

    #[test]
    fn round_trips_through_reader() {
        let (pools, units) = tables();
        let parts = vec![0, 1, 0];
        let mut out = Vec::new();
        write_assignment(&mut out, &parts, &pools, &units).unwrap();
        let content = String::from_utf8(out).unwrap();
        assert_eq!(read_assignment(&content, &pools, &units).unwrap(), parts);
    }

    #[test]
    fn unknown_unit_in_reader_fails() {
        let (pools, units) = tables();
        let err = read_assignment("fpga01: u9\n", &pools, &units).unwrap_err();
        assert!(matches!(err, IoError::UnknownName { .. }));
    }

    #[test]
    fn unassigned_unit_fails() {
        let (pools, units) = tables();
        let err = read_assignment("fpga01: u1 u2\nfpga02:\n", &pools, &units).unwrap_err();
        match err {
            IoError::Malformed { message, .. } => assert!(message.contains("u3")),
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn doubly_assigned_unit_fails() {
        let (pools, units) = tables();
        let err =
            read_assignment("fpga01: u1 u2 u3\nfpga02: u1\n", &pools, &units).unwrap_err();
        assert!(matches!(err, IoError::Malformed { line: 2, .. }));
    }

    #[test]
    fn writes_to_file() {
        let (pools, units) = tables();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("design.fpga.out");
        write_assignment_file(&path, &[1, 1, 0], &pools, &units).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "fpga01: u3\nfpga02: u1 u2\n");
    }
}
