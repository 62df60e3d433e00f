//! Readers for the four-file textual design description.
//!
//! A design directory holds `design.info` (pools), `design.are` (units),
//! `design.net` (nets) and `design.topo` (hop budget + adjacency). Names are
//! interned in file order so external names map onto the model's dense ID
//! spaces; the reverse maps are kept for writing results back out.

use crate::error::IoError;
use crate::names::NameTable;
use fabric_model::{NetlistGraph, PoolId, PoolSet, ResourceVec, Topology, UnitId};
use std::path::Path;

/// Aggregate statistics collected while loading a design.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesignStats {
    /// Total pin count over all nets.
    pub pin_count: usize,
    /// Largest net size (terminals including the source).
    pub max_fanout: usize,
    /// External name of the largest net's source unit.
    pub max_fanout_source: String,
    /// Per-dimension capacity totals over all pools.
    pub total_capacity: ResourceVec,
    /// Per-dimension demand totals over all units.
    pub total_demand: ResourceVec,
}

/// A fully loaded design: model inputs plus the external name tables.
#[derive(Debug, Clone)]
pub struct DesignInput {
    /// The netlist hypergraph, with unit weights already derived.
    pub graph: NetlistGraph,
    /// The device pools with capacities and hop budget.
    pub pools: PoolSet,
    /// All-pairs hop distances over the pool interconnect.
    pub topology: Topology,
    /// Pool index to external name, in `design.info` order.
    pub pool_names: NameTable,
    /// Unit index to external name, in `design.are` order.
    pub unit_names: NameTable,
    /// Load-time statistics.
    pub stats: DesignStats,
}

/// Reads a design directory (`design.info`, `design.are`, `design.net`,
/// `design.topo`).
pub fn read_design_dir(dir: &Path) -> Result<DesignInput, IoError> {
    let info = read_file(dir, "design.info")?;
    let are = read_file(dir, "design.are")?;
    let net = read_file(dir, "design.net")?;
    let topo = read_file(dir, "design.topo")?;
    read_design(&info, &are, &net, &topo)
}

fn read_file(dir: &Path, name: &str) -> Result<String, IoError> {
    std::fs::read_to_string(dir.join(name)).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IoError::MissingFile {
                file: dir.join(name).display().to_string(),
            }
        } else {
            IoError::Io(e)
        }
    })
}

/// Assembles a design from the four file contents.
///
/// The resource dimension count is inferred from the first `design.info`
/// line; every later capacity and demand line must match it.
pub fn read_design(
    info: &str,
    are: &str,
    net: &str,
    topo: &str,
) -> Result<DesignInput, IoError> {
    let (pools, pool_names) = parse_info(info)?;
    let (mut graph, unit_names, total_demand) = parse_are(are, pools.dims())?;
    let max_fanout = parse_net(net, &mut graph, &unit_names)?;
    let (pools, topology) = parse_topo(topo, pools, &pool_names)?;

    graph.derive_weights(&pools);

    let max_fanout_source = max_fanout
        .as_ref()
        .and_then(|&(_, source)| unit_names.name_of(source.as_raw()))
        .unwrap_or("")
        .to_string();
    let stats = DesignStats {
        pin_count: graph.pin_count(),
        max_fanout: max_fanout.map_or(0, |(size, _)| size),
        max_fanout_source,
        total_capacity: pools.total_capacity(),
        total_demand,
    };

    Ok(DesignInput {
        graph,
        pools,
        topology,
        pool_names,
        unit_names,
        stats,
    })
}

/// `design.info`: one pool per line: name, max interconnects, K capacities.
fn parse_info(content: &str) -> Result<(PoolSet, NameTable), IoError> {
    let mut names = NameTable::new();
    let mut pools: Option<PoolSet> = None;

    for (line_no, line) in numbered_lines(content) {
        let mut fields = line.split_whitespace();
        let name = next_field(&mut fields, "design.info", line_no, "pool name")?;
        let max_interconnects: i64 =
            parse_field(&mut fields, "design.info", line_no, "max interconnects")?;

        let capacity: Vec<i64> = fields
            .map(|f| parse_value(f, "design.info", line_no, "capacity value"))
            .collect::<Result<_, _>>()?;
        if capacity.is_empty() {
            return Err(malformed("design.info", line_no, "no capacity values"));
        }

        let pools = pools.get_or_insert_with(|| PoolSet::new(capacity.len()));
        if capacity.len() != pools.dims() {
            return Err(malformed(
                "design.info",
                line_no,
                &format!(
                    "expected {} capacity values, found {}",
                    pools.dims(),
                    capacity.len()
                ),
            ));
        }
        if names.index_of(name).is_some() {
            return Err(malformed(
                "design.info",
                line_no,
                &format!("duplicate pool name '{name}'"),
            ));
        }
        names.intern(name);
        pools.add_pool(ResourceVec::from_vec(capacity), max_interconnects);
    }

    match pools {
        Some(pools) => Ok((pools, names)),
        None => Err(malformed("design.info", 1, "no pools declared")),
    }
}

/// `design.are`: one unit per line: name, K demands.
fn parse_are(
    content: &str,
    dims: usize,
) -> Result<(NetlistGraph, NameTable, ResourceVec), IoError> {
    let mut names = NameTable::new();
    let mut graph = NetlistGraph::new(dims);
    let mut total = ResourceVec::zeros(dims);

    for (line_no, line) in numbered_lines(content) {
        let mut fields = line.split_whitespace();
        let name = next_field(&mut fields, "design.are", line_no, "unit name")?;

        let demand: Vec<i64> = fields
            .map(|f| parse_value(f, "design.are", line_no, "demand value"))
            .collect::<Result<_, _>>()?;
        if demand.len() != dims {
            return Err(malformed(
                "design.are",
                line_no,
                &format!("expected {dims} demand values, found {}", demand.len()),
            ));
        }
        if names.index_of(name).is_some() {
            return Err(malformed(
                "design.are",
                line_no,
                &format!("duplicate unit name '{name}'"),
            ));
        }
        names.intern(name);
        let demand = ResourceVec::from_vec(demand);
        total.add_assign(&demand);
        graph.add_unit(demand);
    }

    Ok((graph, names, total))
}

/// `design.net`: one net per line: source name, weight, destination names.
///
/// Returns the largest net's (size, source) for the load statistics.
fn parse_net(
    content: &str,
    graph: &mut NetlistGraph,
    unit_names: &NameTable,
) -> Result<Option<(usize, UnitId)>, IoError> {
    let mut max_fanout: Option<(usize, UnitId)> = None;

    for (line_no, line) in numbered_lines(content) {
        let mut fields = line.split_whitespace();
        let source = next_field(&mut fields, "design.net", line_no, "source name")?;
        let weight: i64 = parse_field(&mut fields, "design.net", line_no, "net weight")?;

        let mut units = vec![lookup_unit(unit_names, source, line_no)?];
        for dest in fields {
            units.push(lookup_unit(unit_names, dest, line_no)?);
        }

        let size = units.len();
        let source_id = units[0];
        graph.add_net(weight, units);
        if max_fanout.map_or(true, |(best, _)| size > best) {
            max_fanout = Some((size, source_id));
        }
    }

    Ok(max_fanout)
}

/// `design.topo`: first line hop budget, then adjacent pool-name pairs.
fn parse_topo(
    content: &str,
    mut pools: PoolSet,
    pool_names: &NameTable,
) -> Result<(PoolSet, Topology), IoError> {
    let mut lines = numbered_lines(content);
    let (line_no, first) = lines
        .next()
        .ok_or_else(|| malformed("design.topo", 1, "missing hop budget line"))?;
    let budget: u32 = first
        .trim()
        .parse()
        .map_err(|_| malformed("design.topo", line_no, "invalid hop budget"))?;
    pools.set_hop_budget(budget);

    let mut edges = Vec::new();
    for (line_no, line) in lines {
        let mut fields = line.split_whitespace();
        let a = next_field(&mut fields, "design.topo", line_no, "pool name")?;
        let b = next_field(&mut fields, "design.topo", line_no, "pool name")?;
        edges.push((
            lookup_pool(pool_names, a, line_no)?,
            lookup_pool(pool_names, b, line_no)?,
        ));
    }

    let topology = Topology::from_edges(pools.len(), &edges)?;
    Ok((pools, topology))
}

fn numbered_lines(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line))
        .filter(|(_, line)| !line.trim().is_empty())
}

fn next_field<'a>(
    fields: &mut impl Iterator<Item = &'a str>,
    file: &str,
    line: usize,
    what: &str,
) -> Result<&'a str, IoError> {
    fields
        .next()
        .ok_or_else(|| malformed(file, line, &format!("missing {what}")))
}

fn parse_field<'a, T: std::str::FromStr>(
    fields: &mut impl Iterator<Item = &'a str>,
    file: &str,
    line: usize,
    what: &str,
) -> Result<T, IoError> {
    let field = next_field(fields, file, line, what)?;
    parse_value(field, file, line, what)
}

fn parse_value<T: std::str::FromStr>(
    field: &str,
    file: &str,
    line: usize,
    what: &str,
) -> Result<T, IoError> {
    field
        .parse()
        .map_err(|_| malformed(file, line, &format!("invalid {what} '{field}'")))
}

fn malformed(file: &str, line: usize, message: &str) -> IoError {
    IoError::Malformed {
        file: file.to_string(),
        line,
        message: message.to_string(),
    }
}

fn lookup_unit(names: &NameTable, name: &str, line: usize) -> Result<UnitId, IoError> {
    names
        .index_of(name)
        .map(UnitId::from_raw)
        .ok_or_else(|| IoError::UnknownName {
            file: "design.net".to_string(),
            line,
            name: name.to_string(),
        })
}

fn lookup_pool(names: &NameTable, name: &str, line: usize) -> Result<PoolId, IoError> {
    names
        .index_of(name)
        .map(PoolId::from_raw)
        .ok_or_else(|| IoError::UnknownName {
            file: "design.topo".to_string(),
            line,
            name: name.to_string(),
        })
}
