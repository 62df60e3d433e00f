//! Textual design I/O for the Fabric partition mapper.
//!
//! Reads the four-file design description (`design.info`, `design.are`,
//! `design.net`, `design.topo`) into the model types, writes the final
//! assignment (`design.fpga.out` format), and produces/consumes the exchange
//! files used by a file-mediated external partitioning oracle (hMETIS
//! hypergraph, METIS target graph, partition result).

#![warn(missing_docs)]

pub mod assignment;
pub mod design;
pub mod error;
pub mod names;
pub mod oracle_files;

pub use assignment::{read_assignment, write_assignment, write_assignment_file};
pub use design::{read_design, read_design_dir, DesignInput, DesignStats};
pub use error::IoError;
pub use names::NameTable;
pub use oracle_files::{
    read_partition, read_partition_file, write_hypergraph, write_hypergraph_file,
    write_target_graph, write_target_graph_file,
};
