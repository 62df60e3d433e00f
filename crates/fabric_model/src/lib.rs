//! Data model for the Fabric multi-device partition mapper.
//!
//! This crate defines the read-only inputs to the refinement engine — the
//! netlist hypergraph ([`NetlistGraph`]), the device pool set ([`PoolSet`]),
//! and the interconnect [`Topology`] with its all-pairs hop distances — plus
//! the one piece of mutable state the engine owns: the [`Placement`], which
//! tracks the unit-to-pool assignment together with each pool's incrementally
//! maintained resource tally.

#![warn(missing_docs)]

pub mod assignment;
pub mod device;
pub mod error;
pub mod graph;
pub mod ids;
pub mod resources;
pub mod topology;

pub use assignment::Placement;
pub use device::{Pool, PoolSet};
pub use error::ModelError;
pub use graph::{Net, NetlistGraph, Unit};
pub use ids::{NetId, PoolId, UnitId};
pub use resources::ResourceVec;
pub use topology::{Topology, UNREACHABLE};
