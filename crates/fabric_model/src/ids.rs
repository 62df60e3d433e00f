//! Opaque ID newtypes for partition-mapping entities.
//!
//! [`UnitId`], [`NetId`], and [`PoolId`] are thin `u32` wrappers used as
//! arena indices into the netlist graph and pool set. They are `Copy`,
//! `Hash`, and `Serialize`/`Deserialize`.

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
        pub struct $name(u32);

        impl $name {
            /// Creates an ID from a raw `u32` index.
            pub fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw `u32` index.
            pub fn as_raw(self) -> u32 {
                self.0
            }

            /// Returns the index as a `usize` for direct slice access.
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Opaque, copyable ID for a logic unit in the netlist hypergraph.
    UnitId
);

define_id!(
    /// Opaque, copyable ID for a multi-terminal net (hyperedge).
    NetId
);

define_id!(
    /// Opaque, copyable ID for a device resource pool.
    PoolId
);
