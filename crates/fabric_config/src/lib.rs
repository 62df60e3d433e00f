//! Run configuration for the Fabric partition mapper.
//!
//! Loads an optional `fabric.toml` describing the oracle to call and the
//! repair policies to apply. Every section and field has a default, so an
//! absent or empty file yields the built-in defaults.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str};
pub use types::{OracleKind, OracleSection, RunConfig};
