//! Device resource model for the basalt place-and-route core.
//!
//! This crate defines the opaque handles for physical device resources
//! (bels, wires, pips), the read-only [`DeviceGraph`] view the core requires
//! from any architecture backend, a concrete buildable [`Device`] backend,
//! the cluster descriptions shipped in device databases, and the zero-copy
//! [`chipdb`] reader for the relocatable chip-database format.

#![warn(missing_docs)]

pub mod chipdb;
pub mod cluster;
pub mod device;
pub mod graph;
pub mod ids;

pub use chipdb::{ChipDb, ChipDbError};
pub use cluster::{ChainablePort, ClusterCellPort, ClusterDesc};
pub use device::Device;
pub use graph::{BelCategory, BelPin, DeviceGraph};
pub use ids::{BelId, Loc, PipId, WireId};
