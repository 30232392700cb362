//! In-memory design database for the basalt place-and-route core.
//!
//! The [`Design`] owns every cell and net of a technology-mapped netlist
//! together with the binding state of device resources (which cell sits on
//! which bel, which net owns which wires and pips), the packed cluster
//! registry, placement regions, and design hierarchy records. All mutation
//! funnels through [`Design`] operations so the cross-reference invariants
//! (port/net duality, binding duality, wire-tree closure) hold after every
//! public call.

#![warn(missing_docs)]

pub mod arch_info;
pub mod arena;
pub mod cell;
pub mod cluster;
pub mod design;
pub mod error;
pub mod hierarchy;
pub mod ids;
pub mod net;
pub mod region;

pub use arch_info::assign_arch_info;
pub use arena::{Arena, ArenaKey};
pub use cell::{ArchCellInfo, CellInfo, CombInfo, FfInfo, PortInfo, SliceInfo};
pub use cluster::Cluster;
pub use design::Design;
pub use error::DesignError;
pub use hierarchy::{HierarchicalCell, HierarchicalPort};
pub use ids::{CellId, ClusterId, NetId, RegionId};
pub use net::{ClockConstraint, NetInfo, PipMap, PortRef};
pub use region::Region;
