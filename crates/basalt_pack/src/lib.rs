//! Netlist transformation passes run between the frontend and the placer:
//! cluster packing (grouping chain-connected cells into atoms the placer
//! moves together) and timing-driven LUT-input permutation.

#![warn(missing_docs)]

pub mod cluster_pack;
pub mod lut_perm;

pub use cluster_pack::pack_clusters;
pub use lut_perm::{permute_luts, CriticalitySource};
