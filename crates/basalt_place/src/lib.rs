//! Placement legality and cluster placement resolution.
//!
//! The placer proposes moves; this crate answers two questions about them:
//! is a bel location legal given everything else bound nearby
//! ([`is_bel_location_valid`]), and where does every member of a cluster
//! land if its root goes on a given bel ([`get_cluster_placement`]).

#![warn(missing_docs)]

pub mod cluster_place;
pub mod validity;

pub use cluster_place::{
    find_cluster_bels, get_cluster_bounds, get_cluster_offset, get_cluster_placement,
    get_cluster_root_cell, is_cluster_strict, ClusterBounds, WalkDirection,
};
pub use validity::{is_bel_location_valid, is_valid_bel_for_cell_type};
