//! Cluster descriptions shipped in the device database.
//!
//! A cluster description tells the packer which cell types may start a
//! cluster, which dedicated source/sink port pair threads identical-type
//! nodes into a chain, and which satellite cell types attached to which
//! ports belong to the same cluster node.

use basalt_common::Ident;
use serde::{Deserialize, Serialize};

/// The dedicated driver/sink port pair of a chain interconnect.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ChainablePort {
    /// Cell port that drives the chain (e.g. `COUT`).
    pub cell_source: Ident,
    /// Cell port that receives the chain (e.g. `CIN`).
    pub cell_sink: Ident,
    /// Bel pin corresponding to the driver side.
    pub bel_source: Ident,
    /// Bel pin corresponding to the sink side.
    pub bel_sink: Ident,
    /// Average x distance between consecutive chain nodes.
    pub avg_x_offset: i32,
    /// Average y distance between consecutive chain nodes.
    pub avg_y_offset: i32,
}

/// A satellite cell type admitted on a given port of a cluster node.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ClusterCellPort {
    /// The satellite cell type.
    pub cell: Ident,
    /// The node port the satellite attaches through.
    pub port: Ident,
}

/// One cluster description from the device database.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ClusterDesc {
    /// Name of the description, for diagnostics.
    pub name: Ident,
    /// Cell types that may start a cluster.
    pub root_cell_types: Vec<Ident>,
    /// Dedicated chain port pairs; only the first entry is used.
    pub chainable_ports: Vec<ChainablePort>,
    /// Satellite cell/port admissions.
    pub cluster_cells_map: Vec<ClusterCellPort>,
    /// Whether satellite lookup may leave the node's site.
    pub out_of_site_clusters: bool,
}

impl ClusterDesc {
    /// Returns `true` if this description threads nodes through a chain.
    pub fn is_chainable(&self) -> bool {
        !self.chainable_ports.is_empty()
    }

    /// The single chain port pair in use, if any.
    pub fn chain_ports(&self) -> Option<&ChainablePort> {
        self.chainable_ports.first()
    }
}
