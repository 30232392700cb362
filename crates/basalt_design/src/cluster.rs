//! Packed cluster instances.
//!
//! A cluster groups cells the placer must relocate atomically: the chain
//! nodes threaded through dedicated interconnect, plus the satellite cells
//! claimed onto each node. Clusters are created once by the packer and
//! never mutated afterwards.

use crate::ids::{CellId, ClusterId};
use basalt_common::Ident;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One packed cluster.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Cluster {
    /// The root cell of the cluster.
    pub root: CellId,
    /// Index of the cluster description in the device database.
    pub index: u32,
    /// Chain nodes in order from root to tail.
    pub cluster_nodes: Vec<CellId>,
    /// Per node (by node cell name): the `(port, satellite)` pairs claimed
    /// onto that node.
    pub cluster_node_cells: IndexMap<Ident, Vec<(Ident, CellId)>>,
    /// Member cell name to the name of the node it belongs to.
    pub cell_cluster_node_map: HashMap<Ident, Ident>,
}

impl Cluster {
    /// Creates a cluster with only its root recorded.
    pub fn new(root: CellId, index: u32) -> Self {
        Self {
            root,
            index,
            cluster_nodes: Vec::new(),
            cluster_node_cells: IndexMap::new(),
            cell_cluster_node_map: HashMap::new(),
        }
    }

    /// Position of a node in the chain, if the cell is a chain node.
    pub fn node_position(&self, node: CellId) -> Option<usize> {
        self.cluster_nodes.iter().position(|&c| c == node)
    }

    /// Total number of member cells (nodes plus satellites).
    pub fn member_count(&self) -> usize {
        self.cell_cluster_node_map.len()
    }
}

/// Convenience alias for the design's cluster registry.
pub type ClusterMap = HashMap<ClusterId, Cluster>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_position() {
        let mut cluster = Cluster::new(CellId::from_raw(0), 0);
        cluster.cluster_nodes = vec![CellId::from_raw(0), CellId::from_raw(1)];
        assert_eq!(cluster.node_position(CellId::from_raw(0)), Some(0));
        assert_eq!(cluster.node_position(CellId::from_raw(1)), Some(1));
        assert_eq!(cluster.node_position(CellId::from_raw(9)), None);
    }

    #[test]
    fn member_count_counts_map_entries() {
        let mut cluster = Cluster::new(CellId::from_raw(0), 0);
        cluster
            .cell_cluster_node_map
            .insert(Ident::from_raw(1), Ident::from_raw(1));
        cluster
            .cell_cluster_node_map
            .insert(Ident::from_raw(2), Ident::from_raw(1));
        assert_eq!(cluster.member_count(), 2);
    }
}
