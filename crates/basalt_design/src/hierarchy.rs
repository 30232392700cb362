//! Records of the pre-flattening design hierarchy.
//!
//! The PnR flow works on a flat netlist, but reports and constraint files
//! refer to instances by hierarchical path, so the frontend preserves the
//! non-leaf structure here.

use basalt_common::{Ident, PortType};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A port on a non-leaf cell.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct HierarchicalPort {
    /// Port name.
    pub name: Ident,
    /// Port direction.
    pub dir: PortType,
    /// Flat net names the port bits map to, LSB first.
    pub nets: Vec<Ident>,
    /// Bit offset of the vector.
    pub offset: i32,
    /// Whether the range is declared low-to-high.
    pub upto: bool,
}

/// The contents of a non-leaf cell in a hierarchical design.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct HierarchicalCell {
    /// Instance name within the parent.
    pub name: Ident,
    /// Module type name.
    pub ty: Ident,
    /// Parent instance, if any (the top cell has none).
    pub parent: Option<Ident>,
    /// Full hierarchical path of this instance.
    pub fullpath: Ident,
    /// Local leaf-cell name to flat name.
    pub leaf_cells: IndexMap<Ident, Ident>,
    /// Local net name to flat name.
    pub nets: IndexMap<Ident, Ident>,
    /// Flat leaf-cell name back to local name.
    pub leaf_cells_by_gname: IndexMap<Ident, Ident>,
    /// Flat net name back to local name.
    pub nets_by_gname: IndexMap<Ident, Ident>,
    /// Ports of this instance.
    pub ports: IndexMap<Ident, HierarchicalPort>,
    /// Local child-instance name to flat name.
    pub hier_cells: IndexMap<Ident, Ident>,
}

impl HierarchicalCell {
    /// Creates an empty hierarchy record.
    pub fn new(name: Ident, ty: Ident, fullpath: Ident) -> Self {
        Self {
            name,
            ty,
            parent: None,
            fullpath,
            leaf_cells: IndexMap::new(),
            nets: IndexMap::new(),
            leaf_cells_by_gname: IndexMap::new(),
            nets_by_gname: IndexMap::new(),
            ports: IndexMap::new(),
            hier_cells: IndexMap::new(),
        }
    }

    /// Records a leaf cell, maintaining both direction maps.
    pub fn add_leaf_cell(&mut self, local: Ident, global: Ident) {
        self.leaf_cells.insert(local, global);
        self.leaf_cells_by_gname.insert(global, local);
    }

    /// Records a net, maintaining both direction maps.
    pub fn add_net(&mut self, local: Ident, global: Ident) {
        self.nets.insert(local, global);
        self.nets_by_gname.insert(global, local);
    }
}
