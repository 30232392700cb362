//! The design database: owning store of cells, nets, and binding state.

use crate::arena::Arena;
use crate::cell::CellInfo;
use crate::cluster::ClusterMap;
use crate::error::DesignError;
use crate::hierarchy::HierarchicalCell;
use crate::ids::{CellId, NetId, RegionId};
use crate::net::{NetInfo, PipMap, PortRef};
use crate::region::Region;
use basalt_common::{Ident, PlaceStrength, PortType, PropertyMap};
use basalt_device::{BelId, DeviceGraph, PipId, WireId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The owning store of a design under place-and-route.
///
/// Cells and nets reference each other by arena id and are only ever
/// created, never destroyed. Binding state is stored twice (on the design
/// entity and in the per-resource tables) and kept consistent by funneling
/// all mutation through the methods here.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Design {
    cells: Arena<CellId, CellInfo>,
    nets: Arena<NetId, NetInfo>,
    cell_by_name: HashMap<Ident, CellId>,
    net_by_name: HashMap<Ident, NetId>,
    bel_bindings: HashMap<BelId, (CellId, PlaceStrength)>,
    wire_bindings: HashMap<WireId, NetId>,
    pip_bindings: HashMap<PipId, NetId>,
    /// Placement/routing regions.
    pub regions: Arena<RegionId, Region>,
    /// Packed clusters, keyed by cluster id.
    pub clusters: ClusterMap,
    /// Preserved design hierarchy, keyed by full path.
    pub hierarchy: IndexMap<Ident, HierarchicalCell>,
    /// Top-level design attributes.
    pub attrs: PropertyMap,
}

impl Design {
    /// Creates an empty design.
    pub fn new() -> Self {
        Self::default()
    }

    // --- cells and nets ---

    /// Creates a cell and returns its id.
    pub fn add_cell(&mut self, name: Ident, ty: Ident) -> Result<CellId, DesignError> {
        if self.cell_by_name.contains_key(&name) {
            return Err(DesignError::DuplicateCell(name));
        }
        let id = self.cells.alloc(CellInfo::new(name, ty));
        self.cell_by_name.insert(name, id);
        Ok(id)
    }

    /// Creates a net and returns its id.
    pub fn add_net(&mut self, name: Ident) -> Result<NetId, DesignError> {
        if self.net_by_name.contains_key(&name) {
            return Err(DesignError::DuplicateNet(name));
        }
        let id = self.nets.alloc(NetInfo::new(name));
        self.net_by_name.insert(name, id);
        Ok(id)
    }

    /// The cell with the given id.
    pub fn cell(&self, id: CellId) -> &CellInfo {
        &self.cells[id]
    }

    /// Mutable access to the cell with the given id.
    pub fn cell_mut(&mut self, id: CellId) -> &mut CellInfo {
        &mut self.cells[id]
    }

    /// The net with the given id.
    pub fn net(&self, id: NetId) -> &NetInfo {
        &self.nets[id]
    }

    /// Mutable access to the net with the given id.
    pub fn net_mut(&mut self, id: NetId) -> &mut NetInfo {
        &mut self.nets[id]
    }

    /// Looks up a cell by name.
    pub fn cell_by_name(&self, name: Ident) -> Option<CellId> {
        self.cell_by_name.get(&name).copied()
    }

    /// Looks up a net by name.
    pub fn net_by_name(&self, name: Ident) -> Option<NetId> {
        self.net_by_name.get(&name).copied()
    }

    /// Iterates over all cells in creation order.
    pub fn cells(&self) -> impl Iterator<Item = (CellId, &CellInfo)> {
        self.cells.iter()
    }

    /// Iterates over all nets in creation order.
    pub fn nets(&self) -> impl Iterator<Item = (NetId, &NetInfo)> {
        self.nets.iter()
    }

    /// Number of cells.
    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    /// Number of nets.
    pub fn num_nets(&self) -> usize {
        self.nets.len()
    }

    // --- ports ---

    /// Adds an input port to a cell.
    pub fn add_input(&mut self, cell: CellId, port: Ident) {
        self.cells[cell].add_input(port);
    }

    /// Adds an output port to a cell.
    pub fn add_output(&mut self, cell: CellId, port: Ident) {
        self.cells[cell].add_output(port);
    }

    /// Adds a bidirectional port to a cell.
    pub fn add_inout(&mut self, cell: CellId, port: Ident) {
        self.cells[cell].add_inout(port);
    }

    /// Connects a cell port to a net.
    ///
    /// Output ports become the net's driver; a second driver is a
    /// structural violation. Input and inout ports are appended to the
    /// net's user list, preserving connection order.
    pub fn connect_port(
        &mut self,
        net: NetId,
        cell: CellId,
        port: Ident,
    ) -> Result<(), DesignError> {
        let cell_name = self.cells[cell].name;
        let (ty, connected) = match self.cells[cell].ports.get(&port) {
            None => {
                return Err(DesignError::PortNotFound {
                    cell: cell_name,
                    port,
                })
            }
            Some(p) => (p.ty, p.net.is_some()),
        };
        if connected {
            return Err(DesignError::PortConnected {
                cell: cell_name,
                port,
            });
        }
        let net_info = &mut self.nets[net];
        match ty {
            PortType::Output => {
                if net_info.driver.is_some() {
                    return Err(DesignError::NetAlreadyDriven(net_info.name));
                }
                net_info.driver = Some(PortRef::new(cell, port));
            }
            PortType::Input | PortType::Inout => {
                net_info.users.push(PortRef::new(cell, port));
            }
        }
        if let Some(p) = self.cells[cell].ports.get_mut(&port) {
            p.net = Some(net);
        }
        Ok(())
    }

    /// Disconnects a cell port from whatever net it is on.
    ///
    /// Disconnecting an already-disconnected port is a no-op; a missing
    /// port is a structural violation.
    pub fn disconnect_port(&mut self, cell: CellId, port: Ident) -> Result<(), DesignError> {
        let cell_name = self.cells[cell].name;
        let net = match self.cells[cell].ports.get(&port) {
            None => {
                return Err(DesignError::PortNotFound {
                    cell: cell_name,
                    port,
                })
            }
            Some(p) => match p.net {
                None => return Ok(()),
                Some(net) => net,
            },
        };
        let net_info = &mut self.nets[net];
        if net_info.driver.is_some_and(|d| d.is(cell, port)) {
            net_info.driver = None;
        }
        net_info.users.retain(|u| !u.is(cell, port));
        if let Some(p) = self.cells[cell].ports.get_mut(&port) {
            p.net = None;
        }
        Ok(())
    }

    // --- bel bindings ---

    /// Binds a cell onto a bel.
    pub fn bind_bel(
        &mut self,
        bel: BelId,
        cell: CellId,
        strength: PlaceStrength,
    ) -> Result<(), DesignError> {
        if self.bel_bindings.contains_key(&bel) {
            return Err(DesignError::BelAlreadyBound(bel));
        }
        let info = &mut self.cells[cell];
        if info.bel.is_some() {
            return Err(DesignError::CellAlreadyPlaced(info.name));
        }
        info.bel = Some(bel);
        info.bel_strength = strength;
        self.bel_bindings.insert(bel, (cell, strength));
        Ok(())
    }

    /// Unbinds whatever cell sits on the bel, returning it.
    pub fn unbind_bel(&mut self, bel: BelId) -> Result<CellId, DesignError> {
        let (cell, _) = self
            .bel_bindings
            .remove(&bel)
            .ok_or(DesignError::BelNotBound(bel))?;
        let info = &mut self.cells[cell];
        info.bel = None;
        info.bel_strength = PlaceStrength::None;
        Ok(cell)
    }

    /// Whether the bel is free.
    pub fn check_bel_avail(&self, bel: BelId) -> bool {
        !self.bel_bindings.contains_key(&bel)
    }

    /// The cell bound to the bel, if any.
    pub fn bound_bel_cell(&self, bel: BelId) -> Option<CellId> {
        self.bel_bindings.get(&bel).map(|&(cell, _)| cell)
    }

    /// The cell bound to the bel together with its binding strength.
    pub fn bel_binding(&self, bel: BelId) -> Option<(CellId, PlaceStrength)> {
        self.bel_bindings.get(&bel).copied()
    }

    // --- wire bindings ---

    /// Binds a wire into a net's routing tree as a root (no uphill pip).
    pub fn bind_wire(
        &mut self,
        wire: WireId,
        net: NetId,
        strength: PlaceStrength,
    ) -> Result<(), DesignError> {
        if self.wire_bindings.contains_key(&wire) {
            return Err(DesignError::WireAlreadyBound(wire));
        }
        self.wire_bindings.insert(wire, net);
        self.nets[net].wires.insert(wire, PipMap { pip: None, strength });
        Ok(())
    }

    /// Removes a wire from its net's routing tree, releasing the uphill
    /// pip as well if the wire was pip-driven. Returns the net.
    pub fn unbind_wire(&mut self, wire: WireId) -> Result<NetId, DesignError> {
        let net = self
            .wire_bindings
            .remove(&wire)
            .ok_or(DesignError::WireNotBound(wire))?;
        if let Some(entry) = self.nets[net].wires.shift_remove(&wire) {
            if let Some(pip) = entry.pip {
                self.pip_bindings.remove(&pip);
            }
        }
        Ok(net)
    }

    /// Whether the wire is free.
    pub fn check_wire_avail(&self, wire: WireId) -> bool {
        !self.wire_bindings.contains_key(&wire)
    }

    /// The net bound to the wire, if any.
    pub fn bound_wire_net(&self, wire: WireId) -> Option<NetId> {
        self.wire_bindings.get(&wire).copied()
    }

    // --- pip bindings ---

    /// Binds a pip for a net, implicitly binding the pip's destination
    /// wire and recording the pip as that wire's uphill driver.
    pub fn bind_pip(
        &mut self,
        graph: &dyn DeviceGraph,
        pip: PipId,
        net: NetId,
        strength: PlaceStrength,
    ) -> Result<(), DesignError> {
        if self.pip_bindings.contains_key(&pip) {
            return Err(DesignError::PipAlreadyBound(pip));
        }
        let dst = graph.pip_dst_wire(pip);
        if self.wire_bindings.contains_key(&dst) {
            return Err(DesignError::WireAlreadyBound(dst));
        }
        self.pip_bindings.insert(pip, net);
        self.wire_bindings.insert(dst, net);
        self.nets[net].wires.insert(
            dst,
            PipMap {
                pip: Some(pip),
                strength,
            },
        );
        Ok(())
    }

    /// Releases a pip and its destination wire. Returns the net.
    pub fn unbind_pip(
        &mut self,
        graph: &dyn DeviceGraph,
        pip: PipId,
    ) -> Result<NetId, DesignError> {
        let net = self
            .pip_bindings
            .remove(&pip)
            .ok_or(DesignError::PipNotBound(pip))?;
        let dst = graph.pip_dst_wire(pip);
        self.wire_bindings.remove(&dst);
        self.nets[net].wires.shift_remove(&dst);
        Ok(net)
    }

    /// Whether the pip is free.
    pub fn check_pip_avail(&self, pip: PipId) -> bool {
        !self.pip_bindings.contains_key(&pip)
    }

    /// The net bound to the pip, if any.
    pub fn bound_pip_net(&self, pip: PipId) -> Option<NetId> {
        self.pip_bindings.get(&pip).copied()
    }

    // --- regions ---

    /// Registers a region and returns its id.
    pub fn add_region(&mut self, region: Region) -> RegionId {
        self.regions.alloc(region)
    }

    /// Whether the cell's region (if any, and if bel-constraining) admits
    /// the bel.
    pub fn test_region(&self, cell: CellId, bel: BelId) -> bool {
        match self.cells[cell].region {
            None => true,
            Some(region) => self.regions[region].admits_bel(bel),
        }
    }
}
