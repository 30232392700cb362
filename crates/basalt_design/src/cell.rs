//! Cells: technology-mapped netlist instances with typed ports.

use crate::ids::{ClusterId, NetId, RegionId};
use basalt_common::{Ident, PlaceStrength, PortType, Property, PropertyMap};
use basalt_device::BelId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A named, directed port on a cell and its net linkage.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct PortInfo {
    /// Port name.
    pub name: Ident,
    /// Port direction.
    pub ty: PortType,
    /// The net the port is connected to, if any.
    pub net: Option<NetId>,
}

/// Architecture-specific data precomputed per cell by the
/// [`assign_arch_info`](crate::assign_arch_info) pass.
///
/// The location validator reads these instead of chasing ports and params
/// on every candidate move.
#[derive(Clone, PartialEq, Eq, Default, Debug, Serialize, Deserialize)]
pub enum ArchCellInfo {
    /// No architecture-specific data.
    #[default]
    None,
    /// Slice-class cell (shared clock/reset rails within a tile).
    Slice(SliceInfo),
    /// Combinational ALM-class cell.
    Comb(CombInfo),
    /// Sequential ALM-class cell.
    Ff(FfInfo),
}

/// Precomputed clocking signals of a slice-class cell.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct SliceInfo {
    /// Whether either internal DFF is in use.
    pub using_dff: bool,
    /// Whether the cell drives the wide-function mux between half-slices.
    pub has_l6mux: bool,
    /// Net on the clock input.
    pub clk_sig: Option<NetId>,
    /// Net on the local set/reset input.
    pub lsr_sig: Option<NetId>,
    /// Clock mux setting (interned param value).
    pub clkmux: Ident,
    /// Set/reset mux setting (interned param value).
    pub lsrmux: Ident,
    /// Set/reset mode (interned param value).
    pub srmode: Ident,
}

/// Precomputed input usage of a combinational ALM-class cell.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct CombInfo {
    /// Nets on the connected combinational inputs.
    pub inputs: Vec<NetId>,
}

/// Precomputed control set of a sequential ALM-class cell.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct FfInfo {
    /// Clock net.
    pub clk: Option<NetId>,
    /// Clock-enable net.
    pub ena: Option<NetId>,
    /// Synchronous clear net.
    pub sclr: Option<NetId>,
    /// Asynchronous clear net.
    pub aclr: Option<NetId>,
}

impl FfInfo {
    /// The control-set tuple used for LAB compatibility grouping.
    pub fn ctrl_set(&self) -> (Option<NetId>, Option<NetId>, Option<NetId>, Option<NetId>) {
        (self.clk, self.ena, self.sclr, self.aclr)
    }
}

/// A cell in the design database.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CellInfo {
    /// Cell instance name.
    pub name: Ident,
    /// Cell type (e.g. `TRELLIS_SLICE`, `CCU2C`).
    pub ty: Ident,
    /// Hierarchical path of the originating instance, if preserved.
    pub hierpath: Option<Ident>,
    /// Ports, in insertion order.
    pub ports: IndexMap<Ident, PortInfo>,
    /// HDL parameters.
    pub params: PropertyMap,
    /// HDL attributes.
    pub attrs: PropertyMap,
    /// The bel the cell is bound to, if placed.
    pub bel: Option<BelId>,
    /// How firmly the bel binding is pinned.
    pub bel_strength: PlaceStrength,
    /// The cluster the cell belongs to, if any.
    pub cluster: Option<ClusterId>,
    /// Placement region constraint, if any.
    pub region: Option<RegionId>,
    /// Architecture-specific sidecar data.
    pub arch_info: ArchCellInfo,
}

impl CellInfo {
    /// Creates an unplaced, unclustered cell with no ports.
    pub fn new(name: Ident, ty: Ident) -> Self {
        Self {
            name,
            ty,
            hierpath: None,
            ports: IndexMap::new(),
            params: PropertyMap::new(),
            attrs: PropertyMap::new(),
            bel: None,
            bel_strength: PlaceStrength::None,
            cluster: None,
            region: None,
            arch_info: ArchCellInfo::None,
        }
    }

    fn add_port(&mut self, name: Ident, ty: PortType) {
        let port = self.ports.entry(name).or_insert(PortInfo {
            name,
            ty,
            net: None,
        });
        port.ty = ty;
    }

    /// Adds an input port, or re-types an existing port as input.
    pub fn add_input(&mut self, name: Ident) {
        self.add_port(name, PortType::Input);
    }

    /// Adds an output port, or re-types an existing port as output.
    pub fn add_output(&mut self, name: Ident) {
        self.add_port(name, PortType::Output);
    }

    /// Adds a bidirectional port, or re-types an existing port as inout.
    pub fn add_inout(&mut self, name: Ident) {
        self.add_port(name, PortType::Inout);
    }

    /// The net connected to the named port, if the port exists and is
    /// connected.
    pub fn port_net(&self, name: Ident) -> Option<NetId> {
        self.ports.get(&name).and_then(|p| p.net)
    }

    /// Sets a parameter value.
    pub fn set_param(&mut self, name: Ident, value: Property) {
        self.params.insert(name, value);
    }

    /// Removes a parameter.
    pub fn unset_param(&mut self, name: Ident) {
        self.params.shift_remove(&name);
    }

    /// Sets an attribute value.
    pub fn set_attr(&mut self, name: Ident, value: Property) {
        self.attrs.insert(name, value);
    }

    /// Removes an attribute.
    pub fn unset_attr(&mut self, name: Ident) {
        self.attrs.shift_remove(&name);
    }
}
