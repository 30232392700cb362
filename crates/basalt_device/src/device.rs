//! A concrete, programmatically built device model.
//!
//! Backends that load a chip database register bels, wires, and pips here
//! one at a time; the result implements [`DeviceGraph`] for the core. Test
//! fixtures across the workspace use the same builder API.

use crate::cluster::ClusterDesc;
use crate::graph::{BelCategory, BelPin, DeviceGraph};
use crate::ids::{BelId, Loc, PipId, WireId};
use basalt_common::{Ident, PortType};
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};

struct BelPinData {
    dir: PortType,
    wire: WireId,
}

struct BelData {
    name: Ident,
    ty: Ident,
    loc: Loc,
    category: BelCategory,
    synthetic: bool,
    pins: IndexMap<Ident, BelPinData>,
}

struct WireData {
    name: Ident,
    site: Option<u32>,
    uphill: Vec<PipId>,
    downhill: Vec<PipId>,
    bel_pins: Vec<BelPin>,
}

struct PipData {
    src: WireId,
    dst: WireId,
    site_port: bool,
    synthetic: bool,
}

/// A buildable device model.
///
/// Resources are appended and never removed, so ids stay stable. Mutation
/// happens only while the backend constructs the model; the PnR core sees
/// it through the read-only [`DeviceGraph`] trait.
pub struct Device {
    width: i32,
    height: i32,
    bels: Vec<BelData>,
    wires: Vec<WireData>,
    pips: Vec<PipData>,
    bels_by_tile: HashMap<(i32, i32), Vec<BelId>>,
    // bel type -> additional cell types admitted beyond the exact match
    type_buckets: HashMap<Ident, HashSet<Ident>>,
    missing_cell_types: HashSet<Ident>,
    cell_bel_map: HashMap<(Ident, Ident), Vec<Ident>>,
    clusters: Vec<ClusterDesc>,
}

impl Device {
    /// Creates an empty device with the given grid dimensions.
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            bels: Vec::new(),
            wires: Vec::new(),
            pips: Vec::new(),
            bels_by_tile: HashMap::new(),
            type_buckets: HashMap::new(),
            missing_cell_types: HashSet::new(),
            cell_bel_map: HashMap::new(),
            clusters: Vec::new(),
        }
    }

    /// Registers a bel at the given location and returns its id.
    pub fn add_bel(&mut self, name: Ident, ty: Ident, loc: Loc) -> BelId {
        let id = BelId::from_raw(self.bels.len() as u32);
        self.bels.push(BelData {
            name,
            ty,
            loc,
            category: BelCategory::Logic,
            synthetic: false,
            pins: IndexMap::new(),
        });
        self.bels_by_tile.entry(loc.tile()).or_default().push(id);
        id
    }

    /// Registers a wire and returns its id. `site` is `None` for general
    /// inter-site routing wires.
    pub fn add_wire(&mut self, name: Ident, site: Option<u32>) -> WireId {
        let id = WireId::from_raw(self.wires.len() as u32);
        self.wires.push(WireData {
            name,
            site,
            uphill: Vec::new(),
            downhill: Vec::new(),
            bel_pins: Vec::new(),
        });
        id
    }

    /// Registers a pip from `src` to `dst` and returns its id.
    pub fn add_pip(&mut self, src: WireId, dst: WireId) -> PipId {
        let id = PipId::from_raw(self.pips.len() as u32);
        self.pips.push(PipData {
            src,
            dst,
            site_port: false,
            synthetic: false,
        });
        self.wires[src.as_raw() as usize].downhill.push(id);
        self.wires[dst.as_raw() as usize].uphill.push(id);
        id
    }

    /// Attaches a pin to a bel and records the reverse link on the wire.
    ///
    /// # Panics
    ///
    /// Panics if the bel already has a pin of that name.
    pub fn add_bel_pin(&mut self, bel: BelId, pin: Ident, dir: PortType, wire: WireId) {
        let data = &mut self.bels[bel.as_raw() as usize];
        let prev = data.pins.insert(pin, BelPinData { dir, wire });
        assert!(prev.is_none(), "duplicate bel pin");
        self.wires[wire.as_raw() as usize]
            .bel_pins
            .push(BelPin { bel, pin });
    }

    /// Marks a pip as a site port (it crosses a site boundary).
    pub fn set_site_port(&mut self, pip: PipId) {
        self.pips[pip.as_raw() as usize].site_port = true;
    }

    /// Marks a pip as synthetic.
    pub fn set_pip_synthetic(&mut self, pip: PipId) {
        self.pips[pip.as_raw() as usize].synthetic = true;
    }

    /// Sets a bel's functional category.
    pub fn set_bel_category(&mut self, bel: BelId, category: BelCategory) {
        self.bels[bel.as_raw() as usize].category = category;
    }

    /// Marks a bel as synthetic.
    pub fn set_bel_synthetic(&mut self, bel: BelId) {
        self.bels[bel.as_raw() as usize].synthetic = true;
    }

    /// Admits `cell_type` on bels of type `bel_type` in addition to the
    /// exact type match.
    pub fn add_bel_bucket(&mut self, bel_type: Ident, cell_type: Ident) {
        self.type_buckets.entry(bel_type).or_default().insert(cell_type);
    }

    /// Declares that this part lacks the given cell type entirely.
    pub fn set_cell_type_unavailable(&mut self, cell_type: Ident) {
        self.missing_cell_types.insert(cell_type);
    }

    /// Maps a logical cell port to one or more physical bel pins for cells
    /// of the given type.
    pub fn add_cell_bel_pin(&mut self, cell_type: Ident, port: Ident, bel_pin: Ident) {
        self.cell_bel_map
            .entry((cell_type, port))
            .or_default()
            .push(bel_pin);
    }

    /// Appends a cluster description; returns its database index.
    pub fn add_cluster_desc(&mut self, desc: ClusterDesc) -> u32 {
        self.clusters.push(desc);
        (self.clusters.len() - 1) as u32
    }

    /// The name a bel was registered under.
    pub fn bel_name(&self, bel: BelId) -> Ident {
        self.bels[bel.as_raw() as usize].name
    }

    /// The name a wire was registered under.
    pub fn wire_name(&self, wire: WireId) -> Ident {
        self.wires[wire.as_raw() as usize].name
    }

    /// Total number of bels.
    pub fn num_bels(&self) -> usize {
        self.bels.len()
    }

    /// Total number of wires.
    pub fn num_wires(&self) -> usize {
        self.wires.len()
    }

    /// Total number of pips.
    pub fn num_pips(&self) -> usize {
        self.pips.len()
    }
}

impl DeviceGraph for Device {
    fn grid_dim(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    fn bels_by_tile(&self, x: i32, y: i32) -> Vec<BelId> {
        self.bels_by_tile.get(&(x, y)).cloned().unwrap_or_default()
    }

    fn bel_location(&self, bel: BelId) -> Loc {
        self.bels[bel.as_raw() as usize].loc
    }

    fn bel_type(&self, bel: BelId) -> Ident {
        self.bels[bel.as_raw() as usize].ty
    }

    fn bel_category(&self, bel: BelId) -> BelCategory {
        self.bels[bel.as_raw() as usize].category
    }

    fn bel_synthetic(&self, bel: BelId) -> bool {
        self.bels[bel.as_raw() as usize].synthetic
    }

    fn bel_pins(&self, bel: BelId) -> Vec<Ident> {
        self.bels[bel.as_raw() as usize].pins.keys().copied().collect()
    }

    fn bel_pin_wire(&self, bel: BelId, pin: Ident) -> Option<WireId> {
        self.bels[bel.as_raw() as usize]
            .pins
            .get(&pin)
            .map(|p| p.wire)
    }

    fn bel_pin_type(&self, bel: BelId, pin: Ident) -> Option<PortType> {
        self.bels[bel.as_raw() as usize].pins.get(&pin).map(|p| p.dir)
    }

    fn wire_bel_pins(&self, wire: WireId) -> Vec<BelPin> {
        self.wires[wire.as_raw() as usize].bel_pins.clone()
    }

    fn wire_site_index(&self, wire: WireId) -> Option<u32> {
        self.wires[wire.as_raw() as usize].site
    }

    fn pips_downhill(&self, wire: WireId) -> Vec<PipId> {
        self.wires[wire.as_raw() as usize].downhill.clone()
    }

    fn pips_uphill(&self, wire: WireId) -> Vec<PipId> {
        self.wires[wire.as_raw() as usize].uphill.clone()
    }

    fn pip_src_wire(&self, pip: PipId) -> WireId {
        self.pips[pip.as_raw() as usize].src
    }

    fn pip_dst_wire(&self, pip: PipId) -> WireId {
        self.pips[pip.as_raw() as usize].dst
    }

    fn is_site_port(&self, pip: PipId) -> bool {
        self.pips[pip.as_raw() as usize].site_port
    }

    fn is_pip_synthetic(&self, pip: PipId) -> bool {
        self.pips[pip.as_raw() as usize].synthetic
    }

    fn cell_bel_pins(&self, cell_type: Ident, port: Ident) -> Vec<Ident> {
        match self.cell_bel_map.get(&(cell_type, port)) {
            Some(pins) => pins.clone(),
            None => vec![port],
        }
    }

    fn is_valid_bel_for_cell_type(&self, cell_type: Ident, bel: BelId) -> bool {
        let bel_type = self.bel_type(bel);
        if bel_type == cell_type {
            return true;
        }
        self.type_buckets
            .get(&bel_type)
            .is_some_and(|types| types.contains(&cell_type))
    }

    fn cell_type_available(&self, cell_type: Ident) -> bool {
        !self.missing_cell_types.contains(&cell_type)
    }

    fn cluster_descs(&self) -> &[ClusterDesc] {
        &self.clusters
    }
}
