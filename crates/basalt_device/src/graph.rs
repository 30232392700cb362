//! The read-only device graph view required from any architecture backend.

use crate::cluster::ClusterDesc;
use crate::ids::{BelId, Loc, PipId, WireId};
use basalt_common::{Ident, PortType};
use serde::{Deserialize, Serialize};

/// Functional category of a bel.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum BelCategory {
    /// A logic bel a cell may be placed on.
    Logic,
    /// An intra-site routing bel (route-through mux).
    Routing,
    /// A site port pseudo-bel on the site boundary.
    SitePort,
}

/// A `(bel, pin)` pair attached to a wire.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct BelPin {
    /// The bel.
    pub bel: BelId,
    /// The pin name on that bel.
    pub pin: Ident,
}

/// Read-only accessors over the device's bels, wires, and pips.
///
/// The core consumes this trait; architecture backends implement it over
/// whatever internal representation they use. All methods must be pure and
/// deterministic; the packer and placement resolver rely on no particular
/// neighbour order beyond determinism.
pub trait DeviceGraph {
    /// Grid dimensions as `(width, height)` in tiles.
    fn grid_dim(&self) -> (i32, i32);

    /// All bels in the tile at `(x, y)`, in ascending `z` order.
    fn bels_by_tile(&self, x: i32, y: i32) -> Vec<BelId>;

    /// The tile coordinates and intra-tile index of a bel.
    fn bel_location(&self, bel: BelId) -> Loc;

    /// The bel's type id.
    fn bel_type(&self, bel: BelId) -> Ident;

    /// The bel's functional category.
    fn bel_category(&self, bel: BelId) -> BelCategory;

    /// Whether the bel is synthetic (invented by the backend, not fabric).
    fn bel_synthetic(&self, bel: BelId) -> bool;

    /// Pin names of a bel, in backend order.
    fn bel_pins(&self, bel: BelId) -> Vec<Ident>;

    /// The wire a bel pin attaches to, if the pin exists.
    fn bel_pin_wire(&self, bel: BelId, pin: Ident) -> Option<WireId>;

    /// The direction of a bel pin, if the pin exists.
    fn bel_pin_type(&self, bel: BelId, pin: Ident) -> Option<PortType>;

    /// All `(bel, pin)` pairs attached to a wire.
    fn wire_bel_pins(&self, wire: WireId) -> Vec<BelPin>;

    /// The site a wire belongs to; `None` for inter-site routing wires.
    fn wire_site_index(&self, wire: WireId) -> Option<u32>;

    /// Pips whose source is `wire`.
    fn pips_downhill(&self, wire: WireId) -> Vec<PipId>;

    /// Pips whose destination is `wire`.
    fn pips_uphill(&self, wire: WireId) -> Vec<PipId>;

    /// The wire driving a pip.
    fn pip_src_wire(&self, pip: PipId) -> WireId;

    /// The wire a pip drives.
    fn pip_dst_wire(&self, pip: PipId) -> WireId;

    /// Whether the pip crosses a site boundary.
    fn is_site_port(&self, pip: PipId) -> bool;

    /// Whether the pip is synthetic (invented by the backend, not fabric).
    fn is_pip_synthetic(&self, pip: PipId) -> bool;

    /// Physical bel pins a logical cell port maps to on a bel of the given
    /// cell type. Defaults to the identity mapping.
    fn cell_bel_pins(&self, _cell_type: Ident, port: Ident) -> Vec<Ident> {
        vec![port]
    }

    /// Whether a cell of `cell_type` may in principle be placed on `bel`.
    ///
    /// This is the coarse type-compatibility check; the fine-grained
    /// legality of the surrounding tile is `is_bel_location_valid` in the
    /// placement layer. Defaults to exact type equality.
    fn is_valid_bel_for_cell_type(&self, cell_type: Ident, bel: BelId) -> bool {
        self.bel_type(bel) == cell_type
    }

    /// Whether the part physically provides the given cell type at all.
    /// Smaller family members lack e.g. SERDES blocks.
    fn cell_type_available(&self, _cell_type: Ident) -> bool {
        true
    }

    /// Cluster descriptions shipped with the device, in database order.
    fn cluster_descs(&self) -> &[ClusterDesc] {
        &[]
    }
}
