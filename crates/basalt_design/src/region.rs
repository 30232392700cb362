//! Placement and routing regions.

use basalt_common::Ident;
use basalt_device::{BelId, Loc, WireId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A named subset of device resources a cell or net may be constrained to.
///
/// Each subset only constrains when its corresponding flag is set; an empty
/// flag means "no opinion", not "nothing allowed".
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Region {
    /// Region name.
    pub name: Ident,
    /// Whether `bels` constrains placement.
    pub constr_bels: bool,
    /// Whether `wires` constrains routing.
    pub constr_wires: bool,
    /// Whether `piplocs` constrains pip usage.
    pub constr_pips: bool,
    /// Bels inside the region.
    pub bels: HashSet<BelId>,
    /// Wires inside the region.
    pub wires: HashSet<WireId>,
    /// Tile locations whose pips are inside the region.
    pub piplocs: HashSet<Loc>,
}

impl Region {
    /// Creates an unconstraining region with the given name.
    pub fn new(name: Ident) -> Self {
        Self {
            name,
            constr_bels: false,
            constr_wires: false,
            constr_pips: false,
            bels: HashSet::new(),
            wires: HashSet::new(),
            piplocs: HashSet::new(),
        }
    }

    /// Returns `true` if the region admits the bel (or has no bel
    /// constraint at all).
    pub fn admits_bel(&self, bel: BelId) -> bool {
        !self.constr_bels || self.bels.contains(&bel)
    }

    /// Returns `true` if the region admits the wire (or has no wire
    /// constraint at all).
    pub fn admits_wire(&self, wire: WireId) -> bool {
        !self.constr_wires || self.wires.contains(&wire)
    }
}
