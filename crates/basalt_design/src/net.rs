//! Nets: signals with a driver, users, and a routed wire tree.

use crate::ids::{CellId, RegionId};
use basalt_common::{Delay, DelayPair, Ident, PlaceStrength, PropertyMap};
use basalt_device::{PipId, WireId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A reference to one end of a net: a `(cell, port)` pair plus the slack
/// budget the timing analyser assigned to this arc.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct PortRef {
    /// The cell.
    pub cell: CellId,
    /// The port on that cell.
    pub port: Ident,
    /// Delay budget for this arc.
    pub budget: Delay,
}

impl PortRef {
    /// Creates a reference with a zero budget.
    pub fn new(cell: CellId, port: Ident) -> Self {
        Self {
            cell,
            port,
            budget: 0,
        }
    }

    /// Returns `true` if this reference points at `(cell, port)`.
    pub fn is(&self, cell: CellId, port: Ident) -> bool {
        self.cell == cell && self.port == port
    }
}

/// One entry of a net's routing tree: the uphill pip driving a wire, or
/// `None` when the wire is a routing root (e.g. the driver's bel pin wire).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct PipMap {
    /// The pip that drives the keyed wire, if any.
    pub pip: Option<PipId>,
    /// How firmly the binding is pinned.
    pub strength: PlaceStrength,
}

/// A clock-period constraint attached to a clock net.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ClockConstraint {
    /// High phase duration.
    pub high: DelayPair,
    /// Low phase duration.
    pub low: DelayPair,
    /// Full period.
    pub period: DelayPair,
}

/// A net in the design database.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NetInfo {
    /// Net name.
    pub name: Ident,
    /// Hierarchical path of the originating signal, if preserved.
    pub hierpath: Option<Ident>,
    /// The driving `(cell, port)`, at most one.
    pub driver: Option<PortRef>,
    /// Sink `(cell, port)`s, in insertion order.
    pub users: Vec<PortRef>,
    /// HDL attributes.
    pub attrs: PropertyMap,
    /// The routing tree, keyed by destination wire.
    pub wires: IndexMap<WireId, PipMap>,
    /// Clock-period constraint, if this is a constrained clock.
    pub clkconstr: Option<ClockConstraint>,
    /// Routing region constraint, if any.
    pub region: Option<RegionId>,
}

impl NetInfo {
    /// Creates an undriven net with no users and an empty wire tree.
    pub fn new(name: Ident) -> Self {
        Self {
            name,
            hierpath: None,
            driver: None,
            users: Vec::new(),
            attrs: PropertyMap::new(),
            wires: IndexMap::new(),
            clkconstr: None,
            region: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_ref_matching() {
        let r = PortRef::new(CellId::from_raw(3), Ident::from_raw(7));
        assert!(r.is(CellId::from_raw(3), Ident::from_raw(7)));
        assert!(!r.is(CellId::from_raw(3), Ident::from_raw(8)));
        assert!(!r.is(CellId::from_raw(4), Ident::from_raw(7)));
        assert_eq!(r.budget, 0);
    }

    #[test]
    fn new_net_is_bare() {
        let net = NetInfo::new(Ident::from_raw(50));
        assert!(net.driver.is_none());
        assert!(net.users.is_empty());
        assert!(net.wires.is_empty());
        assert!(net.clkconstr.is_none());
    }

    #[test]
    fn wire_tree_preserves_insertion_order() {
        let mut net = NetInfo::new(Ident::from_raw(50));
        for raw in [5u32, 1, 9] {
            net.wires.insert(
                WireId::from_raw(raw),
                PipMap {
                    pip: None,
                    strength: PlaceStrength::Strong,
                },
            );
        }
        let keys: Vec<u32> = net.wires.keys().map(|w| w.as_raw()).collect();
        assert_eq!(keys, vec![5, 1, 9]);
    }

    #[test]
    fn serde_roundtrip() {
        let mut net = NetInfo::new(Ident::from_raw(50));
        net.driver = Some(PortRef::new(CellId::from_raw(0), Ident::from_raw(1)));
        net.wires.insert(
            WireId::from_raw(2),
            PipMap {
                pip: Some(PipId::from_raw(4)),
                strength: PlaceStrength::Weak,
            },
        );
        net.clkconstr = Some(ClockConstraint {
            high: DelayPair::from_delay(5_000),
            low: DelayPair::from_delay(5_000),
            period: DelayPair::from_delay(10_000),
        });
        let json = serde_json::to_string(&net).unwrap();
        let back: NetInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(back.driver, net.driver);
        assert_eq!(back.wires.len(), 1);
        assert_eq!(back.clkconstr, net.clkconstr);
    }
}
