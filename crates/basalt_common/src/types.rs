//! Port directions and binding strengths shared by the device and design
//! layers.

use serde::{Deserialize, Serialize};

/// Direction of a cell port or bel pin.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum PortType {
    /// An input port (signal flows into the cell).
    Input,
    /// An output port (signal flows out of the cell).
    Output,
    /// A bidirectional port.
    Inout,
}

/// How firmly a binding (cell to bel, net to wire/pip) is pinned.
///
/// The placer may only move bindings of strength [`Strong`](Self::Strong)
/// or below. Ordering follows declaration order via the derived `Ord`.
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Debug, Serialize, Deserialize,
)]
pub enum PlaceStrength {
    /// Not bound at all.
    #[default]
    None,
    /// A provisional binding, freely replaceable.
    Weak,
    /// A normal binding made during placement or routing.
    Strong,
    /// Fixed by the placer after legalization.
    Placer,
    /// Locked by an earlier flow stage.
    Locked,
    /// Pinned by an explicit user constraint.
    User,
}
