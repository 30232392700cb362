//! Opaque ID newtypes and tile coordinates for device resources.
//!
//! Architecture backends differ in how they represent bels, wires, and pips
//! internally (flat index, packed tile location, packed routing-node id);
//! the core only requires equality-comparable, hashable, totally-ordered
//! tokens. "No resource" is expressed as `Option<_>` rather than a sentinel
//! value.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize,
        )]
        pub struct $name(u32);

        impl $name {
            /// Creates an ID from a raw `u32` index.
            pub const fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw `u32` index.
            pub const fn as_raw(self) -> u32 {
                self.0
            }
        }
    };
}

define_id!(
    /// Opaque, copyable ID for a bel (basic element of logic).
    BelId
);

define_id!(
    /// Opaque, copyable ID for a routing wire.
    WireId
);

define_id!(
    /// Opaque, copyable ID for a pip (programmable interconnect point).
    PipId
);

/// Integer tile coordinates; `z` sub-indexes bels within a tile.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Debug, Serialize, Deserialize)]
pub struct Loc {
    /// Column index.
    pub x: i32,
    /// Row index.
    pub y: i32,
    /// Index within the tile.
    pub z: i32,
}

impl Loc {
    /// Creates a location from its three coordinates.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The `(x, y)` tile this location lies in.
    pub fn tile(self) -> (i32, i32) {
        (self.x, self.y)
    }
}

impl Add for Loc {
    type Output = Loc;

    fn add(self, other: Loc) -> Loc {
        Loc::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl Sub for Loc {
    type Output = Loc;

    fn sub(self, other: Loc) -> Loc {
        Loc::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}
