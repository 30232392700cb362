//! Opaque ID newtypes for design entities.

use crate::arena::ArenaKey;
use basalt_common::Ident;
use serde::{Deserialize, Serialize};

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

        impl ArenaKey for $name {
            fn from_raw(index: u32) -> Self {
                Self(index)
            }

            fn as_raw(self) -> u32 {
                self.0
            }
        }
    };
}

define_id!(
    /// Opaque, copyable ID for a cell in the design.
    CellId
);

define_id!(
    /// Opaque, copyable ID for a net in the design.
    NetId
);

define_id!(
    /// Opaque, copyable ID for a placement region.
    RegionId
);

/// Identifier of a packed cluster.
///
/// Clusters are named after their root cell, so the id wraps the root's
/// interned name.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct ClusterId(Ident);

impl ClusterId {
    /// Creates a cluster id from the root cell's name.
    pub const fn new(root_name: Ident) -> Self {
        Self(root_name)
    }

    /// The root cell's name.
    pub const fn name(self) -> Ident {
        self.0
    }
}
