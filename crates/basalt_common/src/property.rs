//! HDL parameter and attribute values.
//!
//! A [`Property`] is either an integer with an explicit bit width (LUT init
//! vectors, numeric parameters) or a free-form string (mode selectors, mux
//! settings). Cells and nets carry insertion-ordered maps of these.

use crate::ident::Ident;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// An insertion-ordered parameter/attribute map keyed by interned name.
pub type PropertyMap = IndexMap<Ident, Property>;

/// The value of an HDL parameter or attribute.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Property {
    /// An integer value with an explicit bit width.
    Int {
        /// The value, sign-extended into an `i64`.
        value: i64,
        /// Significant bit width of the value.
        width: u32,
    },
    /// A string value.
    Str(String),
}

impl Property {
    /// Creates an integer property with the given bit width.
    pub fn int(value: i64, width: u32) -> Self {
        Property::Int { value, width }
    }

    /// Creates a string property.
    pub fn str(value: impl Into<String>) -> Self {
        Property::Str(value.into())
    }

    /// Returns the integer value, if this is an integer property.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Property::Int { value, .. } => Some(*value),
            Property::Str(_) => None,
        }
    }

    /// Returns the string value, if this is a string property.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Property::Int { .. } => None,
            Property::Str(s) => Some(s),
        }
    }
}

/// Looks up an integer property, falling back to `default` when the key is
/// absent or holds a string.
pub fn int_or_default(map: &PropertyMap, key: Ident, default: i64) -> i64 {
    map.get(&key).and_then(Property::as_int).unwrap_or(default)
}

/// Looks up a string property, falling back to `default` when the key is
/// absent or holds an integer.
pub fn str_or_default<'a>(map: &'a PropertyMap, key: Ident, default: &'a str) -> &'a str {
    map.get(&key).and_then(Property::as_str).unwrap_or(default)
}
