//! Shared foundational types for the basalt place-and-route core.
//!
//! This crate provides the interned identifier table (with its sealed range
//! of built-in constids), HDL parameter/attribute properties, min/max and
//! rise/fall delay types, port directions, binding strengths, and the common
//! result types used across the basalt crates.

#![warn(missing_docs)]

pub mod constids;
pub mod delay;
pub mod ident;
pub mod property;
pub mod result;
pub mod types;

pub use delay::{Delay, DelayPair, DelayQuad};
pub use ident::{Ident, Interner};
pub use property::{int_or_default, str_or_default, Property, PropertyMap};
pub use result::{BasaltResult, InternalError};
pub use types::{PlaceStrength, PortType};
