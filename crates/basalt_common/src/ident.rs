//! Interned identifiers for cheap cloning and O(1) equality comparison.
//!
//! Every named entity in a design (cells, nets, ports, parameters, bel
//! types) is referred to by an [`Ident`]: a `u32` index into an
//! [`Interner`]. A fixed low range of ids is reserved for the built-in
//! constids (see [`crate::constids`]), which every interner pre-interns in
//! the same order so their `Ident` constants are valid process-wide.

use crate::constids;
use lasso::ThreadedRodeo;
use serde::{Deserialize, Serialize};

/// A unique identifier for any named entity in the design.
///
/// Identifiers are interned strings represented as a `u32` index into an
/// interner. Equality, ordering, and hashing are all by integer id.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct Ident(u32);

impl Ident {
    /// Creates an `Ident` from a raw `u32` index.
    ///
    /// Primarily intended for the constid table, deserialization, and
    /// testing. In normal use, identifiers are created through
    /// [`Interner::get_or_intern`].
    pub const fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw `u32` index of this identifier.
    pub const fn as_raw(self) -> u32 {
        self.0
    }

    /// Returns `true` if this id lies in the sealed built-in constid range.
    pub const fn is_constid(self) -> bool {
        self.0 < constids::COUNT
    }
}

// SAFETY: `Ident` wraps a `u32` which is always a valid `usize` on 32-bit
// and 64-bit platforms. `try_from_usize` rejects values that don't fit.
unsafe impl lasso::Key for Ident {
    fn into_usize(self) -> usize {
        self.0 as usize
    }

    fn try_from_usize(int: usize) -> Option<Self> {
        u32::try_from(int).ok().map(Ident)
    }
}

/// String interner backed by [`lasso::ThreadedRodeo`].
///
/// The table is append-only: ids never change for the lifetime of the
/// interner. Construction pre-interns the built-in constids, so the
/// constants in [`crate::constids`] resolve against any `Interner`.
/// Population may happen from multiple threads up front, but a PnR run
/// treats the table as quiescent.
pub struct Interner {
    rodeo: ThreadedRodeo<Ident>,
}

impl Interner {
    /// Creates an interner with the built-in constids pre-interned.
    pub fn new() -> Self {
        let rodeo = ThreadedRodeo::new();
        for (i, s) in constids::STRINGS.iter().enumerate() {
            let id: Ident = rodeo.get_or_intern_static(s);
            debug_assert_eq!(id.as_raw() as usize, i);
        }
        Self { rodeo }
    }

    /// Interns a string, returning its [`Ident`]. If the string was already
    /// interned, returns the existing identifier without allocating.
    pub fn get_or_intern(&self, s: &str) -> Ident {
        self.rodeo.get_or_intern(s)
    }

    /// Returns the id of `s` if it has already been interned.
    pub fn get(&self, s: &str) -> Option<Ident> {
        self.rodeo.get(s)
    }

    /// Resolves an [`Ident`] back to its string value.
    ///
    /// # Panics
    ///
    /// Panics if the `Ident` was not created by this interner.
    pub fn resolve(&self, ident: Ident) -> &str {
        self.rodeo.resolve(&ident)
    }

    /// Returns the number of interned strings, constids included.
    pub fn len(&self) -> usize {
        self.rodeo.len()
    }

    /// Returns `true` if the interner holds no strings beyond nothing at
    /// all; never the case in practice since constids are pre-interned.
    pub fn is_empty(&self) -> bool {
        self.rodeo.is_empty()
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}
