//! Zero-copy reader for the relocatable chip-database format.
//!
//! A chip database is a single binary blob, typically memory-mapped, with
//! little-endian integer fields. Nested structures are referenced by
//! self-relative offsets: a 32-bit signed offset stored at position `p`
//! points at `p + offset`. The reader validates the version field up front,
//! bounds-checks every offset it follows, and yields views that borrow from
//! the backing mapping; payload data is never copied.
//!
//! Layout, from the top: header (family, version, grid dimensions), tile
//! grid (per tile: bels, pips, clock pips, aliases), global alias table,
//! timing classes (groups of named delay records), variants (packages and
//! their pin maps), cluster descriptions, and the id-string table that all
//! name fields index into.

use crate::cluster::{ChainablePort, ClusterCellPort, ClusterDesc};
use basalt_common::{DelayPair, Interner};

/// Errors produced while opening or traversing a chip database.
#[derive(Debug, thiserror::Error)]
pub enum ChipDbError {
    /// The blob ends before a field that should be present.
    #[error("chip database truncated at byte {at}")]
    Truncated {
        /// Byte position of the failed read.
        at: usize,
    },
    /// The version field does not match what this reader understands.
    #[error("unsupported chip database version {found} (expected {})", ChipDb::SUPPORTED_VERSION)]
    BadVersion {
        /// Version found in the blob.
        found: u32,
    },
    /// A self-relative offset points outside the blob.
    #[error("dangling offset at byte {at}")]
    BadOffset {
        /// Byte position of the offset field.
        at: usize,
    },
    /// A string in the id table is not valid UTF-8.
    #[error("malformed string in chip database")]
    BadString,
    /// An index addressed past the end of its table.
    #[error("{what} index {index} out of range")]
    IndexOutOfRange {
        /// Which table was being indexed.
        what: &'static str,
        /// The offending index.
        index: u32,
    },
}

fn u16_at(data: &[u8], at: usize) -> Result<u16, ChipDbError> {
    let bytes = data
        .get(at..at + 2)
        .ok_or(ChipDbError::Truncated { at })?;
    Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
}

fn u32_at(data: &[u8], at: usize) -> Result<u32, ChipDbError> {
    let bytes = data
        .get(at..at + 4)
        .ok_or(ChipDbError::Truncated { at })?;
    Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

fn i16_at(data: &[u8], at: usize) -> Result<i16, ChipDbError> {
    Ok(u16_at(data, at)? as i16)
}

/// Resolves a self-relative 32-bit offset stored at `at`.
fn rel_at(data: &[u8], at: usize) -> Result<usize, ChipDbError> {
    let offset = u32_at(data, at)? as i32;
    let target = (at as i64) + (offset as i64);
    if target < 0 || target as usize > data.len() {
        return Err(ChipDbError::BadOffset { at });
    }
    Ok(target as usize)
}

/// Reads a NUL-terminated UTF-8 string starting at `at`.
fn cstr_at(data: &[u8], at: usize) -> Result<&str, ChipDbError> {
    let tail = data.get(at..).ok_or(ChipDbError::Truncated { at })?;
    let end = tail
        .iter()
        .position(|&b| b == 0)
        .ok_or(ChipDbError::Truncated { at: data.len() })?;
    std::str::from_utf8(&tail[..end]).map_err(|_| ChipDbError::BadString)
}

// Header field positions.
const H_FAMILY: usize = 0;
const H_VERSION: usize = 4;
const H_ROWS: usize = 8;
const H_COLS: usize = 10;
const H_GRID: usize = 12;
const H_NUM_ALIASES: usize = 16;
const H_ALIASES: usize = 20;
const H_NUM_TIMING_CLASSES: usize = 24;
const H_TIMING_CLASSES: usize = 28;
const H_NUM_VARIANTS: usize = 32;
const H_VARIANTS: usize = 36;
const H_NUM_CLUSTERS: usize = 40;
const H_CLUSTERS: usize = 44;
const H_NUM_IDS: usize = 48;
const H_ID_STRS: usize = 52;
const HEADER_LEN: usize = 56;

const BEL_LEN: usize = 8;
const PAIR_LEN: usize = 4;
const ALIAS_LEN: usize = 12;
const TIMING_CLASS_LEN: usize = 12;
const TIMING_GROUP_LEN: usize = 12;
const TIMING_LEN: usize = 20;
const VARIANT_LEN: usize = 12;
const PACKAGE_LEN: usize = 12;
const CLUSTER_LEN: usize = 32;
const CHAIN_PORT_LEN: usize = 20;
const CELL_PORT_LEN: usize = 8;

/// A validated chip database over a borrowed blob.
pub struct ChipDb<'a> {
    data: &'a [u8],
    version: u32,
}

impl<'a> ChipDb<'a> {
    /// The database format version this reader understands.
    pub const SUPPORTED_VERSION: u32 = 3;

    /// Opens a chip database, validating its length and version.
    pub fn new(data: &'a [u8]) -> Result<Self, ChipDbError> {
        if data.len() < HEADER_LEN {
            return Err(ChipDbError::Truncated { at: data.len() });
        }
        let version = u32_at(data, H_VERSION)?;
        if version != Self::SUPPORTED_VERSION {
            return Err(ChipDbError::BadVersion { found: version });
        }
        Ok(Self { data, version })
    }

    /// The device family name.
    pub fn family(&self) -> Result<&'a str, ChipDbError> {
        cstr_at(self.data, rel_at(self.data, H_FAMILY)?)
    }

    /// The format version stored in the blob.
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Grid height in tiles.
    pub fn rows(&self) -> Result<u16, ChipDbError> {
        u16_at(self.data, H_ROWS)
    }

    /// Grid width in tiles.
    pub fn cols(&self) -> Result<u16, ChipDbError> {
        u16_at(self.data, H_COLS)
    }

    /// The tile at `(row, col)`.
    pub fn tile(&self, row: u16, col: u16) -> Result<TileView<'a>, ChipDbError> {
        let rows = self.rows()?;
        let cols = self.cols()?;
        if row >= rows || col >= cols {
            return Err(ChipDbError::IndexOutOfRange {
                what: "tile",
                index: row as u32 * cols as u32 + col as u32,
            });
        }
        let grid = rel_at(self.data, H_GRID)?;
        let entry = grid + (row as usize * cols as usize + col as usize) * 4;
        let base = rel_at(self.data, entry)?;
        Ok(TileView {
            data: self.data,
            base,
        })
    }

    /// Number of global wire aliases.
    pub fn num_aliases(&self) -> Result<u32, ChipDbError> {
        u32_at(self.data, H_NUM_ALIASES)
    }

    /// The `index`-th global wire alias.
    pub fn alias(&self, index: u32) -> Result<GlobalAlias, ChipDbError> {
        let count = self.num_aliases()?;
        if index >= count {
            return Err(ChipDbError::IndexOutOfRange {
                what: "alias",
                index,
            });
        }
        let base = rel_at(self.data, H_ALIASES)? + index as usize * ALIAS_LEN;
        Ok(GlobalAlias {
            dest_row: u16_at(self.data, base)?,
            dest_col: u16_at(self.data, base + 2)?,
            dest_id: u16_at(self.data, base + 4)?,
            src_row: u16_at(self.data, base + 6)?,
            src_col: u16_at(self.data, base + 8)?,
            src_id: u16_at(self.data, base + 10)?,
        })
    }

    /// Number of timing classes (speed grades).
    pub fn num_timing_classes(&self) -> Result<u32, ChipDbError> {
        u32_at(self.data, H_NUM_TIMING_CLASSES)
    }

    /// The `index`-th timing class.
    pub fn timing_class(&self, index: u32) -> Result<TimingClassView<'a>, ChipDbError> {
        let count = self.num_timing_classes()?;
        if index >= count {
            return Err(ChipDbError::IndexOutOfRange {
                what: "timing class",
                index,
            });
        }
        let base = rel_at(self.data, H_TIMING_CLASSES)? + index as usize * TIMING_CLASS_LEN;
        Ok(TimingClassView {
            data: self.data,
            base,
        })
    }

    /// Number of device variants.
    pub fn num_variants(&self) -> Result<u32, ChipDbError> {
        u32_at(self.data, H_NUM_VARIANTS)
    }

    /// The `index`-th device variant.
    pub fn variant(&self, index: u32) -> Result<VariantView<'a>, ChipDbError> {
        let count = self.num_variants()?;
        if index >= count {
            return Err(ChipDbError::IndexOutOfRange {
                what: "variant",
                index,
            });
        }
        let base = rel_at(self.data, H_VARIANTS)? + index as usize * VARIANT_LEN;
        Ok(VariantView {
            data: self.data,
            base,
        })
    }

    /// Number of cluster descriptions.
    pub fn num_clusters(&self) -> Result<u32, ChipDbError> {
        u32_at(self.data, H_NUM_CLUSTERS)
    }

    /// Decodes the `index`-th cluster description, interning its names.
    pub fn cluster_desc(
        &self,
        index: u32,
        interner: &Interner,
    ) -> Result<ClusterDesc, ChipDbError> {
        let count = self.num_clusters()?;
        if index >= count {
            return Err(ChipDbError::IndexOutOfRange {
                what: "cluster",
                index,
            });
        }
        let base = rel_at(self.data, H_CLUSTERS)? + index as usize * CLUSTER_LEN;
        let data = self.data;

        let ident = |id: u32| -> Result<basalt_common::Ident, ChipDbError> {
            Ok(interner.get_or_intern(self.id_str(id)?))
        };

        let name = ident(u32_at(data, base)?)?;

        let num_roots = u32_at(data, base + 4)?;
        let roots_base = rel_at(data, base + 8)?;
        let mut root_cell_types = Vec::with_capacity(num_roots as usize);
        for i in 0..num_roots {
            root_cell_types.push(ident(u32_at(data, roots_base + i as usize * 4)?)?);
        }

        let num_chains = u32_at(data, base + 12)?;
        let chains_base = rel_at(data, base + 16)?;
        let mut chainable_ports = Vec::with_capacity(num_chains as usize);
        for i in 0..num_chains {
            let at = chains_base + i as usize * CHAIN_PORT_LEN;
            chainable_ports.push(ChainablePort {
                cell_source: ident(u32_at(data, at)?)?,
                cell_sink: ident(u32_at(data, at + 4)?)?,
                bel_source: ident(u32_at(data, at + 8)?)?,
                bel_sink: ident(u32_at(data, at + 12)?)?,
                avg_x_offset: i16_at(data, at + 16)? as i32,
                avg_y_offset: i16_at(data, at + 18)? as i32,
            });
        }

        let num_cells = u32_at(data, base + 20)?;
        let cells_base = rel_at(data, base + 24)?;
        let mut cluster_cells_map = Vec::with_capacity(num_cells as usize);
        for i in 0..num_cells {
            let at = cells_base + i as usize * CELL_PORT_LEN;
            cluster_cells_map.push(ClusterCellPort {
                cell: ident(u32_at(data, at)?)?,
                port: ident(u32_at(data, at + 4)?)?,
            });
        }

        let out_of_site_clusters = u32_at(data, base + 28)? != 0;

        Ok(ClusterDesc {
            name,
            root_cell_types,
            chainable_ports,
            cluster_cells_map,
            out_of_site_clusters,
        })
    }

    /// Number of entries in the id-string table.
    pub fn num_ids(&self) -> Result<u32, ChipDbError> {
        u32_at(self.data, H_NUM_IDS)
    }

    /// Resolves a name id against the blob's id-string table.
    pub fn id_str(&self, id: u32) -> Result<&'a str, ChipDbError> {
        let count = self.num_ids()?;
        if id >= count {
            return Err(ChipDbError::IndexOutOfRange {
                what: "id string",
                index: id,
            });
        }
        let table = rel_at(self.data, H_ID_STRS)?;
        cstr_at(self.data, rel_at(self.data, table + id as usize * 4)?)
    }
}

/// A `(dest_id, src_id)` pair: bel port to wire, pip destination to source,
/// package pin to pad, depending on the containing table.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct IdPair {
    /// Destination name id.
    pub dest_id: u16,
    /// Source name id.
    pub src_id: u16,
}

fn pair_at(data: &[u8], at: usize) -> Result<IdPair, ChipDbError> {
    Ok(IdPair {
        dest_id: u16_at(data, at)?,
        src_id: u16_at(data, at + 2)?,
    })
}

/// A global wire alias joining wires across tiles.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct GlobalAlias {
    /// Destination tile row.
    pub dest_row: u16,
    /// Destination tile column.
    pub dest_col: u16,
    /// Destination wire name id.
    pub dest_id: u16,
    /// Source tile row.
    pub src_row: u16,
    /// Source tile column.
    pub src_col: u16,
    /// Source wire name id.
    pub src_id: u16,
}

/// View of one tile's contents.
pub struct TileView<'a> {
    data: &'a [u8],
    base: usize,
}

impl<'a> TileView<'a> {
    /// Number of bels in the tile.
    pub fn num_bels(&self) -> Result<u32, ChipDbError> {
        u32_at(self.data, self.base)
    }

    /// The `index`-th bel in the tile.
    pub fn bel(&self, index: u32) -> Result<BelView<'a>, ChipDbError> {
        if index >= self.num_bels()? {
            return Err(ChipDbError::IndexOutOfRange {
                what: "tile bel",
                index,
            });
        }
        let base = rel_at(self.data, self.base + 4)? + index as usize * BEL_LEN;
        Ok(BelView {
            data: self.data,
            base,
        })
    }

    /// Number of pips in the tile.
    pub fn num_pips(&self) -> Result<u32, ChipDbError> {
        u32_at(self.data, self.base + 8)
    }

    /// The `index`-th pip as a `(dest wire, src wire)` name-id pair.
    pub fn pip(&self, index: u32) -> Result<IdPair, ChipDbError> {
        if index >= self.num_pips()? {
            return Err(ChipDbError::IndexOutOfRange {
                what: "tile pip",
                index,
            });
        }
        let base = rel_at(self.data, self.base + 12)?;
        pair_at(self.data, base + index as usize * PAIR_LEN)
    }

    /// Number of dedicated clock pips in the tile.
    pub fn num_clock_pips(&self) -> Result<u32, ChipDbError> {
        u32_at(self.data, self.base + 16)
    }

    /// The `index`-th clock pip as a `(dest wire, src wire)` name-id pair.
    pub fn clock_pip(&self, index: u32) -> Result<IdPair, ChipDbError> {
        if index >= self.num_clock_pips()? {
            return Err(ChipDbError::IndexOutOfRange {
                what: "tile clock pip",
                index,
            });
        }
        let base = rel_at(self.data, self.base + 20)?;
        pair_at(self.data, base + index as usize * PAIR_LEN)
    }

    /// Number of intra-tile wire aliases.
    pub fn num_aliases(&self) -> Result<u32, ChipDbError> {
        u32_at(self.data, self.base + 24)
    }

    /// The `index`-th intra-tile alias as a `(dest, src)` name-id pair.
    pub fn alias(&self, index: u32) -> Result<IdPair, ChipDbError> {
        if index >= self.num_aliases()? {
            return Err(ChipDbError::IndexOutOfRange {
                what: "tile alias",
                index,
            });
        }
        let base = rel_at(self.data, self.base + 28)?;
        pair_at(self.data, base + index as usize * PAIR_LEN)
    }
}

/// View of one bel record inside a tile.
pub struct BelView<'a> {
    data: &'a [u8],
    base: usize,
}

impl<'a> BelView<'a> {
    /// Name id of the bel's type.
    pub fn type_id(&self) -> Result<u16, ChipDbError> {
        u16_at(self.data, self.base)
    }

    /// Number of pin records.
    pub fn num_ports(&self) -> Result<u16, ChipDbError> {
        u16_at(self.data, self.base + 2)
    }

    /// The `index`-th pin as a `(pin name, wire name)` id pair.
    pub fn port(&self, index: u16) -> Result<IdPair, ChipDbError> {
        if index >= self.num_ports()? {
            return Err(ChipDbError::IndexOutOfRange {
                what: "bel port",
                index: index as u32,
            });
        }
        let base = rel_at(self.data, self.base + 4)?;
        pair_at(self.data, base + index as usize * PAIR_LEN)
    }
}

/// A named delay record within a timing group.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TimingEntry {
    /// Name id of the timed element.
    pub name_id: u32,
    /// Fall-to-fall delay in picoseconds.
    pub ff: u32,
    /// Fall-to-rise delay in picoseconds.
    pub fr: u32,
    /// Rise-to-fall delay in picoseconds.
    pub rf: u32,
    /// Rise-to-rise delay in picoseconds.
    pub rr: u32,
}

impl TimingEntry {
    /// Collapses the four transition delays into a min/max pair.
    pub fn delay_pair(&self) -> DelayPair {
        let lo = self.ff.min(self.fr).min(self.rf).min(self.rr);
        let hi = self.ff.max(self.fr).max(self.rf).max(self.rr);
        DelayPair::new(lo as i64, hi as i64)
    }
}

/// View of one timing class (speed grade).
pub struct TimingClassView<'a> {
    data: &'a [u8],
    base: usize,
}

impl<'a> TimingClassView<'a> {
    /// Name id of the class (e.g. the speed-grade string).
    pub fn name_id(&self) -> Result<u32, ChipDbError> {
        u32_at(self.data, self.base)
    }

    /// Number of timing groups in the class.
    pub fn num_groups(&self) -> Result<u32, ChipDbError> {
        u32_at(self.data, self.base + 4)
    }

    /// The `index`-th timing group.
    pub fn group(&self, index: u32) -> Result<TimingGroupView<'a>, ChipDbError> {
        if index >= self.num_groups()? {
            return Err(ChipDbError::IndexOutOfRange {
                what: "timing group",
                index,
            });
        }
        let base = rel_at(self.data, self.base + 8)? + index as usize * TIMING_GROUP_LEN;
        Ok(TimingGroupView {
            data: self.data,
            base,
        })
    }
}

/// View of one timing group (e.g. all LUT delays).
pub struct TimingGroupView<'a> {
    data: &'a [u8],
    base: usize,
}

impl<'a> TimingGroupView<'a> {
    /// Name id of the group.
    pub fn name_id(&self) -> Result<u32, ChipDbError> {
        u32_at(self.data, self.base)
    }

    /// Number of timing entries in the group.
    pub fn num_timings(&self) -> Result<u32, ChipDbError> {
        u32_at(self.data, self.base + 4)
    }

    /// The `index`-th timing entry.
    pub fn timing(&self, index: u32) -> Result<TimingEntry, ChipDbError> {
        if index >= self.num_timings()? {
            return Err(ChipDbError::IndexOutOfRange {
                what: "timing entry",
                index,
            });
        }
        let at = rel_at(self.data, self.base + 8)? + index as usize * TIMING_LEN;
        Ok(TimingEntry {
            name_id: u32_at(self.data, at)?,
            ff: u32_at(self.data, at + 4)?,
            fr: u32_at(self.data, at + 8)?,
            rf: u32_at(self.data, at + 12)?,
            rr: u32_at(self.data, at + 16)?,
        })
    }
}

/// View of one device variant.
pub struct VariantView<'a> {
    data: &'a [u8],
    base: usize,
}

impl<'a> VariantView<'a> {
    /// Name id of the variant.
    pub fn name_id(&self) -> Result<u32, ChipDbError> {
        u32_at(self.data, self.base)
    }

    /// Number of packages the variant ships in.
    pub fn num_packages(&self) -> Result<u32, ChipDbError> {
        u32_at(self.data, self.base + 4)
    }

    /// The `index`-th package.
    pub fn package(&self, index: u32) -> Result<PackageView<'a>, ChipDbError> {
        if index >= self.num_packages()? {
            return Err(ChipDbError::IndexOutOfRange {
                what: "package",
                index,
            });
        }
        let base = rel_at(self.data, self.base + 8)? + index as usize * PACKAGE_LEN;
        Ok(PackageView {
            data: self.data,
            base,
        })
    }
}

/// View of one package's pin map.
pub struct PackageView<'a> {
    data: &'a [u8],
    base: usize,
}

impl<'a> PackageView<'a> {
    /// Name id of the package.
    pub fn name_id(&self) -> Result<u32, ChipDbError> {
        u32_at(self.data, self.base)
    }

    /// Number of pin-map entries.
    pub fn num_pins(&self) -> Result<u32, ChipDbError> {
        u32_at(self.data, self.base + 4)
    }

    /// The `index`-th pin-map entry as a `(pin, pad)` name-id pair.
    pub fn pin(&self, index: u32) -> Result<IdPair, ChipDbError> {
        if index >= self.num_pins()? {
            return Err(ChipDbError::IndexOutOfRange {
                what: "package pin",
                index,
            });
        }
        let base = rel_at(self.data, self.base + 8)?;
        pair_at(self.data, base + index as usize * PAIR_LEN)
    }
}
