//! Per-bel placement legality.
//!
//! [`is_bel_location_valid`] is called on every candidate move the placer
//! considers, so it only reads precomputed [`ArchCellInfo`] sidecars and
//! current binding state; it never mutates anything.
//!
//! Rules implemented, by bel type:
//!
//! - `TRELLIS_SLICE`: all DFF-using cells in a tile must agree on clock,
//!   set/reset, and their mux/mode settings; cells driving the wide-function
//!   mux may only sit on even half-slices.
//! - `MISTRAL_COMB` / `MISTRAL_FF`: ALM sharing, LAB input budget, and (for
//!   FFs) the LAB control-set limit.
//! - Everything else: available unless the part lacks the cell type
//!   (SERDES-class blocks on small family members).
//!
//! Region compliance applies to the bound cell in every case.

use basalt_common::{constids, Ident};
use basalt_design::{ArchCellInfo, CellId, Design, SliceInfo};
use basalt_device::{BelId, DeviceGraph};
use std::collections::HashSet;

/// Distinct input nets an ALM's combinational cells may use together.
const ALM_INPUT_BUDGET: usize = 8;

/// Distinct combinational input nets available to one LAB.
const LAB_INPUT_BUDGET: usize = 46;

/// Distinct flip-flop control sets available to one LAB.
const LAB_CTRL_SETS: usize = 2;

/// Bels per ALM in the LAB tile model: two combinational positions
/// followed by two flip-flop positions.
const BELS_PER_ALM: i32 = 4;

/// Whether a cell of `cell_type` may in principle sit on `bel`.
///
/// Thin re-export of the device predicate so placer code has one import
/// for both legality questions.
pub fn is_valid_bel_for_cell_type(
    graph: &dyn DeviceGraph,
    cell_type: Ident,
    bel: BelId,
) -> bool {
    graph.is_valid_bel_for_cell_type(cell_type, bel)
}

/// Whether the current occupant of `bel` (and its neighbours) satisfy the
/// architecture rules at this location. Pure: no observable state changes.
pub fn is_bel_location_valid(design: &Design, graph: &dyn DeviceGraph, bel: BelId) -> bool {
    if let Some(cell) = design.bound_bel_cell(bel) {
        if !design.test_region(cell, bel) {
            return false;
        }
    }
    let bel_type = graph.bel_type(bel);
    if bel_type == constids::TRELLIS_SLICE {
        slice_location_valid(design, graph, bel)
    } else if bel_type == constids::MISTRAL_COMB || bel_type == constids::MISTRAL_FF {
        alm_location_valid(design, graph, bel)
    } else {
        match design.bound_bel_cell(bel) {
            None => true,
            Some(cell) => {
                let ty = design.cell(cell).ty;
                if ty == constids::DCUA || ty == constids::EXTREFB || ty == constids::PCSCLKDIV
                {
                    graph.cell_type_available(ty)
                } else {
                    true
                }
            }
        }
    }
}

fn slice_location_valid(design: &Design, graph: &dyn DeviceGraph, bel: BelId) -> bool {
    let loc = graph.bel_location(bel);
    if let Some(cell) = design.bound_bel_cell(bel) {
        if let ArchCellInfo::Slice(info) = &design.cell(cell).arch_info {
            // The wide-function mux only exists on even half-slices.
            if info.has_l6mux && loc.z % 2 == 1 {
                return false;
            }
        }
    }
    let mut tile_cells = Vec::new();
    for other in graph.bels_by_tile(loc.x, loc.y) {
        if let Some(cell) = design.bound_bel_cell(other) {
            tile_cells.push(cell);
        }
    }
    slices_compatible(design, &tile_cells)
}

/// All DFF-using slices in a tile share one clock/reset configuration.
fn slices_compatible(design: &Design, cells: &[CellId]) -> bool {
    let mut first: Option<&SliceInfo> = None;
    for &cell in cells {
        let ArchCellInfo::Slice(info) = &design.cell(cell).arch_info else {
            continue;
        };
        if !info.using_dff {
            continue;
        }
        match first {
            None => first = Some(info),
            Some(reference) => {
                if info.clk_sig != reference.clk_sig
                    || info.lsr_sig != reference.lsr_sig
                    || info.clkmux != reference.clkmux
                    || info.lsrmux != reference.lsrmux
                    || info.srmode != reference.srmode
                {
                    return false;
                }
            }
        }
    }
    true
}

fn alm_location_valid(design: &Design, graph: &dyn DeviceGraph, bel: BelId) -> bool {
    let loc = graph.bel_location(bel);
    let alm = loc.z / BELS_PER_ALM;
    if !alm_legal(design, graph, loc.x, loc.y, alm) {
        return false;
    }
    if !lab_input_count_ok(design, graph, loc.x, loc.y) {
        return false;
    }
    if graph.bel_type(bel) == constids::MISTRAL_FF
        && !lab_ctrlset_legal(design, graph, loc.x, loc.y)
    {
        return false;
    }
    true
}

/// The combinational cells sharing one ALM must fit its input pins.
fn alm_legal(design: &Design, graph: &dyn DeviceGraph, x: i32, y: i32, alm: i32) -> bool {
    let mut inputs: HashSet<_> = HashSet::new();
    for bel in graph.bels_by_tile(x, y) {
        if graph.bel_location(bel).z / BELS_PER_ALM != alm {
            continue;
        }
        if graph.bel_type(bel) != constids::MISTRAL_COMB {
            continue;
        }
        let Some(cell) = design.bound_bel_cell(bel) else {
            continue;
        };
        if let ArchCellInfo::Comb(info) = &design.cell(cell).arch_info {
            inputs.extend(info.inputs.iter().copied());
        }
    }
    inputs.len() <= ALM_INPUT_BUDGET
}

/// A LAB routes a bounded number of distinct signals to its ALM inputs.
fn lab_input_count_ok(design: &Design, graph: &dyn DeviceGraph, x: i32, y: i32) -> bool {
    let mut inputs: HashSet<_> = HashSet::new();
    for bel in graph.bels_by_tile(x, y) {
        if graph.bel_type(bel) != constids::MISTRAL_COMB {
            continue;
        }
        let Some(cell) = design.bound_bel_cell(bel) else {
            continue;
        };
        if let ArchCellInfo::Comb(info) = &design.cell(cell).arch_info {
            inputs.extend(info.inputs.iter().copied());
        }
    }
    inputs.len() <= LAB_INPUT_BUDGET
}

/// A LAB distributes a bounded number of distinct FF control sets.
fn lab_ctrlset_legal(design: &Design, graph: &dyn DeviceGraph, x: i32, y: i32) -> bool {
    let mut ctrl_sets = HashSet::new();
    for bel in graph.bels_by_tile(x, y) {
        if graph.bel_type(bel) != constids::MISTRAL_FF {
            continue;
        }
        let Some(cell) = design.bound_bel_cell(bel) else {
            continue;
        };
        if let ArchCellInfo::Ff(info) = &design.cell(cell).arch_info {
            ctrl_sets.insert(info.ctrl_set());
        }
    }
    ctrl_sets.len() <= LAB_CTRL_SETS
}
