//! Timing-driven LUT-input permutation.
//!
//! The four inputs of a slice LUT have unequal physical delays (the `A`
//! input is the slowest). For every logic-mode slice, this pass reorders
//! the connected nets so the least critical net lands on the slowest pin,
//! then rewrites the LUT truth table and per-pin mux parameters so the
//! implemented function is unchanged. Re-running the pass with the same
//! criticalities is a no-op.

use basalt_common::{constids, int_or_default, str_or_default, Ident, Interner, PlaceStrength, Property};
use basalt_design::{CellId, Design, DesignError, NetId};

/// Source of per-arc timing criticality, in `[0, 1]` with 1 on the
/// critical path. Implemented by the external static timing analyser.
pub trait CriticalitySource {
    /// Criticality of the arc ending at `(cell, port)`.
    fn criticality(&self, design: &Design, cell: CellId, port: Ident) -> f32;
}

/// Permutes the LUT inputs of every logic-mode slice in the design.
///
/// Cells pinned above [`PlaceStrength::Strong`] keep their input order;
/// their mux and truth-table parameters are still normalized.
pub fn permute_luts(
    design: &mut Design,
    interner: &Interner,
    tmg: &dyn CriticalitySource,
) -> Result<(), DesignError> {
    let slices: Vec<CellId> = design
        .cells()
        .filter(|(_, cell)| {
            cell.ty == constids::TRELLIS_SLICE
                && str_or_default(&cell.params, constids::MODE, "LOGIC") == "LOGIC"
        })
        .map(|(id, _)| id)
        .collect();
    for cell in slices {
        permute_lut(design, interner, tmg, cell, 0)?;
        permute_lut(design, interner, tmg, cell, 1)?;
    }
    Ok(())
}

fn permute_lut(
    design: &mut Design,
    interner: &Interner,
    tmg: &dyn CriticalitySource,
    cell: CellId,
    lut: u32,
) -> Result<(), DesignError> {
    let port_names: Vec<Ident> = ["A", "B", "C", "D"]
        .iter()
        .map(|ch| interner.get_or_intern(&format!("{ch}{lut}")))
        .collect();

    let mut inputs: Vec<(f32, usize)> = Vec::with_capacity(4);
    let mut orig_nets: Vec<Option<NetId>> = Vec::with_capacity(4);
    for (i, &port) in port_names.iter().enumerate() {
        design.cell_mut(cell).add_input(port);
        let net = design.cell(cell).port_net(port);
        let crit = if net.is_some() {
            tmg.criticality(design, cell, port)
        } else {
            0.0
        };
        orig_nets.push(net);
        inputs.push((crit, i));
    }

    // Least critical first; the stable sort keeps ties in pin order.
    // Locked cells (e.g. from an OOC submodule) keep their input order.
    if design.cell(cell).bel_strength <= PlaceStrength::Strong {
        inputs.sort_by(|a, b| a.0.total_cmp(&b.0));
    }

    for (i, &port) in port_names.iter().enumerate() {
        design.disconnect_port(cell, port)?;
        let mux = interner.get_or_intern(&format!("{}MUX", interner.resolve(port)));
        if let Some(net) = orig_nets[inputs[i].1] {
            design.connect_port(net, cell, port)?;
            let value = interner.resolve(port).to_owned();
            design.cell_mut(cell).set_param(mux, Property::str(value));
        } else {
            design.cell_mut(cell).set_param(mux, Property::str("1"));
        }
    }

    // Rewrite the truth table for the new input order.
    let init_key = if lut == 0 {
        constids::LUT0_INITVAL
    } else {
        constids::LUT1_INITVAL
    };
    let old_init = int_or_default(&design.cell(cell).params, init_key, 0);
    let mut new_init: i64 = 0;
    for i in 0..16 {
        let mut old_index = 0usize;
        for (k, input) in inputs.iter().enumerate() {
            if i & (1 << k) != 0 {
                old_index |= 1 << input.1;
            }
        }
        if old_init & (1 << old_index) != 0 {
            new_init |= 1 << i;
        }
    }
    design
        .cell_mut(cell)
        .set_param(init_key, Property::int(new_init, 16));
    Ok(())
}
