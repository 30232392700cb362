//! Architecture sidecar assignment.
//!
//! After the frontend has populated the design, this pass precomputes the
//! per-cell data the location validator reads on every candidate move:
//! slice clocking signals for slice-class cells, control sets for
//! ALM-class flip-flops, and input usage for ALM-class combinational
//! cells. Run it once before placement; binding operations do not
//! invalidate it (it depends only on connectivity and parameters).

use crate::cell::{ArchCellInfo, CombInfo, FfInfo, SliceInfo};
use crate::design::Design;
use basalt_common::{constids, int_or_default, str_or_default, Interner, PortType};

/// Populates [`ArchCellInfo`] on every cell of a known type.
pub fn assign_arch_info(design: &mut Design, interner: &Interner) {
    let ids: Vec<_> = design.cells().map(|(id, _)| id).collect();
    for id in ids {
        let info = {
            let cell = design.cell(id);
            if cell.ty == constids::TRELLIS_SLICE {
                let clkmux = interner
                    .get_or_intern(str_or_default(&cell.params, constids::CLKMUX, "CLK"));
                let lsrmux = interner
                    .get_or_intern(str_or_default(&cell.params, constids::LSRMUX, "LSR"));
                let srmode = interner.get_or_intern(str_or_default(
                    &cell.params,
                    constids::SRMODE,
                    "LSR_OVER_CE",
                ));
                ArchCellInfo::Slice(SliceInfo {
                    using_dff: cell.port_net(constids::Q0).is_some()
                        || cell.port_net(constids::Q1).is_some(),
                    has_l6mux: int_or_default(&cell.attrs, constids::L6MUX, 0) != 0,
                    clk_sig: cell.port_net(constids::CLK),
                    lsr_sig: cell.port_net(constids::LSR),
                    clkmux,
                    lsrmux,
                    srmode,
                })
            } else if cell.ty == constids::MISTRAL_FF {
                ArchCellInfo::Ff(FfInfo {
                    clk: cell.port_net(constids::CLK),
                    ena: cell.port_net(constids::ENA),
                    sclr: cell.port_net(constids::SCLR),
                    aclr: cell.port_net(constids::ACLR),
                })
            } else if cell.ty == constids::MISTRAL_COMB || cell.ty == constids::LUT4 {
                let inputs = cell
                    .ports
                    .values()
                    .filter(|p| p.ty == PortType::Input)
                    .filter_map(|p| p.net)
                    .collect();
                ArchCellInfo::Comb(CombInfo { inputs })
            } else {
                ArchCellInfo::None
            }
        };
        design.cell_mut(id).arch_info = info;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use basalt_common::Property;

    #[test]
    fn slice_info_from_ports_and_params() {
        let interner = Interner::new();
        let mut design = Design::new();
        let c = design
            .add_cell(interner.get_or_intern("slice_0"), constids::TRELLIS_SLICE)
            .unwrap();
        let clk = design.add_net(interner.get_or_intern("clk")).unwrap();
        let q = design.add_net(interner.get_or_intern("q")).unwrap();
        design.add_input(c, constids::CLK);
        design.add_output(c, constids::Q0);
        design.connect_port(clk, c, constids::CLK).unwrap();
        design.connect_port(q, c, constids::Q0).unwrap();
        design
            .cell_mut(c)
            .set_param(constids::SRMODE, Property::str("ASYNC"));

        assign_arch_info(&mut design, &interner);

        match &design.cell(c).arch_info {
            ArchCellInfo::Slice(info) => {
                assert!(info.using_dff);
                assert!(!info.has_l6mux);
                assert_eq!(info.clk_sig, Some(clk));
                assert_eq!(info.lsr_sig, None);
                assert_eq!(interner.resolve(info.clkmux), "CLK");
                assert_eq!(interner.resolve(info.srmode), "ASYNC");
            }
            other => panic!("expected slice info, got {other:?}"),
        }
    }

    #[test]
    fn slice_without_ff_outputs() {
        let interner = Interner::new();
        let mut design = Design::new();
        let c = design
            .add_cell(interner.get_or_intern("slice_0"), constids::TRELLIS_SLICE)
            .unwrap();
        design.add_output(c, constids::F0);
        design
            .cell_mut(c)
            .set_attr(constids::L6MUX, Property::int(1, 1));

        assign_arch_info(&mut design, &interner);

        match &design.cell(c).arch_info {
            ArchCellInfo::Slice(info) => {
                assert!(!info.using_dff);
                assert!(info.has_l6mux);
            }
            other => panic!("expected slice info, got {other:?}"),
        }
    }

    #[test]
    fn ff_control_set() {
        let interner = Interner::new();
        let mut design = Design::new();
        let c = design
            .add_cell(interner.get_or_intern("ff_0"), constids::MISTRAL_FF)
            .unwrap();
        let clk = design.add_net(interner.get_or_intern("clk")).unwrap();
        let rst = design.add_net(interner.get_or_intern("rst")).unwrap();
        design.add_input(c, constids::CLK);
        design.add_input(c, constids::ACLR);
        design.add_input(c, constids::D);
        design.connect_port(clk, c, constids::CLK).unwrap();
        design.connect_port(rst, c, constids::ACLR).unwrap();

        assign_arch_info(&mut design, &interner);

        match &design.cell(c).arch_info {
            ArchCellInfo::Ff(info) => {
                assert_eq!(info.ctrl_set(), (Some(clk), None, None, Some(rst)));
            }
            other => panic!("expected ff info, got {other:?}"),
        }
    }

    #[test]
    fn comb_inputs_collected() {
        let interner = Interner::new();
        let mut design = Design::new();
        let c = design
            .add_cell(interner.get_or_intern("comb_0"), constids::MISTRAL_COMB)
            .unwrap();
        let a = design.add_net(interner.get_or_intern("a")).unwrap();
        let b = design.add_net(interner.get_or_intern("b")).unwrap();
        design.add_input(c, constids::A0);
        design.add_input(c, constids::B0);
        design.add_input(c, constids::C0);
        design.add_output(c, constids::F0);
        design.connect_port(a, c, constids::A0).unwrap();
        design.connect_port(b, c, constids::B0).unwrap();

        assign_arch_info(&mut design, &interner);

        match &design.cell(c).arch_info {
            ArchCellInfo::Comb(info) => assert_eq!(info.inputs, vec![a, b]),
            other => panic!("expected comb info, got {other:?}"),
        }
    }

    #[test]
    fn unknown_types_untouched() {
        let interner = Interner::new();
        let mut design = Design::new();
        let c = design
            .add_cell(interner.get_or_intern("dcu"), constids::DCUA)
            .unwrap();
        assign_arch_info(&mut design, &interner);
        assert_eq!(design.cell(c).arch_info, ArchCellInfo::None);
    }

    #[test]
    fn idempotent() {
        let interner = Interner::new();
        let mut design = Design::new();
        let c = design
            .add_cell(interner.get_or_intern("slice_0"), constids::TRELLIS_SLICE)
            .unwrap();
        design.add_output(c, constids::Q0);
        let q = design.add_net(interner.get_or_intern("q")).unwrap();
        design.connect_port(q, c, constids::Q0).unwrap();

        assign_arch_info(&mut design, &interner);
        let first = design.cell(c).arch_info.clone();
        assign_arch_info(&mut design, &interner);
        assert_eq!(design.cell(c).arch_info, first);
    }
}
