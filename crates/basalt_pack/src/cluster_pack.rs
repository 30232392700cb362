//! Cluster packing.
//!
//! Walks the netlist once per cluster description from the device
//! database, discovering chain roots, following the dedicated chain
//! interconnect from node to node, and claiming compatible satellite cells
//! onto each node. The resulting [`Cluster`]s are atoms the placer must
//! relocate as a unit; they are created here and never mutated afterwards.

use basalt_common::{Ident, Interner, PortType};
use basalt_design::{CellId, Cluster, ClusterId, Design, NetId};
use basalt_device::ClusterDesc;
use basalt_diagnostics::DiagnosticSink;
use std::collections::{HashMap, HashSet};

/// Packs clusters for every description, in database order.
///
/// Cluster ids are derived from root cell names, so re-running the pass on
/// an already-packed design is a no-op (every candidate root already
/// carries a cluster id).
pub fn pack_clusters(
    design: &mut Design,
    descs: &[ClusterDesc],
    interner: &Interner,
    sink: &DiagnosticSink,
) {
    for (index, desc) in descs.iter().enumerate() {
        sink.note(format!(
            "packing clusters for description {}",
            interner.resolve(desc.name)
        ));
        prepare_cluster(design, desc, index as u32, interner, sink);
    }
}

/// Two satellites of the same type may share a cluster node only if their
/// input nets agree, excluding the node's own output nets. Divergent
/// clock/reset/enable nets would make the cluster unplaceable.
fn compatible_with_peer(
    design: &Design,
    peer: CellId,
    candidate: CellId,
    exclude_nets: &HashSet<NetId>,
) -> bool {
    debug_assert_eq!(design.cell(peer).ty, design.cell(candidate).ty);
    for (name, port) in &design.cell(candidate).ports {
        if port.ty != PortType::Input {
            continue;
        }
        if let Some(net) = port.net {
            if exclude_nets.contains(&net) {
                continue;
            }
        }
        if port.net != design.cell(peer).port_net(*name) {
            return false;
        }
    }
    true
}

fn prepare_cluster(
    design: &mut Design,
    desc: &ClusterDesc,
    index: u32,
    interner: &Interner,
    sink: &DiagnosticSink,
) {
    let root_types: HashSet<Ident> = desc.root_cell_types.iter().copied().collect();

    // Phase 1: root discovery. A cell starts a cluster unless its chain
    // sink port is fed by the chain source port of a same-type cell.
    let mut roots: Vec<CellId> = Vec::new();
    let candidates: Vec<CellId> = design
        .cells()
        .filter(|(_, cell)| cell.cluster.is_none() && root_types.contains(&cell.ty))
        .map(|(id, _)| id)
        .collect();
    for id in candidates {
        if let Some(chain) = desc.chain_ports() {
            let is_root = {
                let cell = design.cell(id);
                match cell.port_net(chain.cell_sink) {
                    None => true,
                    Some(net) => match design.net(net).driver {
                        None => true,
                        Some(driver) => {
                            design.cell(driver.cell).ty != cell.ty
                                || driver.port != chain.cell_source
                        }
                    },
                }
            };
            if !is_root {
                continue;
            }
            let name = design.cell(id).name;
            design.cell_mut(id).cluster = Some(ClusterId::new(name));
            roots.push(id);
            // The chain sink rides dedicated interconnect that cannot
            // reach the general VCC/GND network, so the default constant
            // connection has to go.
            if design.cell(id).ports.contains_key(&chain.cell_sink) {
                let _ = design.disconnect_port(id, chain.cell_sink);
            }
        } else {
            let name = design.cell(id).name;
            design.cell_mut(id).cluster = Some(ClusterId::new(name));
            roots.push(id);
        }
    }

    // Port name -> satellite cell types admitted on that port.
    let mut port_cell_maps: HashMap<Ident, HashSet<Ident>> = HashMap::new();
    for entry in &desc.cluster_cells_map {
        port_cell_maps.entry(entry.port).or_default().insert(entry.cell);
    }

    // Phase 2: walk the chain from each root, claiming satellites.
    for root in roots {
        let cluster_id = match design.cell(root).cluster {
            Some(id) => id,
            None => continue,
        };
        sink.note(format!(
            "forming cluster from root cell {}",
            interner.resolve(design.cell(root).name)
        ));

        let mut cluster = Cluster::new(root, index);
        let mut node = root;
        let mut count_cluster_cells: u32 = 0;
        loop {
            let node_name = design.cell(node).name;
            let mut node_cells: Vec<(Ident, CellId)> = Vec::new();
            // First satellite of each type becomes the compatibility
            // reference for later ones.
            let mut cell_type_dict: HashMap<Ident, CellId> = HashMap::new();
            let mut exclude_nets: HashSet<NetId> = HashSet::new();
            count_cluster_cells += 1;

            let ports: Vec<(Ident, PortType, Option<NetId>)> = design
                .cell(node)
                .ports
                .values()
                .map(|p| (p.name, p.ty, p.net))
                .collect();
            for (port_name, port_ty, port_net) in ports {
                let Some(admitted) = port_cell_maps.get(&port_name) else {
                    continue;
                };
                match port_ty {
                    PortType::Output => {
                        let Some(net) = port_net else { continue };
                        exclude_nets.insert(net);
                        let users = &design.net(net).users;
                        if users.len() != 1 {
                            continue;
                        }
                        let user = users[0].cell;
                        let user_ty = design.cell(user).ty;
                        if !admitted.contains(&user_ty) {
                            continue;
                        }
                        let compatible = match cell_type_dict.get(&user_ty) {
                            None => {
                                cell_type_dict.insert(user_ty, user);
                                true
                            }
                            Some(&peer) => {
                                compatible_with_peer(design, peer, user, &exclude_nets)
                            }
                        };
                        if !compatible {
                            continue;
                        }
                        design.cell_mut(user).cluster = Some(cluster_id);
                        let user_name = design.cell(user).name;
                        node_cells.push((port_name, user));
                        cluster.cell_cluster_node_map.insert(user_name, node_name);
                        count_cluster_cells += 1;
                    }
                    PortType::Input => {
                        let Some(net) = port_net else { continue };
                        if design.net(net).users.len() != 1 {
                            continue;
                        }
                        let Some(driver) = design.net(net).driver else {
                            continue;
                        };
                        let driver_cell = driver.cell;
                        let driver_ty = design.cell(driver_cell).ty;
                        if !admitted.contains(&driver_ty) {
                            continue;
                        }
                        design.cell_mut(driver_cell).cluster = Some(cluster_id);
                        let driver_name = design.cell(driver_cell).name;
                        node_cells.push((port_name, driver_cell));
                        cluster.cell_cluster_node_map.insert(driver_name, node_name);
                        count_cluster_cells += 1;
                    }
                    PortType::Inout => {}
                }
            }

            cluster.cell_cluster_node_map.insert(node_name, node_name);
            cluster.cluster_nodes.push(node);
            cluster.cluster_node_cells.insert(node_name, node_cells);

            let Some(chain) = desc.chain_ports() else { break };
            let Some(next_net) = design.cell(node).port_net(chain.cell_source) else {
                break;
            };
            let mut next_node = None;
            for user in &design.net(next_net).users {
                if root_types.contains(&design.cell(user.cell).ty) {
                    next_node = Some(user.cell);
                    break;
                }
            }
            match next_node {
                Some(next) => {
                    design.cell_mut(next).cluster = Some(cluster_id);
                    node = next;
                }
                None => break,
            }
        }

        // A satellite-less, chain-less cluster is pointless; give the root
        // its freedom back.
        if count_cluster_cells == 1 && !desc.is_chainable() {
            design.cell_mut(root).cluster = None;
            continue;
        }

        design.clusters.insert(cluster_id, cluster);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use basalt_common::{constids, Interner};
    use basalt_device::{ChainablePort, ClusterCellPort};

    fn carry_desc() -> ClusterDesc {
        ClusterDesc {
            name: constids::CCU2C,
            root_cell_types: vec![constids::CCU2C],
            chainable_ports: vec![ChainablePort {
                cell_source: constids::COUT,
                cell_sink: constids::CIN,
                bel_source: constids::COUT,
                bel_sink: constids::CIN,
                avg_x_offset: 0,
                avg_y_offset: 1,
            }],
            cluster_cells_map: vec![],
            out_of_site_clusters: false,
        }
    }

    /// Builds `count` CCU2C cells chained COUT -> CIN, with the head's CIN
    /// tied to a VCC net.
    fn carry_chain(
        design: &mut Design,
        interner: &Interner,
        count: usize,
    ) -> (Vec<CellId>, NetId) {
        let vcc = design.add_net(interner.get_or_intern("$vcc")).unwrap();
        let mut cells = Vec::new();
        for i in 0..count {
            let c = design
                .add_cell(interner.get_or_intern(&format!("c{i}")), constids::CCU2C)
                .unwrap();
            design.add_input(c, constids::CIN);
            design.add_output(c, constids::COUT);
            cells.push(c);
        }
        design.connect_port(vcc, cells[0], constids::CIN).unwrap();
        for i in 0..count - 1 {
            let net = design
                .add_net(interner.get_or_intern(&format!("carry_{i}")))
                .unwrap();
            design.connect_port(net, cells[i], constids::COUT).unwrap();
            design.connect_port(net, cells[i + 1], constids::CIN).unwrap();
        }
        (cells, vcc)
    }

    #[test]
    fn carry_chain_forms_single_cluster() {
        let interner = Interner::new();
        let mut design = Design::new();
        let (cells, vcc) = carry_chain(&mut design, &interner, 3);
        let sink = DiagnosticSink::new();

        pack_clusters(&mut design, &[carry_desc()], &interner, &sink);

        let root_name = design.cell(cells[0]).name;
        let id = ClusterId::new(root_name);
        for &c in &cells {
            assert_eq!(design.cell(c).cluster, Some(id));
        }
        let cluster = &design.clusters[&id];
        assert_eq!(cluster.root, cells[0]);
        assert_eq!(cluster.cluster_nodes, cells);
        assert_eq!(cluster.member_count(), 3);
        assert_eq!(design.clusters.len(), 1);

        // The root's chain sink was cut loose from VCC; the in-chain sink
        // ports keep their nets.
        assert!(design.cell(cells[0]).port_net(constids::CIN).is_none());
        assert!(design.net(vcc).users.is_empty());
        assert!(design.cell(cells[1]).port_net(constids::CIN).is_some());
        assert!(design.cell(cells[2]).port_net(constids::CIN).is_some());
    }

    #[test]
    fn chain_nodes_share_the_chain_net() {
        let interner = Interner::new();
        let mut design = Design::new();
        let (cells, _) = carry_chain(&mut design, &interner, 4);
        let sink = DiagnosticSink::new();
        pack_clusters(&mut design, &[carry_desc()], &interner, &sink);

        let id = ClusterId::new(design.cell(cells[0]).name);
        let cluster = &design.clusters[&id];
        for pair in cluster.cluster_nodes.windows(2) {
            let source_net = design.cell(pair[0]).port_net(constids::COUT);
            let sink_net = design.cell(pair[1]).port_net(constids::CIN);
            assert!(source_net.is_some());
            assert_eq!(source_net, sink_net);
        }
    }

    #[test]
    fn two_chains_stay_separate() {
        let interner = Interner::new();
        let mut design = Design::new();
        let (first, _) = carry_chain(&mut design, &interner, 2);

        // A second, unconnected chain.
        let c2 = design
            .add_cell(interner.get_or_intern("d0"), constids::CCU2C)
            .unwrap();
        let c3 = design
            .add_cell(interner.get_or_intern("d1"), constids::CCU2C)
            .unwrap();
        design.add_input(c2, constids::CIN);
        design.add_output(c2, constids::COUT);
        design.add_input(c3, constids::CIN);
        design.add_output(c3, constids::COUT);
        let link = design.add_net(interner.get_or_intern("link")).unwrap();
        design.connect_port(link, c2, constids::COUT).unwrap();
        design.connect_port(link, c3, constids::CIN).unwrap();

        let sink = DiagnosticSink::new();
        pack_clusters(&mut design, &[carry_desc()], &interner, &sink);

        assert_eq!(design.clusters.len(), 2);
        assert_ne!(design.cell(first[0]).cluster, design.cell(c2).cluster);
        assert_eq!(design.cell(c2).cluster, design.cell(c3).cluster);
    }

    #[test]
    fn standalone_chainable_cell_keeps_cluster() {
        // A lone carry cell still forms a (single-node) cluster: the chain
        // description promises dedicated interconnect either way.
        let interner = Interner::new();
        let mut design = Design::new();
        let (cells, _) = carry_chain(&mut design, &interner, 1);
        let sink = DiagnosticSink::new();
        pack_clusters(&mut design, &[carry_desc()], &interner, &sink);
        assert!(design.cell(cells[0]).cluster.is_some());
        assert_eq!(design.clusters.len(), 1);
    }

    fn lutff_desc() -> ClusterDesc {
        ClusterDesc {
            name: constids::LUT4,
            root_cell_types: vec![constids::LUT4],
            chainable_ports: vec![],
            cluster_cells_map: vec![
                ClusterCellPort {
                    cell: constids::MISTRAL_FF,
                    port: constids::F0,
                },
                ClusterCellPort {
                    cell: constids::MISTRAL_FF,
                    port: constids::F1,
                },
            ],
            out_of_site_clusters: false,
        }
    }

    struct LutFfFixture {
        design: Design,
        interner: Interner,
        lut: CellId,
        ff0: CellId,
        ff1: CellId,
        clk_a: NetId,
        clk_b: NetId,
    }

    /// A LUT4 with two outputs, each feeding one FF's D input.
    fn lut_with_two_ffs() -> LutFfFixture {
        let interner = Interner::new();
        let mut design = Design::new();
        let lut = design
            .add_cell(interner.get_or_intern("lut0"), constids::LUT4)
            .unwrap();
        design.add_output(lut, constids::F0);
        design.add_output(lut, constids::F1);

        let clk_a = design.add_net(interner.get_or_intern("clk_a")).unwrap();
        let clk_b = design.add_net(interner.get_or_intern("clk_b")).unwrap();

        let mut ffs = Vec::new();
        for (i, out) in [constids::F0, constids::F1].into_iter().enumerate() {
            let ff = design
                .add_cell(interner.get_or_intern(&format!("ff{i}")), constids::MISTRAL_FF)
                .unwrap();
            design.add_input(ff, constids::D);
            design.add_input(ff, constids::CLK);
            let d = design
                .add_net(interner.get_or_intern(&format!("d{i}")))
                .unwrap();
            design.connect_port(d, lut, out).unwrap();
            design.connect_port(d, ff, constids::D).unwrap();
            ffs.push(ff);
        }
        let (ff0, ff1) = (ffs[0], ffs[1]);
        LutFfFixture {
            design,
            interner,
            lut,
            ff0,
            ff1,
            clk_a,
            clk_b,
        }
    }

    #[test]
    fn satellites_claimed_when_compatible() {
        let mut f = lut_with_two_ffs();
        f.design.connect_port(f.clk_a, f.ff0, constids::CLK).unwrap();
        f.design.connect_port(f.clk_a, f.ff1, constids::CLK).unwrap();
        let sink = DiagnosticSink::new();
        pack_clusters(&mut f.design, &[lutff_desc()], &f.interner, &sink);

        let id = ClusterId::new(f.design.cell(f.lut).name);
        assert_eq!(f.design.cell(f.ff0).cluster, Some(id));
        assert_eq!(f.design.cell(f.ff1).cluster, Some(id));
        let cluster = &f.design.clusters[&id];
        assert_eq!(cluster.member_count(), 3);
        let lut_name = f.design.cell(f.lut).name;
        let node_cells = &cluster.cluster_node_cells[&lut_name];
        assert_eq!(node_cells.len(), 2);
        assert_eq!(node_cells[0], (constids::F0, f.ff0));
        assert_eq!(node_cells[1], (constids::F1, f.ff1));
    }

    #[test]
    fn incompatible_satellite_rejected() {
        // FFs with divergent clock nets cannot share the cluster; only the
        // first is claimed.
        let mut f = lut_with_two_ffs();
        f.design.connect_port(f.clk_a, f.ff0, constids::CLK).unwrap();
        f.design.connect_port(f.clk_b, f.ff1, constids::CLK).unwrap();
        let sink = DiagnosticSink::new();
        pack_clusters(&mut f.design, &[lutff_desc()], &f.interner, &sink);

        let id = ClusterId::new(f.design.cell(f.lut).name);
        assert_eq!(f.design.cell(f.ff0).cluster, Some(id));
        assert_eq!(f.design.cell(f.ff1).cluster, None);
        assert_eq!(f.design.clusters[&id].member_count(), 2);
    }

    #[test]
    fn satellite_compatibility_ignores_node_outputs() {
        // The D inputs necessarily differ (they carry the node's own
        // outputs); that must not count against compatibility.
        let mut f = lut_with_two_ffs();
        f.design.connect_port(f.clk_a, f.ff0, constids::CLK).unwrap();
        f.design.connect_port(f.clk_a, f.ff1, constids::CLK).unwrap();
        let sink = DiagnosticSink::new();
        pack_clusters(&mut f.design, &[lutff_desc()], &f.interner, &sink);
        let id = ClusterId::new(f.design.cell(f.lut).name);
        assert_eq!(f.design.clusters[&id].member_count(), 3);
        assert_ne!(
            f.design.cell(f.ff0).port_net(constids::D),
            f.design.cell(f.ff1).port_net(constids::D)
        );
    }

    #[test]
    fn fanout_blocks_satellite_claim() {
        let mut f = lut_with_two_ffs();
        f.design.connect_port(f.clk_a, f.ff0, constids::CLK).unwrap();
        f.design.connect_port(f.clk_a, f.ff1, constids::CLK).unwrap();
        // Give F0's net a second user; the packer requires sole use.
        let extra = f
            .design
            .add_cell(f.interner.get_or_intern("tap"), constids::MISTRAL_FF)
            .unwrap();
        f.design.add_input(extra, constids::D);
        let d0 = f.design.cell(f.lut).port_net(constids::F0).unwrap();
        f.design.connect_port(d0, extra, constids::D).unwrap();

        let sink = DiagnosticSink::new();
        pack_clusters(&mut f.design, &[lutff_desc()], &f.interner, &sink);

        let id = ClusterId::new(f.design.cell(f.lut).name);
        assert_eq!(f.design.cell(f.ff0).cluster, None);
        assert_eq!(f.design.cell(f.ff1).cluster, Some(id));
    }

    #[test]
    fn singleton_without_chain_is_discarded() {
        let interner = Interner::new();
        let mut design = Design::new();
        let lut = design
            .add_cell(interner.get_or_intern("lonely"), constids::LUT4)
            .unwrap();
        design.add_output(lut, constids::F0);
        let sink = DiagnosticSink::new();
        pack_clusters(&mut design, &[lutff_desc()], &interner, &sink);

        assert_eq!(design.cell(lut).cluster, None);
        assert!(design.clusters.is_empty());
    }

    #[test]
    fn driver_satellite_claimed_through_input_port() {
        // An input-port admission claims the net's driver instead.
        let interner = Interner::new();
        let mut design = Design::new();
        let lut = design
            .add_cell(interner.get_or_intern("lut0"), constids::LUT4)
            .unwrap();
        design.add_input(lut, constids::DI0);
        let src = design
            .add_cell(interner.get_or_intern("src_ff"), constids::MISTRAL_FF)
            .unwrap();
        design.add_output(src, constids::Q);
        let net = design.add_net(interner.get_or_intern("q0")).unwrap();
        design.connect_port(net, src, constids::Q).unwrap();
        design.connect_port(net, lut, constids::DI0).unwrap();

        let desc = ClusterDesc {
            name: constids::LUT4,
            root_cell_types: vec![constids::LUT4],
            chainable_ports: vec![],
            cluster_cells_map: vec![ClusterCellPort {
                cell: constids::MISTRAL_FF,
                port: constids::DI0,
            }],
            out_of_site_clusters: false,
        };
        let sink = DiagnosticSink::new();
        pack_clusters(&mut design, &[desc], &interner, &sink);

        let id = ClusterId::new(design.cell(lut).name);
        assert_eq!(design.cell(src).cluster, Some(id));
        let cluster = &design.clusters[&id];
        assert_eq!(cluster.member_count(), 2);
        assert_eq!(
            cluster.cell_cluster_node_map[&design.cell(src).name],
            design.cell(lut).name
        );
    }

    #[test]
    fn packing_reports_progress() {
        let interner = Interner::new();
        let mut design = Design::new();
        carry_chain(&mut design, &interner, 2);
        let sink = DiagnosticSink::new();
        pack_clusters(&mut design, &[carry_desc()], &interner, &sink);
        let notes = sink.take_all();
        assert!(!notes.is_empty());
        assert!(notes.iter().any(|d| d.message.contains("c0")));
        assert!(!sink.has_errors());
    }

    #[test]
    fn repacking_is_a_noop() {
        let interner = Interner::new();
        let mut design = Design::new();
        let (cells, _) = carry_chain(&mut design, &interner, 3);
        let sink = DiagnosticSink::new();
        pack_clusters(&mut design, &[carry_desc()], &interner, &sink);
        let before: Vec<_> = cells.iter().map(|&c| design.cell(c).cluster).collect();
        pack_clusters(&mut design, &[carry_desc()], &interner, &sink);
        let after: Vec<_> = cells.iter().map(|&c| design.cell(c).cluster).collect();
        assert_eq!(before, after);
        assert_eq!(design.clusters.len(), 1);
    }
}
