//! Cluster geometric placement resolution.
//!
//! Given a candidate root bel, derive the bel for every other cluster
//! member by a short-range traversal of the routing graph: chained nodes
//! are found downhill of the chain source pin, satellites up- or downhill
//! of the node pin their port maps to. The traversal is bounded by a
//! four-state automaton that allows at most one excursion out of the
//! source site and strictly fewer than two inter-site hops.

use basalt_common::PortType;
use basalt_design::{CellId, ClusterId, Design};
use basalt_device::{BelCategory, BelId, DeviceGraph, Loc, PipId, WireId};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Which way [`find_cluster_bels`] expands.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum WalkDirection {
    /// Toward drivers, via `pips_uphill`.
    Uphill,
    /// Toward sinks, via `pips_downhill`.
    Downhill,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum WalkState {
    /// May not leave the source site at all.
    OnlyInSourceSite,
    /// Still inside the source site; may leave through a site port.
    InSourceSite,
    /// On general routing between sites.
    InRouting,
    /// Entered a sink site; may not leave again.
    InSinkSite,
}

#[derive(Clone, Copy)]
struct WalkNode {
    wire: WireId,
    state: WalkState,
    depth: u32,
}

/// Collects the logic bels reachable from `wire` within the walk bounds.
///
/// Bels are collected whenever the walk is inside a site. For uphill
/// walks, a bel only counts if one of its pins sits on the wire the walk
/// arrived from, confirming the backward direction reaches that specific
/// pin. Results are deterministic and deduplicated, in discovery order.
pub fn find_cluster_bels(
    graph: &dyn DeviceGraph,
    wire: WireId,
    direction: WalkDirection,
    out_of_site_expansion: bool,
) -> Vec<BelId> {
    let mut bels: IndexSet<BelId> = IndexSet::new();
    let mut to_expand = vec![WalkNode {
        wire,
        state: if out_of_site_expansion {
            WalkState::InSourceSite
        } else {
            WalkState::OnlyInSourceSite
        },
        depth: 0,
    }];

    while let Some(node) = to_expand.pop() {
        let pips = match direction {
            WalkDirection::Downhill => graph.pips_downhill(node.wire),
            WalkDirection::Uphill => graph.pips_uphill(node.wire),
        };
        for pip in pips {
            if graph.is_pip_synthetic(pip) {
                continue;
            }
            expand_through_pip(graph, pip, node, direction, &mut to_expand, &mut bels);
        }
    }

    bels.into_iter().collect()
}

fn expand_through_pip(
    graph: &dyn DeviceGraph,
    pip: PipId,
    node: WalkNode,
    direction: WalkDirection,
    to_expand: &mut Vec<WalkNode>,
    bels: &mut IndexSet<BelId>,
) {
    let prev_wire = node.wire;
    let wire = match direction {
        WalkDirection::Uphill => graph.pip_src_wire(pip),
        WalkDirection::Downhill => graph.pip_dst_wire(pip),
    };

    let mut next = WalkNode {
        wire,
        state: node.state,
        depth: node.depth,
    };
    if next.depth >= 2 {
        return;
    }

    if graph.is_site_port(pip) {
        match node.state {
            WalkState::OnlyInSourceSite | WalkState::InSinkSite => return,
            WalkState::InSourceSite => {
                debug_assert!(graph.wire_site_index(wire).is_none());
                next.state = WalkState::InRouting;
            }
            WalkState::InRouting => {
                debug_assert!(graph.wire_site_index(wire).is_some());
                next.state = WalkState::InSinkSite;
            }
        }
    } else if next.state == WalkState::InRouting {
        next.depth += 1;
    }

    to_expand.push(next);

    if next.state == WalkState::InSinkSite || next.state == WalkState::OnlyInSourceSite {
        for bel_pin in graph.wire_bel_pins(wire) {
            let bel = bel_pin.bel;
            if bels.contains(&bel) {
                continue;
            }
            if graph.bel_category(bel) != BelCategory::Logic {
                break;
            }
            if graph.bel_synthetic(bel) {
                break;
            }
            match direction {
                WalkDirection::Uphill => {
                    for check_pin in graph.bel_pins(bel) {
                        if graph.bel_pin_wire(bel, check_pin) == Some(prev_wire) {
                            bels.insert(bel);
                            break;
                        }
                    }
                }
                WalkDirection::Downhill => {
                    bels.insert(bel);
                }
            }
        }
    }
}

/// The root cell of a packed cluster.
pub fn get_cluster_root_cell(design: &Design, cluster: ClusterId) -> Option<CellId> {
    design.clusters.get(&cluster).map(|c| c.root)
}

/// Clusters are strict: the placer must not relocate members
/// independently of their root.
pub fn is_cluster_strict(_cell: CellId) -> bool {
    true
}

/// Resolves bels for every member of `cluster` assuming its root sits on
/// `root_bel`. Returns `None` (publishing nothing) if any member cannot
/// be placed.
pub fn get_cluster_placement(
    design: &Design,
    graph: &dyn DeviceGraph,
    cluster: ClusterId,
    root_bel: BelId,
) -> Option<Vec<(CellId, BelId)>> {
    let packed = design.clusters.get(&cluster)?;
    let desc = graph.cluster_descs().get(packed.index as usize)?;

    let root_cell = packed.root;
    if !graph.is_valid_bel_for_cell_type(design.cell(root_cell).ty, root_bel) {
        return None;
    }

    let mut placement = Vec::new();
    let mut next_bel = root_bel;
    for &node in &packed.cluster_nodes {
        if node != root_cell {
            // Chained nodes sit downhill of the previous node's chain
            // source pin, possibly in the next site over.
            let chain = desc.chain_ports()?;
            let pin_wire = graph.bel_pin_wire(next_bel, chain.bel_source)?;
            let node_ty = design.cell(node).ty;
            next_bel = find_cluster_bels(graph, pin_wire, WalkDirection::Downhill, true)
                .into_iter()
                .find(|&bel| graph.is_valid_bel_for_cell_type(node_ty, bel))?;
        }
        placement.push((node, next_bel));

        let node_name = design.cell(node).name;
        let node_ty = design.cell(node).ty;
        let Some(satellites) = packed.cluster_node_cells.get(&node_name) else {
            continue;
        };
        for &(port, satellite) in satellites {
            let port_ty = design.cell(node).ports.get(&port)?.ty;
            if port_ty == PortType::Inout {
                continue;
            }
            let direction = if port_ty == PortType::Input {
                WalkDirection::Uphill
            } else {
                WalkDirection::Downhill
            };
            let satellite_ty = design.cell(satellite).ty;
            let mut placed = false;
            for bel_pin in graph.cell_bel_pins(node_ty, port) {
                let Some(pin_wire) = graph.bel_pin_wire(next_bel, bel_pin) else {
                    continue;
                };
                let candidates =
                    find_cluster_bels(graph, pin_wire, direction, desc.out_of_site_clusters);
                for bel in candidates {
                    if graph.is_valid_bel_for_cell_type(satellite_ty, bel) {
                        placement.push((satellite, bel));
                        placed = true;
                        break;
                    }
                }
                if placed {
                    break;
                }
            }
            if !placed {
                return None;
            }
        }
    }

    Some(placement)
}

/// Offset of a cluster member relative to its root.
///
/// When both are bound the offset is exact; otherwise it is approximated
/// from the chain's average per-node offsets.
pub fn get_cluster_offset(
    design: &Design,
    graph: &dyn DeviceGraph,
    cell: CellId,
) -> Option<Loc> {
    let cluster_id = design.cell(cell).cluster?;
    let packed = design.clusters.get(&cluster_id)?;
    let root = packed.root;

    if let (Some(cell_bel), Some(root_bel)) = (design.cell(cell).bel, design.cell(root).bel) {
        return Some(graph.bel_location(cell_bel) - graph.bel_location(root_bel));
    }

    let desc = graph.cluster_descs().get(packed.index as usize)?;
    let Some(chain) = desc.chain_ports() else {
        return Some(Loc::default());
    };
    let node_name = packed.cell_cluster_node_map.get(&design.cell(cell).name)?;
    let node = design.cell_by_name(*node_name)?;
    let position = packed.node_position(node)? as i32;
    Some(Loc::new(
        chain.avg_x_offset * position,
        chain.avg_y_offset * position,
        0,
    ))
}

/// Axis-aligned bounds of a cluster's bound members.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug, Serialize, Deserialize)]
pub struct ClusterBounds {
    /// Leftmost tile column.
    pub x0: i32,
    /// Bottom tile row.
    pub y0: i32,
    /// Rightmost tile column.
    pub x1: i32,
    /// Top tile row.
    pub y1: i32,
}

/// Bounding box over the bels of the cluster's bound members. Unbound
/// members are ignored; a fully unbound cluster yields a zero box.
pub fn get_cluster_bounds(
    design: &Design,
    graph: &dyn DeviceGraph,
    cluster: ClusterId,
) -> ClusterBounds {
    let Some(packed) = design.clusters.get(&cluster) else {
        return ClusterBounds::default();
    };
    let mut bounds: Option<ClusterBounds> = None;
    for name in packed.cell_cluster_node_map.keys() {
        let Some(cell) = design.cell_by_name(*name) else {
            continue;
        };
        let Some(bel) = design.cell(cell).bel else {
            continue;
        };
        let loc = graph.bel_location(bel);
        bounds = Some(match bounds {
            None => ClusterBounds {
                x0: loc.x,
                y0: loc.y,
                x1: loc.x,
                y1: loc.y,
            },
            Some(b) => ClusterBounds {
                x0: b.x0.min(loc.x),
                y0: b.y0.min(loc.y),
                x1: b.x1.max(loc.x),
                y1: b.y1.max(loc.y),
            },
        });
    }
    bounds.unwrap_or_default()
}
