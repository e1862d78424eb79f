//! River ribbons around corners
//!
//! Every corner touched by river edges gets one mesh joining the river banks
//! across it. The shape depends on how many of its three edges carry a
//! river:
//!
//! - one edge, corner touching the sea: the river fans out into the sea
//!   along two curves ending on the corner's other edges
//! - one edge, inland: a triangle capping the source
//! - two edges: two bank curves bending around the corner
//! - three edges: three bank curves meeting at a confluence triangle
//!
//! Banks sit on either side of an edge's midpoint, half a river width apart
//! (`river_width / 20` each way). Bank midpoints lie on chords between
//! corners, so every vertex below the water sphere is pushed back onto it.

use std::collections::BTreeMap;

use glam::Vec3;
use rayon::prelude::*;

use super::bezier::QuadraticBezier;
use super::Mesh;
use crate::graph::{CornerId, Edge, EdgeId, Graph};
use crate::terrain::TerrainCategory;

const OUTFLOW_SAMPLES: usize = 5;
const BEND_SAMPLES: usize = 9;

const SOURCE_INDICES: [[u32; 3]; 1] = [[0, 1, 2]];

#[rustfmt::skip]
const OUTFLOW_INDICES: [[u32; 3]; 8] = [
    [0, 1, 5], [5, 1, 6],
    [1, 2, 6], [6, 2, 7],
    [2, 3, 7], [7, 3, 8],
    [3, 4, 8], [8, 4, 9],
];

#[rustfmt::skip]
const BEND_INDICES: [[u32; 3]; 16] = [
    [0, 1, 9], [9, 1, 10],
    [1, 2, 10], [10, 2, 11],
    [2, 3, 11], [11, 3, 12],
    [3, 4, 12], [12, 4, 13],
    [4, 5, 13], [13, 5, 14],
    [5, 6, 14], [14, 6, 15],
    [6, 7, 15], [15, 7, 16],
    [7, 8, 16], [16, 8, 17],
];

#[rustfmt::skip]
const CONFLUENCE_INDICES: [[u32; 3]; 25] = [
    [0, 1, 26], [26, 1, 25],
    [1, 2, 25], [25, 2, 24],
    [2, 3, 24], [24, 3, 23],
    [3, 4, 23], [23, 4, 22],
    [9, 10, 8], [8, 10, 7],
    [10, 11, 7], [7, 11, 6],
    [11, 12, 6], [6, 12, 5],
    [12, 13, 5], [5, 13, 4],
    [18, 19, 17], [17, 19, 16],
    [19, 20, 16], [16, 20, 15],
    [20, 21, 15], [15, 21, 14],
    [21, 22, 14], [14, 22, 13],
    [4, 13, 22],
];

/// Bank points of one river edge as seen from a corner
#[derive(Debug, Clone, Copy)]
struct Banks {
    mid: Vec3,
    left: Vec3,
    right: Vec3,
    /// Offset from the midpoint to the left bank
    offset: Vec3,
}

impl Banks {
    fn new(graph: &Graph, corner: CornerId, edge: &Edge) -> Self {
        let [c1, c2] = edge.corners();
        let mid = (graph.corner(c1).position + graph.corner(c2).position) / 2.0;
        let here = graph.corner(corner).position;
        let there = graph.corner(edge.other_corner(corner)).position;
        let offset = (there - here).cross(here).normalize_or_zero() * (edge.river_width / 20.0);
        Self {
            mid,
            left: mid + offset,
            right: mid - offset,
            offset,
        }
    }

    fn pair(&self) -> [Vec3; 2] {
        [self.left, self.right]
    }
}

/// Closest of the four pairings between two bank pairs
fn nearest_pair(a: [Vec3; 2], b: [Vec3; 2]) -> (Vec3, Vec3) {
    let mut best = (a[0], b[0]);
    let mut best_dist = a[0].distance_squared(b[0]);
    for (p, q) in [(a[1], b[0]), (a[0], b[1]), (a[1], b[1])] {
        let d = p.distance_squared(q);
        if d < best_dist {
            best = (p, q);
            best_dist = d;
        }
    }
    best
}

/// River mesh for one corner, or `None` if no river touches it
pub fn river_mesh(graph: &Graph, corner: CornerId, water_level: f32) -> Option<Mesh> {
    let edge_ids = graph.corner(corner).edges();
    if edge_ids.len() != 3 {
        return None;
    }
    let edges: [EdgeId; 3] = [edge_ids[0], edge_ids[1], edge_ids[2]];
    let is_river = edges.map(|e| graph.edge(e).is_river());

    let mut mesh = match is_river.iter().filter(|&&r| r).count() {
        0 => return None,
        1 => {
            let k = is_river.iter().position(|&r| r)?;
            if graph.corner_touches(corner, TerrainCategory::Sea) {
                outflow(graph, corner, edges, k)
            } else {
                source(graph, corner, edges[k])
            }
        }
        2 => {
            let first = if is_river[0] { edges[0] } else { edges[1] };
            let second = if is_river[2] { edges[2] } else { edges[1] };
            bend(graph, corner, first, second)
        }
        _ => confluence(graph, corner, edges),
    };
    lift_to_water(&mut mesh.vertices, water_level);
    mesh.orient_outward();
    Some(mesh)
}

/// River meshes for every corner with at least one river edge
pub fn river_meshes(graph: &Graph, water_level: f32) -> BTreeMap<CornerId, Mesh> {
    (0..graph.corner_count())
        .into_par_iter()
        .filter_map(|i| {
            let corner = CornerId(i);
            river_mesh(graph, corner, water_level).map(|mesh| (corner, mesh))
        })
        .collect()
}

/// River mouth: banks of the river edge curve out onto the other two edges
fn outflow(graph: &Graph, corner: CornerId, edges: [EdgeId; 3], k: usize) -> Mesh {
    let river = graph.edge(edges[k]);
    let banks = Banks::new(graph, corner, river);
    let here = graph.corner(corner).position;
    let spread = river.river_width / 20.0 * 3.0;

    let along = |e: EdgeId| {
        let there = graph.corner(graph.edge(e).other_corner(corner)).position;
        here + (there - here).normalize_or_zero() * spread
    };
    let p1 = along(edges[(k + 1) % 3]);
    let p2 = along(edges[(k + 2) % 3]);

    let (m1, m2) = (banks.left, banks.right);
    let straight = m1.distance_squared(p1) + m2.distance_squared(p2);
    let crossed = m1.distance_squared(p2) + m2.distance_squared(p1);
    let (end1, end2) = if straight < crossed { (p1, p2) } else { (p2, p1) };

    let mut vertices = vec![Vec3::ZERO; OUTFLOW_SAMPLES * 2];
    let (left, right) = vertices.split_at_mut(OUTFLOW_SAMPLES);
    QuadraticBezier::new(m1, here + banks.offset, end1).sample_into(left);
    QuadraticBezier::new(m2, here - banks.offset, end2).sample_into(right);

    Mesh::new(vertices, OUTFLOW_INDICES.to_vec())
}

/// Push vertices inside the water sphere out onto it
fn lift_to_water(vertices: &mut [Vec3], water_level: f32) {
    let floor = water_level * water_level;
    for v in vertices {
        if v.length_squared() < floor {
            *v = v.normalize_or_zero() * water_level;
        }
    }
}

/// River source: a single triangle from the corner to the banks
fn source(graph: &Graph, corner: CornerId, edge: EdgeId) -> Mesh {
    let banks = Banks::new(graph, corner, graph.edge(edge));
    let vertices = vec![graph.corner(corner).position, banks.left, banks.right];
    Mesh::new(vertices, SOURCE_INDICES.to_vec())
}

/// River passing through: both banks bend around the corner
fn bend(graph: &Graph, corner: CornerId, first: EdgeId, second: EdgeId) -> Mesh {
    let a = Banks::new(graph, corner, graph.edge(first));
    let b = Banks::new(graph, corner, graph.edge(second));
    let pull = graph.corner(corner).position - (a.mid + b.mid) / 2.0;

    let curve = |s: Vec3, e: Vec3| QuadraticBezier::new(s, (s + e) / 2.0 + pull, e);

    let mut vertices = vec![Vec3::ZERO; BEND_SAMPLES * 2];
    let (outer, inner) = vertices.split_at_mut(BEND_SAMPLES);
    curve(a.left, b.right).sample_into(outer);
    curve(a.right, b.left).sample_into(inner);

    Mesh::new(vertices, BEND_INDICES.to_vec())
}

/// Three rivers meeting: one curve between each pair of edges
fn confluence(graph: &Graph, corner: CornerId, edges: [EdgeId; 3]) -> Mesh {
    let here = graph.corner(corner).position;
    let banks = edges.map(|e| Banks::new(graph, corner, graph.edge(e)));

    let curve = |i: usize, j: usize, reversed: bool| {
        let (v1, v2) = nearest_pair(banks[i].pair(), banks[j].pair());
        let control = (v1 + v2) / 2.0 + (here - (banks[i].mid + banks[j].mid) / 2.0);
        if reversed {
            QuadraticBezier::new(v2, control, v1)
        } else {
            QuadraticBezier::new(v1, control, v2)
        }
    };

    let mut vertices = vec![Vec3::ZERO; BEND_SAMPLES * 3];
    let (first, rest) = vertices.split_at_mut(BEND_SAMPLES);
    let (second, third) = rest.split_at_mut(BEND_SAMPLES);
    curve(0, 1, false).sample_into(first);
    curve(1, 2, false).sample_into(second);
    curve(0, 2, true).sample_into(third);

    Mesh::new(vertices, CONFLUENCE_INDICES.to_vec())
}
