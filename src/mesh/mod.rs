//! Tile and river tessellation
//!
//! Meshes are derived from a frozen [`Graph`] on demand. Each [`Mesh`] is a
//! small, self-contained triangle list; [`render`] flattens them into one
//! engine-agnostic buffer.
//!
//! Every emitted triangle faces away from the sphere center: its vertices
//! `a, b, c` satisfy `a · (b × c) >= 0`.

mod bezier;
mod colors;
pub mod render;
pub mod river;

pub use bezier::QuadraticBezier;
pub use colors::{CategoryColorMapper, ColorMapper, CustomColorMapper, TerrainColor};
pub use render::{build_world_mesh, MeshData};
pub use river::{river_mesh, river_meshes};

use std::collections::HashMap;

use glam::Vec3;
use rayon::prelude::*;

use crate::graph::{CornerId, Graph, NodeId};

/// Triangle list in absolute world coordinates
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    pub vertices: Vec<Vec3>,
    pub indices: Vec<[u32; 3]>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vec3>, indices: Vec<[u32; 3]>) -> Self {
        Self { vertices, indices }
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Vertices of one triangle
    #[inline]
    pub fn triangle(&self, triangle: usize) -> [Vec3; 3] {
        self.indices[triangle].map(|i| self.vertices[i as usize])
    }

    /// Signed volume of the tetrahedron spanned by the origin and a triangle
    ///
    /// Positive when the triangle winds counter-clockwise seen from outside.
    pub fn signed_volume(&self, triangle: usize) -> f32 {
        let [a, b, c] = self.triangle(triangle);
        a.dot(b.cross(c)) / 6.0
    }

    /// Swap the first two indices of every inward-facing triangle
    pub(crate) fn orient_outward(&mut self) {
        for tri in &mut self.indices {
            let [a, b, c] = tri.map(|i| self.vertices[i as usize]);
            if a.dot(b.cross(c)) <= 0.0 {
                tri.swap(0, 1);
            }
        }
    }
}

/// Triangulate one tile as a fan over its boundary corners
///
/// Corners are numbered in the order the node's sorted edges first reach
/// them. Every edge not touching corner 0 contributes the triangle
/// `(0, c1, c2)`, which covers a convex tile with `edges - 2` triangles.
/// A node with fewer than 3 edges yields an empty mesh.
pub fn tile_mesh(graph: &Graph, node: NodeId) -> Mesh {
    let edges = graph.node(node).edges();
    if edges.len() < 3 {
        return Mesh::default();
    }

    let mut slots: HashMap<CornerId, u32> = HashMap::with_capacity(edges.len());
    let mut vertices = Vec::with_capacity(edges.len());
    for &e in edges {
        for corner in graph.edge(e).corners() {
            slots.entry(corner).or_insert_with(|| {
                vertices.push(graph.corner(corner).position);
                (vertices.len() - 1) as u32
            });
        }
    }

    let indices = edges
        .iter()
        .filter_map(|&e| {
            let [c1, c2] = graph.edge(e).corners();
            let (i2, i3) = (slots[&c1], slots[&c2]);
            (i2 != 0 && i3 != 0).then_some([0, i2, i3])
        })
        .collect();

    let mut mesh = Mesh::new(vertices, indices);
    mesh.orient_outward();
    mesh
}

/// Tile meshes for every node, indexed by node
pub fn tile_meshes(graph: &Graph) -> Vec<Mesh> {
    (0..graph.node_count())
        .into_par_iter()
        .map(|i| tile_mesh(graph, NodeId(i)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::hull::compute_hull;
    use crate::generation::sampling::sample_sphere_points;
    use crate::graph::build_from_hull;
    use crate::graph::tests::tetrahedron;

    fn sorted_graph(seed: u32) -> Graph {
        let points = sample_sphere_points(250, 0.12, seed).unwrap();
        let mut graph = build_from_hull(&compute_hull(&points).unwrap());
        graph.sort_all_incident_edges();
        graph
    }

    #[test]
    fn test_tetrahedron_tile_is_one_triangle() {
        let mut graph = tetrahedron();
        graph.sort_all_incident_edges();
        let mesh = tile_mesh(&graph, NodeId(0));
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert!(mesh.signed_volume(0) > 0.0);
    }

    #[test]
    fn test_fan_covers_tile() {
        let graph = sorted_graph(1);
        for id in graph.node_ids() {
            let mesh = tile_mesh(&graph, id);
            let edges = graph.node(id).edges().len();
            assert_eq!(mesh.vertex_count(), edges);
            assert_eq!(mesh.triangle_count(), edges - 2);
        }
    }

    #[test]
    fn test_triangles_face_outward() {
        let graph = sorted_graph(2);
        for mesh in tile_meshes(&graph) {
            for t in 0..mesh.triangle_count() {
                assert!(mesh.signed_volume(t) >= 0.0);
            }
        }
    }

    #[test]
    fn test_tile_vertices_are_node_corners() {
        let graph = sorted_graph(3);
        let id = NodeId(10);
        let mesh = tile_mesh(&graph, id);
        for v in &mesh.vertices {
            let found = graph.node(id).edges().iter().any(|&e| {
                graph
                    .edge(e)
                    .corners()
                    .iter()
                    .any(|&c| graph.corner(c).position == *v)
            });
            assert!(found);
        }
    }

    #[test]
    fn test_parallel_matches_serial() {
        let graph = sorted_graph(4);
        let parallel = tile_meshes(&graph);
        assert_eq!(parallel.len(), graph.node_count());
        for id in graph.node_ids() {
            assert_eq!(parallel[id.index()], tile_mesh(&graph, id));
        }
    }

    #[test]
    fn test_orient_outward_flips_inward_triangle() {
        let mut mesh = Mesh::new(vec![Vec3::X, Vec3::Z, Vec3::Y], vec![[0, 1, 2]]);
        assert!(mesh.signed_volume(0) < 0.0);
        mesh.orient_outward();
        assert_eq!(mesh.indices[0], [1, 0, 2]);
        assert!(mesh.signed_volume(0) > 0.0);
    }
}
