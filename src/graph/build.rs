//! Graph construction from a convex hull
//!
//! Hull vertices become Nodes, hull faces become Corners, and every pair of
//! faces sharing a hull edge becomes one Edge.

use glam::Vec3;

use super::{CornerId, Graph, NodeId};
use crate::generation::hull::Hull;

/// Build the dual tile graph of `hull`
///
/// Node positions end up as the normalized average of their corners, which
/// pulls each tile center toward the centroid of its cell. Incident edges
/// are left unsorted; see [`Graph::sort_all_incident_edges`].
pub fn build_from_hull(hull: &Hull) -> Graph {
    let mut graph = Graph::with_capacity(hull.vertices.len());

    for vertex in &hull.vertices {
        graph.add_node(vertex.normalize());
    }

    // Faces around each vertex
    let mut node_faces: Vec<Vec<usize>> = vec![Vec::new(); hull.vertices.len()];
    for (face_idx, face) in hull.faces.iter().enumerate() {
        graph.add_corner(hull.face_center(face_idx).normalize());
        for &v in face {
            node_faces[v as usize].push(face_idx);
        }
    }

    for faces in &node_faces {
        for j in 0..faces.len().saturating_sub(1) {
            let fj = hull.faces[faces[j]];
            for k in (j + 1)..faces.len() {
                let fk = hull.faces[faces[k]];

                let mut shared = fj.iter().filter(|v| fk.contains(*v));
                let (Some(&a), Some(&b)) = (shared.next(), shared.next()) else {
                    continue;
                };

                let (c1, c2) = (CornerId(faces[j]), CornerId(faces[k]));
                if graph.corners_connected(c1, c2) {
                    continue;
                }
                graph.add_edge([NodeId(a as usize), NodeId(b as usize)], [c1, c2]);
            }
        }
    }

    recenter_nodes(&mut graph);
    graph
}

/// Move every node to the normalized average of its edges' corners
fn recenter_nodes(graph: &mut Graph) {
    for node in 0..graph.node_count() {
        let id = NodeId(node);
        let sum: Vec3 = graph
            .node(id)
            .edges()
            .iter()
            .flat_map(|&e| graph.edge(e).corners())
            .map(|c| graph.corner(c).position)
            .sum();
        if sum != Vec3::ZERO {
            graph.node_mut(id).position = sum.normalize();
        }
    }
}
