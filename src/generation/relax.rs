//! Relaxation by repeated re-hulling
//!
//! Building a graph already moves every tile center to the normalized
//! average of its corners. Feeding those centers back in as sample points
//! and rebuilding is one Lloyd-style pass: cells drift toward equal size and
//! the layout loses the clumping of the raw samples.

use std::time::Instant;

use glam::Vec3;

use super::hull::compute_hull;
use crate::error::Result;
use crate::graph::{build_from_hull, Graph};

/// Run `iterations` rebuild passes over `graph`
///
/// Each pass hulls the current tile centers and rebuilds the graph from
/// scratch, so node ids are not stable across passes.
///
/// # Errors
///
/// Returns `HullConstructionFailed` if a pass cannot hull its points. The
/// error is passed through unchanged; there is no retry at this stage.
pub fn relax(mut graph: Graph, iterations: usize) -> Result<Graph> {
    let total_start = Instant::now();

    for iteration in 0..iterations {
        let iter_start = Instant::now();
        let points: Vec<Vec3> = graph.nodes().iter().map(|n| n.direction()).collect();

        let hull_start = Instant::now();
        let hull = compute_hull(&points)?;
        let hull_time = hull_start.elapsed();

        let build_start = Instant::now();
        graph = build_from_hull(&hull);
        let build_time = build_start.elapsed();

        let max_displacement = graph
            .nodes()
            .iter()
            .zip(&hull.vertices)
            .map(|(node, &before)| node.position.distance(before.normalize()))
            .fold(0.0f32, f32::max);

        tracing::debug!(
            target: "voronoi_world::relax",
            iteration = iteration + 1,
            hull_ms = hull_time.as_secs_f64() * 1e3,
            build_ms = build_time.as_secs_f64() * 1e3,
            total_ms = iter_start.elapsed().as_secs_f64() * 1e3,
            max_displacement,
            "relax.iteration"
        );
    }

    tracing::debug!(
        target: "voronoi_world::relax",
        iterations,
        nodes = graph.node_count(),
        total_ms = total_start.elapsed().as_secs_f64() * 1e3,
        "relax.done"
    );

    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::sampling::sample_sphere_points;

    fn raw_graph(count: usize, seed: u32) -> Graph {
        let points = sample_sphere_points(count, 0.12, seed).unwrap();
        build_from_hull(&compute_hull(&points).unwrap())
    }

    /// Coefficient of variation of edge lengths
    fn spacing_spread(graph: &Graph) -> f32 {
        let lengths: Vec<f32> = graph
            .edges()
            .iter()
            .map(|e| {
                let [a, b] = e.corners();
                graph.corner(a).position.distance(graph.corner(b).position)
            })
            .collect();
        let mean = lengths.iter().sum::<f32>() / lengths.len() as f32;
        let var = lengths.iter().map(|l| (l - mean).powi(2)).sum::<f32>() / lengths.len() as f32;
        var.sqrt() / mean
    }

    #[test]
    fn test_relax_keeps_node_count() {
        let graph = raw_graph(200, 3);
        let relaxed = relax(graph, 2).unwrap();
        assert_eq!(relaxed.node_count(), 200);
        assert_eq!(relaxed.corner_count(), 2 * 200 - 4);
        relaxed.check_topology().unwrap();
        for node in relaxed.nodes() {
            assert!((node.height() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_zero_iterations_is_identity() {
        let graph = raw_graph(100, 8);
        let positions: Vec<Vec3> = graph.nodes().iter().map(|n| n.position).collect();
        let relaxed = relax(graph, 0).unwrap();
        let after: Vec<Vec3> = relaxed.nodes().iter().map(|n| n.position).collect();
        assert_eq!(positions, after);
    }

    #[test]
    fn test_relax_evens_out_edges() {
        let graph = raw_graph(300, 17);
        let before = spacing_spread(&graph);
        let relaxed = relax(graph, 3).unwrap();
        assert!(spacing_spread(&relaxed) < before);
    }

    #[test]
    fn test_failed_pass_returns_hull_error() {
        let mut graph = Graph::with_capacity(3);
        for p in [Vec3::X, Vec3::Y, Vec3::Z] {
            graph.add_node(p);
        }
        assert!(matches!(
            relax(graph, 1),
            Err(crate::error::WorldError::HullConstructionFailed(_))
        ));
    }

    #[test]
    fn test_relax_determinism() {
        let a = relax(raw_graph(150, 5), 2).unwrap();
        let b = relax(raw_graph(150, 5), 2).unwrap();
        let pa: Vec<Vec3> = a.nodes().iter().map(|n| n.position).collect();
        let pb: Vec<Vec3> = b.nodes().iter().map(|n| n.position).collect();
        assert_eq!(pa, pb);
    }
}
