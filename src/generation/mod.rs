//! Graph generation pipeline
//!
//! Samples points on the unit sphere, hulls them, builds the dual tile graph
//! and relaxes it. Terrain and rivers are layered on afterwards by
//! [`crate::World`].

pub mod hull;
pub mod relax;
pub mod sampling;

pub use hull::{compute_hull, Hull};
pub use relax::relax;
pub use sampling::sample_sphere_points;

use glam::Vec3;

use crate::config::WorldConfig;
use crate::error::{Result, WorldError};
use crate::graph::{build_from_hull, Graph};

/// Hull attempts before generation gives up
pub const MAX_HULL_ATTEMPTS: usize = 10;

/// Generate the relaxed, edge-sorted tile graph for `config`
///
/// A failed hull is retried with a fresh point set drawn from the next seed.
///
/// # Errors
///
/// - `SamplingExhausted` if the points cannot be placed (not retried)
/// - `GenerationFailed` after [`MAX_HULL_ATTEMPTS`] failed hulls
/// - `HullConstructionFailed` if a relaxation pass fails. Relaxation
///   re-hulls the tile centers of a graph that already built once, so its
///   failures are returned as is and never retried.
pub fn generate_graph(config: &WorldConfig) -> Result<Graph> {
    generate_graph_with(config, compute_hull)
}

/// [`generate_graph`] with the initial hull stage supplied by the caller
pub(crate) fn generate_graph_with<F>(config: &WorldConfig, mut hull_of: F) -> Result<Graph>
where
    F: FnMut(&[Vec3]) -> Result<Hull>,
{
    let node_count = config.node_count();
    let min_distance = config.min_distance();

    let mut last_error = None;
    let mut hull = None;
    for attempt in 0..MAX_HULL_ATTEMPTS {
        let seed = config.seed.wrapping_add(attempt as u32);
        let points = sample_sphere_points(node_count, min_distance, seed)?;
        match hull_of(&points) {
            Ok(h) => {
                hull = Some(h);
                break;
            }
            Err(e) => {
                tracing::warn!(
                    target: "voronoi_world::generation",
                    attempt = attempt + 1,
                    error = %e,
                    "generation.hull_retry"
                );
                last_error = Some(e);
            }
        }
    }

    let Some(hull) = hull else {
        return Err(WorldError::GenerationFailed {
            attempts: MAX_HULL_ATTEMPTS,
            last: Box::new(last_error.unwrap_or_else(|| {
                WorldError::HullConstructionFailed("no hull attempt was made".into())
            })),
        });
    };

    let graph = build_from_hull(&hull);
    let mut graph = relax(graph, config.relaxation_iterations)?;
    graph.sort_all_incident_edges();

    debug_assert!(
        graph.check_topology().is_ok(),
        "generated graph violates topology: {:?}",
        graph.check_topology()
    );

    tracing::info!(
        target: "voronoi_world::generation",
        seed = config.seed,
        nodes = graph.node_count(),
        corners = graph.corner_count(),
        edges = graph.edge_count(),
        relaxation_iterations = config.relaxation_iterations,
        "generation.graph_built"
    );

    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{WorldConfigBuilder, WorldSize};

    fn small_config(seed: u32) -> WorldConfig {
        WorldConfigBuilder::new()
            .seed(seed)
            .size(WorldSize::Custom {
                node_count: 300,
                min_distance: 0.12,
            })
            .build()
            .unwrap()
    }

    #[test]
    fn test_generate_graph() {
        let graph = generate_graph(&small_config(1)).unwrap();
        assert_eq!(graph.node_count(), 300);
        assert_eq!(graph.corner_count(), 596);
        assert_eq!(graph.edge_count(), 894);
        graph.check_topology().unwrap();
    }

    #[test]
    fn test_edges_sorted_into_cycles() {
        let graph = generate_graph(&small_config(2)).unwrap();
        for node in graph.nodes() {
            let edges = node.edges();
            for i in 0..edges.len() {
                let a = graph.edge(edges[i]);
                let b = graph.edge(edges[(i + 1) % edges.len()]);
                assert!(a.corners().iter().any(|&c| b.has_corner(c)));
            }
        }
    }

    #[test]
    fn test_sampling_failure_is_not_retried() {
        let config = WorldConfigBuilder::new()
            .seed(0)
            .size(WorldSize::Custom {
                node_count: 500,
                min_distance: 1.5,
            })
            .build()
            .unwrap();
        assert!(matches!(
            generate_graph(&config),
            Err(WorldError::SamplingExhausted { .. })
        ));
    }

    #[test]
    fn test_hull_failures_give_up_after_max_attempts() {
        let mut calls = 0;
        let result = generate_graph_with(&small_config(3), |_| {
            calls += 1;
            Err(WorldError::HullConstructionFailed(format!("attempt {}", calls)))
        });

        assert_eq!(calls, MAX_HULL_ATTEMPTS);
        match result {
            Err(WorldError::GenerationFailed { attempts, last }) => {
                assert_eq!(attempts, MAX_HULL_ATTEMPTS);
                assert_eq!(*last, WorldError::HullConstructionFailed("attempt 10".into()));
            }
            other => panic!("expected GenerationFailed, got {:?}", other.map(|g| g.node_count())),
        }
    }

    #[test]
    fn test_hull_retry_draws_from_next_seed() {
        let config = small_config(7);
        let mut seen: Vec<Vec<Vec3>> = Vec::new();
        let graph = generate_graph_with(&config, |points| {
            seen.push(points.to_vec());
            if seen.len() < 3 {
                Err(WorldError::HullConstructionFailed("flat".into()))
            } else {
                compute_hull(points)
            }
        })
        .unwrap();

        assert_eq!(seen.len(), 3);
        assert_eq!(graph.node_count(), 300);
        for (attempt, points) in seen.iter().enumerate() {
            let expected = sample_sphere_points(300, 0.12, 7 + attempt as u32).unwrap();
            assert_eq!(points, &expected);
        }
        assert_ne!(seen[0], seen[2]);
    }

    #[test]
    fn test_retry_seed_wraps() {
        let config = WorldConfigBuilder::new()
            .seed(u32::MAX)
            .size(WorldSize::Custom {
                node_count: 100,
                min_distance: 0.2,
            })
            .build()
            .unwrap();
        let mut seen = Vec::new();
        generate_graph_with(&config, |points| {
            seen.push(points.to_vec());
            if seen.len() < 2 {
                Err(WorldError::HullConstructionFailed("flat".into()))
            } else {
                compute_hull(points)
            }
        })
        .unwrap();
        assert_eq!(seen[1], sample_sphere_points(100, 0.2, 0).unwrap());
    }
}
