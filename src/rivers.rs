//! River growth by greedy downhill walks
//!
//! A river starts at a random inland corner and repeatedly steps along the
//! edge with the smallest height change to a corner it has not seen yet.
//! It succeeds once it reaches a corner touching the sea; every edge it
//! crossed becomes a river edge and gets wider. A walk that would have to
//! climb more than [`FLATNESS_THRESHOLD`] is dropped without a trace.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::graph::{CornerId, EdgeId, EdgeKind, Graph};
use crate::terrain::TerrainCategory;

/// Largest uphill step a walk may take
pub const FLATNESS_THRESHOLD: f32 = 0.1;

/// Width added to an edge each time a river crosses it
pub const WIDTH_STEP: f32 = 0.05;

pub const MIN_RIVER_WIDTH: f32 = 0.05;
pub const MAX_RIVER_WIDTH: f32 = 0.2;

/// Outcome of a river generation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RiverReport {
    /// Rivers asked for
    pub requested: usize,
    /// Walks that reached the sea
    pub generated: usize,
    /// Start corners drawn, including inland checks that failed
    pub attempts: usize,
    /// Walks that started but were dropped
    pub abandoned: usize,
}

impl RiverReport {
    /// Whether every requested river was grown
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.generated >= self.requested
    }
}

/// Grows rivers on a classified graph
///
/// The number of start draws is capped so worlds with no viable start
/// corner still terminate. The default cap is `river_count * 1000 + 1000`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RiverGenerator {
    max_attempts: Option<usize>,
}

impl RiverGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the start draw cap
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    /// Start draw cap for a run of `river_count` rivers
    pub fn max_attempts_for(&self, river_count: usize) -> usize {
        self.max_attempts
            .unwrap_or_else(|| river_count.saturating_mul(1000).saturating_add(1000))
    }

    /// Grow `river_count` rivers, drawing start corners from `seed`
    pub fn generate(&self, graph: &mut Graph, river_count: usize, seed: u32) -> RiverReport {
        let mut report = RiverReport {
            requested: river_count,
            ..Default::default()
        };
        if river_count == 0 || graph.corner_count() == 0 {
            return report;
        }

        let max_attempts = self.max_attempts_for(river_count);
        let mut rng = ChaCha8Rng::seed_from_u64(seed as u64);
        let mut walk = Walk::new(graph.corner_count());

        while report.generated < river_count && report.attempts < max_attempts {
            report.attempts += 1;
            let start = CornerId(rng.gen_range(0..graph.corner_count()));
            if graph.corner_touches(start, TerrainCategory::Sea) {
                continue;
            }

            if walk.run(graph, start) {
                for &edge in &walk.path {
                    let edge = graph.edge_mut(edge);
                    edge.kind = EdgeKind::River;
                    edge.river_width =
                        (edge.river_width + WIDTH_STEP).clamp(MIN_RIVER_WIDTH, MAX_RIVER_WIDTH);
                }
                report.generated += 1;
            } else {
                report.abandoned += 1;
            }
            walk.reset();
        }

        if !report.is_complete() {
            tracing::warn!(
                target: "voronoi_world::rivers",
                requested = report.requested,
                generated = report.generated,
                attempts = report.attempts,
                "rivers.attempts_exhausted"
            );
        }
        tracing::info!(
            target: "voronoi_world::rivers",
            requested = report.requested,
            generated = report.generated,
            attempts = report.attempts,
            abandoned = report.abandoned,
            river_edges = graph.edges().iter().filter(|e| e.is_river()).count(),
            "rivers.generated"
        );

        report
    }
}

/// Scratch state for one walk
struct Walk {
    visited: Vec<bool>,
    marked: Vec<CornerId>,
    path: Vec<EdgeId>,
}

impl Walk {
    fn new(corner_count: usize) -> Self {
        Self {
            visited: vec![false; corner_count],
            marked: Vec::new(),
            path: Vec::new(),
        }
    }

    fn mark(&mut self, corner: CornerId) {
        if !self.visited[corner.index()] {
            self.visited[corner.index()] = true;
            self.marked.push(corner);
        }
    }

    fn reset(&mut self) {
        for corner in self.marked.drain(..) {
            self.visited[corner.index()] = false;
        }
        self.path.clear();
    }

    /// Walk downhill from `start`, recording crossed edges in `path`
    ///
    /// Every neighbor inspected at a step is marked, so later steps never
    /// turn back toward the area the walk came through.
    fn run(&mut self, graph: &Graph, start: CornerId) -> bool {
        self.mark(start);
        let mut current = start;

        for _ in 0..graph.corner_count() {
            let height = graph.corner(current).height;
            let mut best: Option<(f32, EdgeId, CornerId)> = None;
            for (edge, next) in graph.corner_neighbors(current) {
                if self.visited[next.index()] {
                    continue;
                }
                let delta = graph.corner(next).height - height;
                if best.map_or(true, |(d, _, _)| delta < d) {
                    best = Some((delta, edge, next));
                }
                self.mark(next);
            }

            let Some((delta, edge, next)) = best else {
                return false;
            };
            if delta > FLATNESS_THRESHOLD {
                return false;
            }

            self.path.push(edge);
            current = next;
            if graph.corner_touches(current, TerrainCategory::Sea) {
                return true;
            }
        }
        false
    }
}
