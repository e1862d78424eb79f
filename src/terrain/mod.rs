//! Terrain heights and tile classification
//!
//! Heights live on corners. Every corner samples layered noise, the result
//! is folded into a height around 1.0, and each tile takes the average
//! height of its corners. Tiles are then classified against levels found by
//! scanning for a target share of tiles:
//!
//! 1. [`assign_corner_heights`]
//! 2. [`apply_corner_heights`]
//! 3. [`update_node_positions`]
//! 4. [`set_water_level`], then [`floor_corners`] at the returned level
//! 5. [`set_top_tiles_as`] for mountains, then for mountaintops
//! 6. [`mark_coasts`]
//!
//! [`classify`] runs the whole sequence.

pub mod noise;

pub use noise::{CoherentNoise3D, PerlinNoise};

use glam::Vec3;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::WorldConfig;
use crate::graph::Graph;

/// Spacing of the level scan
const LEVEL_STEP: f32 = 0.05;

/// Scale applied to corner positions before sampling noise
const NOISE_SCALE: f32 = 1.2;

/// Terrain category of a tile
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TerrainCategory {
    Sea,
    /// Dry tile next to the sea
    Coast,
    #[default]
    Ground,
    Mountain,
    Mountaintop,
}

impl TerrainCategory {
    pub const ALL: [TerrainCategory; 5] = [
        TerrainCategory::Sea,
        TerrainCategory::Coast,
        TerrainCategory::Ground,
        TerrainCategory::Mountain,
        TerrainCategory::Mountaintop,
    ];

    #[inline]
    pub fn is_water(self) -> bool {
        self == TerrainCategory::Sea
    }

    #[inline]
    pub fn is_land(self) -> bool {
        !self.is_water()
    }

    pub fn name(self) -> &'static str {
        match self {
            TerrainCategory::Sea => "Sea",
            TerrainCategory::Coast => "Coast",
            TerrainCategory::Ground => "Ground",
            TerrainCategory::Mountain => "Mountain",
            TerrainCategory::Mountaintop => "Mountaintop",
        }
    }
}

/// Target share of tiles for each classified band
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainPercentages {
    pub water: f32,
    pub mountain: f32,
    pub mountaintop: f32,
}

impl Default for TerrainPercentages {
    fn default() -> Self {
        Self {
            water: 0.5,
            mountain: 0.2,
            mountaintop: 0.05,
        }
    }
}

impl From<&WorldConfig> for TerrainPercentages {
    fn from(config: &WorldConfig) -> Self {
        Self {
            water: config.water_percentage,
            mountain: config.mountain_percentage,
            mountaintop: config.mountaintop_percentage,
        }
    }
}

/// Height thresholds chosen by the classifier
///
/// A level of 0 means the band was skipped; 2 means every tile was
/// assigned to it.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TerrainLevels {
    pub water: f32,
    pub mountain: f32,
    pub mountaintop: f32,
}

/// Seed-derived integer translation of the noise domain
pub fn noise_offset(seed: u32) -> Vec3 {
    let mut rng = ChaCha8Rng::seed_from_u64(seed as u64);
    let mut axis = || rng.gen_range(-1000..1000) as f32;
    Vec3::new(axis(), axis(), axis())
}

/// Raw corner height for an already offset sampling position
///
/// Three octaves are summed and shifted up, then positive values are
/// sharpened by cubing, folded back below 1 and square-rooted. Negative
/// values pass through.
pub fn corner_height<N: CoherentNoise3D + ?Sized>(noise: &N, pos: Vec3) -> f32 {
    let p = pos * NOISE_SCALE;
    let mut a = (noise.noise(p) + noise.noise(p * 2.0) / 2.0 + noise.noise(p * 4.0) / 4.0) / 1.75 + 0.2;
    if a > 0.0 {
        a = a.powi(3);
        if a > 1.0 {
            a = 1.0 - (a - 1.0);
        }
        a = a.sqrt();
    }
    a
}

/// Sample a raw height for every corner
pub fn assign_corner_heights<N: CoherentNoise3D + ?Sized>(graph: &mut Graph, noise: &N, seed: u32) {
    let offset = noise_offset(seed);
    for corner in graph.corners_mut() {
        corner.height = corner_height(noise, corner.position + offset);
    }
}

/// Turn raw heights into radii around 1.0 and move corners out to them
pub fn apply_corner_heights(graph: &mut Graph) {
    for corner in graph.corners_mut() {
        corner.height = 1.0 + corner.height / 4.0;
        corner.position = corner.direction() * corner.height;
    }
}

/// Lift every tile center to the average height of its edges' corners
pub fn update_node_positions(graph: &mut Graph) {
    let heights: Vec<f32> = graph
        .nodes()
        .iter()
        .map(|node| {
            let sum: f32 = node
                .edges()
                .iter()
                .flat_map(|&e| graph.edge(e).corners())
                .map(|c| graph.corner(c).height)
                .sum();
            sum / (node.edges().len() * 2).max(1) as f32
        })
        .collect();

    for (node, height) in graph.nodes_mut().iter_mut().zip(heights) {
        node.position = node.direction() * height;
    }
}

/// Scan levels from `from` toward `to` until `required` tiles pass
///
/// The result is interpolated inside the step that reached the count, in
/// proportion to how many of that step's new tiles were needed.
fn find_level(graph: &Graph, required: usize, from: f32, to: f32) -> f32 {
    let rising = to > from;
    let count_at = |level: f32| {
        graph
            .nodes()
            .iter()
            .filter(|n| if rising { n.height() <= level } else { n.height() >= level })
            .count()
    };

    let step = if rising { LEVEL_STEP } else { -LEVEL_STEP };
    let steps = ((to - from).abs() / LEVEL_STEP).round() as usize;

    let mut prev_level = from;
    let mut prev_count = 0;
    for i in 1..=steps {
        let level = from + step * i as f32;
        let count = count_at(level);
        if count >= required {
            if count == prev_count {
                return level;
            }
            let t = (required - prev_count) as f32 / (count - prev_count) as f32;
            return prev_level + t * (level - prev_level);
        }
        prev_level = level;
        prev_count = count;
    }
    to
}

/// Classify the lowest `target` share of tiles as sea
///
/// Returns the water level. `target <= 0` changes nothing and returns 0;
/// `target >= 1` floods every tile and returns 2.
pub fn set_water_level(graph: &mut Graph, target: f32) -> f32 {
    if target <= 0.0 {
        return 0.0;
    }
    if target >= 1.0 {
        for node in graph.nodes_mut() {
            node.category = TerrainCategory::Sea;
        }
        return 2.0;
    }

    let required = (target * graph.node_count() as f32) as usize;
    let level = find_level(graph, required, 0.5, 2.0);
    for node in graph.nodes_mut() {
        if node.height() <= level {
            node.category = TerrainCategory::Sea;
        }
    }
    level
}

/// Raise corners below `level` onto it
pub fn floor_corners(graph: &mut Graph, level: f32) {
    for corner in graph.corners_mut() {
        if corner.height < level {
            corner.height = level;
            corner.position = corner.direction() * level;
        }
    }
}

/// Classify the highest `target` share of tiles as `category`
///
/// Overwrites whatever category those tiles had. Returns the level with the
/// same sentinels as [`set_water_level`].
pub fn set_top_tiles_as(graph: &mut Graph, target: f32, category: TerrainCategory) -> f32 {
    if target <= 0.0 {
        return 0.0;
    }
    if target >= 1.0 {
        for node in graph.nodes_mut() {
            node.category = category;
        }
        return 2.0;
    }

    let required = (target * graph.node_count() as f32) as usize;
    let level = find_level(graph, required, 2.0, 1.0);
    for node in graph.nodes_mut() {
        if node.height() >= level {
            node.category = category;
        }
    }
    level
}

/// Turn ground tiles bordering the sea into coast
///
/// Returns the number of tiles changed.
pub fn mark_coasts(graph: &mut Graph) -> usize {
    let coasts: Vec<usize> = graph
        .node_ids()
        .filter(|&id| graph.node(id).category == TerrainCategory::Ground)
        .filter(|&id| {
            graph
                .node_neighbors(id)
                .any(|n| graph.node(n).category == TerrainCategory::Sea)
        })
        .map(|id| id.index())
        .collect();

    let nodes = graph.nodes_mut();
    for &i in &coasts {
        nodes[i].category = TerrainCategory::Coast;
    }
    coasts.len()
}

/// Run the full height and classification sequence
pub fn classify<N: CoherentNoise3D + ?Sized>(
    graph: &mut Graph,
    noise: &N,
    seed: u32,
    percentages: TerrainPercentages,
) -> TerrainLevels {
    assign_corner_heights(graph, noise, seed);
    apply_corner_heights(graph);
    update_node_positions(graph);

    let water = set_water_level(graph, percentages.water);
    floor_corners(graph, water);
    let mountain = set_top_tiles_as(graph, percentages.mountain, TerrainCategory::Mountain);
    let mountaintop = set_top_tiles_as(graph, percentages.mountaintop, TerrainCategory::Mountaintop);
    let coasts = mark_coasts(graph);

    let sea = graph
        .nodes()
        .iter()
        .filter(|n| n.category == TerrainCategory::Sea)
        .count();
    tracing::info!(
        target: "voronoi_world::terrain",
        water_level = water,
        mountain_level = mountain,
        mountaintop_level = mountaintop,
        sea,
        coasts,
        tiles = graph.node_count(),
        "terrain.classified"
    );

    TerrainLevels {
        water,
        mountain,
        mountaintop,
    }
}
