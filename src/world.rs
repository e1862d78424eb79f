//! World: the generated graph with its terrain and rivers

use std::collections::{BTreeMap, HashSet};
use std::time::Instant;

use crate::config::WorldConfig;
use crate::error::{Result, WorldError};
use crate::generation::generate_graph;
use crate::graph::{CornerId, Graph, Node, NodeId};
use crate::mesh::{self, Mesh};
use crate::rivers::{RiverGenerator, RiverReport};
use crate::terrain::{classify, CoherentNoise3D, PerlinNoise, TerrainCategory, TerrainLevels, TerrainPercentages};

#[cfg(feature = "spatial-index")]
use crate::spatial::SpatialIndex;
#[cfg(feature = "spatial-index")]
use glam::Vec3;

/// A generated world
///
/// The graph is frozen once generation finishes; every query and mesh
/// builder only borrows it.
///
/// # Examples
///
/// ```
/// use voronoi_world::*;
///
/// let config = WorldConfigBuilder::new()
///     .seed(42)
///     .size(WorldSize::Custom { node_count: 300, min_distance: 0.12 })
///     .river_count(10)
///     .build()
///     .unwrap();
///
/// let world = World::generate(config).unwrap();
/// assert_eq!(world.node_count(), 300);
/// ```
#[derive(Clone)]
pub struct World {
    config: WorldConfig,
    graph: Graph,
    levels: TerrainLevels,
    rivers: RiverReport,

    #[cfg(feature = "spatial-index")]
    spatial_index: SpatialIndex,
}

impl World {
    /// Generate a world with Perlin noise seeded from the config
    ///
    /// # Errors
    ///
    /// Propagates sampling and hull failures from graph generation.
    pub fn generate(config: WorldConfig) -> Result<Self> {
        let noise = PerlinNoise::new(config.seed);
        Self::generate_with_noise(config, &noise)
    }

    /// Generate a world with a custom height noise
    pub fn generate_with_noise<N>(config: WorldConfig, noise: &N) -> Result<Self>
    where
        N: CoherentNoise3D + ?Sized,
    {
        let start = Instant::now();

        let mut graph = generate_graph(&config)?;
        let levels = classify(&mut graph, noise, config.seed, TerrainPercentages::from(&config));
        let rivers = RiverGenerator::new().generate(&mut graph, config.river_count, config.seed);

        #[cfg(feature = "spatial-index")]
        let spatial_index = {
            let directions: Vec<Vec3> = graph.nodes().iter().map(Node::direction).collect();
            SpatialIndex::new(&directions)
        };

        tracing::info!(
            target: "voronoi_world::world",
            seed = config.seed,
            size = config.size.name(),
            nodes = graph.node_count(),
            corners = graph.corner_count(),
            edges = graph.edge_count(),
            rivers = rivers.generated,
            total_ms = start.elapsed().as_secs_f64() * 1e3,
            "world.generated"
        );

        Ok(Self {
            config,
            graph,
            levels,
            rivers,
            #[cfg(feature = "spatial-index")]
            spatial_index,
        })
    }

    #[inline]
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Read-only view of the tile graph
    #[inline]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Height thresholds chosen by classification
    #[inline]
    pub fn levels(&self) -> TerrainLevels {
        self.levels
    }

    #[inline]
    pub fn water_level(&self) -> f32 {
        self.levels.water
    }

    /// How many rivers were asked for and grown
    #[inline]
    pub fn river_report(&self) -> RiverReport {
        self.rivers
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Get a tile by index
    ///
    /// # Errors
    ///
    /// Returns `NodeNotFound` if `id` is out of range.
    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.check_node(id)?;
        Ok(self.graph.node(id))
    }

    fn check_node(&self, id: NodeId) -> Result<()> {
        if id.index() < self.graph.node_count() {
            Ok(())
        } else {
            Err(WorldError::NodeNotFound(id.index()))
        }
    }

    /// Triangulated tile for one node
    pub fn tile_mesh(&self, id: NodeId) -> Result<Mesh> {
        self.check_node(id)?;
        Ok(mesh::tile_mesh(&self.graph, id))
    }

    /// Triangulated tiles for every node, indexed by node
    pub fn tile_meshes(&self) -> Vec<Mesh> {
        mesh::tile_meshes(&self.graph)
    }

    /// River ribbons for every corner a river passes through
    pub fn river_meshes(&self) -> BTreeMap<CornerId, Mesh> {
        mesh::river_meshes(&self.graph, self.levels.water)
    }

    /// Tile under a point, by direction from the sphere center
    ///
    /// Returns `None` for the zero vector.
    #[cfg(feature = "spatial-index")]
    pub fn find_tile_at(&self, position: Vec3) -> Option<NodeId> {
        let direction = position.try_normalize()?;
        Some(NodeId(self.spatial_index.find_nearest(direction)))
    }

    /// Tiles at most `hops` edges away from `center`, including `center`
    ///
    /// Tiles come out in breadth-first order.
    pub fn tiles_within(&self, center: NodeId, hops: usize) -> Result<Vec<NodeId>> {
        self.check_node(center)?;

        let mut visited = HashSet::from([center]);
        let mut order = vec![center];
        let mut frontier = vec![center];

        for _ in 0..hops {
            let mut next = Vec::new();
            for &node in &frontier {
                for neighbor in self.graph.node_neighbors(node) {
                    if visited.insert(neighbor) {
                        next.push(neighbor);
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            order.extend_from_slice(&next);
            frontier = next;
        }

        Ok(order)
    }

    /// Number of tiles per category, in [`TerrainCategory::ALL`] order
    pub fn category_counts(&self) -> [(TerrainCategory, usize); 5] {
        TerrainCategory::ALL.map(|category| {
            let count = self
                .graph
                .nodes()
                .iter()
                .filter(|n| n.category == category)
                .count();
            (category, count)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{WorldConfigBuilder, WorldSize};

    fn small_config(seed: u32) -> WorldConfig {
        WorldConfigBuilder::new()
            .seed(seed)
            .size(WorldSize::Custom {
                node_count: 400,
                min_distance: 0.1,
            })
            .river_count(15)
            .build()
            .unwrap()
    }

    #[test]
    fn test_world_generation() {
        let world = World::generate(small_config(42)).unwrap();
        assert_eq!(world.node_count(), 400);
        assert_eq!(world.graph().corner_count(), 796);
        assert_eq!(world.config().seed, 42);
        assert_eq!(world.river_report().requested, 15);
    }

    #[test]
    fn test_node_lookup() {
        let world = World::generate(small_config(1)).unwrap();
        assert!(world.node(NodeId(0)).is_ok());
        assert_eq!(
            world.node(NodeId(400)).unwrap_err(),
            WorldError::NodeNotFound(400)
        );
        assert!(world.tile_mesh(NodeId(400)).is_err());
    }

    #[test]
    fn test_tiles_within() {
        let world = World::generate(small_config(2)).unwrap();
        let center = NodeId(0);

        let r0 = world.tiles_within(center, 0).unwrap();
        assert_eq!(r0, vec![center]);

        let r1 = world.tiles_within(center, 1).unwrap();
        let neighbors = world.graph().node(center).edges().len();
        assert_eq!(r1.len(), 1 + neighbors);

        let r2 = world.tiles_within(center, 2).unwrap();
        assert!(r2.len() > r1.len());
        assert_eq!(&r2[..r1.len()], &r1[..]);

        // Enough hops reach every tile
        assert_eq!(world.tiles_within(center, 400).unwrap().len(), 400);
        assert!(world.tiles_within(NodeId(9999), 2).is_err());
    }

    #[test]
    fn test_category_counts_cover_every_tile() {
        let world = World::generate(small_config(3)).unwrap();
        let counts = world.category_counts();
        let total: usize = counts.iter().map(|(_, c)| c).sum();
        assert_eq!(total, world.node_count());
        assert!(counts[0].1 > 0, "should have some sea");
    }

    #[test]
    fn test_custom_noise() {
        struct Flat;
        impl CoherentNoise3D for Flat {
            fn noise(&self, _p: glam::Vec3) -> f32 {
                0.0
            }
        }

        let world = World::generate_with_noise(small_config(4), &Flat).unwrap();
        assert_eq!(world.node_count(), 400);
    }

    #[cfg(feature = "spatial-index")]
    #[test]
    fn test_find_tile_at() {
        let world = World::generate(small_config(5)).unwrap();
        for id in [NodeId(0), NodeId(17), NodeId(399)] {
            let position = world.graph().node(id).position;
            assert_eq!(world.find_tile_at(position), Some(id));
            assert_eq!(world.find_tile_at(position.normalize() * 3.0), Some(id));
        }
        assert_eq!(world.find_tile_at(Vec3::ZERO), None);
    }
}
