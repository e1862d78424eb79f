//! Seeded spherical tile worlds
//!
//! Samples points on the unit sphere, builds their convex hull and reads it
//! back as a Voronoi-style tile graph. Tiles are raised by coherent noise,
//! classified into sea, coast, ground, mountains and mountaintops, and
//! crossed by rivers grown downhill to the sea. Meshes for tiles and river
//! ribbons come out engine-agnostic.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use voronoi_world::*;
//!
//! let config = WorldConfigBuilder::new()
//!     .seed(42)
//!     .size(WorldSize::Small)
//!     .relaxation_iterations(2).unwrap()
//!     .river_count(100)
//!     .build().unwrap();
//!
//! let world = World::generate(config).unwrap();
//!
//! let mesh = build_world_mesh(&world, &CategoryColorMapper);
//! println!("Generated {} triangles", mesh.triangle_count());
//! ```
//!
//! # Features
//!
//! - `spatial-index` (default): direction-to-tile lookups using a KD-tree
//! - `serde`: serialization support for configuration, ids and categories

pub mod config;
pub mod error;
pub mod generation;
pub mod graph;
pub mod mesh;
pub mod rivers;
pub mod terrain;
pub mod world;

#[cfg(feature = "spatial-index")]
pub mod spatial;

pub use config::{WorldConfig, WorldConfigBuilder, WorldSize};
pub use error::{Result, WorldError};
pub use graph::{Corner, CornerId, Edge, EdgeId, EdgeKind, Endpoint, Graph, Node, NodeId};
pub use mesh::{
    build_world_mesh, CategoryColorMapper, ColorMapper, CustomColorMapper, Mesh, MeshData,
    TerrainColor,
};
pub use rivers::{RiverGenerator, RiverReport};
pub use terrain::{CoherentNoise3D, PerlinNoise, TerrainCategory, TerrainLevels, TerrainPercentages};
pub use world::World;

#[cfg(feature = "spatial-index")]
pub use spatial::SpatialIndex;

pub use glam::Vec3;
