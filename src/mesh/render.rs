//! Engine-agnostic render buffers
//!
//! Flattens every tile mesh and river ribbon of a [`World`] into one indexed
//! vertex buffer with normals and colors.

use glam::Vec3;

use super::colors::{ColorMapper, TerrainColor};
use super::Mesh;
use crate::world::World;

/// Engine-agnostic mesh data output
///
/// Contains raw vertex data suitable for any rendering engine:
/// - Bevy: Convert to `Mesh` with attributes
/// - Godot: Convert to `ArrayMesh`
/// - wgpu: Use directly as vertex buffers
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    /// Vertex positions (3D coordinates)
    pub positions: Vec<[f32; 3]>,
    /// Vertex normals (normalized direction from sphere center)
    pub normals: Vec<[f32; 3]>,
    /// Vertex colors (RGBA)
    pub colors: Vec<[f32; 4]>,
    /// Triangle indices
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Append a mesh with a single color, rebasing its indices
    pub fn append(&mut self, mesh: &Mesh, color: TerrainColor) {
        let base = self.positions.len() as u32;
        for v in &mesh.vertices {
            let n = v.normalize_or_zero();
            self.positions.push(v.to_array());
            self.normals.push(n.to_array());
            self.colors.push(color);
        }
        self.indices
            .extend(mesh.indices.iter().flat_map(|tri| tri.map(|i| base + i)));
    }

    /// Position of a vertex as a vector
    #[inline]
    pub fn position(&self, vertex: usize) -> Vec3 {
        Vec3::from_array(self.positions[vertex])
    }
}

/// Build one buffer holding every tile and river mesh of `world`
///
/// Tiles are colored by category, rivers with the mapper's river color.
/// Tile meshes come first, in node order, followed by river meshes in
/// corner order.
pub fn build_world_mesh<C: ColorMapper + ?Sized>(world: &World, colors: &C) -> MeshData {
    let graph = world.graph();
    let tiles = world.tile_meshes();
    let rivers = world.river_meshes();

    let mut data = MeshData::default();
    for (node, mesh) in graph.nodes().iter().zip(&tiles) {
        data.append(mesh, colors.category_color(node.category));
    }
    let river_color = colors.river_color();
    for mesh in rivers.values() {
        data.append(mesh, river_color);
    }

    tracing::debug!(
        target: "voronoi_world::mesh",
        vertices = data.vertex_count(),
        triangles = data.triangle_count(),
        river_meshes = rivers.len(),
        "mesh.built"
    );

    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{WorldConfigBuilder, WorldSize};
    use crate::mesh::{CategoryColorMapper, CustomColorMapper};

    fn small_world() -> World {
        let config = WorldConfigBuilder::new()
            .seed(42)
            .size(WorldSize::Custom {
                node_count: 400,
                min_distance: 0.1,
            })
            .river_count(20)
            .build()
            .unwrap();
        World::generate(config).unwrap()
    }

    #[test]
    fn test_append_rebases_indices() {
        let tri = Mesh::new(vec![Vec3::X, Vec3::Y, Vec3::Z], vec![[0, 1, 2]]);
        let mut data = MeshData::default();
        data.append(&tri, [1.0; 4]);
        data.append(&tri, [0.5; 4]);
        assert_eq!(data.vertex_count(), 6);
        assert_eq!(data.indices, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(data.colors[4], [0.5; 4]);
    }

    #[test]
    fn test_world_mesh_consistency() {
        let world = small_world();
        let mesh = build_world_mesh(&world, &CategoryColorMapper);

        assert!(!mesh.is_empty());
        assert_eq!(mesh.positions.len(), mesh.normals.len());
        assert_eq!(mesh.positions.len(), mesh.colors.len());
        assert_eq!(mesh.indices.len() % 3, 0);
        for &i in &mesh.indices {
            assert!((i as usize) < mesh.vertex_count());
        }
        for n in &mesh.normals {
            let len = Vec3::from_array(*n).length();
            assert!((len - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_world_mesh_counts_match_parts() {
        let world = small_world();
        let mesh = build_world_mesh(&world, &CategoryColorMapper);

        let tiles = world.tile_meshes();
        let rivers = world.river_meshes();
        let triangles: usize = tiles.iter().map(Mesh::triangle_count).sum::<usize>()
            + rivers.values().map(Mesh::triangle_count).sum::<usize>();
        assert_eq!(mesh.triangle_count(), triangles);
    }

    #[test]
    fn test_river_color_is_used() {
        let world = small_world();
        let marker = [1.0, 0.0, 1.0, 1.0];
        let colors = CustomColorMapper {
            river: marker,
            ..Default::default()
        };
        let mesh = build_world_mesh(&world, &colors);

        let river_vertices: usize = world.river_meshes().values().map(Mesh::vertex_count).sum();
        let marked = mesh.colors.iter().filter(|&&c| c == marker).count();
        assert_eq!(marked, river_vertices);
    }
}
