//! Direction-to-tile lookup
//!
//! This module is only available with the `spatial-index` feature.

use glam::Vec3;
use kiddo::immutable::float::kdtree::ImmutableKdTree;
use kiddo::SquaredEuclidean;

/// KD-tree over tile directions
///
/// Tiles are indexed by their unit direction, not their height-scaled
/// position, so a query only needs to point the right way.
///
/// # Performance
///
/// - Construction: O(n log n)
/// - Query: O(log n)
#[derive(Clone)]
pub struct SpatialIndex {
    tree: ImmutableKdTree<f32, usize, 3, 32>,
}

impl SpatialIndex {
    /// Build the index from tile directions
    ///
    /// Inputs are normalized before insertion.
    ///
    /// # Example
    ///
    /// ```
    /// use voronoi_world::spatial::SpatialIndex;
    /// use glam::Vec3;
    ///
    /// let directions = vec![Vec3::X, Vec3::Y, Vec3::Z];
    /// let index = SpatialIndex::new(&directions);
    /// assert_eq!(index.find_nearest(Vec3::new(1.0, 0.1, 0.0)), 0);
    /// ```
    pub fn new(directions: &[Vec3]) -> Self {
        let points: Vec<[f32; 3]> = directions
            .iter()
            .map(|d| d.normalize_or_zero().to_array())
            .collect();

        Self {
            tree: ImmutableKdTree::new_from_slice(&points),
        }
    }

    /// Index of the tile whose direction is closest to `direction`
    ///
    /// `direction` must already be normalized.
    pub fn find_nearest(&self, direction: Vec3) -> usize {
        let result = self.tree.nearest_one::<SquaredEuclidean>(&direction.to_array());
        result.item as usize
    }
}
