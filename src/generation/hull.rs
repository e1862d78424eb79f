//! Convex hull of sphere samples
//!
//! For points on a sphere, the 3D convex hull is combinatorially the
//! Delaunay triangulation of the sphere, and its dual is the spherical
//! Voronoi diagram. This module is a thin wrapper around parry3d.

use glam::Vec3;
use parry3d::math::Point;
use parry3d::transformation;

use crate::error::{Result, WorldError};

/// Triangulated convex hull
#[derive(Debug, Clone)]
pub struct Hull {
    /// Hull vertices (may be reordered from the input points)
    pub vertices: Vec<Vec3>,
    /// Triangular faces as indices into `vertices`
    pub faces: Vec<[u32; 3]>,
}

impl Hull {
    /// Centroid of a face (not normalized)
    #[inline]
    pub fn face_center(&self, face: usize) -> Vec3 {
        let [a, b, c] = self.faces[face];
        (self.vertices[a as usize] + self.vertices[b as usize] + self.vertices[c as usize]) / 3.0
    }
}

/// Compute the convex hull of `points`
///
/// # Errors
///
/// Returns `HullConstructionFailed` for fewer than 4 points or when parry3d
/// reports a degenerate input.
pub fn compute_hull(points: &[Vec3]) -> Result<Hull> {
    if points.len() < 4 {
        return Err(WorldError::HullConstructionFailed(format!(
            "need at least 4 points, got {}",
            points.len()
        )));
    }

    let input: Vec<Point<f32>> = points.iter().map(|p| Point::new(p.x, p.y, p.z)).collect();
    let (vertices, faces) = transformation::try_convex_hull(&input)
        .map_err(|e| WorldError::HullConstructionFailed(format!("{:?}", e)))?;

    if faces.len() < 4 {
        return Err(WorldError::HullConstructionFailed(format!(
            "hull has only {} faces",
            faces.len()
        )));
    }

    Ok(Hull {
        vertices: vertices.iter().map(|p| Vec3::new(p.x, p.y, p.z)).collect(),
        faces,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::sampling::sample_sphere_points;

    #[test]
    fn test_tetrahedron_hull() {
        let points = vec![
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(-1.0, -1.0, -1.0),
        ];

        let hull = compute_hull(&points).unwrap();
        assert_eq!(hull.vertices.len(), 4);
        assert_eq!(hull.faces.len(), 4);
    }

    #[test]
    fn test_too_few_points() {
        let points = vec![Vec3::X, Vec3::Y, Vec3::Z];
        assert!(matches!(
            compute_hull(&points),
            Err(WorldError::HullConstructionFailed(_))
        ));
    }

    #[test]
    fn test_sphere_hull_is_triangulated_sphere() {
        let points = sample_sphere_points(200, 0.2, 3).unwrap();
        let hull = compute_hull(&points).unwrap();

        // Euler: every sample is extreme, F = 2V - 4
        assert_eq!(hull.vertices.len(), 200);
        assert_eq!(hull.faces.len(), 2 * 200 - 4);
    }
}
