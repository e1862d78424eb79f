//! Minimum-distance random sampling on the unit sphere
//!
//! Points are drawn from uniform spherical coordinates and rejected when a
//! previously accepted point lies closer than the separation radius. Nearby
//! points are found through a 3D voxel grid laid over `[-1, 1]³`: only the
//! candidate's voxel and its 26 neighbors are inspected.
//!
//! # Separation guarantee
//!
//! `min_distance` is the spacing between exclusion zones, so each point keeps
//! a radius of `min_distance / 2` free of other points. Every accepted pair
//! is at least `min_distance / 2` apart in chordal distance, which never
//! exceeds the angular distance.

use std::collections::HashMap;
use std::f32::consts::{PI, TAU};

use glam::Vec3;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::error::{Result, WorldError};

/// Draw budget per requested point
const DRAWS_PER_POINT: usize = 10;

/// Accepted points bucketed by voxel
///
/// The cell width is at least the separation radius, so any point closer
/// than the radius sits in the same or an adjacent voxel.
struct VoxelGrid {
    cells_per_axis: i32,
    radius_sq: f32,
    cells: HashMap<[i32; 3], Vec<Vec3>>,
}

impl VoxelGrid {
    fn new(radius: f32) -> Self {
        Self {
            cells_per_axis: ((2.0 / radius) as i32).max(1),
            radius_sq: radius * radius,
            cells: HashMap::new(),
        }
    }

    fn cell_of(&self, p: Vec3) -> [i32; 3] {
        let axis = |c: f32| ((c + 1.0) / 2.0 * self.cells_per_axis as f32) as i32;
        [axis(p.x), axis(p.y), axis(p.z)]
    }

    /// Whether an accepted point lies within the radius of `p`
    fn is_crowded(&self, p: Vec3, cell: [i32; 3]) -> bool {
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let key = [cell[0] + dx, cell[1] + dy, cell[2] + dz];
                    if let Some(bucket) = self.cells.get(&key) {
                        if bucket.iter().any(|q| q.distance_squared(p) < self.radius_sq) {
                            return true;
                        }
                    }
                }
            }
        }
        false
    }

    fn insert(&mut self, p: Vec3, cell: [i32; 3]) {
        self.cells.entry(cell).or_default().push(p);
    }
}

/// Convert azimuth/polar angles to a unit vector, y up
#[inline]
fn spherical_to_cartesian(azimuth: f32, polar: f32) -> Vec3 {
    Vec3::new(
        azimuth.cos() * polar.sin(),
        polar.cos(),
        azimuth.sin() * polar.sin(),
    )
}

/// Sample `count` unit vectors with a minimum separation
///
/// The two poles `(0, 1, 0)` and `(0, -1, 0)` are always the first two
/// points. The output is fully determined by `seed`.
///
/// # Errors
///
/// - `InvalidConfig` if `count < 2` or `min_distance` is not positive
/// - `SamplingExhausted` if `count * 10` draws do not yield enough points
///
/// # Example
///
/// ```rust
/// use voronoi_world::generation::sample_sphere_points;
///
/// let points = sample_sphere_points(100, 0.3, 0).unwrap();
/// assert_eq!(points.len(), 100);
/// ```
pub fn sample_sphere_points(count: usize, min_distance: f32, seed: u32) -> Result<Vec<Vec3>> {
    if count < 2 {
        return Err(WorldError::InvalidConfig(format!(
            "need at least 2 sample points (got {})",
            count
        )));
    }
    if !(min_distance > 0.0) {
        return Err(WorldError::InvalidConfig(format!(
            "min distance must be positive (got {})",
            min_distance
        )));
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed as u64);
    let mut grid = VoxelGrid::new(min_distance / 2.0);
    let mut points = Vec::with_capacity(count);

    for pole in [Vec3::Y, Vec3::NEG_Y] {
        grid.insert(pole, grid.cell_of(pole));
        points.push(pole);
    }

    let budget = count * DRAWS_PER_POINT;
    let mut draws = 0;
    while points.len() < count {
        if draws >= budget {
            return Err(WorldError::SamplingExhausted {
                requested: count,
                accepted: points.len(),
                draws,
            });
        }
        draws += 1;

        let azimuth: f32 = rng.gen_range(0.0..TAU);
        let polar: f32 = rng.gen_range(0.0..PI);
        let candidate = spherical_to_cartesian(azimuth, polar);

        let cell = grid.cell_of(candidate);
        if grid.is_crowded(candidate, cell) {
            continue;
        }
        grid.insert(candidate, cell);
        points.push(candidate);
    }

    tracing::debug!(
        target: "voronoi_world::sampling",
        count,
        min_distance,
        draws,
        "sampling.done"
    );

    Ok(points)
}
