//! World configuration and builder
//!
//! A [`WorldConfig`] fully determines a generated world: the same config
//! always produces the same graph, categories and rivers.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, WorldError};

/// World size presets
///
/// Each preset pairs a node count with a sampling distance that the point
/// sampler can satisfy within its draw budget.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum WorldSize {
    /// ~1,000 tiles
    Tiny,
    /// ~5,000 tiles
    Small,
    /// ~10,000 tiles (default)
    #[default]
    Medium,
    /// ~20,000 tiles
    Large,
    /// Explicit node count and sampling distance
    Custom {
        /// Number of tiles to generate
        node_count: usize,
        /// Minimum sampling distance on the unit sphere
        min_distance: f32,
    },
}

impl WorldSize {
    /// Number of tiles for this size
    pub fn node_count(self) -> usize {
        match self {
            WorldSize::Tiny => 1_000,
            WorldSize::Small => 5_000,
            WorldSize::Medium => 10_000,
            WorldSize::Large => 20_000,
            WorldSize::Custom { node_count, .. } => node_count,
        }
    }

    /// Sampling distance for this size
    ///
    /// Scales with `1 / sqrt(node_count)` so tile density stays comparable.
    pub fn min_distance(self) -> f32 {
        match self {
            WorldSize::Tiny => 0.075,
            WorldSize::Small => 0.035,
            WorldSize::Medium => 0.025,
            WorldSize::Large => 0.017,
            WorldSize::Custom { min_distance, .. } => min_distance,
        }
    }

    /// Human-readable name
    pub fn name(self) -> &'static str {
        match self {
            WorldSize::Tiny => "Tiny",
            WorldSize::Small => "Small",
            WorldSize::Medium => "Medium",
            WorldSize::Large => "Large",
            WorldSize::Custom { .. } => "Custom",
        }
    }
}

/// Configuration for deterministic world generation
///
/// # Example
///
/// ```rust
/// use voronoi_world::*;
///
/// let config = WorldConfigBuilder::new()
///     .seed(42)
///     .size(WorldSize::Tiny)
///     .river_count(20)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.node_count(), 1_000);
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldConfig {
    /// Seed shared by every random stage (sampling, noise offset, rivers)
    pub seed: u32,

    /// Tile count and sampling distance
    pub size: WorldSize,

    /// Number of re-hull relaxation passes
    ///
    /// - 0: raw random layout (irregular tiles)
    /// - 2: default, evens out tile sizes
    pub relaxation_iterations: usize,

    /// Target fraction of tiles classified as sea
    ///
    /// Values `<= 0` leave every tile dry, values `>= 1` flood everything.
    pub water_percentage: f32,

    /// Target fraction of highest tiles classified as mountains
    pub mountain_percentage: f32,

    /// Target fraction of highest tiles classified as mountaintops
    pub mountaintop_percentage: f32,

    /// Number of rivers to grow
    pub river_count: usize,
}

impl WorldConfig {
    /// Number of tiles to generate
    #[inline]
    pub fn node_count(&self) -> usize {
        self.size.node_count()
    }

    /// Minimum sampling distance
    #[inline]
    pub fn min_distance(&self) -> f32 {
        self.size.min_distance()
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            size: WorldSize::default(),
            relaxation_iterations: 2,
            water_percentage: 0.5,
            mountain_percentage: 0.2,
            mountaintop_percentage: 0.05,
            river_count: 200,
        }
    }
}

/// Builder for [`WorldConfig`] with validation
///
/// Percentages are never rejected: out-of-range values fall back to the
/// classifier's sentinel behavior.
#[derive(Debug, Clone)]
pub struct WorldConfigBuilder {
    seed: Option<u32>,
    size: WorldSize,
    relaxation_iterations: usize,
    water_percentage: f32,
    mountain_percentage: f32,
    mountaintop_percentage: f32,
    river_count: usize,
}

impl WorldConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - seed: random
    /// - size: Medium (10,000 tiles, distance 0.025)
    /// - relaxation_iterations: 2
    /// - water 0.5, mountains 0.2, mountaintops 0.05
    /// - river_count: 200
    pub fn new() -> Self {
        let defaults = WorldConfig::default();
        Self {
            seed: None,
            size: defaults.size,
            relaxation_iterations: defaults.relaxation_iterations,
            water_percentage: defaults.water_percentage,
            mountain_percentage: defaults.mountain_percentage,
            mountaintop_percentage: defaults.mountaintop_percentage,
            river_count: defaults.river_count,
        }
    }

    /// Set the random seed
    pub fn seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the world size preset
    pub fn size(mut self, size: WorldSize) -> Self {
        self.size = size;
        self
    }

    /// Set the number of relaxation passes
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if iterations > 20
    pub fn relaxation_iterations(mut self, iterations: usize) -> Result<Self> {
        if iterations > 20 {
            return Err(WorldError::InvalidConfig(format!(
                "relaxation iterations must be <= 20 (got {})",
                iterations
            )));
        }
        self.relaxation_iterations = iterations;
        Ok(self)
    }

    /// Set the target sea coverage
    pub fn water_percentage(mut self, percentage: f32) -> Self {
        self.water_percentage = percentage;
        self
    }

    /// Set the target mountain coverage
    pub fn mountain_percentage(mut self, percentage: f32) -> Self {
        self.mountain_percentage = percentage;
        self
    }

    /// Set the target mountaintop coverage
    pub fn mountaintop_percentage(mut self, percentage: f32) -> Self {
        self.mountaintop_percentage = percentage;
        self
    }

    /// Set the number of rivers
    pub fn river_count(mut self, count: usize) -> Self {
        self.river_count = count;
        self
    }

    /// Build the configuration
    ///
    /// If no seed was provided, a random one is drawn.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for fewer than 4 tiles, a non-positive
    /// distance, or a NaN percentage.
    pub fn build(self) -> Result<WorldConfig> {
        let node_count = self.size.node_count();
        if node_count < 4 {
            return Err(WorldError::InvalidConfig(format!(
                "node count must be >= 4 (got {})",
                node_count
            )));
        }
        let min_distance = self.size.min_distance();
        if !(min_distance > 0.0) {
            return Err(WorldError::InvalidConfig(format!(
                "min distance must be positive (got {})",
                min_distance
            )));
        }
        if self.water_percentage.is_nan()
            || self.mountain_percentage.is_nan()
            || self.mountaintop_percentage.is_nan()
        {
            return Err(WorldError::InvalidConfig("percentages must not be NaN".into()));
        }

        Ok(WorldConfig {
            seed: self.seed.unwrap_or_else(rand::random),
            size: self.size,
            relaxation_iterations: self.relaxation_iterations,
            water_percentage: self.water_percentage,
            mountain_percentage: self.mountain_percentage,
            mountaintop_percentage: self.mountaintop_percentage,
            river_count: self.river_count,
        })
    }
}

impl Default for WorldConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_presets() {
        assert_eq!(WorldSize::Tiny.node_count(), 1_000);
        assert_eq!(WorldSize::Medium.node_count(), 10_000);
        assert_eq!(WorldSize::Medium.min_distance(), 0.025);
        assert_eq!(WorldSize::default(), WorldSize::Medium);
    }

    #[test]
    fn test_size_custom() {
        let custom = WorldSize::Custom {
            node_count: 100,
            min_distance: 0.3,
        };
        assert_eq!(custom.node_count(), 100);
        assert_eq!(custom.min_distance(), 0.3);
        assert_eq!(custom.name(), "Custom");
    }

    #[test]
    fn test_builder_defaults() {
        let config = WorldConfigBuilder::new().seed(7).build().unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.node_count(), 10_000);
        assert_eq!(config.relaxation_iterations, 2);
        assert_eq!(config.water_percentage, 0.5);
        assert_eq!(config.mountain_percentage, 0.2);
        assert_eq!(config.mountaintop_percentage, 0.05);
        assert_eq!(config.river_count, 200);
    }

    #[test]
    fn test_builder_custom() {
        let config = WorldConfigBuilder::new()
            .seed(42)
            .size(WorldSize::Small)
            .relaxation_iterations(3)
            .unwrap()
            .water_percentage(0.7)
            .river_count(0)
            .build()
            .unwrap();

        assert_eq!(config.size, WorldSize::Small);
        assert_eq!(config.relaxation_iterations, 3);
        assert_eq!(config.water_percentage, 0.7);
        assert_eq!(config.river_count, 0);
    }

    #[test]
    fn test_builder_too_many_iterations() {
        assert!(WorldConfigBuilder::new().relaxation_iterations(21).is_err());
    }

    #[test]
    fn test_builder_rejects_bad_size() {
        let result = WorldConfigBuilder::new()
            .size(WorldSize::Custom {
                node_count: 3,
                min_distance: 0.1,
            })
            .build();
        assert!(matches!(result, Err(WorldError::InvalidConfig(_))));

        let result = WorldConfigBuilder::new()
            .size(WorldSize::Custom {
                node_count: 100,
                min_distance: 0.0,
            })
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_out_of_range_percentages_are_accepted() {
        let config = WorldConfigBuilder::new()
            .seed(1)
            .water_percentage(1.5)
            .mountain_percentage(-0.2)
            .build()
            .unwrap();
        assert_eq!(config.water_percentage, 1.5);
        assert_eq!(config.mountain_percentage, -0.2);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_serialization() {
        let config = WorldConfigBuilder::new()
            .seed(12345)
            .size(WorldSize::Tiny)
            .build()
            .unwrap();

        let json = serde_json::to_string(&config).unwrap();
        let restored: WorldConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, restored);
    }
}
