//! Color mapping for terrain categories and rivers

use crate::terrain::TerrainCategory;

/// RGBA color type
pub type TerrainColor = [f32; 4];

/// Maps world features to vertex colors
pub trait ColorMapper {
    /// Color of a tile of the given category
    fn category_color(&self, category: TerrainCategory) -> TerrainColor;

    /// Color of river ribbons
    fn river_color(&self) -> TerrainColor;
}

/// Fixed palette
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryColorMapper;

impl ColorMapper for CategoryColorMapper {
    fn category_color(&self, category: TerrainCategory) -> TerrainColor {
        match category {
            TerrainCategory::Sea => [0.1, 0.3, 0.7, 1.0],
            TerrainCategory::Coast => [0.9, 0.8, 0.5, 1.0],
            TerrainCategory::Ground => [0.2, 0.6, 0.2, 1.0],
            TerrainCategory::Mountain => [0.5, 0.45, 0.4, 1.0],
            TerrainCategory::Mountaintop => [0.95, 0.95, 1.0, 1.0],
        }
    }

    fn river_color(&self) -> TerrainColor {
        [0.2, 0.45, 0.85, 1.0]
    }
}

/// Palette with one settable color per category
#[derive(Debug, Clone)]
pub struct CustomColorMapper {
    pub sea: TerrainColor,
    pub coast: TerrainColor,
    pub ground: TerrainColor,
    pub mountain: TerrainColor,
    pub mountaintop: TerrainColor,
    pub river: TerrainColor,
}

impl Default for CustomColorMapper {
    fn default() -> Self {
        let base = CategoryColorMapper;
        Self {
            sea: base.category_color(TerrainCategory::Sea),
            coast: base.category_color(TerrainCategory::Coast),
            ground: base.category_color(TerrainCategory::Ground),
            mountain: base.category_color(TerrainCategory::Mountain),
            mountaintop: base.category_color(TerrainCategory::Mountaintop),
            river: base.river_color(),
        }
    }
}

impl ColorMapper for CustomColorMapper {
    fn category_color(&self, category: TerrainCategory) -> TerrainColor {
        match category {
            TerrainCategory::Sea => self.sea,
            TerrainCategory::Coast => self.coast,
            TerrainCategory::Ground => self.ground,
            TerrainCategory::Mountain => self.mountain,
            TerrainCategory::Mountaintop => self.mountaintop,
        }
    }

    fn river_color(&self) -> TerrainColor {
        self.river
    }
}
