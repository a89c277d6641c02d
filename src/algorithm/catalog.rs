use crate::analysis::color::Rgb;
use crate::analysis::profile::ColorProfile;
use crate::spatial::grid::GridPosition;
use image::RgbaImage;

/// One candidate image available for placement into grid cells
#[derive(Clone, Debug)]
pub struct MaterialImage {
    /// Identifier the image was loaded from
    pub source_id: String,
    /// Decoded full-resolution image
    pub image: RgbaImage,
    /// Square thumbnail at the configured material resolution
    pub thumbnail: RgbaImage,
    /// Mean color and variance of the thumbnail
    pub profile: ColorProfile,
    /// Cells assigned this material during the current pass
    pub usage_count: u32,
    /// Grid position of the most recent assignment in the current pass
    pub last_used: Option<GridPosition>,
}

impl MaterialImage {
    /// Create an unused material
    pub fn new(
        source_id: impl Into<String>,
        image: RgbaImage,
        thumbnail: RgbaImage,
        profile: ColorProfile,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            image,
            thumbnail,
            profile,
            usage_count: 0,
            last_used: None,
        }
    }

    /// Mean color of the thumbnail
    pub const fn mean_color(&self) -> Rgb {
        self.profile.mean
    }

    /// Color variance of the thumbnail
    pub const fn variance(&self) -> f64 {
        self.profile.variance
    }

    /// Record an assignment at `position`
    pub const fn record_use(&mut self, position: GridPosition) {
        self.usage_count += 1;
        self.last_used = Some(position);
    }

    /// Forget all usage from a previous pass
    pub const fn reset_usage(&mut self) {
        self.usage_count = 0;
        self.last_used = None;
    }
}

/// Summary of how evenly materials were used in a pass
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UsageStats {
    /// Highest usage count
    pub max: u32,
    /// Lowest usage count
    pub min: u32,
    /// Mean usage count
    pub mean: f64,
    /// Sum of usage counts
    pub total: u64,
    /// Materials used at least once
    pub distinct: usize,
}

/// The loaded materials of one generation run
#[derive(Clone, Debug, Default)]
pub struct MaterialCatalog {
    materials: Vec<MaterialImage>,
}

impl MaterialCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a material; its index is the previous length
    pub fn push(&mut self, material: MaterialImage) {
        self.materials.push(material);
    }

    /// Number of materials
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// Whether the catalog has no materials
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Material at `index`
    pub fn get(&self, index: usize) -> Option<&MaterialImage> {
        self.materials.get(index)
    }

    /// Mutable material at `index`
    pub fn get_mut(&mut self, index: usize) -> Option<&mut MaterialImage> {
        self.materials.get_mut(index)
    }

    /// Materials in index order
    pub fn iter(&self) -> std::slice::Iter<'_, MaterialImage> {
        self.materials.iter()
    }

    /// Mean colors in index order
    pub fn mean_colors(&self) -> impl ExactSizeIterator<Item = Rgb> {
        self.materials.iter().map(MaterialImage::mean_color)
    }

    /// Reset usage counters and last-used positions of every material
    pub fn reset_usage(&mut self) {
        self.materials
            .iter_mut()
            .for_each(MaterialImage::reset_usage);
    }

    /// Sum of usage counts across the catalog
    pub fn total_usage(&self) -> u64 {
        self.materials
            .iter()
            .map(|material| u64::from(material.usage_count))
            .sum()
    }

    /// Usage distribution, `None` for an empty catalog
    pub fn usage_stats(&self) -> Option<UsageStats> {
        let max = self.materials.iter().map(|m| m.usage_count).max()?;
        let min = self.materials.iter().map(|m| m.usage_count).min()?;
        let total = self.total_usage();
        let distinct = self.materials.iter().filter(|m| m.usage_count > 0).count();

        Some(UsageStats {
            max,
            min,
            mean: total as f64 / self.materials.len() as f64,
            total,
            distinct,
        })
    }
}

impl<'a> IntoIterator for &'a MaterialCatalog {
    type Item = &'a MaterialImage;
    type IntoIter = std::slice::Iter<'a, MaterialImage>;

    fn into_iter(self) -> Self::IntoIter {
        self.materials.iter()
    }
}
