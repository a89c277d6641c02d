//! Generation constants, parameter ranges and runtime configuration defaults

use crate::io::error::{Result, invalid_parameter};
use image::imageops::FilterType;
use std::fmt::Display;
use std::ops::RangeInclusive;
use std::time::Duration;

// Accepted parameter ranges
/// Cells per grid side
pub const GRID_SIZE_RANGE: RangeInclusive<u32> = 20..=200;
/// Preview tile side in pixels
pub const PREVIEW_TILE_SIZE_RANGE: RangeInclusive<u32> = 4..=32;
/// Color matching looseness
pub const COLOR_TOLERANCE_RANGE: RangeInclusive<f64> = 5.0..=80.0;
/// Brightness multiplier
pub const BRIGHTNESS_RANGE: RangeInclusive<f64> = 0.4..=2.0;
/// Contrast multiplier
pub const CONTRAST_RANGE: RangeInclusive<f64> = 0.4..=2.0;
/// Material thumbnail side in pixels
pub const MATERIAL_RESOLUTION_RANGE: RangeInclusive<u32> = 16..=512;
/// Final canvas side in pixels
pub const OUTPUT_RESOLUTION_RANGE: RangeInclusive<u32> = 800..=7680;

/// Hard cap on the output canvas side
pub const MAX_OUTPUT_RESOLUTION: u32 = 7680;
/// Preview canvas side never exceeds this
pub const MAX_PREVIEW_RESOLUTION: u32 = 1200;

// Default values for configurable parameters
/// Default cells per grid side
pub const DEFAULT_GRID_SIZE: u32 = 80;
/// Default preview tile side
pub const DEFAULT_PREVIEW_TILE_SIZE: u32 = 12;
/// Default color tolerance
pub const DEFAULT_COLOR_TOLERANCE: f64 = 30.0;
/// Default brightness multiplier
pub const DEFAULT_BRIGHTNESS: f64 = 1.0;
/// Default contrast multiplier
pub const DEFAULT_CONTRAST: f64 = 1.1;
/// Default material thumbnail side
pub const DEFAULT_MATERIAL_RESOLUTION: u32 = 128;
/// Default output canvas side
pub const DEFAULT_OUTPUT_RESOLUTION: u32 = 3200;

// Normalization
/// Thumbnails at or above this side are resized in two stages
pub const TWO_STAGE_RESIZE_THRESHOLD: u32 = 128;
/// Largest intermediate square used by two-stage resizing
pub const MAX_INTERMEDIATE_SIZE: u32 = 1024;
/// Resampling filter used wherever high quality scaling is required
pub const RESAMPLE_FILTER: FilterType = FilterType::Lanczos3;

// Sampling
/// Thumbnails with at least this side are sampled at every pixel
pub const PROFILE_FULL_SAMPLE_SIDE: u32 = 64;
/// Approximate number of pixels sampled per grid cell before subsampling kicks in
pub const GRID_SAMPLE_BUDGET: usize = 3000;

// Loading
/// Time allowed for an individual image load
pub const LOAD_TIMEOUT: Duration = Duration::from_secs(30);
/// Image file extensions accepted as material sources
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

// Output settings
/// Suffix added to generated mosaic filenames
pub const OUTPUT_SUFFIX: &str = "_mosaic";
/// Suffix added to preview filenames
pub const PREVIEW_SUFFIX: &str = "_preview";

/// Parameters controlling one generation run
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MosaicParameters {
    /// Cells per grid side
    pub grid_size: u32,
    /// Preview tile side in pixels (cosmetic only)
    pub preview_tile_size: u32,
    /// Color matching looseness
    pub color_tolerance: f64,
    /// Brightness multiplier applied to both canvases
    pub brightness: f64,
    /// Contrast multiplier applied to both canvases
    pub contrast: f64,
    /// Material thumbnail side in pixels
    pub material_resolution: u32,
    /// Final canvas side in pixels
    pub output_resolution: u32,
}

impl Default for MosaicParameters {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            preview_tile_size: DEFAULT_PREVIEW_TILE_SIZE,
            color_tolerance: DEFAULT_COLOR_TOLERANCE,
            brightness: DEFAULT_BRIGHTNESS,
            contrast: DEFAULT_CONTRAST,
            material_resolution: DEFAULT_MATERIAL_RESOLUTION,
            output_resolution: DEFAULT_OUTPUT_RESOLUTION,
        }
    }
}

impl MosaicParameters {
    /// Check every field against its accepted range
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` naming the first field outside its range
    pub fn validate(&self) -> Result<()> {
        check_range("grid_size", self.grid_size, &GRID_SIZE_RANGE)?;
        check_range(
            "preview_tile_size",
            self.preview_tile_size,
            &PREVIEW_TILE_SIZE_RANGE,
        )?;
        check_range(
            "color_tolerance",
            self.color_tolerance,
            &COLOR_TOLERANCE_RANGE,
        )?;
        check_range("brightness", self.brightness, &BRIGHTNESS_RANGE)?;
        check_range("contrast", self.contrast, &CONTRAST_RANGE)?;
        check_range(
            "material_resolution",
            self.material_resolution,
            &MATERIAL_RESOLUTION_RANGE,
        )?;
        check_range(
            "output_resolution",
            self.output_resolution,
            &OUTPUT_RESOLUTION_RANGE,
        )
    }

    /// Side of the final output canvas
    pub fn output_side(&self) -> u32 {
        self.output_resolution.min(MAX_OUTPUT_RESOLUTION)
    }

    /// Side of the preview canvas
    pub fn preview_side(&self) -> u32 {
        self.output_resolution.min(MAX_PREVIEW_RESOLUTION)
    }
}

// NaN fails `contains`, so it is rejected along with out-of-range values
fn check_range<T>(parameter: &'static str, value: T, range: &RangeInclusive<T>) -> Result<()>
where
    T: PartialOrd + Display,
{
    if range.contains(&value) {
        Ok(())
    } else {
        Err(invalid_parameter(
            parameter,
            &value,
            &format!("must be between {} and {}", range.start(), range.end()),
        ))
    }
}
