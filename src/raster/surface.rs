//! Pixel buffer operations shared by the normalizer, grid builder and compositor
//!
//! Algorithm code only talks to pixels through [`Surface`], keeping the
//! choice of imaging library in one place.

use crate::analysis::color::{ChannelAccumulator, Rgb};
use crate::io::configuration::RESAMPLE_FILTER;
use crate::io::error::{Result, render_error};
use crate::spatial::crop::CropRegion;
use crate::spatial::grid::CellBounds;
use image::{RgbaImage, imageops};

/// Drawing primitives over an RGBA pixel buffer
pub trait Surface: Sized {
    /// Center-crop to the largest square that fits
    ///
    /// # Errors
    ///
    /// Returns a render error if the buffer has no pixels
    fn crop_square(&self) -> Result<Self>;

    /// Crop an explicit square region
    ///
    /// # Errors
    ///
    /// Returns a render error if the region is empty or exceeds the buffer
    fn crop_region(&self, region: CropRegion) -> Result<Self>;

    /// Resample to `width` x `height` with high quality filtering
    ///
    /// # Errors
    ///
    /// Returns a render error if either the source or target is empty
    fn resize(&self, width: u32, height: u32) -> Result<Self>;

    /// Resample a square region straight to `width` x `height` without
    /// copying the region first
    ///
    /// # Errors
    ///
    /// Returns a render error if the region is empty or exceeds the buffer, or
    /// the target is empty
    fn resize_region(&self, region: CropRegion, width: u32, height: u32) -> Result<Self>;

    /// Mean color of a region, visiting every `stride`-th pixel in row-major order
    ///
    /// Returns `None` if the region is empty or lies outside the buffer.
    fn sample_mean_color(&self, region: &CellBounds, stride: usize) -> Option<Rgb>;

    /// Copy `source` into this buffer with its top-left corner at (`x`, `y`)
    ///
    /// # Errors
    ///
    /// Returns a render error if `source` does not fit entirely
    fn blit(&mut self, source: &Self, x: u32, y: u32) -> Result<()>;
}

impl Surface for RgbaImage {
    fn crop_square(&self) -> Result<Self> {
        self.crop_region(CropRegion::centered_square(self.width(), self.height()))
    }

    fn crop_region(&self, region: CropRegion) -> Result<Self> {
        check_region(self, region, "crop")?;
        Ok(imageops::crop_imm(self, region.x, region.y, region.side, region.side).to_image())
    }

    fn resize(&self, width: u32, height: u32) -> Result<Self> {
        if self.width() == 0 || self.height() == 0 || width == 0 || height == 0 {
            return Err(render_error(
                "resize",
                &format!(
                    "cannot resample {}x{} to {width}x{height}",
                    self.width(),
                    self.height()
                ),
            ));
        }
        if self.dimensions() == (width, height) {
            return Ok(self.clone());
        }
        Ok(imageops::resize(self, width, height, RESAMPLE_FILTER))
    }

    fn resize_region(&self, region: CropRegion, width: u32, height: u32) -> Result<Self> {
        check_region(self, region, "resize")?;
        if width == 0 || height == 0 {
            return Err(render_error(
                "resize",
                &format!("cannot resample a {}px region to {width}x{height}", region.side),
            ));
        }

        let view = imageops::crop_imm(self, region.x, region.y, region.side, region.side);
        if (region.side, region.side) == (width, height) {
            return Ok(view.to_image());
        }
        Ok(imageops::resize(&*view, width, height, RESAMPLE_FILTER))
    }

    fn sample_mean_color(&self, region: &CellBounds, stride: usize) -> Option<Rgb> {
        if region.is_empty() || region.right() > self.width() || region.bottom() > self.height()
        {
            return None;
        }

        let mut accumulator = ChannelAccumulator::new();
        let width = u64::from(region.width);

        for index in (0..region.area()).step_by(stride.max(1)) {
            let x = region.x + (index % width) as u32;
            let y = region.y + (index / width) as u32;
            let [r, g, b, _] = self.get_pixel(x, y).0;
            accumulator.push([r, g, b]);
        }

        accumulator.mean()
    }

    fn blit(&mut self, source: &Self, x: u32, y: u32) -> Result<()> {
        let fits = u64::from(x) + u64::from(source.width()) <= u64::from(self.width())
            && u64::from(y) + u64::from(source.height()) <= u64::from(self.height());
        if !fits {
            return Err(render_error(
                "blit",
                &format!(
                    "{}x{} tile at ({x}, {y}) exceeds {}x{} canvas",
                    source.width(),
                    source.height(),
                    self.width(),
                    self.height()
                ),
            ));
        }
        imageops::replace(self, source, i64::from(x), i64::from(y));
        Ok(())
    }
}

fn check_region(image: &RgbaImage, region: CropRegion, operation: &'static str) -> Result<()> {
    let fits = u64::from(region.x) + u64::from(region.side) <= u64::from(image.width())
        && u64::from(region.y) + u64::from(region.side) <= u64::from(image.height());
    if region.is_empty() || !fits {
        return Err(render_error(
            operation,
            &format!(
                "region {}x{} at ({}, {}) does not fit a {}x{} image",
                region.side,
                region.side,
                region.x,
                region.y,
                image.width(),
                image.height()
            ),
        ));
    }
    Ok(())
}
