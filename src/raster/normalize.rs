//! Square thumbnail normalization

use crate::io::configuration::{MAX_INTERMEDIATE_SIZE, TWO_STAGE_RESIZE_THRESHOLD};
use crate::io::error::{Result, invalid_parameter};
use crate::raster::surface::Surface;
use image::RgbaImage;

/// Side of the intermediate square used before the final downscale
///
/// Large thumbnails go through an intermediate of twice their size (capped)
/// to reduce aliasing from a single large reduction. Small thumbnails are
/// resized directly and return `None`.
pub fn intermediate_side(size: u32) -> Option<u32> {
    (size >= TWO_STAGE_RESIZE_THRESHOLD)
        .then(|| size.saturating_mul(2).min(MAX_INTERMEDIATE_SIZE))
}

/// Produce a `size` x `size` thumbnail preserving the source aspect ratio
///
/// The source is center-cropped to a square on its longer axis, then
/// resized in one or two stages depending on [`intermediate_side`].
///
/// # Errors
///
/// Returns an error if `size` is zero or the image has no pixels
pub fn normalize(image: &RgbaImage, size: u32) -> Result<RgbaImage> {
    if size == 0 {
        return Err(invalid_parameter(
            "size",
            &size,
            &"thumbnail side must be positive",
        ));
    }

    let square = image.crop_square()?;

    match intermediate_side(size) {
        Some(intermediate) => square.resize(intermediate, intermediate)?.resize(size, size),
        None => square.resize(size, size),
    }
}
