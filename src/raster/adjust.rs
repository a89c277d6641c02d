//! Brightness and contrast adjustment of finished canvases

use image::RgbaImage;
use num_traits::ToPrimitive;
use rayon::prelude::{ParallelIterator, ParallelSliceMut};

/// Midpoint that contrast scales around
const CONTRAST_PIVOT: f64 = 127.5;

/// Adjust a single channel value: brightness scales, then contrast stretches
/// around the midpoint
pub fn adjust_channel(value: u8, brightness: f64, contrast: f64) -> u8 {
    let brightened = f64::from(value) * brightness;
    let contrasted = (brightened - CONTRAST_PIVOT).mul_add(contrast, CONTRAST_PIVOT);
    contrasted
        .round()
        .clamp(0.0, 255.0)
        .to_u8()
        .unwrap_or(u8::MAX)
}

/// Lookup table mapping every channel value through [`adjust_channel`]
pub fn adjustment_table(brightness: f64, contrast: f64) -> [u8; 256] {
    let mut table = [0u8; 256];
    for (value, entry) in (0..=u8::MAX).zip(table.iter_mut()) {
        *entry = adjust_channel(value, brightness, contrast);
    }
    table
}

/// Whether the adjustment leaves every value unchanged
pub fn is_identity(brightness: f64, contrast: f64) -> bool {
    (brightness - 1.0).abs() < f64::EPSILON && (contrast - 1.0).abs() < f64::EPSILON
}

/// Apply brightness then contrast to the color channels of a canvas
///
/// Alpha is left untouched, and fully transparent pixels are skipped.
pub fn apply_brightness_contrast(canvas: &mut RgbaImage, brightness: f64, contrast: f64) {
    if is_identity(brightness, contrast) {
        return;
    }

    let table = adjustment_table(brightness, contrast);
    canvas.par_chunks_mut(4).for_each(|pixel| {
        if pixel.get(3) == Some(&0) {
            return;
        }
        for channel in pixel.iter_mut().take(3) {
            *channel = table.get(usize::from(*channel)).copied().unwrap_or(*channel);
        }
    });
}
