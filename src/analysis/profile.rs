//! Color profile extraction for normalized thumbnails

use crate::analysis::color::{ChannelAccumulator, Rgb};
use crate::io::configuration::PROFILE_FULL_SAMPLE_SIDE;
use crate::io::error::{Result, render_error};
use image::RgbaImage;

/// Summary of a thumbnail's colors used for matching
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorProfile {
    /// Rounded mean color
    pub mean: Rgb,
    /// Combined channel standard deviation, always non-negative
    pub variance: f64,
}

/// Pixel stride used when sampling a thumbnail of the given side
///
/// Small thumbnails skip every other pixel, larger ones are sampled fully.
pub const fn sample_stride(side: u32) -> usize {
    if side >= PROFILE_FULL_SAMPLE_SIDE { 1 } else { 2 }
}

/// Compute the mean color and variance of a thumbnail
///
/// Pixels are visited in row-major order with the stride given by
/// [`sample_stride`]; both statistics use the same samples.
///
/// # Errors
///
/// Returns a render error if the thumbnail has no pixels
pub fn extract_profile(thumbnail: &RgbaImage) -> Result<ColorProfile> {
    let stride = sample_stride(thumbnail.width());
    let mut accumulator = ChannelAccumulator::new();

    for pixel in thumbnail.pixels().step_by(stride) {
        let [r, g, b, _] = pixel.0;
        accumulator.push([r, g, b]);
    }

    let mean = accumulator
        .mean()
        .ok_or_else(|| render_error("profile extraction", &"thumbnail has no pixels"))?;

    Ok(ColorProfile {
        mean,
        variance: accumulator.variance(),
    })
}
