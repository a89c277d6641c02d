//! Unit tests mirroring the `src/` layout, one file per source file

use image::{Rgba, RgbaImage};
use photomosaic::algorithm::catalog::{MaterialCatalog, MaterialImage};
use photomosaic::algorithm::control::{CancelToken, RunControl};
use photomosaic::analysis::color::Rgb;
use photomosaic::analysis::profile::extract_profile;
use photomosaic::io::image::encode_png;

mod analysis;
mod spatial;

/// Image of a single color
pub(crate) fn solid(width: u32, height: u32, color: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba(color))
}

/// Square image whose left half is `left` and right half is `right`
pub(crate) fn split(side: u32, left: [u8; 4], right: [u8; 4]) -> RgbaImage {
    RgbaImage::from_fn(side, side, |x, _| {
        if x < side / 2 { Rgba(left) } else { Rgba(right) }
    })
}

/// PNG bytes of `image`
pub(crate) fn png_bytes(image: &RgbaImage) -> photomosaic::Result<Vec<u8>> {
    encode_png(image)
}

/// Opaque material of one color with an 8x8 thumbnail
pub(crate) fn material(source_id: &str, color: [u8; 3]) -> photomosaic::Result<MaterialImage> {
    let [r, g, b] = color;
    let image = solid(16, 16, [r, g, b, 255]);
    let thumbnail = solid(8, 8, [r, g, b, 255]);
    let profile = extract_profile(&thumbnail)?;
    Ok(MaterialImage::new(source_id, image, thumbnail, profile))
}

/// Opaque black and white striped material with nonzero variance
pub(crate) fn textured_material(source_id: &str) -> photomosaic::Result<MaterialImage> {
    let image = split(16, [0, 0, 0, 255], [255, 255, 255, 255]);
    let thumbnail = split(8, [0, 0, 0, 255], [255, 255, 255, 255]);
    let profile = extract_profile(&thumbnail)?;
    Ok(MaterialImage::new(source_id, image, thumbnail, profile))
}

/// Catalog with one solid material per color, named `m0`, `m1`, ...
pub(crate) fn catalog(colors: &[[u8; 3]]) -> photomosaic::Result<MaterialCatalog> {
    let mut catalog = MaterialCatalog::new();
    for (index, &color) in colors.iter().enumerate() {
        catalog.push(material(&format!("m{index}"), color)?);
    }
    Ok(catalog)
}

/// Control that never sleeps and draws no progress
pub(crate) fn quiet_control() -> RunControl {
    RunControl::unpaced(CancelToken::new())
}

/// Opaque color as an `Rgb`
pub(crate) const fn rgb(r: u8, g: u8, b: u8) -> Rgb {
    Rgb::new(r, g, b)
}
