//! Decoding of source images and PNG export of finished canvases

use crate::io::error::{MosaicError, Result};
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;
use std::path::Path;

/// Decode encoded image bytes of any supported format into RGBA
///
/// # Errors
///
/// Returns `ImageDecode` if the format is unknown or the data is corrupt;
/// the source identifier is left unknown for the caller to fill in
pub fn decode_image(bytes: &[u8]) -> Result<RgbaImage> {
    let decoded = image::load_from_memory(bytes)?;
    Ok(decoded.to_rgba8())
}

/// Encode a canvas as PNG bytes
///
/// # Errors
///
/// Returns `Encode` if the encoder rejects the canvas
pub fn encode_png(canvas: &RgbaImage) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    canvas
        .write_to(&mut buffer, ImageFormat::Png)
        .map_err(|source| MosaicError::Encode { source })?;
    Ok(buffer.into_inner())
}

/// Save a canvas as a PNG file, creating parent directories as needed
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created or the image
/// cannot be written
pub fn save_png(canvas: &RgbaImage, path: &Path) -> Result<()> {
    create_parent(path)?;
    canvas
        .save_with_format(path, ImageFormat::Png)
        .map_err(|source| MosaicError::ImageExport {
            path: path.to_path_buf(),
            source,
        })
}

/// Write already-encoded bytes to `path`, creating parent directories as needed
///
/// # Errors
///
/// Returns a file system error if the directory or file cannot be written
pub fn write_bytes(bytes: &[u8], path: &Path) -> Result<()> {
    create_parent(path)?;
    std::fs::write(path, bytes).map_err(|source| MosaicError::FileSystem {
        path: path.to_path_buf(),
        operation: "write image",
        source,
    })
}

fn create_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|source| MosaicError::FileSystem {
                path: parent.to_path_buf(),
                operation: "create directory",
                source,
            })
        }
        _ => Ok(()),
    }
}
