//! Photomosaic generation from a target image and a library of material images
//!
//! The target is divided into a square grid, each cell is assigned the
//! material whose mean color matches best while penalizing repetition, and
//! the assignments are composited at full output resolution and as a
//! low-resolution preview.

#![forbid(unsafe_code)]

/// Matching, compositing and pipeline orchestration
pub mod algorithm;
/// Color statistics and profile caching
pub mod analysis;
/// Input/output operations, configuration and error handling
pub mod io;
/// Pixel buffer operations and thumbnail normalization
pub mod raster;
/// Grid geometry, crop regions and color bucketing
pub mod spatial;

pub use io::error::{MosaicError, Result};
