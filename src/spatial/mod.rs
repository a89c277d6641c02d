//! Spatial data structures
//!
//! This module contains spatial-related functionality including:
//! - Square crop geometry
//! - Grid cells and their construction over the target image
//! - Color-space bucketing of materials

/// Color-space bucketing for candidate search
pub mod buckets;
/// Aspect-preserving crop geometry
pub mod crop;
/// Grid cells and grid construction
pub mod grid;

pub use grid::Grid;
