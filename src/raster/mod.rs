//! Pixel-level operations
//!
//! This module contains raster functionality including:
//! - The pixel buffer abstraction used by every stage
//! - Square thumbnail normalization
//! - Brightness and contrast adjustment

/// Brightness and contrast adjustment
pub mod adjust;
/// Aspect-preserving thumbnail normalization
pub mod normalize;
/// Pixel buffer abstraction
pub mod surface;

pub use surface::Surface;
