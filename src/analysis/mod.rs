//! Color analysis of thumbnails and target cells

/// Run-scoped memoization of color profiles
pub mod cache;
/// Color types, channel statistics and color distance
pub mod color;
/// Mean color and variance extraction for thumbnails
pub mod profile;
