//! Matching, compositing and orchestration of generation runs

/// Loaded materials and their per-pass usage
pub mod catalog;
/// Tile rendering into output and preview canvases
pub mod compositor;
/// Cooperative yielding and cancellation
pub mod control;
/// Pipeline orchestration and state tracking
pub mod executor;
/// Greedy diversity-aware cell assignment
pub mod matcher;
/// Color and diversity scoring of candidates
pub mod scoring;
