//! Input/output, configuration and error handling

/// Command-line interface and file processing
pub mod cli;
/// Constants, ranges and generation parameters
pub mod configuration;
/// Error types and source attribution
pub mod error;
/// Image decoding and PNG export
pub mod image;
/// Batched material loading with timeouts
pub mod loader;
/// Progress bar management
pub mod progress;
/// Material byte sources
pub mod source;
