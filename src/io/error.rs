//! Error types and context management for mosaic generation

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Placeholder used until the failing source is known
const UNKNOWN_SOURCE: &str = "<unknown>";

/// Main error type for all mosaic operations
#[derive(Debug)]
pub enum MosaicError {
    /// Image bytes could not be decoded
    ImageDecode {
        /// Identifier of the image source
        source_id: String,
        /// Underlying decoding error
        source: image::ImageError,
    },

    /// Image bytes could not be fetched from their source
    SourceFetch {
        /// Identifier of the image source
        source_id: String,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// An individual image load exceeded its time allowance
    LoadTimeout {
        /// Identifier of the image source
        source_id: String,
        /// Time allowed for the load
        timeout: Duration,
    },

    /// An individual image could not be produced for another reason
    MaterialUnavailable {
        /// Identifier of the image source
        source_id: String,
        /// Description of what went wrong
        reason: String,
    },

    /// The target image could not be loaded, so no mosaic is possible
    TargetLoad {
        /// The per-image failure that caused it
        cause: Box<MosaicError>,
    },

    /// Every material source failed to load
    NoMaterials {
        /// Number of material sources that were attempted
        attempted: usize,
    },

    /// A destination surface could not be allocated or drawn into
    Render {
        /// Name of the drawing operation that failed
        operation: &'static str,
        /// Description of the failure
        reason: String,
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// The run was cancelled at a checkpoint
    Cancelled {
        /// Stage that observed the cancellation
        stage: &'static str,
    },

    /// Encoding the finished mosaic failed
    Encode {
        /// Underlying encoder error
        source: image::ImageError,
    },

    /// Failed to save a generated image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl MosaicError {
    /// Whether this error only affects a single image and the run may continue
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::ImageDecode { .. }
                | Self::SourceFetch { .. }
                | Self::LoadTimeout { .. }
                | Self::MaterialUnavailable { .. }
        )
    }

    /// Identifier of the image this error concerns, if any
    pub fn source_id(&self) -> Option<&str> {
        match self {
            Self::ImageDecode { source_id, .. }
            | Self::SourceFetch { source_id, .. }
            | Self::LoadTimeout { source_id, .. }
            | Self::MaterialUnavailable { source_id, .. } => Some(source_id),
            Self::TargetLoad { cause } => cause.source_id(),
            _ => None,
        }
    }
}

impl fmt::Display for MosaicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImageDecode { source_id, source } => {
                write!(f, "Failed to decode image '{source_id}': {source}")
            }
            Self::SourceFetch { source_id, source } => {
                write!(f, "Failed to fetch image '{source_id}': {source}")
            }
            Self::LoadTimeout { source_id, timeout } => {
                write!(
                    f,
                    "Timed out loading image '{source_id}' after {:.1}s",
                    timeout.as_secs_f64()
                )
            }
            Self::MaterialUnavailable { source_id, reason } => {
                write!(f, "Image '{source_id}' is unavailable: {reason}")
            }
            Self::TargetLoad { cause } => write!(f, "Target image could not be loaded: {cause}"),
            Self::NoMaterials { attempted } => {
                write!(
                    f,
                    "No material images could be loaded ({attempted} sources attempted)"
                )
            }
            Self::Render { operation, reason } => {
                write!(f, "Render error in {operation}: {reason}")
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::Cancelled { stage } => write!(f, "Generation cancelled during {stage}"),
            Self::Encode { source } => write!(f, "Failed to encode mosaic: {source}"),
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for MosaicError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageDecode { source, .. }
            | Self::Encode { source }
            | Self::ImageExport { source, .. } => Some(source),
            Self::SourceFetch { source, .. } | Self::FileSystem { source, .. } => Some(source),
            Self::TargetLoad { cause } => Some(cause.as_ref()),
            _ => None,
        }
    }
}

/// Convenience type alias for mosaic results
pub type Result<T> = std::result::Result<T, MosaicError>;

/// Attaches the identity of the image being processed to per-image errors
pub trait WithSource<T> {
    /// Replace an unknown source identifier with `source_id`
    ///
    /// # Errors
    ///
    /// Propagates the original error with the source identifier applied
    fn for_source(self, source_id: &str) -> Result<T>;
}

impl<T, E> WithSource<T> for std::result::Result<T, E>
where
    E: Into<MosaicError>,
{
    fn for_source(self, source_id: &str) -> Result<T> {
        self.map_err(|e| {
            let mut error = e.into();
            match &mut error {
                MosaicError::ImageDecode { source_id: id, .. }
                | MosaicError::SourceFetch { source_id: id, .. }
                | MosaicError::LoadTimeout { source_id: id, .. }
                | MosaicError::MaterialUnavailable { source_id: id, .. }
                    if id.as_str() == UNKNOWN_SOURCE =>
                {
                    *id = source_id.to_string();
                }
                _ => {}
            }
            error
        })
    }
}

impl From<image::ImageError> for MosaicError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageDecode {
            source_id: UNKNOWN_SOURCE.to_string(),
            source: err,
        }
    }
}

impl From<std::io::Error> for MosaicError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from(UNKNOWN_SOURCE),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> MosaicError {
    MosaicError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a render error
pub fn render_error(operation: &'static str, reason: &impl ToString) -> MosaicError {
    MosaicError::Render {
        operation,
        reason: reason.to_string(),
    }
}
