//! Resolution of material identifiers into raw image bytes

use crate::io::configuration::SUPPORTED_EXTENSIONS;
use crate::io::error::{MosaicError, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Resolves an identifier to the encoded bytes of an image
///
/// Implementations are shared across loader threads.
pub trait MaterialSource: Send + Sync {
    /// Fetch the encoded bytes for `source_id`
    ///
    /// # Errors
    ///
    /// Returns a per-image error if the bytes cannot be obtained
    fn fetch(&self, source_id: &str) -> Result<Vec<u8>>;
}

/// Reads identifiers as paths, optionally relative to a root directory
#[derive(Clone, Debug, Default)]
pub struct FileSource {
    root: Option<PathBuf>,
}

impl FileSource {
    /// Resolve identifiers as given
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve identifiers relative to `root`
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    /// Path an identifier resolves to
    pub fn resolve(&self, source_id: &str) -> PathBuf {
        match &self.root {
            Some(root) => root.join(source_id),
            None => PathBuf::from(source_id),
        }
    }
}

impl MaterialSource for FileSource {
    fn fetch(&self, source_id: &str) -> Result<Vec<u8>> {
        std::fs::read(self.resolve(source_id)).map_err(|source| MosaicError::SourceFetch {
            source_id: source_id.to_string(),
            source,
        })
    }
}

/// Serves bytes registered up front, keyed by identifier
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    images: HashMap<String, Vec<u8>>,
}

impl MemorySource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the bytes served for `source_id`
    pub fn insert(&mut self, source_id: impl Into<String>, bytes: Vec<u8>) {
        self.images.insert(source_id.into(), bytes);
    }

    /// Number of registered images
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

impl MaterialSource for MemorySource {
    fn fetch(&self, source_id: &str) -> Result<Vec<u8>> {
        self.images
            .get(source_id)
            .cloned()
            .ok_or_else(|| MosaicError::MaterialUnavailable {
                source_id: source_id.to_string(),
                reason: "not registered".to_string(),
            })
    }
}

/// Whether `path` has one of the [`SUPPORTED_EXTENSIONS`], ignoring case
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
}

/// Supported image files directly inside `dir`, sorted by path
///
/// # Errors
///
/// Returns a file system error if the directory cannot be read
pub fn collect_material_paths(dir: &Path) -> Result<Vec<PathBuf>> {
    let read_error = |source| MosaicError::FileSystem {
        path: dir.to_path_buf(),
        operation: "read material directory",
        source,
    };

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(read_error)? {
        let path = entry.map_err(read_error)?.path();
        if path.is_file() && is_supported_image(&path) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}
