//! Batched, time-limited loading of material images into a catalog
//!
//! Each batch loads its images concurrently, one thread per image, and waits
//! for them up to the load timeout. Images that fail to fetch, decode or
//! normalize in time are logged and dropped; the run only fails when nothing
//! loads at all.

use crate::algorithm::catalog::{MaterialCatalog, MaterialImage};
use crate::algorithm::control::RunControl;
use crate::analysis::cache::{ProfileCache, ProfileKey};
use crate::analysis::profile::extract_profile;
use crate::io::configuration::LOAD_TIMEOUT;
use crate::io::error::{MosaicError, Result, WithSource};
use crate::io::image::decode_image;
use crate::io::progress::ProgressManager;
use crate::io::source::MaterialSource;
use crate::raster::normalize::normalize;
use image::RgbaImage;
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Images loaded concurrently per batch for the given thumbnail resolution
pub fn loading_batch_size(material_resolution: u32) -> usize {
    let scale = f64::from(material_resolution.max(1)) / 32.0;
    (30.0 / scale).floor().clamp(3.0, 8.0) as usize
}

/// Pause after each loading batch for the given thumbnail resolution
pub fn loading_pause(material_resolution: u32) -> Duration {
    Duration::from_millis(u64::from((material_resolution / 16).max(3)))
}

/// A fetched and normalized material, not yet profiled
#[derive(Clone, Debug)]
pub struct DecodedMaterial {
    /// Identifier the bytes were fetched with
    pub source_id: String,
    /// Full-resolution image
    pub image: RgbaImage,
    /// Square thumbnail
    pub thumbnail: RgbaImage,
}

/// Counts from populating a catalog
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Sources requested
    pub attempted: usize,
    /// Materials added to the catalog
    pub loaded: usize,
    /// Sources dropped after a per-image failure
    pub failed: usize,
}

/// Fetch, decode and normalize one material
///
/// # Errors
///
/// Returns a per-image error naming `source_id`
pub fn decode_material(
    source: &dyn MaterialSource,
    source_id: &str,
    resolution: u32,
) -> Result<DecodedMaterial> {
    let bytes = source.fetch(source_id).for_source(source_id)?;
    let image = decode_image(&bytes).for_source(source_id)?;
    let thumbnail = normalize(&image, resolution).map_err(|e| MosaicError::MaterialUnavailable {
        source_id: source_id.to_string(),
        reason: e.to_string(),
    })?;

    Ok(DecodedMaterial {
        source_id: source_id.to_string(),
        image,
        thumbnail,
    })
}

/// Loads materials from a [`MaterialSource`] at a fixed thumbnail resolution
#[derive(Clone)]
pub struct MaterialLoader {
    source: Arc<dyn MaterialSource>,
    resolution: u32,
    timeout: Duration,
}

impl MaterialLoader {
    /// Create a loader with the default per-image timeout
    pub const fn new(source: Arc<dyn MaterialSource>, resolution: u32) -> Self {
        Self {
            source,
            resolution,
            timeout: LOAD_TIMEOUT,
        }
    }

    /// Override the per-image timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Per-image timeout in effect
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Load one batch concurrently, returning results in input order
    ///
    /// Every image in the batch starts at the same time, so a shared deadline
    /// gives each one the full timeout. Threads still running at the deadline
    /// are abandoned and their results discarded.
    pub fn load_batch(&self, source_ids: &[String]) -> Vec<Result<DecodedMaterial>> {
        let (sender, receiver) = mpsc::channel();
        let mut slots: Vec<Option<Result<DecodedMaterial>>> =
            source_ids.iter().map(|_| None).collect();
        let mut pending = 0usize;

        for (index, source_id) in source_ids.iter().enumerate() {
            let sender = sender.clone();
            let source = Arc::clone(&self.source);
            let id = source_id.clone();
            let resolution = self.resolution;

            let spawned = std::thread::Builder::new()
                .name(format!("load-{index}"))
                .spawn(move || {
                    let result = decode_material(source.as_ref(), &id, resolution);
                    // The receiver is gone once the batch has timed out
                    let _ = sender.send((index, result));
                });

            match spawned {
                Ok(_) => pending += 1,
                Err(e) => {
                    if let Some(slot) = slots.get_mut(index) {
                        *slot = Some(Err(MosaicError::MaterialUnavailable {
                            source_id: source_id.clone(),
                            reason: format!("could not start loader thread: {e}"),
                        }));
                    }
                }
            }
        }
        drop(sender);

        let deadline = Instant::now() + self.timeout;
        let mut timed_out = false;
        while pending > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match receiver.recv_timeout(remaining) {
                Ok((index, result)) => {
                    if let Some(slot) = slots.get_mut(index) {
                        *slot = Some(result);
                    }
                    pending -= 1;
                }
                Err(RecvTimeoutError::Timeout) => {
                    timed_out = true;
                    break;
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        slots
            .into_iter()
            .zip(source_ids)
            .map(|(slot, source_id)| {
                slot.unwrap_or_else(|| {
                    Err(if timed_out {
                        MosaicError::LoadTimeout {
                            source_id: source_id.clone(),
                            timeout: self.timeout,
                        }
                    } else {
                        MosaicError::MaterialUnavailable {
                            source_id: source_id.clone(),
                            reason: "loader thread exited without a result".to_string(),
                        }
                    })
                })
            })
            .collect()
    }

    /// Resolve every source into a profiled material
    ///
    /// Catalog order follows `source_ids`, skipping failures. Profiles go
    /// through `cache`, keyed by source and resolution.
    ///
    /// # Errors
    ///
    /// Returns `NoMaterials` if nothing loaded, or `Cancelled` if the run is
    /// cancelled between batches
    pub fn load_catalog(
        &self,
        source_ids: &[String],
        cache: &mut ProfileCache,
        control: &RunControl,
    ) -> Result<(MaterialCatalog, LoadSummary)> {
        let batch_size = loading_batch_size(self.resolution);
        let pause = loading_pause(self.resolution);
        info!(
            "Loading {} materials at {}x{} in batches of {batch_size}",
            source_ids.len(),
            self.resolution,
            self.resolution
        );

        let bar = control
            .progress()
            .begin_stage("loading", source_ids.len() as u64);
        let mut catalog = MaterialCatalog::new();
        let mut summary = LoadSummary {
            attempted: source_ids.len(),
            ..LoadSummary::default()
        };

        for batch in source_ids.chunks(batch_size) {
            control.ensure_active("loading")?;

            for result in self.load_batch(batch) {
                match result.and_then(|decoded| self.profile(decoded, cache)) {
                    Ok(material) => {
                        catalog.push(material);
                        summary.loaded += 1;
                    }
                    Err(e) => {
                        warn!("Skipping material: {e}");
                        summary.failed += 1;
                    }
                }
            }
            bar.inc(batch.len() as u64);

            control.pause("loading", pause)?;
        }
        ProgressManager::finish_stage(&bar, &format!("{} loaded", summary.loaded));

        debug!(
            "Profile cache: {} hits, {} misses",
            cache.stats.hits, cache.stats.misses
        );

        if catalog.is_empty() {
            return Err(MosaicError::NoMaterials {
                attempted: summary.attempted,
            });
        }

        info!(
            "Loaded {} of {} materials at {}x{}",
            summary.loaded, summary.attempted, self.resolution, self.resolution
        );
        Ok((catalog, summary))
    }

    fn profile(&self, decoded: DecodedMaterial, cache: &mut ProfileCache) -> Result<MaterialImage> {
        let key = ProfileKey::new(decoded.source_id.as_str(), self.resolution);
        let profile = cache
            .get_or_compute(key, || extract_profile(&decoded.thumbnail))
            .map_err(|e| MosaicError::MaterialUnavailable {
                source_id: decoded.source_id.clone(),
                reason: e.to_string(),
            })?;

        Ok(MaterialImage::new(
            decoded.source_id,
            decoded.image,
            decoded.thumbnail,
            profile,
        ))
    }
}
