//! Diversity-aware assignment of materials to grid cells
//!
//! Cells are visited in grid order. Each one scores a bounded slice of
//! color-nearby candidates on color accuracy and diversity, takes the best,
//! and updates that material's usage before the next cell is scored. The
//! result is a greedy, order-dependent assignment rather than a global
//! optimum.

use crate::algorithm::catalog::{MaterialCatalog, UsageStats};
use crate::algorithm::scoring::{
    color_score, diversity_score, min_reuse_distance, search_limit, total_score,
};
use crate::analysis::color::color_distance;
use crate::io::error::{MosaicError, Result};
use crate::spatial::buckets::{CandidateTier, ColorBuckets};
use crate::spatial::grid::{Grid, GridCell};
use tracing::{debug, info};

/// Matching parameters for one pass
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatchConfig {
    /// Color matching looseness
    pub color_tolerance: f64,
    /// Cells per grid side, used for the reuse distance
    pub grid_size: u32,
}

/// Outcome of a matching pass
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatchReport {
    /// Cells assigned
    pub cells: usize,
    /// Bucket width used for the color hash
    pub bucket_width: u32,
    /// Cells whose candidates came from their own bucket
    pub bucket_hits: usize,
    /// Cells whose candidates came from neighboring buckets
    pub neighborhood_hits: usize,
    /// Cells that fell back to the whole catalog
    pub catalog_fallbacks: usize,
    /// Usage distribution after the pass
    pub usage: UsageStats,
}

/// Pick the best candidate for `cell`
///
/// Only the first [`search_limit`] candidates are scored. Ties keep the
/// earlier candidate. Returns `None` when `candidates` is empty.
pub fn select_best(
    cell: &GridCell,
    candidates: &[usize],
    catalog: &MaterialCatalog,
    config: MatchConfig,
) -> Option<usize> {
    let min_distance = min_reuse_distance(config.grid_size);
    let limit = search_limit(candidates.len(), catalog.len());

    let mut best: Option<(usize, f64)> = None;
    for &index in candidates.iter().take(limit) {
        let Some(material) = catalog.get(index) else {
            continue;
        };

        let distance = color_distance(cell.mean_color, material.mean_color());
        let score = total_score(
            color_score(distance, config.color_tolerance),
            diversity_score(material, cell.position, min_distance),
        );

        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((index, score));
        }
    }

    best.map(|(index, _)| index)
}

/// Assign exactly one material to every cell of `grid`
///
/// Usage counters are reset first, so each pass starts from a clean slate.
///
/// # Errors
///
/// Returns `NoMaterials` if the catalog is empty
pub fn match_materials(
    grid: &mut Grid,
    catalog: &mut MaterialCatalog,
    config: MatchConfig,
) -> Result<MatchReport> {
    if catalog.is_empty() {
        return Err(MosaicError::NoMaterials { attempted: 0 });
    }

    catalog.reset_usage();
    let buckets = ColorBuckets::new(catalog.mean_colors());
    debug!(
        "Bucketed {} materials into {} buckets of width {}",
        catalog.len(),
        buckets.occupied(),
        buckets.width()
    );

    let mut tiers = [0usize; 3];
    let mut cells = 0;

    for cell in grid.cells_mut() {
        let candidates = buckets.candidates(cell.mean_color);
        let tier_slot = match candidates.tier {
            CandidateTier::Bucket => 0,
            CandidateTier::Neighborhood => 1,
            CandidateTier::Catalog => 2,
        };
        if let Some(count) = tiers.get_mut(tier_slot) {
            *count += 1;
        }

        // Every tier is non-empty for a non-empty catalog
        let chosen = select_best(cell, &candidates.indices, catalog, config).unwrap_or(0);
        if let Some(material) = catalog.get_mut(chosen) {
            material.record_use(cell.position);
            cell.assigned = Some(chosen);
            cells += 1;
        }
    }

    let usage = catalog
        .usage_stats()
        .ok_or(MosaicError::NoMaterials { attempted: 0 })?;
    info!(
        "Diversity: max use {}, min use {}, mean use {:.1}, {} of {} materials placed",
        usage.max,
        usage.min,
        usage.mean,
        usage.distinct,
        catalog.len()
    );

    let [bucket_hits, neighborhood_hits, catalog_fallbacks] = tiers;
    Ok(MatchReport {
        cells,
        bucket_width: buckets.width(),
        bucket_hits,
        neighborhood_hits,
        catalog_fallbacks,
        usage,
    })
}
