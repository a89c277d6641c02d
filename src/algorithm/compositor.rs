//! Drawing assigned materials into destination canvases
//!
//! The output tier crops each material's full-resolution source; the preview
//! tier reuses the precomputed thumbnails. Cells are processed in batches
//! sized inversely to the canvas resolution, resampled in parallel and blitted
//! in grid order, with a checkpoint between batches.

use crate::algorithm::catalog::{MaterialCatalog, MaterialImage};
use crate::algorithm::control::RunControl;
use crate::io::error::{Result, render_error};
use crate::io::progress::ProgressManager;
use crate::raster::surface::Surface;
use crate::spatial::crop::CropRegion;
use crate::spatial::grid::{CellBounds, Grid, GridCell};
use image::{Rgba, RgbaImage};
use rayon::prelude::{IntoParallelRefIterator, ParallelIterator};
use std::time::Duration;

/// Fill for canvas pixels no tile covers
pub const BACKGROUND: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Quality tier of a compositing pass
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderTier {
    /// Full-resolution sources drawn into every cell
    Output,
    /// Thumbnails drawn as tiles of a cosmetic size
    Preview {
        /// Tile side in pixels; smaller tiles leave a border inside the cell
        tile_size: u32,
    },
}

impl RenderTier {
    /// Cells drawn between checkpoints for a canvas of the given side
    pub fn batch_size(self, canvas_side: u32) -> usize {
        let side = f64::from(canvas_side.max(1));
        let (budget, scale, min, max) = match self {
            Self::Output => (8000.0, 1000.0, 15.0, 80.0),
            Self::Preview { .. } => (12000.0, 800.0, 40.0, 120.0),
        };
        (budget / (side / scale)).floor().clamp(min, max) as usize
    }

    /// Pause taken at each checkpoint between batches
    pub fn batch_pause(self, canvas_side: u32) -> Duration {
        match self {
            Self::Output => Duration::from_millis(u64::from((canvas_side / 1000).max(1))),
            Self::Preview { .. } => Duration::from_millis(1),
        }
    }

    /// Rectangle a tile occupies inside `cell`
    ///
    /// Output tiles fill the cell. Preview tiles are centered squares of
    /// `tile_size` clipped to the cell.
    pub const fn tile_bounds(self, cell: CellBounds) -> CellBounds {
        match self {
            Self::Output => cell,
            Self::Preview { tile_size } => {
                let width = if tile_size < cell.width {
                    tile_size
                } else {
                    cell.width
                };
                let height = if tile_size < cell.height {
                    tile_size
                } else {
                    cell.height
                };
                CellBounds::new(
                    cell.x + (cell.width - width) / 2,
                    cell.y + (cell.height - height) / 2,
                    width,
                    height,
                )
            }
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Output => "output",
            Self::Preview { .. } => "preview",
        }
    }
}

/// Resample the center-cropped material to fill `bounds`
///
/// # Errors
///
/// Returns a render error if the source is empty or the bounds are degenerate
pub fn render_tile(
    material: &MaterialImage,
    tier: RenderTier,
    bounds: CellBounds,
) -> Result<RgbaImage> {
    let source = match tier {
        RenderTier::Output => &material.image,
        RenderTier::Preview { .. } => &material.thumbnail,
    };
    let region = CropRegion::centered_square(source.width(), source.height());
    source.resize_region(region, bounds.width, bounds.height)
}

/// Draw every assigned cell of `grid` onto a fresh canvas
///
/// Cells without an assignment are left at [`BACKGROUND`].
///
/// # Errors
///
/// Returns an error if a tile cannot be rendered or drawn, if a cell refers
/// to a material missing from the catalog, or if the run is cancelled
pub fn composite(
    grid: &Grid,
    catalog: &MaterialCatalog,
    tier: RenderTier,
    control: &RunControl,
) -> Result<RgbaImage> {
    let side = grid.canvas_side();
    let mut canvas = RgbaImage::from_pixel(side, side, BACKGROUND);

    let cells: Vec<&GridCell> = grid.cells().collect();
    let batch_size = tier.batch_size(side);
    let bar = control
        .progress()
        .begin_stage(tier.label(), cells.len() as u64);

    let mut batches = cells.chunks(batch_size).peekable();
    while let Some(batch) = batches.next() {
        let tiles = batch
            .par_iter()
            .filter_map(|cell| cell.assigned.map(|index| (cell, index)))
            .map(|(cell, index)| {
                let material = catalog.get(index).ok_or_else(|| {
                    render_error(
                        "composite",
                        &format!("cell {:?} refers to missing material {index}", cell.position),
                    )
                })?;
                let bounds = tier.tile_bounds(cell.bounds);
                render_tile(material, tier, bounds).map(|tile| (bounds, tile))
            })
            .collect::<Result<Vec<_>>>()?;

        for (bounds, tile) in &tiles {
            canvas.blit(tile, bounds.x, bounds.y)?;
        }
        bar.inc(batch.len() as u64);

        if batches.peek().is_some() {
            control.pause("compositing", tier.batch_pause(side))?;
        }
    }
    ProgressManager::finish_stage(&bar, &format!("{side}x{side}"));

    Ok(canvas)
}
