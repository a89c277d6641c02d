//! Grid construction over the target image
//!
//! The target is rendered at the destination canvas size and partitioned
//! into `grid_size` x `grid_size` cells. Cell edges fall on
//! `floor(i * canvas / grid_size)`, so cells differ by at most one pixel and
//! tile the canvas exactly.

use ndarray::Array2;

use crate::algorithm::control::RunControl;
use crate::analysis::color::Rgb;
use crate::io::configuration::GRID_SAMPLE_BUDGET;
use crate::io::error::{Result, invalid_parameter, render_error};
use crate::io::progress::ProgressManager;
use crate::raster::surface::Surface;
use image::RgbaImage;

/// Axis-aligned pixel rectangle on a destination canvas
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellBounds {
    /// Left edge (inclusive)
    pub x: u32,
    /// Top edge (inclusive)
    pub y: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl CellBounds {
    /// Create bounds from position and size
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (exclusive)
    pub const fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Bottom edge (exclusive)
    pub const fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Number of pixels covered
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Whether no pixels are covered
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Whether two rectangles share at least one pixel
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Integer column/row of a cell within its grid
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridPosition {
    /// Column index
    pub col: u32,
    /// Row index
    pub row: u32,
}

impl GridPosition {
    /// Create a grid position
    pub const fn new(col: u32, row: u32) -> Self {
        Self { col, row }
    }

    /// Euclidean distance in grid units
    pub fn distance(self, other: Self) -> f64 {
        let dx = f64::from(self.col) - f64::from(other.col);
        let dy = f64::from(self.row) - f64::from(other.row);
        dx.hypot(dy)
    }
}

/// One region of the destination canvas and the material assigned to it
#[derive(Clone, Debug, PartialEq)]
pub struct GridCell {
    /// Destination rectangle
    pub bounds: CellBounds,
    /// Column/row within the grid
    pub position: GridPosition,
    /// Mean color of the target under this cell
    pub mean_color: Rgb,
    /// Catalog index of the assigned material
    pub assigned: Option<usize>,
}

/// Cells of one resolution pass, indexed `[row, col]`
///
/// Iteration is row-major: y outer, x inner.
#[derive(Clone, Debug)]
pub struct Grid {
    cells: Array2<GridCell>,
    canvas_side: u32,
}

impl Grid {
    /// Partition `target`, rendered at `canvas_side`, into `grid_size`² cells
    ///
    /// Rows are processed in chunks of [`row_chunk_size`] with a checkpoint
    /// between chunks.
    ///
    /// # Errors
    ///
    /// Returns an error if the grid does not fit the canvas, the target
    /// cannot be resampled, or the run is cancelled
    pub fn build(
        target: &RgbaImage,
        grid_size: u32,
        canvas_side: u32,
        control: &RunControl,
    ) -> Result<Self> {
        if grid_size == 0 || grid_size > canvas_side {
            return Err(invalid_parameter(
                "grid_size",
                &grid_size,
                &format!("must be between 1 and the canvas side {canvas_side}"),
            ));
        }

        let rendered = target.resize(canvas_side, canvas_side)?;
        let edges = axis_edges(canvas_side, grid_size);
        let side = grid_size as usize;
        let chunk = row_chunk_size(grid_size);

        let bar = control
            .progress()
            .begin_stage("grid", u64::from(grid_size));
        let mut cells = Vec::with_capacity(side * side);

        for start in (0..side).step_by(chunk) {
            let end = (start + chunk).min(side);
            for row in start..end {
                for col in 0..side {
                    cells.push(sample_cell(&rendered, &edges, col, row)?);
                }
            }
            bar.inc((end - start) as u64);

            if end < side {
                control.checkpoint("grid building")?;
            }
        }
        ProgressManager::finish_stage(&bar, &format!("{grid_size}x{grid_size} cells"));

        let cells = Array2::from_shape_vec((side, side), cells)
            .map_err(|e| render_error("grid layout", &e))?;

        Ok(Self { cells, canvas_side })
    }

    /// Cells per side
    pub fn grid_size(&self) -> u32 {
        self.cells.nrows() as u32
    }

    /// Side of the canvas the cells tile
    pub const fn canvas_side(&self) -> u32 {
        self.canvas_side
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the grid has no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell at `row`, `col`
    pub fn cell(&self, row: usize, col: usize) -> Option<&GridCell> {
        self.cells.get([row, col])
    }

    /// Cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = &GridCell> {
        self.cells.iter()
    }

    /// Mutable cells in row-major order
    pub fn cells_mut(&mut self) -> impl Iterator<Item = &mut GridCell> {
        self.cells.iter_mut()
    }

    /// Assigned catalog indices laid out as the grid
    pub fn assignments(&self) -> Array2<Option<usize>> {
        self.cells.map(|cell| cell.assigned)
    }
}

/// Pixel offsets of the `grid_size + 1` cell edges along one axis
pub fn axis_edges(canvas_side: u32, grid_size: u32) -> Vec<u32> {
    (0..=u64::from(grid_size))
        .map(|i| (i * u64::from(canvas_side) / u64::from(grid_size.max(1))) as u32)
        .collect()
}

/// Rows processed between checkpoints
pub fn row_chunk_size(grid_size: u32) -> usize {
    (grid_size as usize / 8).clamp(5, 20)
}

/// Pixel stride keeping per-cell sampling within [`GRID_SAMPLE_BUDGET`]
pub fn sample_stride(cell_pixels: u64) -> usize {
    ((cell_pixels / GRID_SAMPLE_BUDGET as u64) as usize).max(1)
}

fn sample_cell(rendered: &RgbaImage, edges: &[u32], col: usize, row: usize) -> Result<GridCell> {
    let edge = |index: usize| {
        edges
            .get(index)
            .copied()
            .ok_or_else(|| render_error("grid layout", &format!("missing cell edge {index}")))
    };
    let (left, right) = (edge(col)?, edge(col + 1)?);
    let (top, bottom) = (edge(row)?, edge(row + 1)?);
    let bounds = CellBounds::new(left, top, right - left, bottom - top);

    let mean_color = rendered
        .sample_mean_color(&bounds, sample_stride(bounds.area()))
        .ok_or_else(|| {
            render_error(
                "grid sampling",
                &format!("cell ({col}, {row}) covers no pixels"),
            )
        })?;

    Ok(GridCell {
        bounds,
        position: GridPosition::new(col as u32, row as u32),
        mean_color,
        assigned: None,
    })
}
