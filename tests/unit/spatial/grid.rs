//! Tests for grid construction, cell geometry and chunked sampling

#[cfg(test)]
mod tests {
    use crate::{quiet_control, rgb, solid, split};
    use photomosaic::MosaicError;
    use photomosaic::algorithm::control::{CancelToken, RunControl};
    use photomosaic::spatial::grid::{
        CellBounds, Grid, GridPosition, axis_edges, row_chunk_size, sample_stride,
    };

    // Tests that cells tile a canvas that does not divide evenly
    // Verified by rounding edges up instead of down
    #[test]
    fn test_cells_tile_canvas_exactly() -> photomosaic::Result<()> {
        let grid = Grid::build(&solid(40, 30, [9, 9, 9, 255]), 10, 103, &quiet_control())?;

        assert_eq!(grid.len(), 100);
        let area: u64 = grid.cells().map(|cell| cell.bounds.area()).sum();
        assert_eq!(area, 103 * 103);

        let cells: Vec<_> = grid.cells().collect();
        for (i, a) in cells.iter().enumerate() {
            assert!(a.bounds.right() <= 103 && a.bounds.bottom() <= 103);
            assert!(a.bounds.width == 10 || a.bounds.width == 11);
            for b in cells.iter().skip(i + 1) {
                assert!(!a.bounds.overlaps(&b.bounds));
            }
        }
        Ok(())
    }

    // Tests row-major order and positions
    // Verified by iterating columns in the outer loop
    #[test]
    fn test_cells_row_major() -> photomosaic::Result<()> {
        let grid = Grid::build(&solid(8, 8, [0, 0, 0, 255]), 4, 40, &quiet_control())?;

        let positions: Vec<_> = grid.cells().take(5).map(|cell| cell.position).collect();
        assert_eq!(positions.first(), Some(&GridPosition::new(0, 0)));
        assert_eq!(positions.get(1), Some(&GridPosition::new(1, 0)));
        assert_eq!(positions.get(4), Some(&GridPosition::new(0, 1)));
        assert_eq!(
            grid.cell(1, 0).map(|cell| cell.bounds),
            Some(CellBounds::new(0, 10, 10, 10))
        );
        Ok(())
    }

    // Tests that cell colors follow the target
    // Verified by sampling the whole canvas for every cell
    #[test]
    fn test_cell_colors_follow_target() -> photomosaic::Result<()> {
        let target = split(64, [0, 0, 0, 255], [255, 255, 255, 255]);
        let grid = Grid::build(&target, 4, 64, &quiet_control())?;

        for cell in grid.cells() {
            let expected = if cell.position.col < 2 {
                rgb(0, 0, 0)
            } else {
                rgb(255, 255, 255)
            };
            assert_eq!(cell.mean_color, expected, "cell {:?}", cell.position);
            assert_eq!(cell.assigned, None);
        }
        Ok(())
    }

    // Tests rejection of more cells than canvas pixels
    // Verified by removing the grid size check
    #[test]
    fn test_grid_larger_than_canvas_rejected() {
        let result = Grid::build(&solid(4, 4, [0, 0, 0, 255]), 20, 10, &quiet_control());
        assert!(matches!(result, Err(MosaicError::InvalidParameter { .. })));
    }

    // Tests that cancellation is observed between row chunks
    // Verified by removing the checkpoint
    #[test]
    fn test_cancellation_between_chunks() {
        let token = CancelToken::new();
        token.cancel();
        let control = RunControl::unpaced(token);

        let result = Grid::build(&solid(4, 4, [0, 0, 0, 255]), 10, 20, &control);
        assert!(matches!(result, Err(MosaicError::Cancelled { .. })));
    }

    // Tests edge placement and the chunking and sampling helpers
    // Verified by clamping chunk sizes to the wrong bounds
    #[test]
    fn test_layout_helpers() {
        assert_eq!(axis_edges(10, 3), vec![0, 3, 6, 10]);
        assert_eq!(row_chunk_size(20), 5);
        assert_eq!(row_chunk_size(80), 10);
        assert_eq!(row_chunk_size(200), 20);
        assert_eq!(sample_stride(2999), 1);
        assert_eq!(sample_stride(9000), 3);
    }

    // Tests Euclidean grid distance
    // Verified by using Manhattan distance
    #[test]
    fn test_position_distance() {
        let a = GridPosition::new(0, 0);
        let b = GridPosition::new(3, 4);
        assert!((a.distance(b) - 5.0).abs() < 1e-12);
    }
}
