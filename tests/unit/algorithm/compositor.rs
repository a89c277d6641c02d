//! Tests for tile placement, batching and canvas compositing

#[cfg(test)]
mod tests {
    use crate::{catalog, material, quiet_control, solid};
    use image::Rgba;
    use photomosaic::algorithm::compositor::{BACKGROUND, RenderTier, composite, render_tile};
    use photomosaic::algorithm::matcher::{MatchConfig, match_materials};
    use photomosaic::spatial::grid::{CellBounds, Grid};
    use std::time::Duration;

    // Tests batch sizes shrink with canvas size within their clamps
    // Verified by using the output budget for previews
    #[test]
    fn test_batch_sizes() {
        assert_eq!(RenderTier::Output.batch_size(3200), 80);
        assert_eq!(RenderTier::Output.batch_size(1_000_000), 15);
        assert_eq!(RenderTier::Output.batch_size(200_000), 40);

        let preview = RenderTier::Preview { tile_size: 12 };
        assert_eq!(preview.batch_size(1200), 120);
        assert_eq!(preview.batch_size(160_000), 60);
        assert_eq!(preview.batch_pause(1200), Duration::from_millis(1));
        assert_eq!(RenderTier::Output.batch_pause(7680), Duration::from_millis(7));
    }

    // Tests that preview tiles are centered squares clipped to the cell
    // Verified by anchoring tiles at the cell corner
    #[test]
    fn test_tile_bounds() {
        let cell = CellBounds::new(40, 40, 40, 41);
        assert_eq!(RenderTier::Output.tile_bounds(cell), cell);
        assert_eq!(
            RenderTier::Preview { tile_size: 12 }.tile_bounds(cell),
            CellBounds::new(54, 54, 12, 12)
        );
        assert_eq!(
            RenderTier::Preview { tile_size: 64 }.tile_bounds(cell),
            cell
        );
    }

    // Tests that output tiles come from the full image and previews from the thumbnail
    // Verified by rendering previews from the full image
    #[test]
    fn test_render_tile_sources() -> photomosaic::Result<()> {
        let mut tile = material("a", [0, 0, 0])?;
        tile.thumbnail = solid(8, 8, [255, 255, 255, 255]);

        let output = render_tile(&tile, RenderTier::Output, CellBounds::new(0, 0, 5, 7))?;
        let preview = render_tile(
            &tile,
            RenderTier::Preview { tile_size: 4 },
            CellBounds::new(0, 0, 4, 4),
        )?;

        assert_eq!(output.dimensions(), (5, 7));
        assert_eq!(output.get_pixel(2, 3), &Rgba([0, 0, 0, 255]));
        assert_eq!(preview.get_pixel(1, 1), &Rgba([255, 255, 255, 255]));
        Ok(())
    }

    // Tests that unassigned cells stay transparent
    // Verified by filling the canvas with opaque black
    #[test]
    fn test_unassigned_cells_transparent() -> photomosaic::Result<()> {
        let grid = Grid::build(&solid(8, 8, [0, 0, 0, 255]), 2, 20, &quiet_control())?;
        let canvas = composite(&grid, &catalog(&[])?, RenderTier::Output, &quiet_control())?;

        assert_eq!(canvas.dimensions(), (20, 20));
        assert!(canvas.pixels().all(|p| *p == BACKGROUND));
        Ok(())
    }

    // Tests that preview gaps between tiles stay transparent
    // Verified by filling whole cells in preview mode
    #[test]
    fn test_preview_leaves_gaps() -> photomosaic::Result<()> {
        let mut grid = Grid::build(&solid(8, 8, [255, 0, 0, 255]), 2, 40, &quiet_control())?;
        let mut materials = catalog(&[[255, 0, 0]])?;
        match_materials(
            &mut grid,
            &mut materials,
            MatchConfig {
                color_tolerance: 30.0,
                grid_size: 2,
            },
        )?;

        let canvas = composite(
            &grid,
            &materials,
            RenderTier::Preview { tile_size: 10 },
            &quiet_control(),
        )?;

        // Cell (0, 0) spans 0..20; its tile spans 5..15
        assert_eq!(canvas.get_pixel(10, 10), &Rgba([255, 0, 0, 255]));
        assert_eq!(canvas.get_pixel(2, 2), &BACKGROUND);
        assert_eq!(canvas.get_pixel(19, 10), &BACKGROUND);
        assert_eq!(canvas.get_pixel(30, 30), &Rgba([255, 0, 0, 255]));
        Ok(())
    }
}
