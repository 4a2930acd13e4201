//! Tests for grid dimension rounding, target downsampling and the assignment grid

#[cfg(test)]
mod tests {

    use image::{Rgb, RgbImage};
    use mosaictile::MosaicError;
    use mosaictile::algorithm::grid::{AssignmentGrid, TargetGrid, grid_dimension};
    use mosaictile::ingestion::TileSize;
    use ndarray::Array2;

    // Tests cell counts round half to even
    // Verified by rounding half away from zero
    #[test]
    fn test_grid_dimension_rounding() {
        assert_eq!(grid_dimension("width", 100, 10).unwrap(), 10);
        assert_eq!(grid_dimension("width", 104, 10).unwrap(), 10);
        assert_eq!(grid_dimension("width", 106, 10).unwrap(), 11);
        assert_eq!(grid_dimension("width", 25, 10).unwrap(), 2);
        assert_eq!(grid_dimension("width", 35, 10).unwrap(), 4);
        assert_eq!(grid_dimension("width", 15, 10).unwrap(), 2);
    }

    // Tests zero-cell grids and zero tiles are invalid parameters
    // Verified by allowing an empty grid
    #[test]
    fn test_grid_dimension_rejects_empty() {
        assert!(matches!(
            grid_dimension("height", 4, 10),
            Err(MosaicError::InvalidParameter { .. })
        ));
        // 0.5 rounds to the even neighbour 0
        assert!(grid_dimension("height", 5, 10).is_err());
        assert!(grid_dimension("height", 100, 0).is_err());
    }

    // Tests grid dimensions come from the image and tile sizes only
    // Verified by swapping width and height
    #[test]
    fn test_target_grid_dimensions() {
        let image = RgbImage::from_pixel(64, 48, Rgb([1, 2, 3]));
        let grid = TargetGrid::from_image(&image, TileSize::new(8, 8).unwrap()).unwrap();
        assert_eq!((grid.width(), grid.height()), (8, 6));
        assert_eq!(grid.len(), 48);
        assert!(!grid.is_empty());

        let tall = TargetGrid::from_image(&image, TileSize::new(4, 16).unwrap()).unwrap();
        assert_eq!((tall.width(), tall.height()), (16, 3));
    }

    // Tests a uniform target keeps its color in every cell
    // Verified by indexing pixels as (row, column)
    #[test]
    fn test_target_grid_colors() {
        let image = RgbImage::from_pixel(40, 20, Rgb([200, 100, 50]));
        let grid = TargetGrid::from_image(&image, TileSize::new(10, 10).unwrap()).unwrap();

        for i in 0..grid.width() {
            for j in 0..grid.height() {
                assert_eq!(grid.color(i, j), Some([200.0, 100.0, 50.0]));
            }
        }
        assert_eq!(grid.color(4, 0), None);
    }

    // Tests targets smaller than half a tile fail
    // Verified by clamping dimensions to one
    #[test]
    fn test_target_grid_too_small() {
        let image = RgbImage::from_pixel(3, 30, Rgb([0, 0, 0]));
        assert!(TargetGrid::from_image(&image, TileSize::new(10, 10).unwrap()).is_err());
    }

    // Tests explicit colors must form a non-empty grid
    // Verified by accepting zero columns
    #[test]
    fn test_target_grid_from_colors() {
        assert!(TargetGrid::from_colors(Array2::from_elem((0, 3), [0.0; 3])).is_err());
        assert!(TargetGrid::from_colors(Array2::from_elem((3, 0), [0.0; 3])).is_err());

        let grid = TargetGrid::from_colors(Array2::from_elem((3, 2), [5.0; 3])).unwrap();
        assert_eq!((grid.width(), grid.height()), (3, 2));
    }

    // Tests cells are stored per position and enumerated with their ids
    // Verified by transposing the backing array
    #[test]
    fn test_assignment_grid_cells() {
        let mut grid = AssignmentGrid::new(3, 2);
        grid.set(2, 1, 7);
        grid.set(0, 1, 4);
        grid.set(5, 5, 9);

        assert_eq!((grid.width(), grid.height()), (3, 2));
        assert_eq!(grid.get(2, 1), Some(7));
        assert_eq!(grid.get(0, 1), Some(4));
        assert_eq!(grid.get(0, 0), Some(0));
        assert_eq!(grid.get(5, 5), None);

        let cells: Vec<((usize, usize), usize)> = grid.cells().collect();
        assert_eq!(cells.len(), 6);
        assert!(cells.contains(&((2, 1), 7)));
        assert!(cells.contains(&((0, 1), 4)));
    }
}
