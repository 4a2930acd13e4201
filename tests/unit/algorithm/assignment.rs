//! Tests for the greedy assignment pass and its anti-repeat decay

#[cfg(test)]
mod tests {

    use image::{Rgb, RgbImage};
    use mosaictile::MosaicError;
    use mosaictile::algorithm::assignment::{AssignmentEngine, decay_color};
    use mosaictile::algorithm::grid::TargetGrid;
    use mosaictile::index::{LinearScanIndex, NearestColorIndex};
    use mosaictile::ingestion::{Color, Tile, TileSet};
    use mosaictile::io::progress::ProgressManager;
    use ndarray::Array2;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::path::PathBuf;

    fn column(colors: &[Color]) -> TargetGrid {
        let grid = Array2::from_shape_vec((1, colors.len()), colors.to_vec()).unwrap();
        TargetGrid::from_colors(grid).unwrap()
    }

    fn close(a: Color, b: Color) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 1e-9)
    }

    fn gray_tiles(levels: &[u8]) -> TileSet {
        let tiles = levels
            .iter()
            .enumerate()
            .map(|(id, &level)| {
                Tile::new(
                    id,
                    RgbImage::from_pixel(2, 2, Rgb([level; 3])),
                    PathBuf::from(format!("gray_{level}.png")),
                    false,
                )
            })
            .collect();
        TileSet::from_tiles(tiles)
    }

    // Tests zero epsilon leaves colors untouched
    // Verified by subtracting epsilon instead of scaling
    #[test]
    fn test_decay_zero_epsilon() {
        let color = [10.0, 20.0, 30.0];
        for uses in 0..5 {
            assert_eq!(decay_color(color, uses, 0.0), color);
        }
    }

    // Tests both shrink factors are applied with the before and after counts
    // Verified by applying only the second factor
    #[test]
    fn test_decay_two_factors() {
        let color = [100.0, 50.0, 10.0];

        // First use: (1 - 0) then (1 - 0.1)
        assert!(close(decay_color(color, 0, 0.1), [90.0, 45.0, 9.0]));

        // Third use: (1 - 0.2) then (1 - 0.3)
        let third = decay_color(color, 2, 0.1);
        assert!(close(third, [56.0, 28.0, 5.6]));

        // A single step with the incremented count would give 70%
        assert!(!close(third, [70.0, 35.0, 7.0]));
    }

    // Tests large epsilon drives colors through zero without clamping
    // Verified by clamping at zero
    #[test]
    fn test_decay_unclamped() {
        let decayed = decay_color([10.0, 10.0, 10.0], 1, 0.8);
        // (1 - 0.8) * (1 - 1.6) = 0.2 * -0.6
        assert!(close(decayed, [-1.2, -1.2, -1.2]));
    }

    // Tests invalid decay strengths are rejected
    // Verified by accepting negative epsilon
    #[test]
    fn test_engine_rejects_invalid_epsilon() {
        assert!(AssignmentEngine::new(-0.1).is_err());
        assert!(AssignmentEngine::new(f64::NAN).is_err());
        assert!(AssignmentEngine::new(f64::INFINITY).is_err());
        assert!(AssignmentEngine::new(0.0).is_ok());
        assert!((AssignmentEngine::new(0.25).unwrap().epsilon() - 0.25).abs() < f64::EPSILON);
    }

    // Tests repeated queries pick the same tile when epsilon is zero
    // Verified by decaying with a fixed epsilon
    #[test]
    fn test_zero_epsilon_repeats_choice() {
        let engine = AssignmentEngine::new(0.0).unwrap();
        let target = column(&[[60.0; 3], [60.0; 3], [60.0; 3]]);
        let colors = vec![[0.0; 3], [64.0; 3], [255.0; 3]];

        let result = engine
            .assign_with::<NearestColorIndex>(&target, colors.clone(), vec![0; 3], None)
            .unwrap();

        assert_eq!(result.grid.as_array().iter().copied().collect::<Vec<_>>(), vec![1, 1, 1]);
        assert_eq!(result.usage, vec![0, 3, 0]);
        assert_eq!(result.decayed_colors, colors);
    }

    // Tests the cell at which accumulated decay flips the nearest tile
    // Verified by applying a single decay factor per use
    #[test]
    fn test_decay_switches_tile_at_fourth_cell() {
        let engine = AssignmentEngine::new(0.1).unwrap();
        let target = column(&[[10.0; 3]; 6]);
        let colors = vec![[9.0; 3], [5.0; 3]];

        let result = engine
            .assign_with::<NearestColorIndex>(&target, colors, vec![0, 0], None)
            .unwrap();
        let chosen: Vec<usize> = (0..6).map(|j| result.grid.get(0, j).unwrap()).collect();

        // 9 -> 8.1 -> 5.832 -> 3.26592 leaves tile 1 nearer from the fourth cell,
        // then 5 -> 4.5 -> 3.24 hands the sixth cell back to tile 0
        assert_eq!(chosen, vec![0, 0, 0, 1, 1, 0]);
        assert_eq!(result.usage, vec![4, 2]);
        assert!(close(result.decayed_colors[1], [3.24; 3]));
    }

    // Tests a zero color is a fixed point of the decay and keeps winning
    // Verified by adding an offset to decayed colors
    #[test]
    fn test_black_tile_never_decays() {
        let engine = AssignmentEngine::new(0.5).unwrap();
        let target = column(&[[1.0; 3]; 5]);
        let colors = vec![[0.0; 3], [10.0; 3]];

        let result = engine
            .assign_with::<NearestColorIndex>(&target, colors, vec![0, 0], None)
            .unwrap();

        assert_eq!(result.usage, vec![5, 0]);
        assert_eq!(result.decayed_colors[0], [0.0; 3]);
    }

    // Tests black/white/gray tiles over a 2x2 grid in width-major order
    // Verified by iterating rows before columns
    #[test]
    fn test_two_by_two_scenario() {
        let engine = AssignmentEngine::new(0.1).unwrap();
        let tiles = gray_tiles(&[0, 255, 128]);

        let mut queries = Array2::from_elem((2, 2), [0.0; 3]);
        queries[(0, 0)] = [10.0; 3];
        queries[(0, 1)] = [250.0; 3];
        queries[(1, 0)] = [240.0; 3];
        queries[(1, 1)] = [130.0; 3];
        let target = TargetGrid::from_colors(queries).unwrap();

        let result = engine.assign(&target, &tiles, None).unwrap();

        assert_eq!(result.grid.get(0, 0), Some(0));
        assert_eq!(result.grid.get(0, 1), Some(1));
        assert_eq!(result.grid.get(1, 0), Some(1));
        assert_eq!(result.grid.get(1, 1), Some(2));
        assert_eq!(result.usage, vec![1, 2, 1]);

        assert!(close(result.decayed_colors[0], [0.0; 3]));
        assert!(close(result.decayed_colors[1], [165.24; 3]));
        assert!(close(result.decayed_colors[2], [115.2; 3]));

        // The tile set keeps its extracted colors
        assert_eq!(tiles.colors()[1], [255.0; 3]);
        assert_eq!(tiles.counters(), &[0, 0, 0]);
    }

    // Tests both index implementations produce the same assignment
    // Verified by skipping the rebuild after decay
    #[test]
    fn test_index_implementations_agree() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut random_color = || -> Color {
            [
                rng.random_range(0.0..255.0),
                rng.random_range(0.0..255.0),
                rng.random_range(0.0..255.0),
            ]
        };

        let colors: Vec<Color> = (0..40).map(|_| random_color()).collect();
        let cells: Vec<Color> = (0..48).map(|_| random_color()).collect();
        let target = TargetGrid::from_colors(Array2::from_shape_vec((6, 8), cells).unwrap()).unwrap();

        let engine = AssignmentEngine::new(0.05).unwrap();
        let tree = engine
            .assign_with::<NearestColorIndex>(&target, colors.clone(), vec![0; 40], None)
            .unwrap();
        let scan = engine
            .assign_with::<LinearScanIndex>(&target, colors, vec![0; 40], None)
            .unwrap();

        assert_eq!(tree.grid, scan.grid);
        assert_eq!(tree.usage, scan.usage);
        assert_eq!(tree.usage.iter().sum::<u32>(), 48);
    }

    // Tests mismatched and empty working arrays are rejected
    // Verified by removing the length check
    #[test]
    fn test_invalid_working_arrays() {
        let engine = AssignmentEngine::new(0.1).unwrap();
        let target = column(&[[1.0; 3]]);

        let mismatched =
            engine.assign_with::<NearestColorIndex>(&target, vec![[0.0; 3]; 2], vec![0], None);
        assert!(matches!(
            mismatched,
            Err(MosaicError::InvalidParameter { .. })
        ));

        let empty = engine.assign_with::<NearestColorIndex>(&target, Vec::new(), Vec::new(), None);
        assert!(matches!(empty, Err(MosaicError::EmptyTileSet { .. })));
    }

    // Tests every cell is reported to the progress display
    // Verified by skipping the final partial stride
    #[test]
    fn test_progress_counts_cells() {
        let engine = AssignmentEngine::new(0.0).unwrap();
        let target = TargetGrid::from_colors(Array2::from_elem((10, 13), [50.0; 3])).unwrap();
        let progress = ProgressManager::hidden();

        engine
            .assign(&target, &gray_tiles(&[0, 100]), Some(&progress))
            .unwrap();

        assert_eq!(progress.cells_done(), 130);
    }
}
