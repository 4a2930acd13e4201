//! Downsampled target grid and the per-cell assignment grid
//!
//! Both grids are indexed `[i, j]` with `i` running along the image width and `j`
//! along its height, matching the pixel offsets `(i * tile_width, j * tile_height)`
//! used when compositing.

use crate::ingestion::{Color, TileSize};
use crate::io::error::{Result, invalid_parameter};
use image::RgbImage;
use image::imageops::{self, FilterType};
use ndarray::Array2;

/// Number of grid cells along one axis: `size / tile` rounded half to even
///
/// # Errors
///
/// Returns an error if `tile` is zero or the rounded cell count is zero
pub fn grid_dimension(axis: &'static str, size: u32, tile: u32) -> Result<usize> {
    if tile == 0 {
        return Err(invalid_parameter(axis, &tile, &"tile dimension must be positive"));
    }
    let cells = (f64::from(size) / f64::from(tile)).round_ties_even() as usize;
    if cells == 0 {
        return Err(invalid_parameter(
            axis,
            &size,
            &format!("image is too small for tiles of {tile} pixels"),
        ));
    }
    Ok(cells)
}

/// The target photo reduced to one query color per tile position
#[derive(Debug, Clone)]
pub struct TargetGrid {
    colors: Array2<Color>,
}

impl TargetGrid {
    /// Downsample `image` to one pixel per tile position
    ///
    /// # Errors
    ///
    /// Returns an error if either grid dimension rounds to zero
    pub fn from_image(image: &RgbImage, tile_size: TileSize) -> Result<Self> {
        let width = grid_dimension("grid width", image.width(), tile_size.width())?;
        let height = grid_dimension("grid height", image.height(), tile_size.height())?;

        let reduced = imageops::resize(image, width as u32, height as u32, FilterType::CatmullRom);
        let colors = Array2::from_shape_fn((width, height), |(i, j)| {
            let pixel = reduced.get_pixel(i as u32, j as u32);
            [
                f64::from(pixel[0]),
                f64::from(pixel[1]),
                f64::from(pixel[2]),
            ]
        });
        log::debug!(
            "Target {}x{} reduced to a {width}x{height} grid",
            image.width(),
            image.height()
        );

        Ok(Self { colors })
    }

    /// Wrap explicit query colors, indexed `[i, j]`
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is zero
    pub fn from_colors(colors: Array2<Color>) -> Result<Self> {
        let (width, height) = colors.dim();
        if width == 0 || height == 0 {
            return Err(invalid_parameter(
                "target grid",
                &format!("{width}x{height}"),
                &"grid dimensions must be positive",
            ));
        }
        Ok(Self { colors })
    }

    /// Number of cells along the image width
    pub fn width(&self) -> usize {
        self.colors.dim().0
    }

    /// Number of cells along the image height
    pub fn height(&self) -> usize {
        self.colors.dim().1
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Whether the grid holds no cells (never true for a constructed grid)
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Query color of cell `[i, j]`
    pub fn color(&self, i: usize, j: usize) -> Option<Color> {
        self.colors.get((i, j)).copied()
    }
}

/// Chosen tile id per cell, same dimensions as the target grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentGrid {
    cells: Array2<usize>,
}

impl AssignmentGrid {
    /// Create a grid with every cell pointing at tile 0
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            cells: Array2::zeros((width, height)),
        }
    }

    /// Number of cells along the image width
    pub fn width(&self) -> usize {
        self.cells.dim().0
    }

    /// Number of cells along the image height
    pub fn height(&self) -> usize {
        self.cells.dim().1
    }

    /// Tile id chosen for cell `[i, j]`
    pub fn get(&self, i: usize, j: usize) -> Option<usize> {
        self.cells.get((i, j)).copied()
    }

    /// Record the tile chosen for cell `[i, j]`; out-of-range cells are ignored
    pub fn set(&mut self, i: usize, j: usize, id: usize) {
        if let Some(cell) = self.cells.get_mut((i, j)) {
            *cell = id;
        }
    }

    /// Every cell as `((i, j), id)`
    pub fn cells(&self) -> impl Iterator<Item = ((usize, usize), usize)> + '_ {
        self.cells.indexed_iter().map(|(position, &id)| (position, id))
    }

    /// Underlying array, indexed `[i, j]`
    pub const fn as_array(&self) -> &Array2<usize> {
        &self.cells
    }
}
