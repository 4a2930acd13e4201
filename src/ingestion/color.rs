//! Mean color extraction and the per-tile color/counter arrays

use crate::ingestion::tiles::Tile;
use image::RgbImage;
use ndarray::{ArrayView2, Axis};
use rayon::prelude::*;

/// Three-channel real-valued color (channel means)
pub type Color = [f64; 3];

/// Arithmetic mean of each channel over every pixel of `image`
///
/// Returns black for an image without pixels.
pub fn mean_color(image: &RgbImage) -> Color {
    let pixel_count = (image.width() as usize) * (image.height() as usize);
    let Ok(pixels) = ArrayView2::from_shape((pixel_count, 3), image.as_raw().as_slice()) else {
        return [0.0; 3];
    };

    pixels
        .mapv(f64::from)
        .mean_axis(Axis(0))
        .map_or([0.0; 3], |mean| {
            [
                mean.get(0).copied().unwrap_or(0.0),
                mean.get(1).copied().unwrap_or(0.0),
                mean.get(2).copied().unwrap_or(0.0),
            ]
        })
}

/// The in-memory tile collection with parallel color and usage arrays
///
/// All three arrays are indexed by tile id and always have the same length.
/// Colors here are the extracted means; an assignment pass decays a working copy.
#[derive(Debug, Clone)]
pub struct TileSet {
    tiles: Vec<Tile>,
    colors: Vec<Color>,
    counters: Vec<u32>,
}

impl TileSet {
    /// Profile every tile and zero its usage counter
    ///
    /// Tile ids are renumbered to match their position in `tiles`.
    pub fn from_tiles(tiles: Vec<Tile>) -> Self {
        let tiles: Vec<Tile> = tiles
            .into_iter()
            .enumerate()
            .map(|(id, tile)| tile.renumbered(id))
            .collect();

        let colors: Vec<Color> = tiles.par_iter().map(|tile| mean_color(tile.image())).collect();
        let counters = vec![0; tiles.len()];

        Self {
            tiles,
            colors,
            counters,
        }
    }

    /// Number of tiles
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether the collection holds no tiles
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// All tiles in id order
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Tile with the given id
    pub fn tile(&self, id: usize) -> Option<&Tile> {
        self.tiles.get(id)
    }

    /// Extracted mean colors in id order
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Usage counters in id order
    pub fn counters(&self) -> &[u32] {
        &self.counters
    }

    /// Record the usage counters produced by an assignment pass
    ///
    /// Counters whose length does not match the collection are ignored.
    pub fn record_usage(&mut self, counters: &[u32]) {
        if counters.len() == self.counters.len() {
            self.counters.copy_from_slice(counters);
        }
    }

    /// Reset every usage counter to zero
    pub fn reset_usage(&mut self) {
        self.counters.iter_mut().for_each(|c| *c = 0);
    }
}
