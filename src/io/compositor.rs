//! Mosaic composition and export

use crate::algorithm::grid::AssignmentGrid;
use crate::ingestion::{TileSet, TileSize};
use crate::io::error::{MosaicError, Result};
use image::RgbImage;
use image::imageops;
use std::path::Path;

/// Paste the chosen tile of every cell onto a black canvas
///
/// Cell `[i, j]` lands at pixel offset `(i * tile_width, j * tile_height)`. Cells are
/// disjoint and exactly tile sized; parts of cells beyond the canvas are clipped.
///
/// # Errors
///
/// Returns an error if a cell refers to a tile id outside `tiles`
pub fn compose(
    grid: &AssignmentGrid,
    tiles: &TileSet,
    tile_size: TileSize,
    canvas_width: u32,
    canvas_height: u32,
) -> Result<RgbImage> {
    let mut canvas = RgbImage::new(canvas_width, canvas_height);

    for ((i, j), id) in grid.cells() {
        let tile = tiles.tile(id).ok_or(MosaicError::InvalidTileIndex {
            index: id,
            max_tiles: tiles.len(),
        })?;
        let x = i64::from(tile_size.width()) * i as i64;
        let y = i64::from(tile_size.height()) * j as i64;
        imageops::replace(&mut canvas, tile.image(), x, y);
    }

    Ok(canvas)
}

/// Write the composed mosaic, creating the parent directory when needed
///
/// The format follows the extension of `output_path`.
///
/// # Errors
///
/// Returns an error if:
/// - The parent directory cannot be created
/// - The image cannot be encoded or written
pub fn save_mosaic(canvas: &RgbImage, output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
    {
        std::fs::create_dir_all(parent).map_err(|e| MosaicError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    canvas
        .save(output_path)
        .map_err(|e| MosaicError::ImageExport {
            path: output_path.to_path_buf(),
            source: e,
        })?;

    log::info!("Mosaic {} created", output_path.display());
    Ok(())
}
