//! Tile ingestion pipeline
//!
//! This module contains tile-related functionality including:
//! - Discovery of candidate files from a directory pattern
//! - Concurrent decoding, orientation filtering and size normalisation
//! - Mean color extraction into parallel per-tile arrays

/// Mean color extraction and the per-tile color/counter arrays
pub mod color;
/// Tile discovery and concurrent loading
pub mod tiles;

pub use color::{Color, TileSet};
pub use tiles::{OrientationFilter, Tile, TileIngestor, TileSize, TileSource};
