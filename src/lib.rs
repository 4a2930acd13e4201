//! Photo mosaic generation through nearest-color tile matching with repeat avoidance
//!
//! Candidate tiles are ingested concurrently and profiled by mean color. Each cell of
//! a downsampled target grid is then matched to its nearest tile color, and every use
//! of a tile shrinks its stored color so that later cells are steered towards other tiles.

#![forbid(unsafe_code)]

/// Target grids, the assignment pass and end-to-end mosaic orchestration
pub mod algorithm;
/// Nearest-color lookup structures rebuilt between assignment queries
pub mod index;
/// Tile discovery, decoding, normalisation and color profiling
pub mod ingestion;
/// Input/output operations, parameters, settings and error handling
pub mod io;

pub use io::error::{MosaicError, Result};
