//! Fully resolved parameter record for one mosaic run

use crate::ingestion::{OrientationFilter, TileSize, TileSource};
use crate::io::configuration::{
    DEFAULT_EPSILON, DEFAULT_OUTPUT_EXTENSION, DEFAULT_RATIO_HEIGHT, DEFAULT_RATIO_WIDTH,
    DEFAULT_TILE_MULTIPLIER, DEFAULT_UPSCALE, OUTPUT_SUFFIX,
};
use crate::io::error::{Result, invalid_parameter};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Every value a mosaic run needs, as stored in a settings profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MosaicParameters {
    /// Target photo to approximate
    pub target: PathBuf,
    /// Directory (optionally with a `*` file-name pattern) holding candidate tiles
    pub tile_pattern: String,
    /// Multiplier applied to the tile ratio to give the tile size in pixels
    pub tile_multiplier: u32,
    /// Tile ratio width
    pub ratio_width: u32,
    /// Tile ratio height
    pub ratio_height: u32,
    /// Decay strength discouraging tile reuse
    pub epsilon: f64,
    /// Integer upscale applied to the target photo
    pub upscale: u32,
    /// Output file name; derived from the target when absent
    #[serde(default)]
    pub output_name: Option<String>,
    /// Output directory; the working directory when absent
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    /// Also use every tile rotated by 180°
    #[serde(default)]
    pub mirror: bool,
}

impl MosaicParameters {
    /// Parameters with default tile size, epsilon, upscale and output location
    pub fn new(target: impl Into<PathBuf>, tile_pattern: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            tile_pattern: tile_pattern.into(),
            tile_multiplier: DEFAULT_TILE_MULTIPLIER,
            ratio_width: DEFAULT_RATIO_WIDTH,
            ratio_height: DEFAULT_RATIO_HEIGHT,
            epsilon: DEFAULT_EPSILON,
            upscale: DEFAULT_UPSCALE,
            output_name: None,
            output_dir: None,
            mirror: false,
        }
    }

    /// Check every numeric parameter
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The tile multiplier or either ratio component is zero
    /// - The tile size overflows
    /// - The upscale multiplier is zero
    /// - Epsilon is negative or not finite
    pub fn validate(&self) -> Result<()> {
        if self.ratio_width == 0 || self.ratio_height == 0 {
            return Err(invalid_parameter(
                "tile ratio",
                &format!("{}:{}", self.ratio_width, self.ratio_height),
                &"both ratio components must be positive",
            ));
        }
        self.tile_size()?;
        if self.upscale == 0 {
            return Err(invalid_parameter(
                "upscale",
                &self.upscale,
                &"must be at least 1",
            ));
        }
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(invalid_parameter(
                "epsilon",
                &self.epsilon,
                &"must be a finite value >= 0",
            ));
        }
        Ok(())
    }

    /// Tile size in pixels: ratio times multiplier on each axis
    ///
    /// # Errors
    ///
    /// Returns an error if any factor is zero or the size overflows
    pub fn tile_size(&self) -> Result<TileSize> {
        TileSize::from_ratio(self.ratio_width, self.ratio_height, self.tile_multiplier)
    }

    /// Orientation filter implied by the tile ratio
    pub const fn orientation_filter(&self) -> OrientationFilter {
        OrientationFilter::from_ratio(self.ratio_width, self.ratio_height)
    }

    /// Parsed tile source pattern
    pub fn tile_source(&self) -> TileSource {
        TileSource::parse(&self.tile_pattern)
    }

    /// Output file name: explicit, or the target's base name plus the mosaic suffix
    ///
    /// The base name ends at the first dot, so `photo.v2.jpg` yields `photo_mosaic.jpg`.
    pub fn output_file_name(&self) -> String {
        self.output_name.clone().unwrap_or_else(|| {
            let file_name = self
                .target
                .file_name()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();
            let stem = file_name.split('.').next().unwrap_or_default();
            format!("{stem}{OUTPUT_SUFFIX}.{DEFAULT_OUTPUT_EXTENSION}")
        })
    }

    /// Resolved output path
    pub fn output_path(&self) -> PathBuf {
        let name = self.output_file_name();
        self.output_dir
            .as_deref()
            .map_or_else(|| PathBuf::from(&name), |dir: &Path| dir.join(&name))
    }
}
