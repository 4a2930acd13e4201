//! End-to-end mosaic run: target preparation, tile ingestion, assignment and composition
//!
//! A [`MosaicMaker`] caches the prepared target and the profiled tile set between
//! runs. Setters record which of the two a parameter change invalidates, so a new
//! epsilon or output location re-runs only the assignment pass.

use crate::algorithm::assignment::{Assignment, AssignmentEngine};
use crate::algorithm::grid::TargetGrid;
use crate::ingestion::{TileIngestor, TileSet};
use crate::io::compositor::{compose, save_mosaic};
use crate::io::error::{Result, invalid_parameter};
use crate::io::image::load_target;
use crate::io::parameters::MosaicParameters;
use crate::io::progress::ProgressManager;
use image::RgbImage;
use std::path::PathBuf;

/// Upscaled target photo and its downsampled grid
#[derive(Debug, Clone)]
pub struct PreparedTarget {
    /// Target after the integer upscale; fixes the canvas size
    pub image: RgbImage,
    /// One query color per tile position
    pub grid: TargetGrid,
}

/// Composed mosaic together with the assignment that produced it
#[derive(Debug, Clone)]
pub struct MosaicRender {
    /// Composed canvas, the size of the upscaled target
    pub canvas: RgbImage,
    /// Per-cell tile choices and usage counts
    pub assignment: Assignment,
}

/// Builds mosaics from a resolved parameter record
pub struct MosaicMaker {
    parameters: MosaicParameters,
    workers: Option<usize>,
    deterministic: bool,
    progress: Option<ProgressManager>,
    target: Option<PreparedTarget>,
    tiles: Option<TileSet>,
}

impl MosaicMaker {
    /// Create a maker; nothing is loaded until the first run
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters fail validation
    pub fn new(parameters: MosaicParameters) -> Result<Self> {
        parameters.validate()?;
        Ok(Self {
            parameters,
            workers: None,
            deterministic: false,
            progress: None,
            target: None,
            tiles: None,
        })
    }

    /// Bound the tile loading pool to `workers` threads
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self.tiles = None;
        self
    }

    /// Assign tile ids by source path instead of load completion order
    pub fn with_deterministic_order(mut self, deterministic: bool) -> Self {
        self.deterministic = deterministic;
        self.tiles = None;
        self
    }

    /// Report loading and assignment progress through `progress`
    pub fn with_progress(mut self, progress: ProgressManager) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Current parameters
    pub const fn parameters(&self) -> &MosaicParameters {
        &self.parameters
    }

    /// Profiled tile set from the last setup, if still valid
    pub const fn tiles(&self) -> Option<&TileSet> {
        self.tiles.as_ref()
    }

    /// Prepared target from the last setup, if still valid
    pub const fn target(&self) -> Option<&PreparedTarget> {
        self.target.as_ref()
    }

    /// Whether the next run must reload the target or the tiles
    pub const fn needs_setup(&self) -> bool {
        self.target.is_none() || self.tiles.is_none()
    }

    /// Replace every parameter, invalidating only what the change affects
    ///
    /// # Errors
    ///
    /// Returns an error if the new parameters fail validation
    pub fn set_parameters(&mut self, parameters: MosaicParameters) -> Result<()> {
        parameters.validate()?;
        let old = &self.parameters;

        let target_changed = old.target != parameters.target || old.upscale != parameters.upscale;
        let tiles_changed = old.tile_pattern != parameters.tile_pattern
            || old.tile_multiplier != parameters.tile_multiplier
            || old.ratio_width != parameters.ratio_width
            || old.ratio_height != parameters.ratio_height
            || old.mirror != parameters.mirror;

        // Grid dimensions depend on the tile size as well as the target
        if target_changed || tiles_changed {
            self.target = None;
        }
        if tiles_changed {
            self.tiles = None;
        }
        self.parameters = parameters;
        Ok(())
    }

    /// Change the decay strength
    ///
    /// # Errors
    ///
    /// Returns an error if `epsilon` is negative or not finite
    pub fn set_epsilon(&mut self, epsilon: f64) -> Result<()> {
        let parameters = MosaicParameters {
            epsilon,
            ..self.parameters.clone()
        };
        self.set_parameters(parameters)
    }

    /// Change the target photo
    ///
    /// # Errors
    ///
    /// Never fails for a valid current parameter set
    pub fn set_target(&mut self, target: impl Into<PathBuf>) -> Result<()> {
        let parameters = MosaicParameters {
            target: target.into(),
            ..self.parameters.clone()
        };
        self.set_parameters(parameters)
    }

    /// Change the target upscale multiplier
    ///
    /// # Errors
    ///
    /// Returns an error if `upscale` is zero
    pub fn set_upscale(&mut self, upscale: u32) -> Result<()> {
        let parameters = MosaicParameters {
            upscale,
            ..self.parameters.clone()
        };
        self.set_parameters(parameters)
    }

    /// Change the tile source pattern
    ///
    /// # Errors
    ///
    /// Never fails for a valid current parameter set
    pub fn set_tile_pattern(&mut self, pattern: impl Into<String>) -> Result<()> {
        let parameters = MosaicParameters {
            tile_pattern: pattern.into(),
            ..self.parameters.clone()
        };
        self.set_parameters(parameters)
    }

    /// Change the tile ratio
    ///
    /// # Errors
    ///
    /// Returns an error if either component is zero or the tile size overflows
    pub fn set_tile_ratio(&mut self, ratio_width: u32, ratio_height: u32) -> Result<()> {
        let parameters = MosaicParameters {
            ratio_width,
            ratio_height,
            ..self.parameters.clone()
        };
        self.set_parameters(parameters)
    }

    /// Change the tile size multiplier
    ///
    /// # Errors
    ///
    /// Returns an error if `multiplier` is zero or the tile size overflows
    pub fn set_tile_multiplier(&mut self, multiplier: u32) -> Result<()> {
        let parameters = MosaicParameters {
            tile_multiplier: multiplier,
            ..self.parameters.clone()
        };
        self.set_parameters(parameters)
    }

    /// Enable or disable the rotated tile variants
    ///
    /// # Errors
    ///
    /// Never fails for a valid current parameter set
    pub fn set_mirror(&mut self, mirror: bool) -> Result<()> {
        let parameters = MosaicParameters {
            mirror,
            ..self.parameters.clone()
        };
        self.set_parameters(parameters)
    }

    /// Change the output file name and directory
    ///
    /// # Errors
    ///
    /// Never fails for a valid current parameter set
    pub fn set_output(
        &mut self,
        output_name: Option<String>,
        output_dir: Option<PathBuf>,
    ) -> Result<()> {
        let parameters = MosaicParameters {
            output_name,
            output_dir,
            ..self.parameters.clone()
        };
        self.set_parameters(parameters)
    }

    /// Load whatever the current parameters have invalidated
    ///
    /// The target is prepared before tiles are ingested so that an undecodable target
    /// or an empty grid fails without scanning the tile directory.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The target cannot be decoded or its grid rounds to zero cells
    /// - The tile directory cannot be read or yields no usable tile
    pub fn setup(&mut self) -> Result<()> {
        let tile_size = self.parameters.tile_size()?;

        if self.target.is_none() {
            let image = load_target(&self.parameters.target, self.parameters.upscale)?;
            let grid = TargetGrid::from_image(&image, tile_size)?;
            self.target = Some(PreparedTarget { image, grid });
        }

        if self.tiles.is_none() {
            let mut ingestor =
                TileIngestor::new(tile_size, self.parameters.orientation_filter())
                    .with_mirror(self.parameters.mirror)
                    .with_deterministic_order(self.deterministic);
            if let Some(workers) = self.workers {
                ingestor = ingestor.with_workers(workers);
            }

            let tiles =
                ingestor.ingest_source(&self.parameters.tile_source(), self.progress.as_ref())?;
            self.tiles = Some(TileSet::from_tiles(tiles));
        }

        Ok(())
    }

    /// Assign and compose a mosaic without writing it
    ///
    /// # Errors
    ///
    /// Returns an error if setup, assignment or composition fails
    pub fn render(&mut self) -> Result<MosaicRender> {
        if self.needs_setup() {
            self.setup()?;
        }
        let tile_size = self.parameters.tile_size()?;
        let engine = AssignmentEngine::new(self.parameters.epsilon)?;

        let (Some(target), Some(tiles)) = (self.target.as_ref(), self.tiles.as_mut()) else {
            return Err(invalid_parameter(
                "setup",
                &"incomplete",
                &"target and tiles must be loaded before rendering",
            ));
        };

        let assignment = engine.assign(&target.grid, tiles, self.progress.as_ref())?;
        tiles.record_usage(&assignment.usage);

        let canvas = compose(
            &assignment.grid,
            tiles,
            tile_size,
            target.image.width(),
            target.image.height(),
        )?;

        Ok(MosaicRender { canvas, assignment })
    }

    /// Run the whole pipeline and write the mosaic to the resolved output path
    ///
    /// Nothing is written unless every earlier stage succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if any stage fails, including the final write
    pub fn create_mosaic(&mut self) -> Result<PathBuf> {
        let render = self.render()?;
        let output_path = self.parameters.output_path();
        save_mosaic(&render.canvas, &output_path)?;

        if let Some(ref pm) = self.progress {
            pm.finish();
        }
        Ok(output_path)
    }
}
