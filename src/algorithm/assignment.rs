//! Greedy per-cell tile assignment with anti-repeat decay
//!
//! Cells are visited in a fixed order: outer loop over the grid width, inner loop
//! over the grid height. Each cell queries the index built from the current working
//! colors, records the nearest tile, decays that tile's color and rebuilds the index
//! before the next query. Every cell therefore depends on the decisions of all the
//! cells before it, so the pass is strictly sequential.

use crate::algorithm::grid::{AssignmentGrid, TargetGrid};
use crate::index::{ColorIndex, NearestColorIndex};
use crate::ingestion::{Color, TileSet};
use crate::io::configuration::ASSIGNMENT_PROGRESS_STRIDE;
use crate::io::error::{MosaicError, Result, invalid_parameter};
use crate::io::progress::ProgressManager;

/// Shrink a tile color after one more use
///
/// `uses_before` is the tile's usage counter prior to this use. Two multiplicative
/// factors are applied in sequence, `1 - epsilon * c` and then `1 - epsilon * (c + 1)`.
/// Results are not clamped and may reach zero or go negative.
pub fn decay_color(color: Color, uses_before: u32, epsilon: f64) -> Color {
    let before = f64::from(uses_before);
    let after = before + 1.0;

    let shrunk = color.map(|channel| channel * (1.0 - epsilon * before));
    shrunk.map(|channel| channel - channel * epsilon * after)
}

/// Outcome of one assignment pass
#[derive(Debug, Clone)]
pub struct Assignment {
    /// Chosen tile id per cell
    pub grid: AssignmentGrid,
    /// Number of cells assigned to each tile, indexed by tile id
    pub usage: Vec<u32>,
    /// Working colors after all decay steps, indexed by tile id
    pub decayed_colors: Vec<Color>,
}

/// Walks the target grid assigning a tile to every cell
#[derive(Debug, Clone, Copy)]
pub struct AssignmentEngine {
    epsilon: f64,
}

impl AssignmentEngine {
    /// Create an engine with decay strength `epsilon`
    ///
    /// # Errors
    ///
    /// Returns an error if `epsilon` is negative or not finite
    pub fn new(epsilon: f64) -> Result<Self> {
        if !epsilon.is_finite() || epsilon < 0.0 {
            return Err(invalid_parameter(
                "epsilon",
                &epsilon,
                &"must be a finite value >= 0",
            ));
        }
        Ok(Self { epsilon })
    }

    /// Decay strength
    pub const fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Assign tiles from `tiles` using a working copy of their extracted colors
    ///
    /// The tile set itself is left unchanged; decayed colors and usage counts are
    /// returned in the [`Assignment`].
    ///
    /// # Errors
    ///
    /// Returns an error if the tile set is empty
    pub fn assign(
        &self,
        target: &TargetGrid,
        tiles: &TileSet,
        progress: Option<&ProgressManager>,
    ) -> Result<Assignment> {
        let colors = tiles.colors().to_vec();
        let counters = vec![0; colors.len()];
        self.assign_with::<NearestColorIndex>(target, colors, counters, progress)
    }

    /// Assign tiles over explicit working colors and counters
    ///
    /// `colors[id]` and `counters[id]` describe tile `id`. The index type `I` is
    /// rebuilt from the working colors after every cell.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `colors` is empty (no index can be built)
    /// - `colors` and `counters` differ in length
    pub fn assign_with<I: ColorIndex>(
        &self,
        target: &TargetGrid,
        mut colors: Vec<Color>,
        mut counters: Vec<u32>,
        progress: Option<&ProgressManager>,
    ) -> Result<Assignment> {
        if colors.len() != counters.len() {
            return Err(invalid_parameter(
                "usage counters",
                &counters.len(),
                &format!("expected one counter per color ({})", colors.len()),
            ));
        }
        let empty_set = || MosaicError::EmptyTileSet {
            source_pattern: "assignment colors".to_string(),
            discovered: 0,
        };

        let mut index = I::build(&colors).ok_or_else(empty_set)?;
        let mut grid = AssignmentGrid::new(target.width(), target.height());

        if let Some(pm) = progress {
            pm.start_assignment(target.len());
        }

        let mut assigned: u64 = 0;
        for i in 0..target.width() {
            for j in 0..target.height() {
                let query = target.color(i, j).unwrap_or_default();
                let nearest = index.query(&query).ok_or_else(empty_set)?;
                grid.set(i, j, nearest.id);

                if let (Some(color), Some(count)) =
                    (colors.get_mut(nearest.id), counters.get_mut(nearest.id))
                {
                    *color = decay_color(*color, *count, self.epsilon);
                    *count += 1;
                }

                index = I::build(&colors).ok_or_else(empty_set)?;

                assigned += 1;
                if let Some(pm) = progress
                    && assigned % ASSIGNMENT_PROGRESS_STRIDE == 0
                {
                    pm.cells_assigned(ASSIGNMENT_PROGRESS_STRIDE);
                }
            }
        }

        if let Some(pm) = progress {
            pm.cells_assigned(assigned % ASSIGNMENT_PROGRESS_STRIDE);
            pm.finish_assignment();
        }

        let distinct = counters.iter().filter(|&&c| c > 0).count();
        log::info!(
            "Assigned {assigned} cells using {distinct} of {} tiles",
            counters.len()
        );

        Ok(Assignment {
            grid,
            usage: counters,
            decayed_colors: colors,
        })
    }
}
