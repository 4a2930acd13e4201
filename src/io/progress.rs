//! Progress display for tile loading and the assignment pass

use crate::io::configuration::PROGRESS_BAR_WIDTH;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::LazyLock;

static PROGRESS_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(&format!(
            "{{prefix:>8}} [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}} {{msg}}"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Coordinates the two progress bars of a mosaic run
///
/// All methods take `&self` so one manager can be shared by the loader and the
/// assignment pass.
pub struct ProgressManager {
    multi_progress: MultiProgress,
    ingestion_bar: ProgressBar,
    assignment_bar: ProgressBar,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressManager {
    /// Create a manager drawing to the terminal
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    /// Create a manager that tracks positions without drawing
    pub fn hidden() -> Self {
        Self::with_draw_target(ProgressDrawTarget::hidden())
    }

    fn with_draw_target(target: ProgressDrawTarget) -> Self {
        let multi_progress = MultiProgress::with_draw_target(target);

        let ingestion_bar = multi_progress.add(ProgressBar::new(0));
        ingestion_bar.set_style(PROGRESS_STYLE.clone());
        ingestion_bar.set_prefix("tiles");

        let assignment_bar = multi_progress.add(ProgressBar::new(0));
        assignment_bar.set_style(PROGRESS_STYLE.clone());
        assignment_bar.set_prefix("cells");

        Self {
            multi_progress,
            ingestion_bar,
            assignment_bar,
        }
    }

    /// Begin tracking `files` loading tasks
    pub fn start_ingestion(&self, files: usize) {
        self.ingestion_bar.set_length(files as u64);
        self.ingestion_bar.set_position(0);
        self.ingestion_bar.set_message("loading");
    }

    /// One loading task has reported
    pub fn file_loaded(&self) {
        self.ingestion_bar.inc(1);
    }

    /// All loading tasks have reported
    pub fn finish_ingestion(&self) {
        self.ingestion_bar.set_message("done");
    }

    /// Begin tracking an assignment pass over `cells` cells
    pub fn start_assignment(&self, cells: usize) {
        self.assignment_bar.set_length(cells as u64);
        self.assignment_bar.set_position(0);
        self.assignment_bar.set_message("assigning");
    }

    /// Advance the assignment bar by `cells`
    pub fn cells_assigned(&self, cells: u64) {
        self.assignment_bar.inc(cells);
    }

    /// The assignment pass has finished
    pub fn finish_assignment(&self) {
        self.assignment_bar.set_message("done");
    }

    /// Files loaded so far
    pub fn files_loaded(&self) -> u64 {
        self.ingestion_bar.position()
    }

    /// Cells assigned so far
    pub fn cells_done(&self) -> u64 {
        self.assignment_bar.position()
    }

    /// Clean up all progress displays
    pub fn finish(&self) {
        self.ingestion_bar.finish();
        self.assignment_bar.finish();
        let _ = self.multi_progress.clear();
    }
}
