//! Mosaic constants and runtime configuration defaults

// Tile discovery
/// Files whose name contains this marker are generated artifacts, never tiles
pub const RESERVED_SUMMARY_MARKER: &str = "Summary";

// Default values for configurable parameters
/// Default decay strength (pure nearest-color assignment)
pub const DEFAULT_EPSILON: f64 = 0.0;
/// Default integer upscale applied to the target photo
pub const DEFAULT_UPSCALE: u32 = 1;
/// Default tile size multiplier
pub const DEFAULT_TILE_MULTIPLIER: u32 = 10;
/// Default tile ratio width
pub const DEFAULT_RATIO_WIDTH: u32 = 1;
/// Default tile ratio height
pub const DEFAULT_RATIO_HEIGHT: u32 = 1;

// Output settings
/// Suffix added to the target's base name for the default output file
pub const OUTPUT_SUFFIX: &str = "_mosaic";
/// Extension of the default output file
pub const DEFAULT_OUTPUT_EXTENSION: &str = "jpg";

// Settings store
/// Default location of the profile store
pub const DEFAULT_SETTINGS_FILE: &str = "mosaic_profiles.json";

// Progress bar display settings
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;
/// Assignment progress is redrawn once per this many cells
pub const ASSIGNMENT_PROGRESS_STRIDE: u64 = 64;
