/// Command-line interface and command dispatch
pub mod cli;
/// Mosaic composition and export
pub mod compositor;
/// Constants and runtime configuration defaults
pub mod configuration;
/// Error types
pub mod error;
/// Target photo decoding and upscaling
pub mod image;
/// Terminal logger setup
pub mod logging;
/// Resolved parameter record and output path resolution
pub mod parameters;
/// Progress display
pub mod progress;
/// Named parameter profile store
pub mod settings;
