/// Greedy per-cell assignment with anti-repeat decay
pub mod assignment;
/// Target and assignment grids
pub mod grid;
/// End-to-end mosaic orchestration
pub mod pipeline;
