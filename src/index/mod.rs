//! Nearest-color indices over the current tile colors
//!
//! An index is an immutable snapshot of the color set it was built from. There is
//! no incremental update: any change to a stored color requires a full rebuild
//! before the next query can be trusted.

use crate::ingestion::Color;

/// Balanced k-d tree over tile colors
pub mod kdtree;
/// Exhaustive scan used as a reference implementation
pub mod linear;

pub use kdtree::NearestColorIndex;
pub use linear::LinearScanIndex;

/// Result of a nearest-color query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Euclidean distance between the query and the stored color
    pub distance: f64,
    /// Tile id of the stored color
    pub id: usize,
}

/// A rebuildable structure answering single nearest-neighbour color queries
///
/// Implementations must break distance ties towards the lowest tile id.
pub trait ColorIndex: Sized {
    /// Build an index over `colors`, where position in the slice is the tile id
    ///
    /// Returns `None` when `colors` is empty.
    fn build(colors: &[Color]) -> Option<Self>;

    /// Find the stored color nearest to `point`
    fn query(&self, point: &Color) -> Option<Neighbor>;

    /// Number of colors in the index
    fn len(&self) -> usize;

    /// Whether the index holds no colors
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Squared Euclidean distance between two colors
pub fn squared_distance(a: &Color, b: &Color) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum()
}
