//! Exhaustive nearest-color scan

use crate::index::{ColorIndex, Neighbor, squared_distance};
use crate::ingestion::Color;

/// Index that compares the query against every stored color
///
/// O(N) per query with a trivial build. Serves as the reference the k-d tree is
/// checked against, and is competitive for very small tile sets.
#[derive(Debug, Clone)]
pub struct LinearScanIndex {
    colors: Vec<Color>,
}

impl ColorIndex for LinearScanIndex {
    fn build(colors: &[Color]) -> Option<Self> {
        (!colors.is_empty()).then(|| Self {
            colors: colors.to_vec(),
        })
    }

    fn query(&self, point: &Color) -> Option<Neighbor> {
        let mut best: Option<(f64, usize)> = None;
        for (id, color) in self.colors.iter().enumerate() {
            let distance = squared_distance(point, color);
            // Strict comparison keeps the lowest id on ties
            if best.is_none_or(|(best_distance, _)| distance < best_distance) {
                best = Some((distance, id));
            }
        }
        best.map(|(squared, id)| Neighbor {
            distance: squared.sqrt(),
            id,
        })
    }

    fn len(&self) -> usize {
        self.colors.len()
    }
}
