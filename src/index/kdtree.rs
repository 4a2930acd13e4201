//! Balanced k-d tree over tile colors
//!
//! Built by recursive median splits cycling through the three channels, giving
//! O(N log N) construction. Queries return the single nearest stored color,
//! preferring the lowest tile id among equally distant candidates.

use crate::index::{ColorIndex, Neighbor, squared_distance};
use crate::ingestion::Color;
use std::cmp::Ordering;

const DIMENSIONS: usize = 3;

#[derive(Debug, Clone)]
struct Node {
    point: Color,
    id: usize,
    axis: usize,
    left: Option<usize>,
    right: Option<usize>,
}

/// Immutable nearest-color index snapshot
///
/// Has no update operation. After any stored color changes the index is stale and
/// must be rebuilt with [`NearestColorIndex::build`].
#[derive(Debug, Clone)]
pub struct NearestColorIndex {
    nodes: Vec<Node>,
    root: Option<usize>,
}

// Best candidate so far as (squared distance, id); compared lexicographically
type Candidate = (f64, usize);

fn is_better(candidate: Candidate, best: Option<Candidate>) -> bool {
    best.is_none_or(|(best_distance, best_id)| {
        match candidate.0.total_cmp(&best_distance) {
            Ordering::Less => true,
            Ordering::Equal => candidate.1 < best_id,
            Ordering::Greater => false,
        }
    })
}

impl NearestColorIndex {
    fn build_subtree(
        nodes: &mut Vec<Node>,
        entries: &mut [(Color, usize)],
        depth: usize,
    ) -> Option<usize> {
        if entries.is_empty() {
            return None;
        }

        let axis = depth % DIMENSIONS;
        let median = entries.len() / 2;
        entries.select_nth_unstable_by(median, |a, b| {
            a.0.get(axis)
                .copied()
                .unwrap_or_default()
                .total_cmp(&b.0.get(axis).copied().unwrap_or_default())
                .then(a.1.cmp(&b.1))
        });

        let (lower, rest) = entries.split_at_mut(median);
        let (pivot, upper) = rest.split_first_mut()?;

        let index = nodes.len();
        nodes.push(Node {
            point: pivot.0,
            id: pivot.1,
            axis,
            left: None,
            right: None,
        });

        let left = Self::build_subtree(nodes, lower, depth + 1);
        let right = Self::build_subtree(nodes, upper, depth + 1);
        if let Some(node) = nodes.get_mut(index) {
            node.left = left;
            node.right = right;
        }
        Some(index)
    }

    fn search(&self, node_index: Option<usize>, point: &Color, best: &mut Option<Candidate>) {
        let Some(node) = node_index.and_then(|i| self.nodes.get(i)) else {
            return;
        };

        let candidate = (squared_distance(point, &node.point), node.id);
        if is_better(candidate, *best) {
            *best = Some(candidate);
        }

        let split = node.point.get(node.axis).copied().unwrap_or_default();
        let offset = point.get(node.axis).copied().unwrap_or_default() - split;
        let (near, far) = if offset < 0.0 {
            (node.left, node.right)
        } else {
            (node.right, node.left)
        };

        self.search(near, point, best);

        // Equal-distance candidates across the plane may carry a lower id
        let crosses_plane = best.is_none_or(|(best_distance, _)| offset * offset <= best_distance);
        if crosses_plane {
            self.search(far, point, best);
        }
    }
}

impl ColorIndex for NearestColorIndex {
    fn build(colors: &[Color]) -> Option<Self> {
        let mut entries: Vec<(Color, usize)> = colors
            .iter()
            .copied()
            .enumerate()
            .map(|(id, color)| (color, id))
            .collect();

        let mut nodes = Vec::with_capacity(entries.len());
        let root = Self::build_subtree(&mut nodes, &mut entries, 0)?;
        log::trace!("Built color index over {} tiles", nodes.len());

        Some(Self {
            nodes,
            root: Some(root),
        })
    }

    fn query(&self, point: &Color) -> Option<Neighbor> {
        let mut best = None;
        self.search(self.root, point, &mut best);
        best.map(|(squared, id)| Neighbor {
            distance: squared.sqrt(),
            id,
        })
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }
}
