//! Bottom-up assembly of a quadtree from a sparse cell list.

use std::collections::HashMap;
use std::sync::Arc;

use logging_timer::stime;
use thiserror::Error;

use super::{Cell, Level, Node, NodeStore};

#[derive(Error, Debug)]
pub enum PatternError {
    #[error("Cannot construct a node from an empty cell list")]
    EmptyPattern,
}

impl NodeStore {
    /// Build the canonical node containing the given on cells.
    ///
    /// Coordinates are translated so the minimum x and y land at zero, then
    /// cells are paired level by level into 2x2 blocks until a single node
    /// remains. The result is always at level >= 1 and must still be padded
    /// (see [NodeStore::pad]) before any successor computation, so that the
    /// pattern is interior to the node.
    #[stime("debug", "NodeStore::{}")]
    pub fn construct(&self, cells: &[Cell]) -> Result<Arc<Node>, PatternError> {
        if cells.is_empty() {
            return Err(PatternError::EmptyPattern);
        }

        // Force start at (0,0).
        let min_x = cells.iter().map(|&(x, _)| x).min().expect("cells is non-empty");
        let min_y = cells.iter().map(|&(_, y)| y).min().expect("cells is non-empty");
        let mut pattern: HashMap<Cell, Arc<Node>> = cells
            .iter()
            .map(|&(x, y)| ((x - min_x, y - min_y), self.on()))
            .collect();

        let mut level = Level::ZERO;
        // Merge 2x2 neighbourhoods one level at a time. Runs at least once so
        // that a single-cell pattern still comes out as a (paddable) level-1
        // node rather than a bare leaf.
        while pattern.len() != 1 || level == Level::ZERO {
            let zero = self.zero(level);
            let mut next_level = HashMap::with_capacity(pattern.len() / 2 + 1);

            while let Some(&(x, y)) = pattern.keys().next() {
                let (x, y) = (x & !1, y & !1);
                // Read all 2x2 neighbours, removing them from those still to
                // work through; at least one must exist by definition.
                let nw = pattern.remove(&(x, y)).unwrap_or_else(|| Arc::clone(&zero));
                let ne = pattern
                    .remove(&(x + 1, y))
                    .unwrap_or_else(|| Arc::clone(&zero));
                let sw = pattern
                    .remove(&(x, y + 1))
                    .unwrap_or_else(|| Arc::clone(&zero));
                let se = pattern
                    .remove(&(x + 1, y + 1))
                    .unwrap_or_else(|| Arc::clone(&zero));
                next_level.insert((x >> 1, y >> 1), self.join(nw, ne, sw, se));
            }

            pattern = next_level;
            level = level.parent();
        }

        Ok(pattern
            .into_values()
            .next()
            .expect("[Bug in pattern constructor] Unable to find root node"))
    }
}

// -------------------------------------------------------------------------------------------------
// Unit tests.

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quadtree::cells;
    use crate::testing_utils::{assert_err, normalize};

    #[test]
    fn empty_pattern_gives_err() {
        let store = NodeStore::default();
        assert_err!(store.construct(&[]), Err(PatternError::EmptyPattern));
    }

    #[test]
    fn single_cell_is_paddable() {
        let store = NodeStore::default();
        let node = store.construct(&[(7, -3)]).unwrap();

        assert!(node.level() >= Level::expect_from(1));
        assert_eq!(node.population(), 1);
        // The whole point of the minimum level: pad must accept the result.
        assert!(store.pad(&node).is_padded());
    }

    #[test]
    fn construct_then_expand_round_trips() {
        let store = NodeStore::default();
        let pts = vec![(3, 1), (-2, 4), (0, 0), (5, 5), (-2, -2)];

        let node = store.construct(&pts).unwrap();

        assert_eq!(node.population(), pts.len() as u64);
        assert_eq!(normalize(&cells(&node)), normalize(&pts));
    }

    #[test]
    fn construct_is_canonical() {
        let store = NodeStore::default();
        let pts = vec![(0, 0), (1, 0), (0, 1), (1, 1)];

        let a = store.construct(&pts).unwrap();
        // Same pattern given in a different order and a different position
        // on the plane lands on the identical node.
        let shifted: Vec<Cell> = pts.iter().rev().map(|&(x, y)| (x + 40, y - 9)).collect();
        let b = store.construct(&shifted).unwrap();

        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn duplicate_cells_collapse() {
        let store = NodeStore::default();
        let node = store.construct(&[(2, 2), (2, 2), (3, 2)]).unwrap();
        assert_eq!(node.population(), 2);
    }
}
