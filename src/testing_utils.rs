//! Helpers shared by the unit tests, plus the naive Life oracle that the
//! quadtree engine is checked against. Exposed to calling libraries via the
//! `testing` feature.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::quadtree::{Cell, Level, Node, NodeStore};

/// Check 2 errors are the same.
/// https://stackoverflow.com/a/65618681
macro_rules! assert_err {
    ($expression:expr, $($pattern:tt)+) => {
        match $expression {
            $($pattern)+ => (),
            ref e => panic!("expected `{}` but got `{:?}`", stringify!($($pattern)+), e),
        }
    }
}
pub(crate) use assert_err;

pub fn init_logger() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
        .is_test(true)
        .try_init();
}

/// The baseline implementation of the Game of Life: apply the B3/S23 rule
/// directly to a set of on cells, returning the next generation.
///
/// Hopelessly slow next to the quadtree engine, which is exactly what makes
/// it a trustworthy oracle.
pub fn baseline_life(cells: &HashSet<Cell>) -> HashSet<Cell> {
    let mut neighbour_counts: HashMap<Cell, u32> = HashMap::new();
    for &(x, y) in cells {
        for dx in -1..=1i64 {
            for dy in -1..=1i64 {
                if (dx, dy) != (0, 0) {
                    *neighbour_counts.entry((x + dx, y + dy)).or_insert(0) += 1;
                }
            }
        }
    }

    neighbour_counts
        .into_iter()
        .filter(|&(cell, count)| count == 3 || (count == 2 && cells.contains(&cell)))
        .map(|(cell, _)| cell)
        .collect()
}

/// Translate a cell list so its minimum x & y are zero, then sort and dedup.
/// Makes cell sets comparable across the coordinate-frame shifts that
/// padding and cropping introduce.
pub fn normalize(cells: &[Cell]) -> Vec<Cell> {
    let Some(min_x) = cells.iter().map(|&(x, _)| x).min() else {
        return Vec::new();
    };
    let min_y = cells.iter().map(|&(_, y)| y).min().expect("cells is non-empty");

    let mut normalized: Vec<Cell> = cells
        .iter()
        .map(|&(x, y)| (x - min_x, y - min_y))
        .collect();
    normalized.sort_unstable();
    normalized.dedup();
    normalized
}

/// Recursive sanity check of every invariant a reachable node must satisfy:
/// child levels, population bookkeeping, leaf canonicity and the uniqueness
/// of the empty node per level. Panics on the first violation.
pub fn validate(store: &NodeStore, node: &Arc<Node>) {
    let mut checked = HashSet::new();
    validate_subtree(store, node, &mut checked);
}

fn validate_subtree(store: &NodeStore, node: &Arc<Node>, checked: &mut HashSet<u64>) {
    if !checked.insert(node.id()) {
        return;
    }

    if node.level() == Level::ZERO {
        let leaf = store.leaf(node.population() == 1);
        assert!(
            Arc::ptr_eq(node, &leaf),
            "leaf is not one of the two canonical leaves: {:?}",
            node
        );
        return;
    }

    let children = [node.nw(), Node::ne(node), node.sw(), node.se()];
    for child in children {
        assert_eq!(
            child.level(),
            node.level().child(),
            "child level mismatch under {:?}",
            node
        );
    }
    assert_eq!(
        node.population(),
        children.iter().map(|c| c.population()).sum::<u64>(),
        "population is not the sum of the children under {:?}",
        node
    );
    assert!(
        u128::from(node.population()) <= 1u128 << (2 * node.level().as_u32()),
        "population exceeds the cell count of {:?}",
        node
    );
    if node.population() == 0 {
        assert!(
            Arc::ptr_eq(node, &store.zero(node.level())),
            "empty node is not the canonical zero: {:?}",
            node
        );
    }

    for child in children {
        validate_subtree(store, child, checked);
    }
}

// -------------------------------------------------------------------------------------------------
// Unit tests.

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_blinker_oscillates() {
        let horizontal: HashSet<Cell> = [(0, 0), (1, 0), (2, 0)].into_iter().collect();
        let vertical: HashSet<Cell> = [(1, -1), (1, 0), (1, 1)].into_iter().collect();

        assert_eq!(baseline_life(&horizontal), vertical);
        assert_eq!(baseline_life(&vertical), horizontal);
    }

    #[test]
    fn baseline_lonely_cells_die() {
        let sparse: HashSet<Cell> = [(0, 0), (10, 10)].into_iter().collect();
        assert!(baseline_life(&sparse).is_empty());
    }

    #[test]
    fn normalize_translates_and_sorts() {
        assert_eq!(
            normalize(&[(5, 9), (3, 9), (3, 12), (5, 9)]),
            vec![(0, 0), (0, 3), (2, 0)]
        );
        assert!(normalize(&[]).is_empty());
    }

    #[test]
    fn validate_accepts_a_constructed_tree() {
        let store = NodeStore::default();
        let node = store
            .construct(&[(0, 0), (5, 5), (2, 3), (7, 0)])
            .unwrap();
        validate(&store, &node);
        validate(&store, &store.zero(Level::expect_from(9)));
    }
}
