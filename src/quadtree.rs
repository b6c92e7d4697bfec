//! Hash-consed quadtree representation of an infinite Life plane.
//!
//! A [Node] represents a square region of side `2^k` cells, where `k` is the
//! node's [Level]. A node at level `k >= 1` is made of four child nodes at
//! level `k - 1` (the `nw`, `ne`, `sw` & `se` quadrants); a node at level 0 is
//! a single cell, either on or off.
//!
//! Nodes are *hash-consed*: the [NodeStore] guarantees that at most one node
//! exists for any given structural content, so structural equality collapses
//! to identity equality. Every operator in this module leans on that
//! guarantee, most importantly the memoized successor operator which keys its
//! cache on node identity alone.
//!
//! Nodes are only ever created through [NodeStore::join] (or the leaf & zero
//! constructors) and are immutable for their entire lifetime. The store hands
//! out [Arc] references; all other components hold non-owning clones of
//! those.

use std::fmt;
use std::sync::Arc;

mod construct;
pub use construct::PatternError;

mod evolve;

mod expand;
pub use expand::{cells, expand, to_text, Clip};

mod geometry;

mod level;
pub use level::{Level, LevelError, MAX_LEVEL};

mod store;
pub use store::NodeStore;

/// A single on-cell position on the plane. The interchange format between
/// pattern parsers, the tree constructor and the readout operators.
pub type Cell = (i64, i64);

// -------------------------------------------------------------------------------------------------
// Main structs.

/// A canonical quadtree node covering a `2^k x 2^k` square of cells.
///
/// Two nodes with the same structural content are guaranteed to be the same
/// allocation, so `id` equality is structural equality. See the
/// [module docs](self) for the hash-consing discipline.
pub struct Node {
    id: u64,
    level: Level,
    population: u64,
    children: Option<Children>,
}

/// The four quadrants of a non-leaf node, each one level down.
struct Children {
    nw: Arc<Node>,
    ne: Arc<Node>,
    sw: Arc<Node>,
    se: Arc<Node>,
}

// -------------------------------------------------------------------------------------------------
// Accessor methods.

impl Node {
    /// Canonical identity of this node. Stable for the lifetime of the store
    /// that minted it, and shared by all structurally equal nodes.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn level(&self) -> Level {
        self.level
    }

    /// Number of on cells in this subtree. Always in `[0, 4^level]`.
    pub fn population(&self) -> u64 {
        self.population
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// North-west quadrant. Panics on a leaf node; asking a single cell for
    /// its quadrants is a programming error.
    pub fn nw(&self) -> &Arc<Node> {
        &self.quadrants().nw
    }

    /// North-east quadrant. Panics on a leaf node.
    pub fn ne(&self) -> &Arc<Node> {
        &self.quadrants().ne
    }

    /// South-west quadrant. Panics on a leaf node.
    pub fn sw(&self) -> &Arc<Node> {
        &self.quadrants().sw
    }

    /// South-east quadrant. Panics on a leaf node.
    pub fn se(&self) -> &Arc<Node> {
        &self.quadrants().se
    }

    fn quadrants(&self) -> &Children {
        self.children
            .as_ref()
            .expect("quadrant access on a leaf node")
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Node {}

impl std::hash::Hash for Node {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Deliberately shallow; deriving [Debug] would print the entire (shared)
/// subtree.
impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Node {{ id: {}, level: {}, {side} x {side}, population: {} }}",
            self.id,
            self.level,
            self.population,
            side = self.level.side_len(),
        )
    }
}

// -------------------------------------------------------------------------------------------------
// Unit tests.

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaf_accessors() {
        let store = NodeStore::default();
        let on = store.on();
        let off = store.off();

        assert!(on.is_leaf());
        assert!(off.is_leaf());
        assert_eq!(on.population(), 1);
        assert_eq!(off.population(), 0);
        assert_eq!(on.level(), Level::ZERO);
    }

    #[test]
    #[should_panic(expected = "quadrant access on a leaf node")]
    fn quadrant_access_on_leaf_panics() {
        let store = NodeStore::default();
        let _ = store.on().nw();
    }

    #[test]
    fn debug_is_shallow() {
        let store = NodeStore::default();
        let node = store.zero(Level::expect_from(2));
        let repr = format!("{:?}", node);
        assert!(repr.contains("level: 2"));
        assert!(repr.contains("4 x 4"));
    }
}
