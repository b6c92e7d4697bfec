//! Geometry operators: embedding, extraction and padding of nodes.
//!
//! These keep a finite pattern correctly embedded inside a sufficiently
//! padded node. The successor operator returns the *central half* of its
//! input, so before stepping, a pattern must be surrounded by enough empty
//! space that nothing reachable falls outside that central half; [pad]
//! establishes the margin and [crop] strips it again afterwards.

use std::sync::Arc;

use super::{Level, Node, NodeStore};

impl NodeStore {
    /// Embed `m` in the middle of a node one level up, surrounding it with
    /// empty space. The inner half of the result equals `m`.
    ///
    /// Requires level >= 1; a leaf has no quadrants to re-centre.
    pub fn centre(&self, m: &Arc<Node>) -> Arc<Node> {
        assert!(
            m.level() >= Level::expect_from(1),
            "centre requires a node at level >= 1, got {}",
            m.level()
        );
        let z = self.zero(m.level().child());
        self.join(
            self.join(
                Arc::clone(&z),
                Arc::clone(&z),
                Arc::clone(&z),
                Arc::clone(m.nw()),
            ),
            self.join(
                Arc::clone(&z),
                Arc::clone(&z),
                Arc::clone(Node::ne(m)),
                Arc::clone(&z),
            ),
            self.join(
                Arc::clone(&z),
                Arc::clone(m.sw()),
                Arc::clone(&z),
                Arc::clone(&z),
            ),
            self.join(
                Arc::clone(m.se()),
                Arc::clone(&z),
                Arc::clone(&z),
                Arc::clone(&z),
            ),
        )
    }

    /// The central `2^(k-1) x 2^(k-1)` block of `m`, one level down.
    /// Left inverse of [NodeStore::centre] for padded nodes.
    ///
    /// Requires level >= 2.
    pub fn inner(&self, m: &Arc<Node>) -> Arc<Node> {
        assert!(
            m.level() >= Level::expect_from(2),
            "inner requires a node at level >= 2, got {}",
            m.level()
        );
        self.join(
            Arc::clone(m.nw().se()),
            Arc::clone(Node::ne(m).sw()),
            Arc::clone(Node::ne(m.sw())),
            Arc::clone(m.se().nw()),
        )
    }

    /// Repeatedly take the inner node until all removable padding is gone.
    pub fn crop(&self, m: &Arc<Node>) -> Arc<Node> {
        let mut node = Arc::clone(m);
        while node.level() > Level::expect_from(3) && node.is_padded() {
            node = self.inner(&node);
        }
        node
    }

    /// Repeatedly centre a node until it is fully padded.
    ///
    /// Terminates because each centring raises the level and definitionally
    /// empties the outermost ring.
    pub fn pad(&self, m: &Arc<Node>) -> Arc<Node> {
        let mut node = Arc::clone(m);
        while node.level() <= Level::expect_from(3) || !node.is_padded() {
            node = self.centre(&node);
        }
        node
    }
}

impl Node {
    /// True if the whole population of each quadrant sits in the quadrant's
    /// central sub-sub-block, i.e. the pattern is surrounded by at least one
    /// sub-sub-block of empty space. Cropping a padded node by one level
    /// cannot lose an on cell.
    ///
    /// Requires level >= 3.
    pub fn is_padded(&self) -> bool {
        assert!(
            self.level() >= Level::expect_from(3),
            "is_padded requires a node at level >= 3, got {}",
            self.level()
        );
        self.nw().population() == self.nw().se().se().population()
            && self.ne().population() == self.ne().sw().sw().population()
            && self.sw().population() == Node::ne(Node::ne(self.sw())).population()
            && self.se().population() == self.se().nw().nw().population()
    }
}

// -------------------------------------------------------------------------------------------------
// Unit tests.

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quadtree::cells;
    use crate::testing_utils::normalize;

    /// A 2x2 node with a single on cell in the nw corner.
    fn corner_quad(store: &NodeStore) -> Arc<Node> {
        store.join(store.on(), store.off(), store.off(), store.off())
    }

    #[test]
    fn inner_inverts_centre() {
        let store = NodeStore::default();

        let m = corner_quad(&store);
        assert!(Arc::ptr_eq(&store.inner(&store.centre(&m)), &m));

        let bigger = store.centre(&m);
        assert!(Arc::ptr_eq(&store.inner(&store.centre(&bigger)), &bigger));
    }

    #[test]
    fn centre_preserves_population() {
        let store = NodeStore::default();
        let m = corner_quad(&store);
        let centred = store.centre(&m);

        assert_eq!(centred.level(), m.level().parent());
        assert_eq!(centred.population(), m.population());
    }

    #[test]
    fn pad_produces_padded_node() {
        let store = NodeStore::default();
        let m = store.join(store.on(), store.on(), store.on(), store.on());

        let padded = store.pad(&m);

        assert!(padded.level() > Level::expect_from(3));
        assert!(padded.is_padded());
        assert_eq!(padded.population(), m.population());
    }

    #[test]
    fn crop_inverts_pad() {
        let store = NodeStore::default();
        let m = store.join(store.on(), store.on(), store.off(), store.on());

        let round_trip = store.crop(&store.pad(&m));

        // Crop bottoms out above the pattern's own level, so compare cell
        // sets rather than node identity; the pattern itself must be intact.
        assert_eq!(round_trip.population(), m.population());
        assert_eq!(normalize(&cells(&round_trip)), normalize(&cells(&m)));
    }

    #[test]
    fn empty_node_is_padded() {
        let store = NodeStore::default();
        assert!(store.zero(Level::expect_from(5)).is_padded());
    }

    #[test]
    #[should_panic(expected = "inner requires a node at level >= 2")]
    fn inner_below_min_level_panics() {
        let store = NodeStore::default();
        let quad = store.join(store.on(), store.off(), store.off(), store.off());
        let _ = store.inner(&quad);
    }

    #[test]
    #[should_panic(expected = "centre requires a node at level >= 1")]
    fn centre_on_leaf_panics() {
        let store = NodeStore::default();
        let _ = store.centre(&store.on());
    }
}
