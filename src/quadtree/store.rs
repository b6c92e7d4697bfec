//! Canonical node store, i.e. the hash-cons table.
//!
//! The store is the only component allowed to mint nodes. [NodeStore::join]
//! is a content-addressed constructor: it maps a four-tuple of child
//! identities to the unique canonical parent node, creating one only if none
//! exists yet. Everything else in the crate relies on the resulting
//! structural-uniqueness guarantee.
//!
//! The store also owns the two derived caches whose lifetimes must match its
//! own: the successor memo and the zero pyramid. Keeping all three together
//! means they can be dropped together, which is what makes the bounded
//! capacity mode sound (a memo entry holds a node identity; dropping the
//! store without dropping the memo would let a stale identity alias a freshly
//! minted node).

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use log::debug;

use super::{Children, Level, Node};
use crate::UniverseConfig;

/// Identity of the off leaf. The on leaf is [ON_ID]; all minted identities
/// start above these two.
const OFF_ID: u64 = 0;
const ON_ID: u64 = 1;

// -------------------------------------------------------------------------------------------------
// Main struct.

/// Content-addressed node table with its derived caches.
///
/// All maps support an atomic get-or-insert, so `&self` is enough for every
/// operation; the store can be shared freely behind an [Arc].
pub struct NodeStore {
    /// Hash-cons table: four child identities to the canonical parent.
    interned: DashMap<[u64; 4], Arc<Node>>,
    /// Successor memo, keyed on (node identity, clamped step exponent).
    pub(super) memo: DashMap<(u64, u8), Arc<Node>>,
    /// Zero pyramid: the canonical all-off node per level.
    zeros: DashMap<u8, Arc<Node>>,
    on: Arc<Node>,
    off: Arc<Node>,
    next_id: AtomicU64,
    config: UniverseConfig,
}

// -------------------------------------------------------------------------------------------------
// Construction & accessors.

impl NodeStore {
    pub fn new(config: UniverseConfig) -> Self {
        let off = Arc::new(Node {
            id: OFF_ID,
            level: Level::ZERO,
            population: 0,
            children: None,
        });
        let on = Arc::new(Node {
            id: ON_ID,
            level: Level::ZERO,
            population: 1,
            children: None,
        });

        NodeStore {
            interned: DashMap::new(),
            memo: DashMap::new(),
            zeros: DashMap::new(),
            on,
            off,
            next_id: AtomicU64::new(ON_ID + 1),
            config,
        }
    }

    /// The canonical on leaf, one of the two process-wide level-0 singletons.
    pub fn on(&self) -> Arc<Node> {
        Arc::clone(&self.on)
    }

    /// The canonical off leaf.
    pub fn off(&self) -> Arc<Node> {
        Arc::clone(&self.off)
    }

    pub fn leaf(&self, alive: bool) -> Arc<Node> {
        if alive {
            self.on()
        } else {
            self.off()
        }
    }

    /// Number of distinct non-leaf nodes currently interned.
    pub fn node_count(&self) -> usize {
        self.interned.len()
    }

    /// Number of entries in the successor memo.
    pub fn memo_len(&self) -> usize {
        self.memo.len()
    }

    pub fn config(&self) -> &UniverseConfig {
        &self.config
    }

    fn mint_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for NodeStore {
    fn default() -> Self {
        NodeStore::new(UniverseConfig::default())
    }
}

// -------------------------------------------------------------------------------------------------
// Hash-consed constructors.

impl NodeStore {
    /// Combine four children at level `k - 1` into the canonical node at
    /// level `k`.
    ///
    /// Any two calls with the same child identities return the same node.
    /// Mixed child levels are a programming error and panic.
    pub fn join(&self, nw: Arc<Node>, ne: Arc<Node>, sw: Arc<Node>, se: Arc<Node>) -> Arc<Node> {
        let child_level = nw.level();
        assert!(
            ne.level() == child_level && sw.level() == child_level && se.level() == child_level,
            "mixed child levels in join: nw={} ne={} sw={} se={}",
            nw.level(),
            ne.level(),
            sw.level(),
            se.level(),
        );
        let level = child_level.parent();

        let key = [nw.id(), ne.id(), sw.id(), se.id()];
        if let Some(node) = self.interned.get(&key) {
            return Arc::clone(node.value());
        }

        let population = nw.population() + ne.population() + sw.population() + se.population();
        Arc::clone(
            self.interned
                .entry(key)
                .or_insert_with(|| {
                    Arc::new(Node {
                        id: self.mint_id(),
                        level,
                        population,
                        children: Some(Children { nw, ne, sw, se }),
                    })
                })
                .value(),
        )
    }

    /// The canonical empty node at the given level.
    ///
    /// Because of hash-consing this is *the* unique all-off node at that
    /// level: any node whose population is zero is identical to it.
    pub fn zero(&self, level: Level) -> Arc<Node> {
        if let Some(zero) = self.zeros.get(&level.as_raw_int()) {
            return Arc::clone(zero.value());
        }

        let zero = if level == Level::ZERO {
            self.off()
        } else {
            let child = self.zero(level.child());
            self.join(
                Arc::clone(&child),
                Arc::clone(&child),
                Arc::clone(&child),
                child,
            )
        };

        // The pyramid cache is bounded; past the cap the node is still
        // canonical (it lives in the intern table), just not cached here.
        if self.zeros.len() < self.config.zero_pyramid_capacity {
            self.zeros.insert(level.as_raw_int(), Arc::clone(&zero));
        }
        zero
    }
}

// -------------------------------------------------------------------------------------------------
// Capacity management.

impl NodeStore {
    /// True if either bounded capacity has been exceeded. Unbounded tables
    /// (the default) never report over-capacity.
    pub fn over_capacity(&self) -> bool {
        let nodes_over = self
            .config
            .node_store_capacity
            .map_or(false, |cap| self.interned.len() > cap.get());
        let memo_over = self
            .config
            .successor_memo_capacity
            .map_or(false, |cap| self.memo.len() > cap.get());
        nodes_over || memo_over
    }

    /// Whole-world compaction: drop the intern table, the successor memo and
    /// the zero pyramid together, then re-intern everything reachable from
    /// `root`. Returns the canonical replacement for `root`.
    ///
    /// Must only be called from outside a computation; callers still holding
    /// nodes from before the compaction must not mix them with nodes minted
    /// after it. Identities are never reused, so a stale identity can at
    /// worst miss a cache, never alias a different node.
    pub fn compact(&self, root: &Arc<Node>) -> Arc<Node> {
        let before = self.interned.len();
        self.interned.clear();
        self.memo.clear();
        self.zeros.clear();

        let mut reinterned = HashMap::new();
        let root = self.reintern(root, &mut reinterned);
        debug!(
            "Compacted node store: {} interned nodes down to {}",
            before,
            self.interned.len()
        );
        root
    }

    fn reintern(&self, node: &Arc<Node>, seen: &mut HashMap<u64, Arc<Node>>) -> Arc<Node> {
        if let Some(fresh) = seen.get(&node.id()) {
            return Arc::clone(fresh);
        }

        let fresh = if node.is_leaf() {
            self.leaf(node.population() == 1)
        } else {
            let nw = self.reintern(node.nw(), seen);
            let ne = self.reintern(Node::ne(node), seen);
            let sw = self.reintern(node.sw(), seen);
            let se = self.reintern(node.se(), seen);
            self.join(nw, ne, sw, se)
        };

        seen.insert(node.id(), Arc::clone(&fresh));
        fresh
    }
}

// -------------------------------------------------------------------------------------------------
// Unit tests.

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_is_canonical() {
        let store = NodeStore::default();

        let a = store.join(store.on(), store.off(), store.off(), store.on());
        let b = store.join(store.on(), store.off(), store.off(), store.on());

        assert_eq!(a.id(), b.id());
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(store.node_count(), 1);
    }

    #[test]
    fn join_computes_level_and_population() {
        let store = NodeStore::default();

        let quad = store.join(store.on(), store.on(), store.off(), store.on());
        assert_eq!(quad.level(), Level::expect_from(1));
        assert_eq!(quad.population(), 3);

        let bigger = store.join(
            Arc::clone(&quad),
            Arc::clone(&quad),
            store.zero(Level::expect_from(1)),
            Arc::clone(&quad),
        );
        assert_eq!(bigger.level(), Level::expect_from(2));
        assert_eq!(bigger.population(), 9);
    }

    #[test]
    #[should_panic(expected = "mixed child levels in join")]
    fn join_with_mixed_levels_panics() {
        let store = NodeStore::default();
        let quad = store.join(store.on(), store.off(), store.off(), store.off());
        let _ = store.join(Arc::clone(&quad), store.on(), store.off(), store.off());
    }

    #[test]
    fn zero_is_unique_per_level() {
        let store = NodeStore::default();

        let z3 = store.zero(Level::expect_from(3));
        assert_eq!(z3.population(), 0);

        // Building the same empty node by hand must end up at the identical
        // canonical node.
        let z2 = store.zero(Level::expect_from(2));
        let by_hand = store.join(Arc::clone(&z2), Arc::clone(&z2), Arc::clone(&z2), z2);
        assert!(Arc::ptr_eq(&z3, &by_hand));
    }

    #[test]
    fn compact_preserves_structure_and_drops_garbage() {
        let store = NodeStore::default();

        // Two trees; only one stays live across the compaction.
        let keep = store.join(store.on(), store.off(), store.off(), store.on());
        let keep = store.join(
            Arc::clone(&keep),
            store.zero(Level::expect_from(1)),
            store.zero(Level::expect_from(1)),
            Arc::clone(&keep),
        );
        let _garbage = store.join(store.on(), store.on(), store.on(), store.on());
        let count_before = store.node_count();

        let fresh = store.compact(&keep);

        assert!(store.node_count() < count_before);
        assert_eq!(fresh.level(), keep.level());
        assert_eq!(fresh.population(), keep.population());
        assert_eq!(
            crate::quadtree::cells(&fresh),
            crate::quadtree::cells(&keep)
        );

        // Compacting again rebuilds the same shape in a fresh table.
        let again = store.compact(&fresh);
        assert_eq!(again.population(), fresh.population());
        assert_eq!(
            crate::quadtree::cells(&again),
            crate::quadtree::cells(&fresh)
        );
    }

    #[test]
    fn over_capacity_unbounded_is_never_hit() {
        let store = NodeStore::default();
        for alive in 0..16u8 {
            let bits = [alive & 1, alive & 2, alive & 4, alive & 8];
            store.join(
                store.leaf(bits[0] != 0),
                store.leaf(bits[1] != 0),
                store.leaf(bits[2] != 0),
                store.leaf(bits[3] != 0),
            );
        }
        assert!(!store.over_capacity());
    }

    #[test]
    fn over_capacity_bounded_trips() {
        let config = crate::UniverseConfigBuilder::default()
            .node_store_capacity(std::num::NonZeroUsize::new(4))
            .build()
            .unwrap();
        let store = NodeStore::new(config);

        for alive in 0..16u8 {
            store.join(
                store.leaf(alive & 1 != 0),
                store.leaf(alive & 2 != 0),
                store.leaf(alive & 4 != 0),
                store.leaf(alive & 8 != 0),
            );
        }
        assert!(store.over_capacity());
    }
}
