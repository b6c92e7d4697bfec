//! The memoized step-doubling successor operator, its 4x4 base case, and the
//! two time-advance drivers built on top of it.
//!
//! [NodeStore::successor] is where the exponential speedup lives: advancing a
//! level-k node by `2^j` generations recurses nine ways over a 3x3 grid of
//! half-sized windows and recombines in one of two modes depending on whether
//! the caller asked for the maximum leap at this level. Results are memoized
//! per (node identity, clamped exponent), and because hash-consing makes
//! identities canonical across space *and* time, identical subpatterns are
//! only ever evolved once.

use std::sync::Arc;

use super::{Level, Node, NodeStore};

impl NodeStore {
    /// The central half of `m` advanced by `2^j` generations on the infinite
    /// plane, as a node one level down. `None` means the maximum leap for
    /// this level, `2^(k-2)` generations.
    ///
    /// Correctness requires `m` to contain every cell that can influence the
    /// returned region within `2^j` steps; callers ensure this by padding
    /// (see [NodeStore::pad]).
    ///
    /// Panics if `m` is below level 2 or `j > level - 2`; both are
    /// programming errors.
    pub fn successor(&self, m: &Arc<Node>, j: Option<u8>) -> Arc<Node> {
        assert!(
            m.level() >= Level::expect_from(2),
            "successor requires a node at level >= 2, got {}",
            m.level()
        );
        let k = m.level().as_raw_int();
        let j = match j {
            None => k - 2,
            Some(j) => {
                assert!(
                    j <= k - 2,
                    "step exponent {} out of range for a node at level {}",
                    j,
                    m.level()
                );
                j
            }
        };
        self.step(m, j)
    }

    /// Recursive worker behind [NodeStore::successor]. Unlike the public
    /// operator this clamps the exponent, because the recursion hands each
    /// half-sized window the exponent of the level above.
    fn step(&self, m: &Arc<Node>, j: u8) -> Arc<Node> {
        let k = m.level().as_raw_int();
        let j = j.min(k - 2);

        if let Some(hit) = self.memo.get(&(m.id(), j)) {
            return Arc::clone(hit.value());
        }

        let result = if m.population() == 0 {
            // All four quadrants are the same canonical empty node.
            Arc::clone(m.nw())
        } else if k == 2 {
            self.life_4x4(m)
        } else {
            // Nine overlapping half-sized windows covering m as a 3x3 grid.
            let c1 = self.step(m.nw(), j);
            let c2 = self.step(
                &self.join(
                    Arc::clone(Node::ne(m.nw())),
                    Arc::clone(Node::ne(m).nw()),
                    Arc::clone(m.nw().se()),
                    Arc::clone(Node::ne(m).sw()),
                ),
                j,
            );
            let c3 = self.step(Node::ne(m), j);
            let c4 = self.step(
                &self.join(
                    Arc::clone(m.nw().sw()),
                    Arc::clone(m.nw().se()),
                    Arc::clone(m.sw().nw()),
                    Arc::clone(Node::ne(m.sw())),
                ),
                j,
            );
            let c5 = self.step(
                &self.join(
                    Arc::clone(m.nw().se()),
                    Arc::clone(Node::ne(m).sw()),
                    Arc::clone(Node::ne(m.sw())),
                    Arc::clone(m.se().nw()),
                ),
                j,
            );
            let c6 = self.step(
                &self.join(
                    Arc::clone(Node::ne(m).sw()),
                    Arc::clone(Node::ne(m).se()),
                    Arc::clone(m.se().nw()),
                    Arc::clone(Node::ne(m.se())),
                ),
                j,
            );
            let c7 = self.step(m.sw(), j);
            let c8 = self.step(
                &self.join(
                    Arc::clone(Node::ne(m.sw())),
                    Arc::clone(m.se().nw()),
                    Arc::clone(m.sw().se()),
                    Arc::clone(m.se().sw()),
                ),
                j,
            );
            let c9 = self.step(m.se(), j);

            if j < k - 2 {
                // Partial step: each window already advanced the full 2^j
                // generations, so recombine by taking inner halves.
                self.join(
                    self.join(
                        Arc::clone(c1.se()),
                        Arc::clone(c2.sw()),
                        Arc::clone(Node::ne(&c4)),
                        Arc::clone(c5.nw()),
                    ),
                    self.join(
                        Arc::clone(c2.se()),
                        Arc::clone(c3.sw()),
                        Arc::clone(Node::ne(&c5)),
                        Arc::clone(c6.nw()),
                    ),
                    self.join(
                        Arc::clone(c4.se()),
                        Arc::clone(c5.sw()),
                        Arc::clone(Node::ne(&c7)),
                        Arc::clone(c8.nw()),
                    ),
                    self.join(
                        Arc::clone(c5.se()),
                        Arc::clone(c6.sw()),
                        Arc::clone(Node::ne(&c8)),
                        Arc::clone(c9.nw()),
                    ),
                )
            } else {
                // Maximum leap: a second round of successors accumulates the
                // other 2^(k-3) generations of the doubling.
                self.join(
                    self.step(
                        &self.join(c1, Arc::clone(&c2), Arc::clone(&c4), Arc::clone(&c5)),
                        j,
                    ),
                    self.step(
                        &self.join(c2, c3, Arc::clone(&c5), Arc::clone(&c6)),
                        j,
                    ),
                    self.step(
                        &self.join(c4, Arc::clone(&c5), c7, Arc::clone(&c8)),
                        j,
                    ),
                    self.step(&self.join(c5, c6, c8, c9), j),
                )
            }
        };

        self.memo.insert((m.id(), j), Arc::clone(&result));
        result
    }

    /// The next generation of a level-2 (4x4) node: its 2x2 central
    /// successor, computed by applying the standard Life rule to each of the
    /// four centre cells over its 3x3 neighbourhood of leaves.
    fn life_4x4(&self, m: &Arc<Node>) -> Arc<Node> {
        let (nw, ne, sw, se) = (m.nw(), Node::ne(m), m.sw(), m.se());

        let na = self.life_rule(
            [
                nw.nw(), Node::ne(nw), ne.nw(),
                nw.sw(),           ne.sw(),
                sw.nw(), Node::ne(sw), se.nw(),
            ],
            nw.se(),
        );
        let nb = self.life_rule(
            [
                Node::ne(nw), ne.nw(), Node::ne(ne),
                nw.se(),           ne.se(),
                Node::ne(sw), se.nw(), Node::ne(se),
            ],
            ne.sw(),
        );
        let nc = self.life_rule(
            [
                nw.sw(), nw.se(), ne.sw(),
                sw.nw(),           se.nw(),
                sw.sw(), sw.se(), se.sw(),
            ],
            Node::ne(sw),
        );
        let nd = self.life_rule(
            [
                nw.se(), ne.sw(), ne.se(),
                Node::ne(sw),           Node::ne(se),
                sw.se(), se.sw(), se.se(),
            ],
            se.nw(),
        );
        self.join(na, nb, nc, nd)
    }

    /// The standard B3/S23 rule over eight neighbour leaves and a centre
    /// leaf.
    fn life_rule(&self, neighbours: [&Arc<Node>; 8], centre: &Arc<Node>) -> Arc<Node> {
        let alive: u64 = neighbours.iter().map(|n| n.population()).sum();
        self.leaf(alive == 3 || (centre.population() == 1 && alive == 2))
    }
}

// -------------------------------------------------------------------------------------------------
// Advance drivers.

impl NodeStore {
    /// Advance `node` by exactly `n` generations, using the binary expansion
    /// of `n` to pick the successor exponents.
    ///
    /// The node is centred once per bit of `n` before any stepping, which
    /// guarantees every required exponent is legal. The result is cropped.
    ///
    /// Requires a node at level >= 1 that is already padded (see
    /// [NodeStore::pad]); on an unpadded node the light cone of a boundary
    /// cell can escape the returned central half. [crate::Universe::advance]
    /// takes care of this.
    pub fn advance(&self, node: &Arc<Node>, n: u64) -> Arc<Node> {
        if n == 0 {
            return Arc::clone(node);
        }

        let mut node = Arc::clone(node);
        let mut bits = Vec::new();
        let mut rest = n;
        while rest > 0 {
            bits.push(rest & 1 == 1);
            rest >>= 1;
            node = self.centre(&node);
        }

        // High bit first, so each set bit j contributes exactly 2^j
        // generations.
        for (j, _) in bits.iter().enumerate().rev().filter(|(_, bit)| **bit) {
            node = self.successor(&node, Some(j as u8));
        }
        self.crop(&node)
    }

    /// Advance as quickly as possible, taking `n_leaps` maximum leaps.
    ///
    /// The number of generations covered is data dependent: each leap first
    /// pads the node and then advances it by `2^(level - 2)` generations.
    /// Returns the final node and the total generations covered.
    pub fn ffwd(&self, node: &Arc<Node>, n_leaps: u64) -> (Arc<Node>, u128) {
        let mut node = Arc::clone(node);
        let mut gens: u128 = 0;
        for _ in 0..n_leaps {
            node = self.pad(&node);
            gens += 1u128 << (node.level().as_raw_int() - 2);
            node = self.successor(&node, None);
        }
        (node, gens)
    }
}

// -------------------------------------------------------------------------------------------------
// Unit tests.
