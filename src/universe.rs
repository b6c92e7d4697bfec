//! Top-level engine type: a pattern embedded in an infinite Life plane,
//! together with the node store that backs it and a running generation
//! count.
//!
//! [Universe] is the intended entry point for calling code. It owns a
//! [NodeStore], keeps the current root node correctly padded around every
//! time step, and triggers whole-world compaction between computations when
//! a bounded capacity is configured. The underlying store operators remain
//! available through [Universe::store] for callers that want to drive the
//! quadtree directly.

use std::path::Path;
use std::sync::Arc;

use log::info;
use logging_timer::stime;
use thiserror::Error;

use crate::parsers::{self, ParserError};
use crate::quadtree::{self, Cell, Clip, Level, Node, NodeStore, PatternError};
use crate::UniverseConfig;

// -------------------------------------------------------------------------------------------------
// Main struct.

/// A finite Life pattern on the infinite plane, advanced with Hashlife.
pub struct Universe {
    store: NodeStore,
    root: Arc<Node>,
    generation: u128,
}

#[derive(Error, Debug)]
pub enum UniverseError {
    #[error("Unable to parse pattern file")]
    PatternFileParsing(#[from] ParserError),
    #[error("Unable to build a quadtree from the pattern")]
    PatternConstruction(#[from] PatternError),
}

// -------------------------------------------------------------------------------------------------
// Construction.

impl Universe {
    /// Build a universe containing the given on cells.
    pub fn new(cells: &[Cell]) -> Result<Self, PatternError> {
        Universe::with_config(cells, UniverseConfig::default())
    }

    pub fn with_config(cells: &[Cell], config: UniverseConfig) -> Result<Self, PatternError> {
        let store = NodeStore::new(config);
        let root = store.construct(cells)?;
        Ok(Universe {
            store,
            root,
            generation: 0,
        })
    }

    /// Build a universe from a pattern file, guessing the file format.
    pub fn from_file(path: &Path) -> Result<Self, UniverseError> {
        let cells = parsers::autoguess_life_file(path)?;
        Ok(Universe::new(&cells)?)
    }
}

// -------------------------------------------------------------------------------------------------
// Accessors & readout.

impl Universe {
    /// Root node of the current pattern.
    pub fn root(&self) -> &Arc<Node> {
        &self.root
    }

    pub fn store(&self) -> &NodeStore {
        &self.store
    }

    /// Number of generations the universe has been advanced since
    /// construction.
    pub fn generation(&self) -> u128 {
        self.generation
    }

    pub fn population(&self) -> u64 {
        self.root.population()
    }

    /// On cells of the current pattern, relative to the root node's top-left
    /// corner.
    pub fn cells(&self) -> Vec<Cell> {
        quadtree::cells(&self.root)
    }

    /// Readout of the current pattern at the given zoom level; see
    /// [quadtree::expand].
    pub fn expand(&self, clip: Option<&Clip>, level: Level) -> Vec<(i64, i64, f64)> {
        quadtree::expand(&self.root, clip, level)
    }

    /// ASCII rendering of the current pattern.
    pub fn to_text(&self) -> String {
        quadtree::to_text(&self.root)
    }
}

// -------------------------------------------------------------------------------------------------
// Time advance.

impl Universe {
    /// Advance by exactly `generations` generations.
    #[stime("info", "Universe::{}")]
    pub fn advance(&mut self, generations: u64) {
        if generations == 0 {
            return;
        }
        let padded = self.store.pad(&self.root);
        self.root = self.store.advance(&padded, generations);
        self.generation += u128::from(generations);
        self.compact_if_over_capacity();
    }

    /// Advance as far as possible in `n_leaps` maximum leaps, returning the
    /// number of generations covered. The count is data dependent; each leap
    /// covers `2^(level - 2)` generations at the current (padded) level.
    #[stime("info", "Universe::{}")]
    pub fn ffwd(&mut self, n_leaps: u64) -> u128 {
        let (root, gens) = self.store.ffwd(&self.root, n_leaps);
        self.root = root;
        self.generation += gens;
        self.compact_if_over_capacity();
        gens
    }

    /// Whole-world compaction, run between computations only: every cache is
    /// dropped and the live tree re-interned, so a bounded store can never
    /// leave a memo entry pointing at an evicted node.
    fn compact_if_over_capacity(&mut self) {
        if self.store.over_capacity() {
            info!(
                "Node store over capacity ({} nodes, {} memo entries), compacting",
                self.store.node_count(),
                self.store.memo_len()
            );
            self.root = self.store.compact(&self.root);
        }
    }
}

// -------------------------------------------------------------------------------------------------
// Unit tests.
