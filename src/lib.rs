//! # Hashlife engine for Conway's Game of Life
//!
//! An implementation of Gosper's Hashlife algorithm: the infinite Life plane
//! is stored as a hash-consed quadtree, and time is advanced with a memoized
//! step-doubling successor operator. Identical subpatterns are shared across
//! both space and time, which is what lets the engine jump patterns forward
//! by astronomical numbers of generations in milliseconds.
//!
//! ## What is contained in this code
//!
//! The core is the canonical node store with structural hash-consing
//! ([NodeStore]), the geometry operators that keep a finite pattern
//! correctly embedded in a padded node, and the recursive successor operator
//! that advances a region by `2^j` generations. On top of that sit
//! [Universe], which tracks a pattern and its generation count through exact
//! (`advance`) and largest-leap (`ffwd`) time steps, parsers for the common
//! Life pattern file formats ([parsers]), and readout of cells or zoomed
//! density tiles ([expand]).
//!
//! ## How this code can be used
//!
//! There is both a Rust API and a CLI. The API revolves around [Universe]:
//!
//! ```
//! use hashlife::Universe;
//!
//! let glider = vec![(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)];
//! let mut universe = Universe::new(&glider).unwrap();
//!
//! universe.advance(4);
//! assert_eq!(universe.generation(), 4);
//! assert_eq!(universe.population(), 5);
//! ```
//!
//! Callers that want to drive the quadtree directly can reach the node
//! store:
//!
//! ```
//! use hashlife::{cells, NodeStore};
//!
//! let store = NodeStore::default();
//! let node = store.construct(&[(0, 0), (1, 0), (2, 0)]).unwrap();
//! let node = store.advance(&store.pad(&node), 2);
//! assert_eq!(cells(&node).len(), 3);
//! ```
//!
//! The caches are unbounded by default; see [UniverseConfig] for the bounded
//! mode, in which the whole world is compacted between computations.
//!
//! ## Features
//!
//! ### Testing
//!
//! This feature opens up additional functions for use within the library,
//! for usage in tests. One such functionality is the naive reference
//! implementation of the Life rule (`testing_utils::baseline_life`), which
//! is useful as an oracle for anything built on top of this crate.

pub mod cli;
pub mod utils;

mod quadtree;
pub use quadtree::{
    cells, expand, to_text, Cell, Clip, Level, LevelError, Node, NodeStore, PatternError,
    MAX_LEVEL,
};

mod universe;
pub use universe::{Universe, UniverseError};

mod universe_config;
pub use universe_config::{
    UniverseConfig, UniverseConfigBuilder, UniverseConfigBuilderError, UniverseConfigError,
    DEFAULT_ZERO_PYRAMID_CAPACITY,
};

pub mod parsers;

#[cfg(any(test, feature = "testing"))]
pub mod testing_utils;
