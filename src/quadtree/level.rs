//! Abstracted level data type.
//!
//! The level of a node is the base-2 log of the side length of the square
//! region the node represents: a node at level `k` covers `2^k x 2^k` cells.

use std::fmt;
use std::{num::ParseIntError, str::FromStr};

use log::error;

static UNDERLYING_INT_TYPE_STR: &str = "u8";
type UnderlyingInt = u8;

/// Maximum level supported.
///
/// 62 keeps every coordinate produced by the readout operators inside `i64`
/// (a level-62 node spans `2^62` cells per side), and keeps the generation
/// count of a single maximum leap (`2^(level - 2)`) inside `u64`. Patterns
/// big enough to hit this limit would exhaust memory long before reaching it.
pub static MAX_LEVEL: Level = Level(62);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Level(UnderlyingInt);

impl Level {
    /// The level of a leaf node, i.e. a single cell.
    pub const ZERO: Level = Level(0);

    pub fn from_with_err(int: UnderlyingInt) -> Result<Self, LevelError> {
        if int > MAX_LEVEL.0 {
            Err(LevelError::InputTooBig)
        } else {
            Ok(Level(int))
        }
    }

    /// Panics instead of returning an error.
    /// Useful if you are confident the input is correct.
    pub fn expect_from(int: UnderlyingInt) -> Self {
        match Self::from_with_err(int) {
            Ok(level) => level,
            Err(e) => {
                error!("Malformed input, error: {:?}", e);
                panic!("Malformed input, error: {:?}", e);
            }
        }
    }

    /// Level of this node's children. Panics at level 0; leaves have no
    /// children.
    pub fn child(&self) -> Level {
        assert!(self.0 > 0, "a leaf node has no child level");
        Level(self.0 - 1)
    }

    /// Level of a node built from four nodes at this level.
    /// Panics above [MAX_LEVEL].
    pub fn parent(&self) -> Level {
        assert!(
            self.0 < MAX_LEVEL.0,
            "level overflow: cannot grow a node beyond level {}",
            MAX_LEVEL
        );
        Level(self.0 + 1)
    }

    /// Side length of the square region covered at this level: `2^level`.
    pub fn side_len(&self) -> u64 {
        1u64 << self.0
    }

    pub fn as_raw_int(&self) -> UnderlyingInt {
        self.0
    }

    pub fn as_u32(&self) -> u32 {
        self.0 as u32
    }

    pub fn as_usize(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Level {
    type Err = LevelError;

    /// Constructor that takes in a string slice.
    /// If the value is greater than the max then Err is returned.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Level::from_with_err(UnderlyingInt::from_str(s)?)?)
    }
}

impl TryFrom<u8> for Level {
    type Error = LevelError;

    fn try_from(int: u8) -> Result<Self, Self::Error> {
        Level::from_with_err(int)
    }
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LevelError {
    #[error("Input is greater than the upper bound {MAX_LEVEL:?}")]
    InputTooBig,
    #[error("Malformed string input for {UNDERLYING_INT_TYPE_STR:?} type")]
    MalformedString(#[from] ParseIntError),
}

// -------------------------------------------------------------------------------------------------
// Unit tests.

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing_utils::assert_err;

    #[test]
    fn child_and_parent_are_inverses() {
        let level = Level::expect_from(5);
        assert_eq!(level.child().parent(), level);
        assert_eq!(level.side_len(), 32);
    }

    #[test]
    fn out_of_bounds_gives_err() {
        assert_err!(Level::from_with_err(63), Err(LevelError::InputTooBig));
        assert_err!(Level::from_str("255"), Err(LevelError::InputTooBig));
        assert_err!(
            Level::from_str("not a number"),
            Err(LevelError::MalformedString(_))
        );
    }

    #[test]
    #[should_panic(expected = "a leaf node has no child level")]
    fn child_of_leaf_level_panics() {
        let _ = Level::ZERO.child();
    }
}
