//! Command Line Interface implementation using [clap].
//!
//! See [MAIN_LONG_ABOUT] for more information.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use patharg::{InputArg, OutputArg};

// -------------------------------------------------------------------------------------------------
// Main structs.

pub const MAIN_LONG_ABOUT: &str = "
Hashlife engine for Conway's Game of Life.

Patterns are stored as hash-consed quadtrees and advanced with a memoized
step-doubling successor operator, which makes astronomically deep time jumps
cheap for patterns with repeating structure.

Pattern files may be in RLE, Life 1.05 or Life 1.06 format; the format is
guessed from the file contents. Use \"-\" to read the pattern from stdin.";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = MAIN_LONG_ABOUT)]
pub struct Cli {
    /// Initial command for the program.
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub verbose: Verbosity<WarnLevel>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Advance a pattern by an exact number of generations.
    Advance {
        /// Pattern file (use "-" to read from stdin).
        #[arg(short, long)]
        pattern: InputArg,

        /// Number of generations to advance by.
        #[arg(short, long)]
        generations: u64,

        /// Cache capacity config file (toml). Defaults are unbounded.
        #[arg(short, long, value_name = "FILE_PATH")]
        config: Option<PathBuf>,

        /// Write the resulting pattern as RLE (use "-" for stdout).
        #[arg(short, long, value_name = "FILE_PATH")]
        out: Option<OutputArg>,
    },

    /// Advance a pattern as far as possible, taking giant leaps.
    ///
    /// Each leap advances by 2^(level - 2) generations at the node's current
    /// level, so the total number of generations covered depends on the
    /// pattern; it is reported on completion.
    Ffwd {
        /// Pattern file (use "-" to read from stdin).
        #[arg(short, long)]
        pattern: InputArg,

        /// Number of leaps to take.
        #[arg(short, long)]
        leaps: u64,

        /// Cache capacity config file (toml). Defaults are unbounded.
        #[arg(short, long, value_name = "FILE_PATH")]
        config: Option<PathBuf>,

        /// Write the resulting pattern as RLE (use "-" for stdout).
        #[arg(short, long, value_name = "FILE_PATH")]
        out: Option<OutputArg>,
    },

    /// Print a pattern as ASCII art without advancing it.
    Print {
        /// Pattern file (use "-" to read from stdin).
        #[arg(short, long)]
        pattern: InputArg,
    },
}
