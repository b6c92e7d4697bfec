//! Parsers for the common Life pattern file formats.
//!
//! Supported formats:
//! * Al Hensel's Life 1.05
//! * Al Hensel's Life 1.06
//! * RLE (run length encoded)
//!
//! All parsers are best-effort in the way most Life tools are: lines that do
//! not look like pattern data are skipped rather than rejected. Every parser
//! yields a list of `(x, y)` on-cell coordinates, without any adjustment of
//! the coordinates from the original file; that list is the interchange
//! format the rest of the crate consumes (see
//! [NodeStore::construct](crate::NodeStore::construct)).
//!
//! [autoguess_life_file] identifies a file from its header (falling back to
//! whichever format parses the most cells) and parses it. Writing RLE is
//! also supported with [to_rle].

use std::fs;
use std::path::Path;

use log::debug;
use thiserror::Error;

mod life_105;
pub use life_105::parse_life_105;

mod life_106;
pub use life_106::parse_life_106;

mod rle;
pub use rle::{parse_rle, to_rle};

use crate::quadtree::Cell;

#[derive(Error, Debug)]
pub enum ParserError {
    #[error("Unable to read the pattern file")]
    FileIo(#[from] std::io::Error),
}

/// Open the given file, identify the format and parse it.
///
/// Files declaring `#Life 1.05` or `#Life 1.06` in their first line are
/// dispatched directly; anything else is run through all parsers and the one
/// yielding the most cells wins, with RLE as the tie-break (the same
/// heuristic as the classic pattern collections need).
pub fn autoguess_life_file(path: &Path) -> Result<Vec<Cell>, ParserError> {
    let text = fs::read_to_string(path)?;
    Ok(autoguess_life_str(&text))
}

/// Format-guessing parse of in-memory pattern text; see
/// [autoguess_life_file].
pub fn autoguess_life_str(text: &str) -> Vec<Cell> {
    let first_line = text.lines().next().unwrap_or("").trim();

    if first_line.starts_with("#Life 1.05") {
        debug!("Parsing as Life 1.05 (header)");
        return parse_life_105(text);
    }
    if first_line.starts_with("#Life 1.06") {
        debug!("Parsing as Life 1.06 (header)");
        return parse_life_106(text);
    }

    let as_rle = parse_rle(text);
    let as_105 = parse_life_105(text);
    let as_106 = parse_life_106(text);

    if as_105.len() > as_rle.len() && as_105.len() > as_106.len() {
        debug!("Guessed Life 1.05 ({} cells)", as_105.len());
        return as_105;
    }
    if as_106.len() > as_rle.len() && as_106.len() > as_105.len() {
        debug!("Guessed Life 1.06 ({} cells)", as_106.len());
        return as_106;
    }
    debug!("Guessed RLE ({} cells)", as_rle.len());
    as_rle
}

// -------------------------------------------------------------------------------------------------
// Unit tests.

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing_utils::normalize;

    #[test]
    fn autoguess_dispatches_on_the_header() {
        // The same body means different cells in 1.05 (a bitmap) and 1.06
        // (coordinate pairs); the header decides.
        let text_105 = "#Life 1.05\n#P 0 0\n.*.\n***\n";
        assert_eq!(
            normalize(&autoguess_life_str(text_105)),
            vec![(0, 1), (1, 0), (1, 1), (2, 1)]
        );

        let text_106 = "#Life 1.06\n0 0\n1 0\n2 0\n";
        assert_eq!(
            normalize(&autoguess_life_str(text_106)),
            vec![(0, 0), (1, 0), (2, 0)]
        );
    }

    #[test]
    fn autoguess_falls_back_to_the_richest_parse() {
        // No header at all: a plain RLE body must still be recognised.
        let rle = "x = 3, y = 1\n3o!";
        assert_eq!(
            normalize(&autoguess_life_str(rle)),
            vec![(0, 0), (1, 0), (2, 0)]
        );

        // Bare coordinate pairs parse as 1.06.
        let pairs = "0 0\n1 1\n2 2\n3 3\n";
        assert_eq!(
            normalize(&autoguess_life_str(pairs)),
            vec![(0, 0), (1, 1), (2, 2), (3, 3)]
        );
    }

    #[test]
    fn autoguess_reads_from_a_file() {
        let path = std::env::temp_dir().join("autoguess_glider_test.rle");
        std::fs::write(&path, "#C glider\nx = 3, y = 3\nbo$2bo$3o!\n").unwrap();

        let cells = autoguess_life_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(
            normalize(&cells),
            vec![(0, 2), (1, 0), (1, 2), (2, 1), (2, 2)]
        );
    }

    #[test]
    fn missing_file_gives_err() {
        let result = autoguess_life_file(Path::new("/definitely/not/here.rle"));
        assert!(matches!(result, Err(ParserError::FileIo(_))));
    }
}
