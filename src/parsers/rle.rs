//! Run-length-encoded pattern format, the de-facto standard for sharing
//! Life patterns.
//!
//! A body is a sequence of runs: `<count>b` for blanks, `<count>o` for on
//! cells, `<count>$` for end-of-rows, terminated by `!`. A missing count
//! means 1. The `x = .., y = ..` size header is accepted and ignored (the
//! cells speak for themselves), as are `#`-prefixed comment lines.

use crate::quadtree::Cell;

/// Maximum body line width produced by [to_rle].
const MAX_LINE_WIDTH: usize = 70;

/// Parse an RLE string into on-cell coordinates.
///
/// Best effort: comment lines, the size header and anything after the
/// terminating `!` are ignored. A `#P x y` line moves the write origin, as
/// some collections use.
pub fn parse_rle(text: &str) -> Vec<Cell> {
    let mut positions = Vec::new();
    let (mut x, mut y) = (0i64, 0i64);

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(rest) = line.strip_prefix('#') {
            // Offset lines move the origin; everything else is commentary.
            if let Some(coords) = rest.strip_prefix(['p', 'P']) {
                if let Some((ox, oy)) = parse_coord_pair(coords) {
                    (x, y) = (ox, oy);
                }
            }
            continue;
        }
        // Skip any size line -- we don't need it.
        if line.starts_with(['x', 'X']) {
            continue;
        }

        let mut count: i64 = 0;
        for c in line.chars() {
            match c {
                '0'..='9' => {
                    count = count * 10 + i64::from(c as u8 - b'0');
                }
                'b' | 'B' => {
                    x += count.max(1);
                    count = 0;
                }
                'o' | 'O' => {
                    for _ in 0..count.max(1) {
                        positions.push((x, y));
                        x += 1;
                    }
                    count = 0;
                }
                '$' => {
                    y += count.max(1);
                    x = 0;
                    count = 0;
                }
                '!' => return positions,
                _ => count = 0,
            }
        }
    }

    positions
}

/// Encode on-cell coordinates as an RLE string, size header included, with
/// the body wrapped to the customary 70 columns. Coordinates are shifted so
/// the pattern starts at the origin.
pub fn to_rle(cells: &[Cell]) -> String {
    if cells.is_empty() {
        return "x = 0, y = 0\n!".to_owned();
    }

    let mut pts: Vec<Cell> = cells.to_vec();
    pts.sort_unstable_by_key(|&(x, y)| (y, x));
    pts.dedup();

    let min_x = pts.iter().map(|&(x, _)| x).min().expect("pts is non-empty");
    let max_x = pts.iter().map(|&(x, _)| x).max().expect("pts is non-empty");
    let (min_y, max_y) = (pts[0].1, pts[pts.len() - 1].1);

    // One token per run, so the line wrapping below can never split a count
    // from its tag.
    let mut runs: Vec<String> = Vec::new();
    let push_run = |runs: &mut Vec<String>, count: i64, tag: char| {
        if count == 1 {
            runs.push(tag.to_string());
        } else if count > 1 {
            runs.push(format!("{count}{tag}"));
        }
    };

    let (mut row, mut cursor, mut ons) = (0i64, 0i64, 0i64);
    for (x, y) in pts.into_iter().map(|(x, y)| (x - min_x, y - min_y)) {
        if y != row {
            push_run(&mut runs, ons, 'o');
            push_run(&mut runs, y - row, '$');
            (row, cursor, ons) = (y, 0, 0);
        }
        let blanks = x - cursor - ons;
        if blanks > 0 {
            push_run(&mut runs, ons, 'o');
            push_run(&mut runs, blanks, 'b');
            (cursor, ons) = (x, 0);
        }
        ons += 1;
    }
    push_run(&mut runs, ons, 'o');
    runs.push('!'.to_string());

    let mut out = format!("x = {}, y = {}\n", max_x - min_x + 1, max_y - min_y + 1);
    let mut width = 0;
    for run in runs {
        if width + run.len() > MAX_LINE_WIDTH {
            out.push('\n');
            width = 0;
        }
        width += run.len();
        out.push_str(&run);
    }
    out
}

fn parse_coord_pair(s: &str) -> Option<(i64, i64)> {
    let mut parts = s.split_whitespace();
    let x = parts.next()?.parse().ok()?;
    let y = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((x, y))
}

// -------------------------------------------------------------------------------------------------
// Unit tests.
