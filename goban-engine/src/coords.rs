//! Conversions between board points, GTP labels ("D4") and SGF letter pairs ("dp").
//!
//! Everything here is closed-form: there are no lookup tables to build or mutate.

use crate::error::GoError;
use crate::{PASS, Point};

/// GTP column letters. `I` is skipped.
const GTP_LETTERS: &[u8; 25] = b"ABCDEFGHJKLMNOPQRSTUVWXYZ";

pub fn is_pass((x, y): Point) -> bool {
    x < 0 || y < 0
}

pub fn is_on_board((x, y): Point, cols: u8, rows: u8) -> bool {
    x >= 0 && y >= 0 && (x as u8) < cols && (y as u8) < rows
}

/// Column label for a zero-based column: `A`..`Z` without `I`, then `AA`, `BB`, ...
/// then `AAA`, `BBB`, ... for very large boards.
pub fn column_label(x: u8) -> String {
    let n = GTP_LETTERS.len();
    let letter = GTP_LETTERS[x as usize % n] as char;
    std::iter::repeat_n(letter, x as usize / n + 1).collect()
}

fn column_index(label: &str) -> Option<u8> {
    let first = label.chars().next()?;
    if !label.chars().all(|c| c == first) {
        return None;
    }
    let pos = GTP_LETTERS.iter().position(|&b| b as char == first)?;
    let idx = (label.len() - 1) * GTP_LETTERS.len() + pos;
    u8::try_from(idx).ok().filter(|&i| i <= i8::MAX as u8)
}

/// `(3, 3)` → `"D4"`. Any point with a negative component is a pass.
pub fn gopoint_to_str(point: Point) -> String {
    if is_pass(point) {
        return "pass".to_string();
    }
    let (x, y) = point;
    format!("{}{}", column_label(x as u8), y as i32 + 1)
}

/// `"D4"` → `(3, 3)`; `"pass"` in any case → [`PASS`].
pub fn str_to_gopoint(label: &str) -> Result<Point, GoError> {
    let s = label.trim().to_ascii_uppercase();
    if s == "PASS" {
        return Ok(PASS);
    }
    let invalid = || GoError::InvalidCoordinate(label.to_string());

    let split = s.find(|c: char| c.is_ascii_digit()).ok_or_else(invalid)?;
    let (letters, digits) = s.split_at(split);
    let x = column_index(letters).ok_or_else(invalid)?;
    let row: i16 = digits.parse().map_err(|_| invalid())?;
    if !(1..=i8::MAX as i16).contains(&row) {
        return Err(invalid());
    }
    Ok((x as i8, (row - 1) as i8))
}

/// SGF letter to 0-based index: a=0 .. z=25, A=26 .. Z=51.
fn sgf_letter_to_index(ch: char) -> Option<i16> {
    match ch {
        'a'..='z' => Some(ch as i16 - 'a' as i16),
        'A'..='Z' => Some(ch as i16 - 'A' as i16 + 26),
        _ => None,
    }
}

fn sgf_index_to_letter(i: i16) -> Option<char> {
    match i {
        0..=25 => Some((b'a' + i as u8) as char),
        26..=51 => Some((b'A' + (i - 26) as u8) as char),
        _ => None,
    }
}

/// Two-letter SGF coordinate to a point. SGF counts rows from the top, so the
/// row is mirrored with `rows`. An empty string is a pass.
///
/// The result is not checked against the board width; a letter beyond the
/// board (e.g. `tt` on 19x19) yields an off-board point.
pub fn sgf_to_gopoint(s: &str, rows: u8) -> Result<Point, GoError> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(PASS);
    }
    let invalid = || GoError::InvalidCoordinate(s.to_string());

    let mut chars = s.chars();
    let (Some(cx), Some(cy), None) = (chars.next(), chars.next(), chars.next()) else {
        return Err(invalid());
    };
    let x = sgf_letter_to_index(cx).ok_or_else(invalid)?;
    let y = rows as i16 - 1 - sgf_letter_to_index(cy).ok_or_else(invalid)?;
    if y < 0 {
        return Err(invalid());
    }
    Ok((x as i8, y as i8))
}

/// Point to two-letter SGF coordinate. A pass becomes the empty string.
pub fn gopoint_to_sgf(point: Point, rows: u8) -> Result<String, GoError> {
    if is_pass(point) {
        return Ok(String::new());
    }
    let (x, y) = point;
    let sgf_row = rows as i16 - 1 - y as i16;
    match (sgf_index_to_letter(x as i16), sgf_index_to_letter(sgf_row)) {
        (Some(cx), Some(cy)) => Ok([cx, cy].iter().collect()),
        _ => Err(GoError::NotOnBoard(point)),
    }
}
