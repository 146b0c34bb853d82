use std::fmt::Write;

use crate::Point;
use crate::coords::{self, is_on_board};
use crate::goban::Goban;
use crate::stone::Stone;

/// Render a board as a single-line SGF record.
///
/// Placements go into one setup node (`AB`/`AW`) after the root, followed by
/// one node per recorded move. `PL` is written only when there are no moves,
/// since otherwise the last move already implies who plays next.
pub fn goban_to_sgf(goban: &Goban) -> String {
    let (cols, rows) = (goban.cols(), goban.rows());
    let sgf_point = |p: Point| {
        if is_on_board(p, cols, rows) {
            coords::gopoint_to_sgf(p, rows).unwrap_or_default()
        } else {
            String::new()
        }
    };

    let mut out = String::from("(;GM[1]FF[4]CA[UTF-8]");
    if cols == rows {
        let _ = write!(out, "SZ[{cols}]");
    } else {
        let _ = write!(out, "SZ[{cols}:{rows}]");
    }
    let _ = write!(out, "KM[{}]", goban.komi());

    let (stones, moves) = goban.stones_n_moves();
    let player = if moves.is_empty() {
        format!("PL[{}]", goban.to_play().letter())
    } else {
        String::new()
    };

    if stones.is_empty() {
        out.push_str(&player);
    } else {
        out.push(';');
        for stone in [Stone::Black, Stone::White] {
            let points: Vec<_> = stones.iter().filter(|(s, _)| *s == stone).collect();
            if points.is_empty() {
                continue;
            }
            out.push_str(if stone == Stone::Black { "AB" } else { "AW" });
            for &(_, p) in points {
                let _ = write!(out, "[{}]", sgf_point(p));
            }
        }
        out.push_str(&player);
    }

    for (stone, p) in moves {
        let _ = write!(out, ";{}[{}]", stone.letter(), sgf_point(p));
    }
    out.push(')');
    out
}
