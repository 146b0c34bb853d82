use tracing::debug;

use crate::coords;
use crate::goban::Goban;
use crate::stone::Stone;
use crate::{PASS, Point};

use super::error::SgfError;
use super::tree::SgfTree;

/// Expand an SGF point value into board points.
///
/// `aa:cc` is a composed point covering the whole rectangle. An empty value,
/// a malformed value, or one that falls off the board yields the single
/// point [`PASS`], so callers must be prepared to see the pass sentinel here.
pub fn points(value: &str, cols: u8, rows: u8) -> Vec<Point> {
    let single = |s: &str| {
        coords::sgf_to_gopoint(s, rows)
            .ok()
            .filter(|&p| coords::is_on_board(p, cols, rows))
    };

    match value.split_once(':') {
        None => vec![single(value).unwrap_or(PASS)],
        Some((a, b)) => match (single(a), single(b)) {
            (Some((x1, y1)), Some((x2, y2))) => {
                let mut out = Vec::new();
                for x in x1.min(x2)..=x1.max(x2) {
                    for y in y1.min(y2)..=y1.max(y2) {
                        out.push((x, y));
                    }
                }
                out
            }
            _ => vec![PASS],
        },
    }
}

/// Parse SZ: either "19" (square) or "19:13" (cols:rows).
fn parse_size(value: &str) -> Result<(u8, u8), SgfError> {
    let invalid = |reason: &str| SgfError::InvalidPropertyValue {
        property: "SZ".to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    };
    let trimmed = value.trim();
    match trimmed.split_once(':') {
        Some((c, r)) => {
            let cols = c.trim().parse().map_err(|_| invalid("invalid board width"))?;
            let rows = r.trim().parse().map_err(|_| invalid("invalid board height"))?;
            Ok((cols, rows))
        }
        None => {
            let size = trimmed.parse().map_err(|_| invalid("invalid board size"))?;
            Ok((size, size))
        }
    }
}

impl SgfTree {
    /// A fresh board set up from the main line's `SZ` (default 19x19) and
    /// `KM`. A komi that does not parse is ignored.
    pub fn new_goban(&self) -> Result<Goban, SgfError> {
        let mut goban = match self.find("SZ", true).and_then(|n| n.value()) {
            Some(value) => {
                let (cols, rows) = parse_size(value)?;
                Goban::try_new(cols, rows).map_err(|e| SgfError::InvalidPropertyValue {
                    property: "SZ".to_string(),
                    value: value.to_string(),
                    reason: e.to_string(),
                })?
            }
            None => Goban::default(),
        };

        if let Some(value) = self.find("KM", true).and_then(|n| n.value()) {
            match value.trim().parse::<f64>() {
                Ok(komi) => goban.set_komi(komi),
                Err(_) => debug!(value, "ignoring unparsable komi"),
            }
        }
        Ok(goban)
    }

    /// Replay the main line into one board per move.
    ///
    /// The first board is the starting position. `AB`/`AW` edit the latest
    /// board in place; every `B`/`W` pushes a new board with that move
    /// played. `PL` only sets the side to move.
    pub fn to_goban_list(&self) -> Result<Vec<Goban>, SgfError> {
        let mut boards = vec![self.new_goban()?];
        let (cols, rows) = (boards[0].cols(), boards[0].rows());

        for id in self.main_line() {
            let node = self.node(id);
            let (Some(key), Some(value)) = (node.key(), node.value()) else {
                continue;
            };
            let last = boards.len() - 1;
            match key {
                "B" | "W" => {
                    let stone = if key == "B" { Stone::Black } else { Stone::White };
                    let point = points(value, cols, rows)[0];
                    boards[last].set_to_play(stone);
                    let mut next = boards[last].clone();
                    next.play(stone, point)?;
                    next.set_to_play(stone.opp());
                    boards.push(next);
                }
                "AB" | "AW" => {
                    let stone = if key == "AB" { Stone::Black } else { Stone::White };
                    for p in points(value, cols, rows) {
                        boards[last].place(stone, p)?;
                    }
                }
                "PL" => {
                    if let Some(stone) = Stone::from_letter(value) {
                        boards[last].set_to_play(stone);
                    }
                }
                _ => {}
            }
        }

        debug!(positions = boards.len(), "replayed SGF main line");
        Ok(boards)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sgf::parse;

    #[test]
    fn composed_points_cover_rectangle() {
        let pts = points("aa:cb", 19, 19);
        assert_eq!(pts.len(), 6);
        assert!(pts.contains(&(0, 18)));
        assert!(pts.contains(&(2, 17)));
        assert!(pts.contains(&(1, 18)));
    }

    #[test]
    fn bad_points_become_pass() {
        assert_eq!(points("", 19, 19), vec![PASS]);
        assert_eq!(points("tt", 19, 19), vec![PASS]);
        assert_eq!(points("abc", 19, 19), vec![PASS]);
        assert_eq!(points("aa:zz", 9, 9), vec![PASS]);
        assert_eq!(points("ia", 9, 9), vec![PASS]);
    }

    #[test]
    fn sizes() {
        assert_eq!(parse_size("19"), Ok((19, 19)));
        assert_eq!(parse_size(" 19:13 "), Ok((19, 13)));
        assert!(parse_size("big").is_err());
        assert!(parse_size("9:x").is_err());
    }

    #[test]
    fn defaults_to_19x19() {
        let boards = parse("(;B[dd])").unwrap().to_goban_list().unwrap();
        assert_eq!(boards.len(), 2);
        assert_eq!((boards[0].cols(), boards[0].rows()), (19, 19));
        assert_eq!(boards[1].stone_at((3, 15)), Some(Stone::Black));
    }

    #[test]
    fn moves_push_snapshots_and_setup_does_not() {
        let sgf = "(;SZ[9]KM[7.5]AB[aa][bb];W[cc];B[dd]AW[ee])";
        let boards = parse(sgf).unwrap().to_goban_list().unwrap();
        assert_eq!(boards.len(), 3);
        assert_eq!(boards[0].komi(), 7.5);
        assert_eq!(boards[0].black_stones().len(), 2);
        assert_eq!(boards[0].white_stones().len(), 0);
        assert_eq!(boards[1].white_stones(), vec![(2, 6)]);
        assert_eq!(boards[2].stone_at((3, 5)), Some(Stone::Black));
        assert_eq!(boards[2].stone_at((4, 4)), Some(Stone::White));
        assert_eq!(boards[1].stone_at((4, 4)), None);
    }

    #[test]
    fn composed_setup_fills_rectangle() {
        let boards = parse("(;SZ[9]AB[aa:cc]AW[ii])")
            .unwrap()
            .to_goban_list()
            .unwrap();
        assert_eq!(boards.len(), 1);
        let black = boards[0].black_stones();
        assert_eq!(black.len(), 9);
        for x in 0..3 {
            for y in 6..9 {
                assert_eq!(boards[0].stone_at((x, y)), Some(Stone::Black));
            }
        }
        assert_eq!(boards[0].white_stones(), vec![(8, 0)]);
    }

    #[test]
    fn unknown_property_does_not_add_stones() {
        let boards = parse("(;SZ[9];AB[aa]xy[bb])")
            .unwrap()
            .to_goban_list()
            .unwrap();
        assert_eq!(boards[0].black_stones(), vec![(0, 8)]);
        assert!(boards[0].white_stones().is_empty());
    }

    #[test]
    fn tracks_side_to_move() {
        let boards = parse("(;SZ[9]PL[W];W[cc];B[dd])")
            .unwrap()
            .to_goban_list()
            .unwrap();
        assert_eq!(boards[0].to_play(), Stone::White);
        assert_eq!(boards[1].to_play(), Stone::Black);
        assert_eq!(boards[2].to_play(), Stone::White);
    }

    #[test]
    fn pass_moves_still_make_a_snapshot() {
        let boards = parse("(;SZ[9];B[];W[tt])")
            .unwrap()
            .to_goban_list()
            .unwrap();
        assert_eq!(boards.len(), 3);
        assert!(boards[2].stones().is_empty());
    }

    #[test]
    fn only_main_line_is_replayed() {
        let boards = parse("(;SZ[9];B[aa](;W[bb];B[cc])(;W[dd]))")
            .unwrap()
            .to_goban_list()
            .unwrap();
        assert_eq!(boards.len(), 4);
        assert_eq!(boards[3].stone_at((3, 5)), None);
        assert_eq!(boards[3].stone_at((1, 7)), Some(Stone::White));
    }

    #[test]
    fn replays_captures_as_moves() {
        let sgf = "(;SZ[5];B[ba];W[aa];B[ab])";
        let boards = parse(sgf).unwrap().to_goban_list().unwrap();
        let last = boards.last().unwrap();
        assert_eq!(last.stone_at((0, 4)), None);
        assert_eq!(last.ko_location(), Some((0, 4)));
        let (stones, moves) = last.stones_n_moves();
        assert!(stones.is_empty());
        assert_eq!(moves.len(), 3);
    }

    #[test]
    fn bad_size_is_an_error() {
        let err = parse("(;SZ[99])").unwrap().to_goban_list().unwrap_err();
        assert!(matches!(err, SgfError::InvalidPropertyValue { ref property, .. } if property == "SZ"));
    }

    #[test]
    fn unparsable_komi_is_ignored() {
        let boards = parse("(;KM[lots])").unwrap().to_goban_list().unwrap();
        assert_eq!(boards[0].komi(), crate::goban::DEFAULT_KOMI);
    }
}
