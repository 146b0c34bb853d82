//! SGF (Smart Game Format) reading and writing.
//!
//! [`parse`] builds a lossless [`SgfTree`] of the whole collection;
//! [`SgfTree::to_goban_list`] replays its main line into board snapshots and
//! [`goban_to_sgf`] goes the other way.

mod error;
mod parser;
mod replay;
mod serialize;
pub mod tree;

pub use error::SgfError;
pub use parser::parse;
pub use replay::points;
pub use serialize::goban_to_sgf;
pub use tree::{NodeId, NodeKind, ROOT, SgfNode, SgfTree};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Goban, Stone};

    #[test]
    fn board_survives_a_round_trip() {
        let mut goban = Goban::new(9, 9);
        goban.set_komi(5.5);
        goban.place(Stone::Black, (1, 1)).unwrap();
        goban.place(Stone::White, (7, 7)).unwrap();
        goban.play(Stone::Black, (1, 0)).unwrap();
        goban.play(Stone::White, (0, 1)).unwrap();
        goban.play(Stone::Black, (0, 2)).unwrap();
        goban.play(Stone::White, (4, 4)).unwrap();
        goban.play(Stone::Black, (0, 0)).unwrap();

        let boards = parse(&goban.as_sgf()).unwrap().to_goban_list().unwrap();
        let last = boards.last().unwrap();
        assert_eq!(last.komi(), 5.5);
        assert!(last.diff(&goban).unwrap().is_empty());
        assert_eq!(last.stones_n_moves(), goban.stones_n_moves());
    }

    #[test]
    fn record_survives_a_round_trip() {
        let sgf = "(;GM[1]FF[4]CA[UTF-8]SZ[9]KM[6.5];AB[cc]AW[gg];B[ee];W[ef])";
        let boards = parse(sgf).unwrap().to_goban_list().unwrap();
        assert_eq!(boards.last().unwrap().as_sgf(), sgf);
    }
}
