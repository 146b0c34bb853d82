use serde::{Deserialize, Serialize};

use crate::goban::Goban;

/// Everything the analysis engine needs to know about a position, shaped
/// like its JSON query: `[["B", "D4"], ...]` pairs for setup stones and moves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineQuery {
    pub initial_stones: Vec<(String, String)>,
    pub moves: Vec<(String, String)>,
    pub board_x_size: u8,
    pub board_y_size: u8,
    pub komi: f64,
}

impl EngineQuery {
    pub fn from_goban(goban: &Goban) -> Self {
        let (initial_stones, moves) = goban.stones_n_moves_coords();
        EngineQuery {
            initial_stones,
            moves,
            board_x_size: goban.cols(),
            board_y_size: goban.rows(),
            komi: goban.komi(),
        }
    }
}
