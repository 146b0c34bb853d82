use std::fmt;

use serde::{Deserialize, Serialize};

use crate::stone::Stone;

/// Contents of one intersection.
///
/// `Ko` is an empty intersection that may not be played on right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cell {
    #[default]
    Empty,
    Black,
    White,
    Ko,
}

impl Cell {
    pub fn stone(self) -> Option<Stone> {
        match self {
            Cell::Black => Some(Stone::Black),
            Cell::White => Some(Stone::White),
            Cell::Empty | Cell::Ko => None,
        }
    }

    /// Empty or Ko. Both count as liberties.
    pub fn is_vacant(self) -> bool {
        self.stone().is_none()
    }

    pub fn is_ko(self) -> bool {
        self == Cell::Ko
    }
}

impl From<Stone> for Cell {
    fn from(stone: Stone) -> Self {
        match stone {
            Stone::Black => Cell::Black,
            Stone::White => Cell::White,
        }
    }
}

impl From<Option<Stone>> for Cell {
    fn from(stone: Option<Stone>) -> Self {
        stone.map_or(Cell::Empty, Cell::from)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => write!(f, "empty"),
            Cell::Black => write!(f, "black"),
            Cell::White => write!(f, "white"),
            Cell::Ko => write!(f, "ko"),
        }
    }
}
