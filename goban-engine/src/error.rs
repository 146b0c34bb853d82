use std::fmt;

use crate::Point;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoError {
    NotOnBoard(Point),
    InvalidCoordinate(String),
    InvalidSize(u8, u8),
    SizeMismatch,
}

impl fmt::Display for GoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoError::NotOnBoard((x, y)) => write!(f, "point ({x}, {y}) is not on the board"),
            GoError::InvalidCoordinate(s) => write!(f, "invalid coordinate: {s}"),
            GoError::InvalidSize(cols, rows) => write!(
                f,
                "invalid board size {cols}x{rows} (each side must be 1-{})",
                crate::MAX_BOARD_SIZE
            ),
            GoError::SizeMismatch => write!(f, "boards have different dimensions"),
        }
    }
}

impl std::error::Error for GoError {}
