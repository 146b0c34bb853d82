pub mod cell;
pub mod coords;
pub mod error;
pub mod export;
pub mod goban;
pub mod grid;
pub mod history;
pub mod sgf;
pub mod stone;

/// Zero-based `(x, y)` intersection, `y = 0` being the bottom row.
pub type Point = (i8, i8);

/// The pass sentinel. Never on any board.
pub const PASS: Point = (-1, -1);

/// Largest supported board dimension (SGF can address `a..z` + `A..Z`).
pub const MAX_BOARD_SIZE: u8 = 52;

pub use cell::Cell;
pub use error::GoError;
pub use export::EngineQuery;
pub use goban::Goban;
pub use grid::Grid;
pub use history::History;
pub use stone::Stone;
