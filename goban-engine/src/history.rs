//! Provenance of a position, split into unordered setup stones and an ordered
//! move list.
//!
//! The analysis engine caches and judges ko differently for moves played in
//! sequence than for stones set up out of band, so throwing away move order
//! on every edit would cost it both speed and correctness. Edits are therefore
//! applied optimistically: build the edited history, replay it from an empty
//! board and compare with the real position. Only an exact match is
//! committed; anything else falls back to [`History::collect`], which is
//! always correct but forgets the move order.

use tracing::{debug, trace};

use crate::cell::Cell;
use crate::coords;
use crate::error::GoError;
use crate::grid::Grid;
use crate::stone::Stone;
use crate::Point;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    black: Vec<Point>,
    white: Vec<Point>,
    plays: Vec<(Stone, Point)>,
}

/// Where the stone at a point came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entry {
    Play(usize),
    Placement(Stone, usize),
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    // -- Accessors --

    /// Setup stones as `(black, white)`. Order carries no meaning.
    pub fn placements(&self) -> (&[Point], &[Point]) {
        (&self.black, &self.white)
    }

    pub fn plays(&self) -> &[(Stone, Point)] {
        &self.plays
    }

    pub fn is_empty(&self) -> bool {
        self.black.is_empty() && self.white.is_empty() && self.plays.is_empty()
    }

    // -- Recording --

    /// Record a play. The caller performs the captures on its own grid.
    pub fn play(&mut self, stone: Stone, point: Point) {
        if coords::is_pass(point) {
            return;
        }
        self.plays.push((stone, point));
    }

    /// Record a stone that was just written to `grid` out of band.
    ///
    /// Setup stones replay before every move, so a new one may change what
    /// the existing moves would have captured. If it does, the history is
    /// collapsed. This can collapse in cases where a smarter edit would have
    /// kept the moves; callers must not rely on order surviving `place`.
    pub fn place(&mut self, stone: Stone, point: Point, grid: &Grid) {
        if coords::is_pass(point) {
            return;
        }
        let mut candidate = self.clone();
        candidate.black.retain(|&p| p != point);
        candidate.white.retain(|&p| p != point);
        candidate.placements_mut(stone).push(point);

        if candidate.reproduces(grid) {
            *self = candidate;
        } else {
            debug!(?point, %stone, "placement changes the move outcome, collapsing history");
            self.collect(grid);
        }
    }

    /// Try to take the stone at `point` out of the history without disturbing
    /// anything else. `grid` is the board before the removal. Returns `false`
    /// and leaves the history untouched if the edit cannot be verified.
    pub fn try_remove(&mut self, point: Point, grid: &Grid) -> bool {
        let Some(stone) = grid.stone_at(point) else {
            return false;
        };
        let Some(entry) = self.locate(stone, point) else {
            return false;
        };

        let mut expected = grid.clone();
        if expected.set(point, Cell::Empty).is_err() {
            return false;
        }

        let mut candidate = self.clone();
        match entry {
            Entry::Play(i) => {
                candidate.plays.remove(i);
            }
            Entry::Placement(s, i) => {
                candidate.placements_mut(s).remove(i);
            }
        }

        self.commit_if_verified(candidate, &expected, "remove")
    }

    /// Try to move the stone at `src` to the vacant point `dest`, keeping its
    /// place in the move order. `grid` is the board before the move.
    pub fn try_relocate(&mut self, src: Point, dest: Point, grid: &Grid) -> bool {
        let Some(stone) = grid.stone_at(src) else {
            return false;
        };
        if !grid.get(dest).is_ok_and(Cell::is_vacant) {
            return false;
        }
        let Some(entry) = self.locate(stone, src) else {
            return false;
        };

        let mut expected = grid.clone();
        if expected.set(src, Cell::Empty).is_err() || expected.set(dest, stone.into()).is_err() {
            return false;
        }

        // A setup stone captured earlier may still be listed at `dest`.
        let mut candidate = self.clone();
        candidate.black.retain(|&p| p != dest);
        candidate.white.retain(|&p| p != dest);
        match entry {
            Entry::Play(i) => candidate.plays[i].1 = dest,
            Entry::Placement(s, _) => {
                if let Some(slot) = candidate.placements_mut(s).iter_mut().find(|p| **p == src) {
                    *slot = dest;
                }
            }
        }

        self.commit_if_verified(candidate, &expected, "relocate")
    }

    /// Forget the move order: every stone on `grid` becomes a setup stone.
    pub fn collect(&mut self, grid: &Grid) {
        self.black = grid.stones(Stone::Black);
        self.white = grid.stones(Stone::White);
        self.plays.clear();
    }

    pub fn clear(&mut self) {
        self.black.clear();
        self.white.clear();
        self.plays.clear();
    }

    // -- Replay --

    /// Rebuild a position from scratch: setup stones (black, then white),
    /// then every play with captures.
    pub fn replay(&self, cols: u8, rows: u8) -> Result<Grid, GoError> {
        let mut grid = Grid::new(cols, rows);
        for &p in &self.black {
            grid.set(p, Cell::Black)?;
        }
        for &p in &self.white {
            grid.set(p, Cell::White)?;
        }
        for &(stone, p) in &self.plays {
            grid.play(stone, p)?;
        }
        Ok(grid)
    }

    fn reproduces(&self, grid: &Grid) -> bool {
        self.replay(grid.cols(), grid.rows())
            .is_ok_and(|replayed| replayed.same_stones(grid))
    }

    fn commit_if_verified(&mut self, candidate: History, expected: &Grid, op: &str) -> bool {
        if candidate.reproduces(expected) {
            trace!(op, "surgical history edit verified");
            *self = candidate;
            true
        } else {
            debug!(op, "surgical history edit rejected by replay");
            false
        }
    }

    /// The entry that put `stone` at `point`: the latest matching play, or
    /// failing that a matching setup stone.
    fn locate(&self, stone: Stone, point: Point) -> Option<Entry> {
        if let Some(i) = self.plays.iter().rposition(|&m| m == (stone, point)) {
            return Some(Entry::Play(i));
        }
        self.placements_of(stone)
            .iter()
            .position(|&p| p == point)
            .map(|i| Entry::Placement(stone, i))
    }

    fn placements_of(&self, stone: Stone) -> &[Point] {
        match stone {
            Stone::Black => &self.black,
            Stone::White => &self.white,
        }
    }

    fn placements_mut(&mut self, stone: Stone) -> &mut Vec<Point> {
        match stone {
            Stone::Black => &mut self.black,
            Stone::White => &mut self.white,
        }
    }

    // -- Export --

    /// `(stones, moves)`: setup stones with their colour (unordered, black
    /// first) and the moves in the order they were played.
    pub fn stones_n_moves(&self) -> (Vec<(Stone, Point)>, Vec<(Stone, Point)>) {
        let stones = self
            .black
            .iter()
            .map(|&p| (Stone::Black, p))
            .chain(self.white.iter().map(|&p| (Stone::White, p)))
            .collect();
        (stones, self.plays.clone())
    }

    /// Same as [`History::stones_n_moves`] with GTP strings, e.g. `("B", "D4")`.
    pub fn stones_n_moves_coords(&self) -> (Vec<(String, String)>, Vec<(String, String)>) {
        let encode = |(stone, point): (Stone, Point)| {
            (stone.letter().to_string(), coords::gopoint_to_str(point))
        };
        let (stones, moves) = self.stones_n_moves();
        (
            stones.into_iter().map(encode).collect(),
            moves.into_iter().map(encode).collect(),
        )
    }
}
