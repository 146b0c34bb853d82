use arrayvec::ArrayVec;

use crate::cell::Cell;
use crate::coords;
use crate::error::GoError;
use crate::stone::Stone;
use crate::Point;

/// Stone occupancy of a board, stored as a flat row-major array.
///
/// This is where all capture and liberty logic lives. It knows nothing about
/// how the position came about; see [`crate::History`] for that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<Cell>,
    cols: u8,
    rows: u8,
}

impl Grid {
    pub fn new(cols: u8, rows: u8) -> Self {
        Grid {
            cells: vec![Cell::Empty; cols as usize * rows as usize],
            cols,
            rows,
        }
    }

    // -- Accessors --

    pub fn cols(&self) -> u8 {
        self.cols
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn on_board(&self, point: Point) -> bool {
        coords::is_on_board(point, self.cols, self.rows)
    }

    pub fn get(&self, point: Point) -> Result<Cell, GoError> {
        self.check(point)?;
        Ok(self.cells[self.idx(point)])
    }

    /// Stone at `point`, `None` for vacant or off-board points.
    pub fn stone_at(&self, point: Point) -> Option<Stone> {
        if self.on_board(point) {
            self.cells[self.idx(point)].stone()
        } else {
            None
        }
    }

    /// All points in row-major order, bottom row first.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        (0..self.rows as i8).flat_map(move |y| (0..self.cols as i8).map(move |x| (x, y)))
    }

    pub fn stones(&self, stone: Stone) -> Vec<Point> {
        self.points()
            .filter(|&p| self.stone_at(p) == Some(stone))
            .collect()
    }

    pub fn ko_location(&self) -> Option<Point> {
        self.points().find(|&p| self.cells[self.idx(p)].is_ko())
    }

    /// Points whose stone occupancy differs. Ko marks count as empty.
    pub fn diff(&self, other: &Grid) -> Result<Vec<Point>, GoError> {
        if self.cols != other.cols || self.rows != other.rows {
            return Err(GoError::SizeMismatch);
        }
        Ok(self
            .points()
            .filter(|&p| self.stone_at(p) != other.stone_at(p))
            .collect())
    }

    pub fn same_stones(&self, other: &Grid) -> bool {
        self.diff(other).is_ok_and(|d| d.is_empty())
    }

    // -- Mutation --

    /// Write a cell without any capture logic.
    pub fn set(&mut self, point: Point, cell: Cell) -> Result<(), GoError> {
        self.check(point)?;
        let i = self.idx(point);
        self.cells[i] = cell;
        Ok(())
    }

    pub fn clear_ko(&mut self) {
        for cell in self.cells.iter_mut().filter(|c| c.is_ko()) {
            *cell = Cell::Empty;
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::Empty);
    }

    /// Put a stone down and remove every adjacent opposing chain left without
    /// liberties. Returns the removed points; a single removed stone leaves a
    /// Ko mark behind.
    ///
    /// Neither occupied points nor suicide are rejected here: the stone is
    /// written whatever was there, and a chain of its own colour left without
    /// liberties stays on the board. Use [`Grid::legal`] beforehand when that
    /// matters.
    pub fn play(&mut self, stone: Stone, point: Point) -> Result<Vec<Point>, GoError> {
        if coords::is_pass(point) {
            return Ok(Vec::new());
        }
        self.check(point)?;

        self.clear_ko();
        self.set(point, stone.into())?;

        let mut removed = Vec::new();
        for n in self.neighbors(point) {
            if self.stone_at(n) == Some(stone.opp()) && !self.has_liberties(n) {
                removed.extend(self.remove_chain(n));
            }
        }

        if let [single] = removed.as_slice() {
            self.set(*single, Cell::Ko)?;
        }
        Ok(removed)
    }

    /// Would `stone` at `point` be a legal play? Occupied and Ko points are
    /// not; otherwise the play is simulated on a scratch copy and must leave
    /// its own chain with a liberty.
    pub fn legal(&self, stone: Stone, point: Point) -> Result<bool, GoError> {
        if coords::is_pass(point) {
            return Ok(true);
        }
        if self.get(point)? != Cell::Empty {
            return Ok(false);
        }
        let mut scratch = self.clone();
        scratch.play(stone, point)?;
        Ok(scratch.has_liberties(point))
    }

    /// Clear the chain through `point` and return its stones.
    pub(crate) fn remove_chain(&mut self, point: Point) -> Vec<Point> {
        let chain = self.chain(point);
        for &p in &chain {
            let i = self.idx(p);
            self.cells[i] = Cell::Empty;
        }
        chain
    }

    // -- Graph algorithms --

    /// Get the 4-connected neighbors that are on the board.
    pub fn neighbors(&self, (x, y): Point) -> ArrayVec<Point, 4> {
        let mut result = ArrayVec::new();
        for n in [(x + 1, y), (x - 1, y), (x, y + 1), (x, y - 1)] {
            if self.on_board(n) {
                result.push(n);
            }
        }
        result
    }

    /// Flood-fill connected group of same-colored stones.
    pub fn chain(&self, point: Point) -> Vec<Point> {
        let mut visited = vec![false; self.cells.len()];
        self.chain_from(point, &mut visited)
    }

    /// Chain flood-fill using a shared visited bitset.
    fn chain_from(&self, point: Point, visited: &mut [bool]) -> Vec<Point> {
        let stone = match self.stone_at(point) {
            Some(s) => s,
            None => return Vec::new(),
        };

        let mut result = Vec::new();
        let mut stack = vec![point];

        while let Some(p) = stack.pop() {
            let vi = self.idx(p);
            if visited[vi] {
                continue;
            }
            visited[vi] = true;
            result.push(p);
            for n in self.neighbors(p) {
                if self.stone_at(n) == Some(stone) && !visited[self.idx(n)] {
                    stack.push(n);
                }
            }
        }

        result
    }

    /// Liberties of the chain through `point`.
    pub fn liberties(&self, point: Point) -> Vec<Point> {
        let chain = self.chain(point);
        self.chain_liberties(&chain)
    }

    /// Get the liberties of a chain (pre-computed group of points).
    pub fn chain_liberties(&self, chain: &[Point]) -> Vec<Point> {
        let mut seen = vec![false; self.cells.len()];
        let mut libs = Vec::new();
        for &p in chain {
            for n in self.neighbors(p) {
                let ni = self.idx(n);
                if !seen[ni] && self.cells[ni].is_vacant() {
                    seen[ni] = true;
                    libs.push(n);
                }
            }
        }
        libs
    }

    /// Like [`Grid::liberties`] but stops at the first one found.
    pub fn has_liberties(&self, point: Point) -> bool {
        self.chain(point)
            .iter()
            .any(|&p| self.neighbors(p).iter().any(|&n| self.cells[self.idx(n)].is_vacant()))
    }

    /// Connected components of each colour: `(black, white)`.
    pub fn groups(&self) -> (Vec<Vec<Point>>, Vec<Vec<Point>>) {
        let mut visited = vec![false; self.cells.len()];
        let mut black = Vec::new();
        let mut white = Vec::new();

        for p in self.points() {
            if visited[self.idx(p)] {
                continue;
            }
            match self.stone_at(p) {
                Some(Stone::Black) => black.push(self.chain_from(p, &mut visited)),
                Some(Stone::White) => white.push(self.chain_from(p, &mut visited)),
                None => {}
            }
        }

        (black, white)
    }

    // -- Internal helpers --

    fn check(&self, point: Point) -> Result<(), GoError> {
        if self.on_board(point) {
            Ok(())
        } else {
            Err(GoError::NotOnBoard(point))
        }
    }

    #[inline]
    fn idx(&self, (x, y): Point) -> usize {
        y as usize * self.cols as usize + x as usize
    }
}
