use std::collections::BTreeSet;
use std::fmt;

use crate::cell::Cell;
use crate::coords;
use crate::error::GoError;
use crate::export::EngineQuery;
use crate::grid::Grid;
use crate::history::History;
use crate::stone::Stone;
use crate::{MAX_BOARD_SIZE, Point};

pub const DEFAULT_KOMI: f64 = 6.5;

/// A free-form Go board: stones plus the history that produced them.
///
/// Mutation methods are permissive so that an editor can set up any position.
/// `play` and `place` overwrite occupied points and never reject suicide;
/// only [`Goban::legal`] checks those rules, so call it first when playing by
/// the rules matters.
///
/// `Clone` is the cheap O(cells) deep copy used for speculative positions:
/// the clone owns its own grid and its own history.
#[derive(Debug, Clone, PartialEq)]
pub struct Goban {
    grid: Grid,
    komi: f64,
    to_play: Stone,
    history: History,
}

impl Default for Goban {
    fn default() -> Self {
        Goban::new(19, 19)
    }
}

impl Goban {
    /// Empty board, komi 6.5, Black to play.
    ///
    /// # Panics
    /// If either side is outside `1..=52`. See [`Goban::try_new`].
    pub fn new(cols: u8, rows: u8) -> Self {
        match Goban::try_new(cols, rows) {
            Ok(goban) => goban,
            Err(e) => panic!("{e}"),
        }
    }

    pub fn try_new(cols: u8, rows: u8) -> Result<Self, GoError> {
        let valid = 1..=MAX_BOARD_SIZE;
        if !valid.contains(&cols) || !valid.contains(&rows) {
            return Err(GoError::InvalidSize(cols, rows));
        }
        Ok(Goban {
            grid: Grid::new(cols, rows),
            komi: DEFAULT_KOMI,
            to_play: Stone::Black,
            history: History::new(),
        })
    }

    // -- Accessors --

    pub fn cols(&self) -> u8 {
        self.grid.cols()
    }

    pub fn rows(&self) -> u8 {
        self.grid.rows()
    }

    pub fn komi(&self) -> f64 {
        self.komi
    }

    pub fn set_komi(&mut self, komi: f64) {
        self.komi = komi;
    }

    /// Side to move. Metadata only; nothing here enforces it.
    pub fn to_play(&self) -> Stone {
        self.to_play
    }

    pub fn set_to_play(&mut self, stone: Stone) {
        self.to_play = stone;
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn get(&self, point: Point) -> Result<Cell, GoError> {
        self.grid.get(point)
    }

    pub fn stone_at(&self, point: Point) -> Option<Stone> {
        self.grid.stone_at(point)
    }

    pub fn ko_location(&self) -> Option<Point> {
        self.grid.ko_location()
    }

    pub fn black_stones(&self) -> Vec<Point> {
        self.grid.stones(Stone::Black)
    }

    pub fn white_stones(&self) -> Vec<Point> {
        self.grid.stones(Stone::White)
    }

    pub fn stones(&self) -> Vec<Point> {
        self.grid
            .points()
            .filter(|&p| self.grid.stone_at(p).is_some())
            .collect()
    }

    /// Vacant points, Ko included.
    pub fn empties(&self) -> Vec<Point> {
        self.grid
            .points()
            .filter(|&p| self.grid.stone_at(p).is_none())
            .collect()
    }

    // -- Editing --

    /// Set a stone down without captures or legality checks. Clears any Ko.
    /// The history keeps its move list unless this stone would change what
    /// those moves captured.
    pub fn place(&mut self, stone: Stone, point: Point) -> Result<(), GoError> {
        if coords::is_pass(point) {
            return Ok(());
        }
        self.grid.get(point)?;
        self.grid.clear_ko();
        self.grid.set(point, stone.into())?;
        self.history.place(stone, point, &self.grid);
        Ok(())
    }

    pub fn place_many(&mut self, black: &[Point], white: &[Point]) -> Result<(), GoError> {
        for &p in black {
            self.place(Stone::Black, p)?;
        }
        for &p in white {
            self.place(Stone::White, p)?;
        }
        Ok(())
    }

    /// Play a move and return the captured points. A single capture leaves a
    /// Ko mark at the vacated point.
    ///
    /// Suicide is not rejected: a stone without liberties stays on the board.
    pub fn play(&mut self, stone: Stone, point: Point) -> Result<Vec<Point>, GoError> {
        if coords::is_pass(point) {
            return Ok(Vec::new());
        }
        let removed = self.grid.play(stone, point)?;
        self.history.play(stone, point);
        Ok(removed)
    }

    /// Play `moves` alternately starting with `first`. Returns the captured
    /// `(black, white)` stones.
    pub fn play_many(
        &mut self,
        first: Stone,
        moves: &[Point],
    ) -> Result<(Vec<Point>, Vec<Point>), GoError> {
        let mut black_caps = Vec::new();
        let mut white_caps = Vec::new();
        let mut stone = first;
        for &p in moves {
            let caps = self.play(stone, p)?;
            match stone {
                Stone::Black => white_caps.extend(caps),
                Stone::White => black_caps.extend(caps),
            }
            stone = stone.opp();
        }
        Ok((black_caps, white_caps))
    }

    /// A copy of this board with one more move played.
    pub fn with_play(&self, stone: Stone, point: Point) -> Result<Goban, GoError> {
        let mut goban = self.clone();
        goban.play(stone, point)?;
        Ok(goban)
    }

    /// Take a stone off the board. Move order is kept when the history can
    /// drop that one stone and still reproduce the board; otherwise the
    /// history collapses to setup stones. Removing from a vacant point does
    /// nothing.
    pub fn remove(&mut self, point: Point) -> Result<(), GoError> {
        if self.grid.get(point)?.is_vacant() {
            return Ok(());
        }
        let surgical = self.history.try_remove(point, &self.grid);
        self.grid.set(point, Cell::Empty)?;
        if !surgical {
            self.history.collect(&self.grid);
        }
        Ok(())
    }

    /// Move the stone at `src` to `dest`, keeping its place in the move order
    /// when the result can be verified, collapsing the history otherwise.
    pub fn relocate(&mut self, src: Point, dest: Point) -> Result<(), GoError> {
        self.grid.get(dest)?;
        let Some(stone) = self.grid.get(src)?.stone() else {
            return Ok(());
        };
        if src == dest {
            return Ok(());
        }

        let surgical = self.history.try_relocate(src, dest, &self.grid);
        self.grid.set(src, Cell::Empty)?;
        self.grid.set(dest, stone.into())?;
        if !surgical {
            self.history.collect(&self.grid);
        }
        Ok(())
    }

    /// Remove every chain without liberties, the side not to move first.
    /// Meant for positions built with `place`; any capture collapses the
    /// history. Returns the removed `(black, white)` stones.
    pub fn cap_all_stones(&mut self, to_play: Stone) -> (Vec<Point>, Vec<Point>) {
        let mut black_caps = Vec::new();
        let mut white_caps = Vec::new();

        for color in [to_play.opp(), to_play] {
            let (black, white) = self.grid.groups();
            let groups = match color {
                Stone::Black => black,
                Stone::White => white,
            };
            for group in groups {
                if !self.grid.chain_liberties(&group).is_empty() {
                    continue;
                }
                let removed = self.grid.remove_chain(group[0]);
                match color {
                    Stone::Black => black_caps.extend(removed),
                    Stone::White => white_caps.extend(removed),
                }
            }
        }

        if !black_caps.is_empty() || !white_caps.is_empty() {
            self.history.collect(&self.grid);
        }
        (black_caps, white_caps)
    }

    pub fn clear(&mut self) {
        self.grid.clear();
        self.history.clear();
    }

    // -- Analysis --

    /// Would this play be legal? Never modifies the board.
    pub fn legal(&self, stone: Stone, point: Point) -> Result<bool, GoError> {
        self.grid.legal(stone, point)
    }

    /// Black and white chains.
    pub fn groups(&self) -> (Vec<Vec<Point>>, Vec<Vec<Point>>) {
        self.grid.groups()
    }

    pub fn liberties(&self, point: Point) -> Result<Vec<Point>, GoError> {
        self.grid.get(point)?;
        Ok(self.grid.liberties(point))
    }

    pub fn has_liberties(&self, point: Point) -> Result<bool, GoError> {
        self.grid.get(point)?;
        Ok(self.grid.has_liberties(point))
    }

    /// Every stone plus all points within `hops` steps of one.
    pub fn nearby_stones(&self, hops: usize) -> BTreeSet<Point> {
        let mut seen: BTreeSet<Point> = self.stones().into_iter().collect();
        let mut frontier: Vec<Point> = seen.iter().copied().collect();
        for _ in 0..hops {
            if frontier.is_empty() {
                break;
            }
            let mut next = Vec::new();
            for p in frontier {
                for n in self.grid.neighbors(p) {
                    if seen.insert(n) {
                        next.push(n);
                    }
                }
            }
            frontier = next;
        }
        seen
    }

    /// The given points and their direct neighbours. Off-board points are
    /// dropped.
    pub fn nearby(&self, points: &[Point]) -> BTreeSet<Point> {
        points
            .iter()
            .filter(|&&p| self.grid.on_board(p))
            .flat_map(|&p| std::iter::once(p).chain(self.grid.neighbors(p)))
            .collect()
    }

    /// Points whose stones differ between two boards of the same size.
    pub fn diff(&self, other: &Goban) -> Result<Vec<Point>, GoError> {
        self.grid.diff(&other.grid)
    }

    // -- Export --

    pub fn stones_n_moves(&self) -> (Vec<(Stone, Point)>, Vec<(Stone, Point)>) {
        self.history.stones_n_moves()
    }

    pub fn stones_n_moves_coords(&self) -> (Vec<(String, String)>, Vec<(String, String)>) {
        self.history.stones_n_moves_coords()
    }

    pub fn engine_query(&self) -> EngineQuery {
        EngineQuery::from_goban(self)
    }

    pub fn as_ascii(&self) -> String {
        self.to_string()
    }

    pub fn as_sgf(&self) -> String {
        crate::sgf::goban_to_sgf(self)
    }
}

impl fmt::Display for Goban {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\n   ")?;
        for x in 0..self.cols() {
            write!(f, "{x:>2}")?;
        }
        for y in (0..self.rows() as i8).rev() {
            write!(f, "\n{y:>2} ")?;
            for x in 0..self.cols() as i8 {
                let c = match self.grid.stone_at((x, y)) {
                    Some(Stone::Black) => 'X',
                    Some(Stone::White) => 'O',
                    None => '.',
                };
                write!(f, " {c}")?;
            }
        }
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_board_defaults() {
        let goban = Goban::default();
        assert_eq!((goban.cols(), goban.rows()), (19, 19));
        assert_eq!(goban.komi(), DEFAULT_KOMI);
        assert_eq!(goban.to_play(), Stone::Black);
        assert!(goban.stones().is_empty());
    }

    #[test]
    fn rejects_bad_sizes() {
        assert_eq!(Goban::try_new(0, 9), Err(GoError::InvalidSize(0, 9)));
        assert_eq!(Goban::try_new(9, 53), Err(GoError::InvalidSize(9, 53)));
        assert!(Goban::try_new(52, 1).is_ok());
    }

    #[test]
    #[should_panic(expected = "invalid board size")]
    fn new_panics_on_bad_size() {
        Goban::new(60, 60);
    }

    #[test]
    fn captures_surrounded_stone() {
        let mut goban = Goban::new(9, 9);
        goban.place(Stone::White, (1, 1)).unwrap();
        goban.place_many(&[(0, 1), (2, 1), (1, 0)], &[]).unwrap();

        let removed = goban.play(Stone::Black, (1, 2)).unwrap();
        assert_eq!(removed, vec![(1, 1)]);
        assert_eq!(goban.get((1, 1)), Ok(Cell::Ko));
        for p in [(0, 1), (2, 1), (1, 0), (1, 2)] {
            assert_eq!(goban.stone_at(p), Some(Stone::Black));
        }
    }

    #[test]
    fn place_clears_ko() {
        let mut goban = Goban::new(9, 9);
        goban.place(Stone::White, (1, 1)).unwrap();
        goban.place_many(&[(0, 1), (2, 1), (1, 0)], &[]).unwrap();
        goban.play(Stone::Black, (1, 2)).unwrap();
        assert_eq!(goban.ko_location(), Some((1, 1)));

        goban.place(Stone::White, (8, 8)).unwrap();
        assert_eq!(goban.ko_location(), None);
    }

    #[test]
    fn pass_is_a_no_op() {
        let mut goban = Goban::new(9, 9);
        assert_eq!(goban.play(Stone::Black, crate::PASS), Ok(vec![]));
        goban.place(Stone::White, crate::PASS).unwrap();
        assert!(goban.history().is_empty());
        assert_eq!(goban.legal(Stone::Black, crate::PASS), Ok(true));
    }

    #[test]
    fn off_board_is_an_error() {
        let mut goban = Goban::new(9, 9);
        assert_eq!(goban.play(Stone::Black, (9, 0)), Err(GoError::NotOnBoard((9, 0))));
        assert!(goban.place(Stone::Black, (0, 9)).is_err());
        assert!(goban.remove((20, 20)).is_err());
        assert!(goban.relocate((0, 0), (0, 10)).is_err());
        assert!(goban.legal(Stone::Black, (10, 10)).is_err());
        assert!(goban.liberties((-3, 0)).is_err());
        assert!(goban.history().is_empty());
    }

    #[test]
    fn remove_keeps_other_moves() {
        let mut goban = Goban::new(9, 9);
        goban
            .play_many(Stone::Black, &[(2, 2), (6, 6), (2, 6)])
            .unwrap();
        goban.remove((6, 6)).unwrap();

        assert_eq!(goban.stone_at((6, 6)), None);
        let (stones, moves) = goban.stones_n_moves();
        assert!(stones.is_empty());
        assert_eq!(moves, vec![(Stone::Black, (2, 2)), (Stone::Black, (2, 6))]);
    }

    #[test]
    fn remove_falls_back_to_collapse() {
        let mut goban = Goban::new(9, 9);
        goban
            .play_many(Stone::White, &[(0, 0), (1, 0), (4, 4), (0, 1)])
            .unwrap();
        assert_eq!(goban.stone_at((0, 0)), None);

        goban.remove((0, 1)).unwrap();
        assert_eq!(goban.stone_at((0, 1)), None);
        let (stones, moves) = goban.stones_n_moves();
        assert!(moves.is_empty());
        assert_eq!(stones.len(), 2);
    }

    #[test]
    fn relocate_moves_the_stone() {
        let mut goban = Goban::new(9, 9);
        goban.place(Stone::Black, (4, 4)).unwrap();
        goban.relocate((4, 4), (5, 5)).unwrap();
        assert_eq!(goban.stone_at((4, 4)), None);
        assert_eq!(goban.stone_at((5, 5)), Some(Stone::Black));
        assert_eq!(goban.history().placements().0, &[(5, 5)]);
    }

    #[test]
    fn relocate_onto_captured_setup_point_lists_it_once() {
        let mut goban = Goban::new(9, 9);
        goban.place(Stone::Black, (0, 0)).unwrap();
        goban.play(Stone::White, (1, 0)).unwrap();
        goban.play(Stone::White, (0, 1)).unwrap();
        goban.place(Stone::White, (4, 4)).unwrap();

        goban.relocate((4, 4), (0, 0)).unwrap();

        let query = goban.engine_query();
        let at_a1: Vec<_> = query
            .initial_stones
            .iter()
            .filter(|(_, p)| p == "A1")
            .collect();
        assert_eq!(at_a1, vec![&("W".to_string(), "A1".to_string())]);

        let boards = crate::sgf::parse(&goban.as_sgf())
            .unwrap()
            .to_goban_list()
            .unwrap();
        assert_eq!(boards.last().unwrap().stones_n_moves(), goban.stones_n_moves());
    }

    #[test]
    fn relocate_onto_occupied_point_collapses() {
        let mut goban = Goban::new(9, 9);
        goban.play_many(Stone::Black, &[(4, 4), (3, 3)]).unwrap();
        goban.relocate((4, 4), (3, 3)).unwrap();

        assert_eq!(goban.stone_at((4, 4)), None);
        assert_eq!(goban.stone_at((3, 3)), Some(Stone::Black));
        let (stones, moves) = goban.stones_n_moves();
        assert_eq!(stones, vec![(Stone::Black, (3, 3))]);
        assert!(moves.is_empty());
    }

    #[test]
    fn relocate_from_vacant_point_does_nothing() {
        let mut goban = Goban::new(9, 9);
        goban.play(Stone::Black, (4, 4)).unwrap();
        let before = goban.clone();
        goban.relocate((0, 0), (1, 1)).unwrap();
        goban.relocate((4, 4), (4, 4)).unwrap();
        assert_eq!(goban, before);
    }

    #[test]
    fn legal_leaves_board_alone() {
        let mut goban = Goban::new(5, 5);
        goban.place_many(&[(1, 0), (0, 1)], &[]).unwrap();
        let before = goban.clone();

        assert_eq!(goban.legal(Stone::White, (0, 0)), Ok(false));
        assert_eq!(goban.legal(Stone::Black, (0, 0)), Ok(true));
        assert_eq!(goban.legal(Stone::White, (1, 0)), Ok(false));
        assert_eq!(goban, before);
    }

    #[test]
    fn play_many_reports_captures_by_colour() {
        let mut goban = Goban::new(5, 5);
        let (black, white) = goban
            .play_many(Stone::White, &[(0, 0), (1, 0), (4, 4), (0, 1)])
            .unwrap();
        assert!(black.is_empty());
        assert_eq!(white, vec![(0, 0)]);
    }

    #[test]
    fn with_play_leaves_original() {
        let goban = Goban::new(5, 5);
        let next = goban.with_play(Stone::Black, (2, 2)).unwrap();
        assert_eq!(next.stone_at((2, 2)), Some(Stone::Black));
        assert_eq!(goban.stone_at((2, 2)), None);
    }

    #[test]
    fn cap_all_stones_removes_dead_setup() {
        let mut goban = Goban::new(5, 5);
        goban.place_many(&[(1, 0), (0, 1)], &[(0, 0)]).unwrap();
        let (black, white) = goban.cap_all_stones(Stone::Black);
        assert!(black.is_empty());
        assert_eq!(white, vec![(0, 0)]);
        assert_eq!(goban.stone_at((0, 0)), None);
        assert!(goban.history().plays().is_empty());
    }

    #[test]
    fn nearby_stones_expands_by_hops() {
        let mut goban = Goban::new(9, 9);
        goban.place(Stone::Black, (4, 4)).unwrap();
        assert_eq!(goban.nearby_stones(0).len(), 1);
        assert_eq!(goban.nearby_stones(1).len(), 5);
        assert_eq!(goban.nearby_stones(2).len(), 13);
        assert_eq!(goban.nearby_stones(usize::MAX).len(), 81);
        assert!(Goban::new(5, 5).nearby_stones(usize::MAX).is_empty());

        let corner = goban.nearby(&[(0, 0), (20, 20)]);
        assert_eq!(corner.into_iter().collect::<Vec<_>>(), vec![(0, 0), (0, 1), (1, 0)]);
    }

    #[test]
    fn diff_lists_changed_points() {
        let a = Goban::new(9, 9);
        let b = a.with_play(Stone::White, (3, 4)).unwrap();
        assert_eq!(a.diff(&b), Ok(vec![(3, 4)]));
        assert_eq!(a.diff(&Goban::new(5, 5)), Err(GoError::SizeMismatch));
    }

    #[test]
    fn ascii_dump() {
        let mut goban = Goban::new(3, 2);
        goban.place(Stone::Black, (0, 0)).unwrap();
        goban.place(Stone::White, (2, 1)).unwrap();
        assert_eq!(goban.as_ascii(), "\n    0 1 2\n 1  . . O\n 0  X . .\n");
    }

    #[test]
    fn clear_empties_everything() {
        let mut goban = Goban::new(9, 9);
        goban.play(Stone::Black, (1, 1)).unwrap();
        goban.clear();
        assert!(goban.stones().is_empty());
        assert!(goban.history().is_empty());
    }
}
