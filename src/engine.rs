//! Board representation and move generation for the sliding-tile puzzle.
//!
//! This module defines the puzzle's fundamental components:
//! - `Direction`: The four directions the blank can travel in.
//! - `Board`: An immutable N×N permutation of `0..N²`, where `0` is the blank,
//!   together with the legal-move generator over it.
//! - `StateKey`: A compact, invertible encoding of a `Board` used as a hash key
//!   by the solver's visited map.
//! - `BoardError`: The ways constructing a `Board` can fail.
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// The value that marks the blank cell.
pub const BLANK: u8 = 0;

/// Smallest supported side length (a 2x2 board).
pub const MIN_SIDE: usize = 2;

/// Largest supported side length. A 5x5 board has 25 cells, and 25^25 still
/// fits in the `u128` behind `StateKey`.
pub const MAX_SIDE: usize = 5;

/// Errors raised while constructing a `Board` from external input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// The input has the right shape but is not a permutation of `0..N²`.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// The input does not have the shape of a square board at all.
    #[error("invalid input type: {0}")]
    InvalidInputType(String),
    /// The board is square but its side is outside `MIN_SIDE..=MAX_SIDE`.
    #[error("unsupported board side {side}: expected a side between 2 and 5")]
    UnsupportedSize { side: usize },
}

/// A direction the blank can move in.
///
/// Moving the blank `Up` swaps it with the tile directly above it, so that
/// tile slides down into the blank's old cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All directions, in the order successors are generated.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Returns the direction that undoes this one.
    ///
    /// # Examples
    ///
    /// ```
    /// use slide_solver::engine::Direction;
    /// assert_eq!(Direction::Up.opposite(), Direction::Down);
    /// assert_eq!(Direction::Left.opposite(), Direction::Right);
    /// ```
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Returns the `(row, column)` delta applied to the blank.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    /// Returns the flat-index offset from the blank to the tile it swaps with
    /// on a board `side` cells wide.
    pub fn offset(self, side: usize) -> isize {
        let (dr, dc) = self.delta();
        dr * side as isize + dc
    }

    /// Lowercase name, as used in step descriptions.
    pub fn name(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Canonical hashable encoding of a `Board`.
///
/// The tiles are read as the digits of a base-N² number, cell 0 being the most
/// significant digit. Two boards of the same side share a key iff they are
/// equal, and `decode` recovers the board given its side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateKey(u128);

impl StateKey {
    /// Returns the raw encoded value.
    pub fn value(self) -> u128 {
        self.0
    }

    /// Decodes this key back into a board with `side` cells per row.
    ///
    /// # Returns
    /// * `Ok(Board)` if the key holds exactly `side * side` digits forming a
    ///   permutation.
    /// * `Err(BoardError::UnsupportedSize)` for a side outside `MIN_SIDE..=MAX_SIDE`.
    /// * `Err(BoardError::InvalidInputType)` if the key has more digits than the board has cells.
    /// * `Err(BoardError::InvalidConfiguration)` if the digits are not a permutation.
    pub fn decode(self, side: usize) -> Result<Board, BoardError> {
        check_side(side)?;
        let cells = side * side;
        let base = cells as u128;
        let mut rest = self.0;
        let mut tiles = vec![BLANK; cells];
        for slot in tiles.iter_mut().rev() {
            *slot = (rest % base) as u8;
            rest /= base;
        }
        if rest != 0 {
            return Err(BoardError::InvalidInputType(format!(
                "key {} has more digits than a {}x{} board has cells",
                self.0, side, side
            )));
        }
        Board::from_tiles(tiles)
    }
}

fn check_side(side: usize) -> Result<(), BoardError> {
    if (MIN_SIDE..=MAX_SIDE).contains(&side) {
        Ok(())
    } else {
        Err(BoardError::UnsupportedSize { side })
    }
}

/// An immutable puzzle configuration.
///
/// The tiles are stored row-major. The board is always a permutation of
/// `0..side²` and is never mutated after construction; every move produces a
/// new `Board`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    side: usize,
    tiles: Vec<u8>,
    blank: usize,
}

impl Board {
    /// Builds a board from a row-major sequence of tiles.
    ///
    /// # Arguments
    /// * `tiles`: The cell values, row by row. Its length must be a perfect square.
    ///
    /// # Returns
    /// * `Ok(Board)` if `tiles` is a permutation of `0..tiles.len()`.
    /// * `Err(BoardError::InvalidInputType)` if the length is not a perfect square.
    /// * `Err(BoardError::UnsupportedSize)` if the side is outside `MIN_SIDE..=MAX_SIDE`.
    /// * `Err(BoardError::InvalidConfiguration)` if a value is out of range or repeated.
    ///
    /// # Examples
    /// ```
    /// use slide_solver::engine::{Board, BoardError};
    /// let board = Board::from_tiles(vec![1, 2, 3, 4, 5, 6, 7, 0, 8]).unwrap();
    /// assert_eq!(board.side(), 3);
    /// assert!(matches!(
    ///     Board::from_tiles(vec![1, 1, 2, 3]),
    ///     Err(BoardError::InvalidConfiguration(_))
    /// ));
    /// ```
    pub fn from_tiles(tiles: Vec<u8>) -> Result<Self, BoardError> {
        let cells = tiles.len();
        let side = (cells as f64).sqrt().round() as usize;
        if cells == 0 || side * side != cells {
            return Err(BoardError::InvalidInputType(format!(
                "expected a square number of tiles, found {}",
                cells
            )));
        }
        check_side(side)?;

        let mut seen = vec![false; cells];
        for &value in &tiles {
            let idx = value as usize;
            if idx >= cells {
                return Err(BoardError::InvalidConfiguration(format!(
                    "tile {} is outside 0..{}",
                    value, cells
                )));
            }
            if seen[idx] {
                return Err(BoardError::InvalidConfiguration(format!(
                    "tile {} appears more than once",
                    value
                )));
            }
            seen[idx] = true;
        }

        // A permutation of 0..cells always contains the blank.
        let blank = tiles.iter().position(|&v| v == BLANK).unwrap_or_default();
        Ok(Board { side, tiles, blank })
    }

    /// Returns the canonical goal `0, 1, ..., side² - 1` (blank in the top-left corner).
    pub fn solved(side: usize) -> Result<Self, BoardError> {
        check_side(side)?;
        let tiles = (0..(side * side) as u8).collect();
        Ok(Board {
            side,
            tiles,
            blank: 0,
        })
    }

    /// Returns a uniformly shuffled board drawn from `rng`.
    ///
    /// The caller owns the random source; seed it (e.g. with
    /// `SmallRng::seed_from_u64`) for reproducible boards. About half of the
    /// results are not reachable from a given goal; see `has_same_parity`.
    pub fn shuffled<R: Rng + ?Sized>(side: usize, rng: &mut R) -> Result<Self, BoardError> {
        let mut tiles = Board::solved(side)?.tiles;
        tiles.shuffle(rng);
        Board::from_tiles(tiles)
    }

    /// Decodes `key` into a board with `side` cells per row. See `StateKey::decode`.
    pub fn decode(key: StateKey, side: usize) -> Result<Self, BoardError> {
        key.decode(side)
    }

    /// Number of cells per row (and per column).
    pub fn side(&self) -> usize {
        self.side
    }

    /// Row-major tiles.
    pub fn tiles(&self) -> &[u8] {
        &self.tiles
    }

    /// Returns the tile at row `r`, column `c`.
    ///
    /// # Panics
    /// Panics if `r` or `c` is not smaller than `side()`.
    pub fn get_tile(&self, r: usize, c: usize) -> u8 {
        assert!(r < self.side && c < self.side, "({}, {}) is off the board", r, c);
        self.tiles[r * self.side + c]
    }

    /// Returns the `(row, column)` of `value`, or `None` if it is not on the board.
    pub fn locate(&self, value: u8) -> Option<(usize, usize)> {
        self.tiles
            .iter()
            .position(|&v| v == value)
            .map(|idx| (idx / self.side, idx % self.side))
    }

    /// Returns the row holding `value`.
    pub fn row_of(&self, value: u8) -> Option<usize> {
        self.locate(value).map(|(r, _)| r)
    }

    /// Returns the column holding `value`.
    pub fn col_of(&self, value: u8) -> Option<usize> {
        self.locate(value).map(|(_, c)| c)
    }

    /// Returns the `(row, column)` of the blank.
    pub fn blank_position(&self) -> (usize, usize) {
        (self.blank / self.side, self.blank % self.side)
    }

    fn target_of(&self, direction: Direction) -> Option<usize> {
        let (row, col) = self.blank_position();
        let (dr, dc) = direction.delta();
        let nr = row as isize + dr;
        let nc = col as isize + dc;
        let bound = self.side as isize;
        if nr < 0 || nr >= bound || nc < 0 || nc >= bound {
            return None;
        }
        Some(nr as usize * self.side + nc as usize)
    }

    /// Returns the directions the blank can move in without leaving the grid,
    /// in `Direction::ALL` order.
    pub fn legal_moves(&self) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|&d| self.target_of(d).is_some())
            .collect()
    }

    /// Returns the board obtained by moving the blank one cell in `direction`,
    /// or `None` if that would leave the grid.
    ///
    /// # Examples
    /// ```
    /// use slide_solver::engine::{Board, Direction};
    /// let board = Board::from_tiles(vec![1, 2, 3, 0]).unwrap();
    /// let moved = board.apply(Direction::Up).unwrap();
    /// assert_eq!(moved.tiles(), &[1, 0, 3, 2]);
    /// assert!(board.apply(Direction::Right).is_none());
    /// ```
    pub fn apply(&self, direction: Direction) -> Option<Board> {
        let target = self.target_of(direction)?;
        let mut tiles = self.tiles.clone();
        tiles.swap(self.blank, target);
        Some(Board {
            side: self.side,
            tiles,
            blank: target,
        })
    }

    /// Returns every board reachable in one move, keyed by the blank's direction.
    ///
    /// A single adjacent swap preserves the permutation, so every successor is
    /// itself a valid board.
    pub fn successors(&self) -> BTreeMap<Direction, Board> {
        Direction::ALL
            .into_iter()
            .filter_map(|d| self.apply(d).map(|b| (d, b)))
            .collect()
    }

    /// Encodes this board into its `StateKey`.
    pub fn encode(&self) -> StateKey {
        let base = self.tiles.len() as u128;
        StateKey(
            self.tiles
                .iter()
                .fold(0u128, |acc, &v| acc * base + v as u128),
        )
    }

    fn inversions(&self) -> usize {
        let tiles: Vec<u8> = self.tiles.iter().copied().filter(|&v| v != BLANK).collect();
        tiles
            .iter()
            .enumerate()
            .map(|(i, &a)| tiles[i + 1..].iter().filter(|&&b| b < a).count())
            .sum()
    }

    /// Parity class of this permutation. Moves never change it.
    ///
    /// On odd sides a vertical move carries a tile past an even number of
    /// others, so the inversion parity alone is invariant. On even sides it
    /// flips together with the blank's row.
    fn parity(&self) -> usize {
        let inversions = self.inversions();
        if self.side % 2 == 1 {
            inversions % 2
        } else {
            (inversions + self.blank / self.side) % 2
        }
    }

    /// Returns `true` if `other` is reachable from this board, i.e. both have
    /// the same side and the same parity class.
    pub fn has_same_parity(&self, other: &Board) -> bool {
        self.side == other.side && self.parity() == other.parity()
    }

    /// Renders the tiles as one string, e.g. `"123405678"`. Boards wider than
    /// 3 have two-digit tiles, so their values are separated by commas.
    pub fn to_compact_string(&self) -> String {
        let separator = if self.side > 3 { "," } else { "" };
        self.tiles
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(separator)
    }
}

impl fmt::Display for Board {
    /// One row per line, the blank shown as `.`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = (self.tiles.len() - 1).to_string().len();
        for (r, row) in self.tiles.chunks(self.side).enumerate() {
            if r > 0 {
                writeln!(f)?;
            }
            let cells: Vec<String> = row
                .iter()
                .map(|&v| {
                    if v == BLANK {
                        format!("{:>width$}", ".", width = width)
                    } else {
                        format!("{:>width$}", v, width = width)
                    }
                })
                .collect();
            write!(f, "{}", cells.join(" "))?;
        }
        Ok(())
    }
}
