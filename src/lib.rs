//! # Sliding-Tile Puzzle Solver Library
//!
//! This library provides a state-space search engine for the N×N sliding-tile
//! puzzle (the classic 3x3 "8-puzzle" and its 2x2 to 5x5 relatives).
//!
//! It is used by two binaries:
//! - `puzzle_solver`: Solves a board given on the command line, read from a
//!   file, or shuffled from a seed, and prints the moves.
//! - `strategy_evaluator`: Compares breadth-first search against best-first
//!   search over a batch of seeded random boards.
//!
//! ## Modules
//! - `engine`: The board representation (`Board`), move directions (`Direction`),
//!   the hashable state encoding (`StateKey`) and legal-move generation.
//! - `ordered`: Binary-search insertion into a sorted `Vec`, used to keep a
//!   priority frontier ordered.
//! - `solver`: The search engine (`Solver`), its frontier and visited map, and
//!   solution path reconstruction.
//! - `utils`: Parsing boards from text and rendering solutions as steps.

pub mod engine;
pub mod ordered;
pub mod solver;
pub mod utils;

use crate::engine::Board;
use crate::solver::{SearchConfig, SolveOutcome, Solver, SolverError};

/// Solves `start` breadth-first, towards `goal` or the canonical sorted board.
///
/// Shorthand for building a `Solver` with `SearchConfig::default()` and calling
/// `solve` on it.
pub fn solve_breadth_first(start: &Board, goal: Option<&Board>) -> Result<SolveOutcome, SolverError> {
    let mut solver = Solver::new(start.clone(), goal.cloned(), SearchConfig::default())?;
    Ok(solver.solve())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solve_breadth_first_already_solved() {
        let board = Board::solved(3).unwrap();
        let outcome = solve_breadth_first(&board, None).unwrap();
        match outcome {
            SolveOutcome::Solved(path) => assert!(path.is_empty()),
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_solve_breadth_first_with_goal() {
        let start = Board::from_tiles(vec![1, 2, 3, 4, 5, 6, 7, 0, 8]).unwrap();
        let goal = Board::from_tiles(vec![1, 2, 3, 4, 5, 6, 7, 8, 0]).unwrap();
        match solve_breadth_first(&start, Some(&goal)).unwrap() {
            SolveOutcome::Solved(path) => assert_eq!(path.len(), 1),
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_solve_breadth_first_reports_unsolvable() {
        let start = Board::from_tiles(vec![0, 2, 1, 3]).unwrap();
        assert_eq!(solve_breadth_first(&start, None).unwrap(), SolveOutcome::Unsolvable);
    }
}
