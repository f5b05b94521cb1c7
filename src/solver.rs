//! State-space search over sliding-tile boards.
//!
//! A `Solver` owns the frontier of boards still to be expanded and the visited
//! map (`PathMap`) linking every recorded state to the parent it was first
//! reached from. Each call to `Solver::step` performs one cycle:
//!
//! 1. take the head of the frontier (or stop as exhausted if it is empty),
//! 2. record it in the visited map, skipping it if it was already recorded,
//! 3. stop as solved if it is the goal,
//! 4. push every unvisited successor onto the frontier.
//!
//! The frontier is FIFO for `Strategy::BreadthFirst`, which yields shortest
//! paths, or kept sorted by `(cost, depth)` with `ordered::binary_insert_by_key`
//! for `Strategy::BestFirst`.
use crate::engine::{Board, BoardError, Direction, StateKey};
use crate::ordered::binary_insert_by_key;
use log::{debug, error, info, trace};
use std::collections::{HashMap, VecDeque};
use std::fmt;
use thiserror::Error;

/// Cost function for best-first search: `(candidate board, depth) -> cost`.
/// Lower costs are expanded first.
pub type CostFn = fn(&Board, u32) -> u32;

/// Visited map: state key -> `(parent key, direction taken from the parent)`.
/// The start state maps to `None`.
pub type PathMap = HashMap<StateKey, Option<(StateKey, Direction)>>;

/// Errors raised while setting up a `Solver`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SolverError {
    #[error(transparent)]
    Board(#[from] BoardError),
}

/// Order in which the frontier hands out candidates.
#[derive(Clone, Copy, Debug)]
pub enum Strategy {
    /// First in, first out. Guarantees a path with the fewest moves.
    BreadthFirst,
    /// Lowest `(cost, depth)` first. Among entries with the same key, the most
    /// recently inserted one comes first.
    BestFirst(CostFn),
}

/// Search settings.
#[derive(Clone, Copy, Debug)]
pub struct SearchConfig {
    pub strategy: Strategy,
    /// Stop after this many expansions and report the search as aborted.
    pub max_expansions: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            strategy: Strategy::BreadthFirst,
            max_expansions: None,
        }
    }
}

/// A candidate waiting in the frontier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrontierEntry {
    pub board: Board,
    /// `None` only for the start entry.
    pub parent_key: Option<StateKey>,
    /// Direction the blank moved in from the parent. `None` only for the start entry.
    pub direction: Option<Direction>,
    /// Number of moves from the start.
    pub depth: u32,
}

#[derive(Debug)]
struct Ranked {
    priority: (u32, u32),
    entry: FrontierEntry,
}

#[derive(Debug)]
enum Frontier {
    Fifo(VecDeque<FrontierEntry>),
    Ordered { cost: CostFn, queue: Vec<Ranked> },
}

impl Frontier {
    fn new(strategy: Strategy) -> Self {
        match strategy {
            Strategy::BreadthFirst => Frontier::Fifo(VecDeque::new()),
            Strategy::BestFirst(cost) => Frontier::Ordered {
                cost,
                queue: Vec::new(),
            },
        }
    }

    fn push(&mut self, entry: FrontierEntry) {
        match self {
            Frontier::Fifo(queue) => queue.push_back(entry),
            Frontier::Ordered { cost, queue } => {
                let priority = ((*cost)(&entry.board, entry.depth), entry.depth);
                let ranked = Ranked { priority, entry };
                // The insertion primitive needs an element to compare against.
                if queue.is_empty() {
                    queue.push(ranked);
                } else if let Err(err) = binary_insert_by_key(ranked, queue, |r| r.priority) {
                    error!("dropped frontier entry: {}", err);
                }
            }
        }
    }

    fn pop(&mut self) -> Option<FrontierEntry> {
        match self {
            Frontier::Fifo(queue) => queue.pop_front(),
            Frontier::Ordered { queue, .. } => {
                if queue.is_empty() {
                    None
                } else {
                    Some(queue.remove(0).entry)
                }
            }
        }
    }

    fn len(&self) -> usize {
        match self {
            Frontier::Fifo(queue) => queue.len(),
            Frontier::Ordered { queue, .. } => queue.len(),
        }
    }
}

/// Where a `Solver` is in its run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchState {
    Running,
    /// The goal has been recorded in the visited map.
    Solved,
    /// The frontier ran dry (`aborted: false`) or the expansion limit was hit
    /// (`aborted: true`).
    Exhausted { aborted: bool },
}

impl SearchState {
    pub fn is_terminal(self) -> bool {
        self != SearchState::Running
    }
}

/// One move of a solution: from `parent`, move the blank in `direction`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathStep {
    pub parent: StateKey,
    pub direction: Direction,
}

/// The moves leading from the start to the goal, in order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SolutionPath {
    pub steps: Vec<PathStep>,
}

impl SolutionPath {
    /// Number of moves.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn directions(&self) -> Vec<Direction> {
        self.steps.iter().map(|s| s.direction).collect()
    }

    /// Applies every move to `start` and returns the resulting board, or `None`
    /// if some move would push the blank off the grid.
    pub fn replay(&self, start: &Board) -> Option<Board> {
        self.steps
            .iter()
            .try_fold(start.clone(), |board, step| board.apply(step.direction))
    }
}

/// Result of `Solver::solve`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SolveOutcome {
    Solved(SolutionPath),
    /// The whole reachable state space was searched without meeting the goal.
    Unsolvable,
    /// `SearchConfig::max_expansions` was reached first.
    Aborted { expanded: usize },
}

/// Search engine for one start/goal pair.
///
/// # Examples
/// ```
/// use slide_solver::engine::Board;
/// use slide_solver::solver::{SearchConfig, SolveOutcome, Solver};
///
/// let start = Board::from_tiles(vec![1, 2, 3, 4, 5, 6, 7, 0, 8]).unwrap();
/// let mut solver = Solver::new(start.clone(), None, SearchConfig::default()).unwrap();
/// match solver.solve() {
///     SolveOutcome::Solved(path) => {
///         assert_eq!(path.replay(&start), Some(Board::solved(3).unwrap()));
///     }
///     other => panic!("expected a solution, got {:?}", other),
/// }
/// ```
#[derive(Debug)]
pub struct Solver {
    start: Board,
    goal: Board,
    goal_key: StateKey,
    config: SearchConfig,
    frontier: Frontier,
    path_map: PathMap,
    state: SearchState,
    expanded: usize,
    solved_depth: Option<u32>,
}

impl Solver {
    /// Prepares a search from `start` to `goal`.
    ///
    /// # Arguments
    /// * `start`: The initial configuration.
    /// * `goal`: The target configuration. Defaults to `Board::solved(start.side())`.
    /// * `config`: Frontier strategy and optional expansion limit.
    ///
    /// # Returns
    /// `Err(SolverError::Board(BoardError::InvalidInputType(_)))` if `goal` has a
    /// different side than `start`.
    pub fn new(start: Board, goal: Option<Board>, config: SearchConfig) -> Result<Self, SolverError> {
        let goal = match goal {
            Some(goal) => goal,
            None => Board::solved(start.side())?,
        };
        if goal.side() != start.side() {
            return Err(BoardError::InvalidInputType(format!(
                "goal is {}x{} but start is {}x{}",
                goal.side(),
                goal.side(),
                start.side(),
                start.side()
            ))
            .into());
        }

        let mut frontier = Frontier::new(config.strategy);
        frontier.push(FrontierEntry {
            board: start.clone(),
            parent_key: None,
            direction: None,
            depth: 0,
        });

        Ok(Solver {
            goal_key: goal.encode(),
            start,
            goal,
            config,
            frontier,
            path_map: HashMap::new(),
            state: SearchState::Running,
            expanded: 0,
            solved_depth: None,
        })
    }

    /// Like `new`, validating raw tile sequences first.
    pub fn from_tiles(start: &[u8], goal: Option<&[u8]>, config: SearchConfig) -> Result<Self, SolverError> {
        let start = Board::from_tiles(start.to_vec())?;
        let goal = goal.map(|g| Board::from_tiles(g.to_vec())).transpose()?;
        Solver::new(start, goal, config)
    }

    pub fn start(&self) -> &Board {
        &self.start
    }

    pub fn goal(&self) -> &Board {
        &self.goal
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    /// Number of boards whose successors have been generated.
    pub fn expanded(&self) -> usize {
        self.expanded
    }

    pub fn visited_len(&self) -> usize {
        self.path_map.len()
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// The visited map built so far.
    pub fn path_map(&self) -> &PathMap {
        &self.path_map
    }

    /// Depth at which the goal was recorded, once solved.
    pub fn solved_depth(&self) -> Option<u32> {
        self.solved_depth
    }

    /// Runs one take-next / visit / check-goal / expand cycle.
    ///
    /// Does nothing once a terminal state has been reached.
    pub fn step(&mut self) -> SearchState {
        if self.state.is_terminal() {
            return self.state;
        }

        if let Some(limit) = self.config.max_expansions {
            if self.expanded >= limit {
                info!("search aborted after {} expansions", self.expanded);
                self.state = SearchState::Exhausted { aborted: true };
                return self.state;
            }
        }

        let current = match self.frontier.pop() {
            Some(entry) => entry,
            None => {
                info!(
                    "frontier exhausted after {} expansions: goal is not reachable from this start",
                    self.expanded
                );
                self.state = SearchState::Exhausted { aborted: false };
                return self.state;
            }
        };

        let key = current.board.encode();
        if self.path_map.contains_key(&key) {
            trace!("skipping {:?}, already visited", key);
            return self.state;
        }
        self.path_map
            .insert(key, current.parent_key.zip(current.direction));

        if key == self.goal_key {
            info!(
                "goal reached at depth {} after {} expansions",
                current.depth, self.expanded
            );
            self.solved_depth = Some(current.depth);
            self.state = SearchState::Solved;
            return self.state;
        }

        self.expanded += 1;
        for (direction, child) in current.board.successors() {
            if self.path_map.contains_key(&child.encode()) {
                continue;
            }
            self.frontier.push(FrontierEntry {
                board: child,
                parent_key: Some(key),
                direction: Some(direction),
                depth: current.depth + 1,
            });
        }
        trace!(
            "expanded {} at depth {}, frontier now {}",
            current.board.to_compact_string(),
            current.depth,
            self.frontier.len()
        );

        self.state
    }

    /// Steps until the search is solved, exhausted or aborted.
    pub fn solve(&mut self) -> SolveOutcome {
        debug!(
            "solving {} -> {} with {:?}",
            self.start.to_compact_string(),
            self.goal.to_compact_string(),
            self.config
        );
        let mut state = self.step();
        while !state.is_terminal() {
            state = self.step();
        }
        match state {
            SearchState::Solved => self
                .reconstruct(self.goal_key)
                .map_or(SolveOutcome::Unsolvable, SolveOutcome::Solved),
            SearchState::Exhausted { aborted: true } => SolveOutcome::Aborted {
                expanded: self.expanded,
            },
            _ => SolveOutcome::Unsolvable,
        }
    }

    /// Walks the visited map backwards from `key` to the start.
    ///
    /// Returns `None` if `key` has not been visited, and an empty path if `key`
    /// is the start itself.
    pub fn reconstruct(&self, key: StateKey) -> Option<SolutionPath> {
        let mut steps = Vec::new();
        let mut link = *self.path_map.get(&key)?;
        while let Some((parent, direction)) = link {
            steps.push(PathStep { parent, direction });
            link = *self.path_map.get(&parent)?;
        }
        steps.reverse();
        Some(SolutionPath { steps })
    }
}

impl fmt::Display for Solver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Solver<{:?}, expanded={}, visited={}, frontier={}>",
            self.state,
            self.expanded,
            self.path_map.len(),
            self.frontier.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(tiles: &[u8]) -> Board {
        Board::from_tiles(tiles.to_vec()).unwrap()
    }

    fn misplaced(board: &Board, depth: u32) -> u32 {
        let wrong = board
            .tiles()
            .iter()
            .enumerate()
            .filter(|&(i, &v)| v != 0 && v as usize != i)
            .count() as u32;
        depth + wrong
    }

    #[test]
    fn test_new_solver_starts_running_with_one_entry() {
        let solver = Solver::new(board(&[1, 2, 3, 0]), None, SearchConfig::default()).unwrap();
        assert_eq!(solver.state(), SearchState::Running);
        assert_eq!(solver.frontier_len(), 1);
        assert_eq!(solver.visited_len(), 0);
        assert_eq!(solver.goal(), &Board::solved(2).unwrap());
    }

    #[test]
    fn test_goal_side_mismatch() {
        let err = Solver::new(
            Board::solved(3).unwrap(),
            Some(Board::solved(2).unwrap()),
            SearchConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, SolverError::Board(BoardError::InvalidInputType(_))));
    }

    #[test]
    fn test_from_tiles_validates_both_boards() {
        let err = Solver::from_tiles(&[1, 1, 2, 3], None, SearchConfig::default()).unwrap_err();
        assert!(matches!(err, SolverError::Board(BoardError::InvalidConfiguration(_))));
        let err = Solver::from_tiles(&[0, 1, 2, 3], Some(&[0u8, 1, 2][..]), SearchConfig::default())
            .unwrap_err();
        assert!(matches!(err, SolverError::Board(BoardError::InvalidInputType(_))));
    }

    #[test]
    fn test_start_equals_goal_is_empty_path() {
        let mut solver = Solver::new(Board::solved(3).unwrap(), None, SearchConfig::default()).unwrap();
        assert_eq!(solver.solve(), SolveOutcome::Solved(SolutionPath::default()));
        assert_eq!(solver.expanded(), 0);
        assert_eq!(solver.solved_depth(), Some(0));
    }

    #[test]
    fn test_single_move() {
        let start = board(&[1, 0, 2, 3, 4, 5, 6, 7, 8]);
        let mut solver = Solver::new(start.clone(), None, SearchConfig::default()).unwrap();
        match solver.solve() {
            SolveOutcome::Solved(path) => {
                assert_eq!(path.directions(), vec![Direction::Left]);
                assert_eq!(path.steps[0].parent, start.encode());
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_breadth_first_solves_and_replays() {
        let start = board(&[1, 2, 3, 4, 5, 6, 7, 0, 8]);
        let mut solver = Solver::new(start.clone(), None, SearchConfig::default()).unwrap();
        let path = match solver.solve() {
            SolveOutcome::Solved(path) => path,
            other => panic!("unexpected outcome {:?}", other),
        };
        assert!(!path.is_empty());
        assert_eq!(path.len() as u32, solver.solved_depth().unwrap());
        assert_eq!(path.replay(&start).as_ref(), Some(solver.goal()));
        assert_eq!(solver.state(), SearchState::Solved);
    }

    #[test]
    fn test_breadth_first_path_is_shortest() {
        // Three blank moves away from the goal; nothing shorter exists.
        let goal = Board::solved(3).unwrap();
        let start = goal
            .apply(Direction::Right)
            .and_then(|b| b.apply(Direction::Down))
            .and_then(|b| b.apply(Direction::Right))
            .unwrap();
        let mut solver = Solver::new(start.clone(), None, SearchConfig::default()).unwrap();
        match solver.solve() {
            SolveOutcome::Solved(path) => {
                assert_eq!(
                    path.directions(),
                    vec![Direction::Left, Direction::Up, Direction::Left]
                );
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_custom_goal() {
        let start = Board::solved(2).unwrap();
        let goal = board(&[1, 0, 2, 3]);
        let mut solver = Solver::new(start.clone(), Some(goal.clone()), SearchConfig::default()).unwrap();
        match solver.solve() {
            SolveOutcome::Solved(path) => assert_eq!(path.replay(&start), Some(goal)),
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_unsolvable_2x2_exhausts_reachable_half() {
        let mut solver = Solver::new(board(&[0, 2, 1, 3]), None, SearchConfig::default()).unwrap();
        assert_eq!(solver.solve(), SolveOutcome::Unsolvable);
        assert_eq!(solver.state(), SearchState::Exhausted { aborted: false });
        // 4! / 2 permutations share the start's parity.
        assert_eq!(solver.visited_len(), 12);
        assert_eq!(solver.frontier_len(), 0);
    }

    #[test]
    fn test_unsolvable_3x3_exhausts() {
        let mut solver =
            Solver::new(board(&[0, 2, 1, 3, 4, 5, 6, 7, 8]), None, SearchConfig::default()).unwrap();
        assert_eq!(solver.solve(), SolveOutcome::Unsolvable);
        assert_eq!(solver.visited_len(), 181_440);
    }

    #[test]
    fn test_expansion_limit_aborts() {
        let config = SearchConfig {
            max_expansions: Some(5),
            ..SearchConfig::default()
        };
        let mut solver = Solver::new(board(&[8, 7, 6, 5, 4, 3, 2, 1, 0]), None, config).unwrap();
        assert_eq!(solver.solve(), SolveOutcome::Aborted { expanded: 5 });
        assert_eq!(solver.state(), SearchState::Exhausted { aborted: true });
        // Terminal states are sticky.
        assert_eq!(solver.step(), SearchState::Exhausted { aborted: true });
    }

    #[test]
    fn test_best_first_solves_and_replays() {
        let start = board(&[1, 2, 5, 3, 4, 0, 6, 7, 8]);
        let config = SearchConfig {
            strategy: Strategy::BestFirst(misplaced),
            max_expansions: None,
        };
        let mut solver = Solver::new(start.clone(), None, config).unwrap();
        match solver.solve() {
            SolveOutcome::Solved(path) => {
                assert_eq!(path.replay(&start).as_ref(), Some(solver.goal()));
                assert_eq!(path.len() as u32, solver.solved_depth().unwrap());
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_best_first_detects_unsolvable() {
        let config = SearchConfig {
            strategy: Strategy::BestFirst(misplaced),
            max_expansions: None,
        };
        let mut solver = Solver::new(board(&[0, 2, 1, 3]), None, config).unwrap();
        assert_eq!(solver.solve(), SolveOutcome::Unsolvable);
    }

    #[test]
    fn test_path_map_is_a_tree_rooted_at_start() {
        let start = board(&[1, 2, 3, 4, 5, 6, 7, 0, 8]);
        let mut solver = Solver::new(start.clone(), None, SearchConfig::default()).unwrap();
        solver.solve();
        let map = solver.path_map();
        assert_eq!(map.get(&start.encode()), Some(&None));
        let roots = map.values().filter(|link| link.is_none()).count();
        assert_eq!(roots, 1);
        for link in map.values().flatten() {
            assert!(map.contains_key(&link.0), "parent {:?} was never visited", link.0);
        }
    }

    #[test]
    fn test_step_by_step_transitions() {
        let mut solver = Solver::new(board(&[1, 0, 2, 3]), None, SearchConfig::default()).unwrap();
        // Start is visited and expanded.
        assert_eq!(solver.step(), SearchState::Running);
        assert_eq!(solver.visited_len(), 1);
        assert_eq!(solver.expanded(), 1);
        assert_eq!(solver.frontier_len(), 2);
        // First successor (blank down) is not the goal.
        assert_eq!(solver.step(), SearchState::Running);
        // Second successor (blank left) is.
        assert_eq!(solver.step(), SearchState::Solved);
        assert_eq!(solver.reconstruct(solver.goal().encode()).unwrap().len(), 1);
    }

    #[test]
    fn test_reconstruct_unknown_key() {
        let solver = Solver::new(Board::solved(2).unwrap(), None, SearchConfig::default()).unwrap();
        assert!(solver.reconstruct(Board::solved(2).unwrap().encode()).is_none());
    }

    #[test]
    fn test_display_reports_progress() {
        let mut solver = Solver::new(Board::solved(2).unwrap(), None, SearchConfig::default()).unwrap();
        solver.solve();
        assert_eq!(
            solver.to_string(),
            "Solver<Solved, expanded=0, visited=1, frontier=0>"
        );
    }
}
