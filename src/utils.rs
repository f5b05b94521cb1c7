use crate::engine::{Board, BoardError};
use crate::solver::SolutionPath;

/// Parses a board from text.
///
/// Two layouts are accepted:
/// - Integers separated by whitespace and/or commas, row-major
///   (`"1 2 3\n4 5 6\n7 0 8"` or `"1,2,3,4,5,6,7,0,8"`).
/// - A single run of digits for boards up to 3x3, one digit per tile
///   (`"123456708"`), the compact form produced by `Board::to_compact_string`.
///
/// # Returns
/// * `Ok(Board)` if the tiles form a valid board.
/// * `Err(BoardError::InvalidInputType)` if a token is not a tile number.
/// * Any error from `Board::from_tiles` otherwise.
///
/// # Examples
/// ```
/// use slide_solver::utils::parse_board;
/// let a = parse_board("1 2 3\n4 5 6\n7 0 8").unwrap();
/// let b = parse_board("123456708").unwrap();
/// assert_eq!(a, b);
/// assert!(parse_board("1 2 x 0").is_err());
/// ```
pub fn parse_board(s: &str) -> Result<Board, BoardError> {
    let tokens: Vec<&str> = s
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .collect();

    if let [compact] = tokens.as_slice() {
        if compact.len() > 1 && compact.chars().all(|c| c.is_ascii_digit()) {
            let tiles = compact
                .chars()
                .filter_map(|c| c.to_digit(10))
                .map(|d| d as u8)
                .collect();
            return Board::from_tiles(tiles);
        }
    }

    let mut tiles = Vec::with_capacity(tokens.len());
    for (i, token) in tokens.iter().enumerate() {
        let value = token.parse::<u8>().map_err(|_| {
            BoardError::InvalidInputType(format!("token {} ('{}') is not a tile number", i, token))
        })?;
        tiles.push(value);
    }
    Board::from_tiles(tiles)
}

/// Renders a solution as numbered, human-readable steps.
///
/// Each line reads `"{n}. From {state}, move the {tile} {direction}"`. The moved
/// tile is the one at `blank + offset` in the parent state, where the offset is
/// -1/+1 for left/right and -side/+side for up/down. The direction printed is
/// the way the tile travels, which is opposite to the blank's.
///
/// # Arguments
/// * `path`: A path returned by `Solver::solve`.
/// * `side`: The side length of the boards in `path`.
///
/// # Returns
/// One line per step, or an error if a parent key does not decode into a board
/// of this side or a step would move the blank off the grid.
pub fn describe_solution_path(path: &SolutionPath, side: usize) -> Result<Vec<String>, BoardError> {
    let mut lines = Vec::with_capacity(path.len());
    for (i, step) in path.steps.iter().enumerate() {
        let parent = step.parent.decode(side)?;
        let (row, col) = parent.blank_position();
        let blank = (row * side + col) as isize;
        let moved = parent
            .apply(step.direction)
            .and_then(|_| usize::try_from(blank + step.direction.offset(side)).ok())
            .and_then(|idx| parent.tiles().get(idx).copied())
            .ok_or_else(|| {
                BoardError::InvalidConfiguration(format!(
                    "step {} moves the blank {} off the board",
                    i + 1,
                    step.direction
                ))
            })?;
        lines.push(format!(
            "{}. From {}, move the {} {}",
            i + 1,
            parent.to_compact_string(),
            moved,
            step.direction.opposite()
        ));
    }
    Ok(lines)
}
