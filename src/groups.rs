//! Group discovery.
//!
//! A group is a maximal set of same-colored cells connected through the
//! configured adjacency table (8-connectivity by default). Groups are found
//! with a breadth-first flood fill seeded at every unvisited colored cell in
//! row-major order.
use std::collections::VecDeque;

use crate::config::AnalysisConfig;
use crate::engine::{Board, Cell, Tile};

/// A connected set of same-colored cells.
///
/// Cells are kept in the order the flood fill discovered them; the first cell
/// is the seed, which is also the group's earliest cell in row-major order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group {
    color: Tile,
    cells: Vec<Cell>,
}

impl Group {
    pub fn new(color: Tile, cells: Vec<Cell>) -> Self {
        Group { color, cells }
    }

    pub fn color(&self) -> Tile {
        self.color
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }
}

/// Finds the connected group of same-colored tiles containing `seed`.
///
/// Uses a Breadth-First Search. Every cell added to the group is marked in
/// `visited`, which is a row-major `rows * cols` flag array owned by the caller;
/// already visited cells are never revisited, so consecutive calls sharing one
/// `visited` array partition the board.
///
/// # Arguments
/// * `board`: The snapshot to search.
/// * `seed`: The starting cell.
/// * `visited`: Row-major visited flags for `board`.
/// * `directions`: The adjacency table as `(d_row, d_col)` steps.
///
/// # Returns
/// The cells of the group in discovery order. Returns an empty vector if the
/// seed is not a color (`Empty` or `Unknown`) or was already visited.
///
/// # Panics
/// Panics if `seed` is off the board or `visited` is shorter than the board.
pub fn find_group(
    board: &Board,
    seed: Cell,
    visited: &mut [bool],
    directions: &[(isize, isize)],
) -> Vec<Cell> {
    let (rows, cols) = (board.rows(), board.cols());
    let index = |cell: Cell| cell.row * cols + cell.col;

    let color = board.tile(seed);
    if !color.is_color() || visited[index(seed)] {
        return Vec::new();
    }

    let mut group = Vec::new();
    let mut queue = VecDeque::new();
    queue.push_back(seed);
    visited[index(seed)] = true;

    while let Some(current) = queue.pop_front() {
        group.push(current);

        for &(d_row, d_col) in directions {
            let Some(next) = current.offset(d_row, d_col, rows, cols) else {
                continue;
            };
            if !visited[index(next)] && board.tile(next) == color {
                visited[index(next)] = true;
                queue.push_back(next);
            }
        }
    }

    group
}

/// Finds every group on the board of at least `config.min_group_size` cells.
///
/// The board is scanned in row-major order and each unvisited colored cell
/// seeds one flood fill. Components smaller than the threshold are dropped.
/// The visited flags live only for the duration of the call.
///
/// # Returns
/// The eligible groups, ordered by their seed cell (row-major). Returns an
/// empty vector if the board holds no eligible group.
///
/// # Examples
/// ```
/// use collect_solver::config::AnalysisConfig;
/// use collect_solver::groups::find_all_groups;
/// use collect_solver::utils::board_from_str_array;
///
/// let board = board_from_str_array(&["RRRR"]).unwrap();
/// let groups = find_all_groups(&board, &AnalysisConfig::with_dimensions(1, 4));
/// assert_eq!(groups.len(), 1);
/// assert_eq!(groups[0].len(), 4);
/// ```
pub fn find_all_groups(board: &Board, config: &AnalysisConfig) -> Vec<Group> {
    let mut visited = vec![false; board.rows() * board.cols()];
    let mut all_groups = Vec::new();

    for seed in board.cells() {
        let cells = find_group(board, seed, &mut visited, &config.directions);
        if !cells.is_empty() && cells.len() >= config.min_group_size {
            all_groups.push(Group::new(board.tile(seed), cells));
        }
    }

    all_groups
}
