//! Drag path planning.
//!
//! A drag gesture must visit every cell of a group exactly once, moving one
//! cell at a time through the adjacency table. Not every group shape admits
//! such a walk, so the planner guarantees only that every step of the returned
//! path is valid; callers compare the path length against the group size and
//! the minimum drag length before acting on it.
use std::collections::HashSet;

use crate::config::{AnalysisConfig, PathPolicy, BACKTRACK_NODE_BUDGET};
use crate::engine::Cell;
use crate::groups::Group;

/// An ordered walk over distinct cells, each step moving to an adjacent cell.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Path(Vec<Cell>);

impl Path {
    pub fn cells(&self) -> &[Cell] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` if the path visits every cell of `group`.
    pub fn is_complete_for(&self, group: &Group) -> bool {
        self.len() == group.len() && self.0.iter().all(|&cell| group.contains(cell))
    }
}

impl From<Vec<Cell>> for Path {
    fn from(cells: Vec<Cell>) -> Self {
        Path(cells)
    }
}

/// Counts how many of `cell`'s neighbors (per `directions`) are in `members`.
pub fn neighbor_count(cell: Cell, members: &HashSet<Cell>, directions: &[(isize, isize)]) -> usize {
    directions
        .iter()
        .filter_map(|&(d_row, d_col)| cell.step(d_row, d_col))
        .filter(|neighbor| members.contains(neighbor))
        .count()
}

/// Finds the drag origin for a group: the cell with the fewest in-group neighbors.
///
/// A low neighbor count marks a cell on the group's rim, which is a more
/// natural place to start a drag than the interior. Ties go to the cell that
/// comes first in the group's iteration order.
///
/// # Returns
/// The start cell, or `None` for an empty group.
pub fn find_start_cell(group: &Group, directions: &[(isize, isize)]) -> Option<Cell> {
    let members: HashSet<Cell> = group.cells().iter().copied().collect();
    let mut best: Option<(Cell, usize)> = None;
    for &cell in group.cells() {
        let count = neighbor_count(cell, &members, directions);
        if best.map_or(true, |(_, best_count)| count < best_count) {
            best = Some((cell, count));
        }
    }
    best.map(|(cell, _)| cell)
}

/// Orders a group's cells into a drag path.
///
/// The walk starts at [`find_start_cell`] and then depends on
/// `config.path_policy`:
/// - `Greedy`: repeatedly steps to the first unvisited group cell found in
///   `config.directions` order, and stops at the first dead end. Reachable
///   cells may be left out.
/// - `Backtrack`: searches depth-first from the same start for a walk that
///   covers the whole group, within `BACKTRACK_NODE_BUDGET` expanded nodes.
///   Returns the longest walk seen, which is never shorter than the greedy one.
///
/// A one-cell group yields a one-cell path and an empty group an empty path.
///
/// # Examples
/// ```
/// use collect_solver::config::AnalysisConfig;
/// use collect_solver::engine::{Cell, Tile};
/// use collect_solver::groups::Group;
/// use collect_solver::path::build_path;
///
/// let cells = vec![Cell::new(0, 0), Cell::new(1, 0), Cell::new(2, 0), Cell::new(2, 1), Cell::new(2, 2)];
/// let group = Group::new(Tile::Red, cells.clone());
/// let path = build_path(&group, &AnalysisConfig::default());
/// assert_eq!(path.cells(), &cells[..]);
/// ```
pub fn build_path(group: &Group, config: &AnalysisConfig) -> Path {
    let directions = &config.directions;
    let Some(start) = find_start_cell(group, directions) else {
        return Path::default();
    };
    if group.len() == 1 {
        return Path(vec![start]);
    }

    let members: HashSet<Cell> = group.cells().iter().copied().collect();
    let greedy = greedy_walk(start, &members, directions);
    match config.path_policy {
        PathPolicy::Greedy => Path(greedy),
        PathPolicy::Backtrack => {
            if greedy.len() == members.len() {
                return Path(greedy);
            }
            let mut search = Backtracker::new(start, &members, directions, BACKTRACK_NODE_BUDGET);
            search.best = greedy;
            search.run();
            Path(search.best)
        }
    }
}

fn greedy_walk(start: Cell, members: &HashSet<Cell>, directions: &[(isize, isize)]) -> Vec<Cell> {
    let mut remaining = members.clone();
    remaining.remove(&start);
    let mut path = vec![start];
    let mut current = start;

    while !remaining.is_empty() {
        let next = directions
            .iter()
            .filter_map(|&(d_row, d_col)| current.step(d_row, d_col))
            .find(|neighbor| remaining.contains(neighbor));
        let Some(next) = next else {
            break;
        };
        remaining.remove(&next);
        path.push(next);
        current = next;
    }

    path
}

/// Depth-first search for a covering walk with a node budget.
struct Backtracker<'a> {
    members: &'a HashSet<Cell>,
    directions: &'a [(isize, isize)],
    budget: usize,
    expanded: usize,
    path: Vec<Cell>,
    on_path: HashSet<Cell>,
    best: Vec<Cell>,
}

impl<'a> Backtracker<'a> {
    fn new(
        start: Cell,
        members: &'a HashSet<Cell>,
        directions: &'a [(isize, isize)],
        budget: usize,
    ) -> Self {
        Backtracker {
            members,
            directions,
            budget,
            expanded: 0,
            path: vec![start],
            on_path: HashSet::from([start]),
            best: vec![start],
        }
    }

    fn run(&mut self) {
        self.extend();
    }

    /// Returns `true` once a covering walk is stored in `best`.
    fn extend(&mut self) -> bool {
        self.expanded += 1;
        if self.path.len() > self.best.len() {
            self.best.clone_from(&self.path);
        }
        if self.path.len() == self.members.len() {
            return true;
        }

        let Some(&current) = self.path.last() else {
            return false;
        };
        for &(d_row, d_col) in self.directions {
            if self.expanded >= self.budget {
                return false;
            }
            let Some(next) = current.step(d_row, d_col) else {
                continue;
            };
            if !self.members.contains(&next) || self.on_path.contains(&next) {
                continue;
            }
            self.path.push(next);
            self.on_path.insert(next);
            if self.extend() {
                return true;
            }
            self.path.pop();
            self.on_path.remove(&next);
        }
        false
    }
}

/// Checks that a path is drivable as one drag: no cell repeats and every
/// consecutive pair is 8-adjacent. Empty and one-cell paths are valid.
///
/// # Examples
/// ```
/// use collect_solver::engine::Cell;
/// use collect_solver::path::verify_path;
///
/// assert!(verify_path(&[Cell::new(0, 0), Cell::new(1, 1), Cell::new(1, 2)]));
/// assert!(!verify_path(&[Cell::new(0, 0), Cell::new(0, 2)]));
/// assert!(!verify_path(&[Cell::new(0, 0), Cell::new(0, 1), Cell::new(0, 0)]));
/// ```
pub fn verify_path(cells: &[Cell]) -> bool {
    let mut seen = HashSet::with_capacity(cells.len());
    cells.iter().all(|&cell| seen.insert(cell))
        && cells.windows(2).all(|pair| pair[0].is_adjacent(pair[1]))
}
