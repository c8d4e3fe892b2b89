//! Board model for the analysis engine.
//!
//! This module defines the data the rest of the crate reasons about:
//! - `Tile`: The closed set of cell labels (colors plus `Empty` and `Unknown`).
//! - `Cell`: A `(row, col)` coordinate, used as a set and map key.
//! - `Board`: One snapshot of the grid, plus the few mechanics the offline
//!   simulator needs (clearing cells, gravity, refilling holes).
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ParseBoardError;

/// Represents the label of a cell on the game board.
///
/// Each color variant is a piece that can join a group. `Empty` means no piece
/// is present and `Unknown` means the observer could not classify the cell;
/// neither ever joins a group.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tile {
    /// No piece in this cell.
    #[display("EMPTY")]
    Empty,
    /// The observer failed to classify this cell.
    #[display("UNKNOWN")]
    Unknown,
    #[display("RED")]
    Red,
    #[display("BLUE")]
    Blue,
    #[display("GREEN")]
    Green,
    #[display("PURPLE")]
    Purple,
    #[display("ORANGE")]
    Orange,
    #[display("YELLOW")]
    Yellow,
}

impl Tile {
    /// Every color label, in declaration order.
    pub const COLORS: [Tile; 6] = [
        Tile::Red,
        Tile::Blue,
        Tile::Green,
        Tile::Purple,
        Tile::Orange,
        Tile::Yellow,
    ];

    /// Returns `true` if this label is a piece color (not `Empty` or `Unknown`).
    pub fn is_color(self) -> bool {
        !matches!(self, Tile::Empty | Tile::Unknown)
    }

    /// Converts the tile to its character representation.
    ///
    /// This is the format used by board files.
    ///
    /// # Examples
    ///
    /// ```
    /// use collect_solver::engine::Tile;
    /// assert_eq!(Tile::Red.to_char(), 'R');
    /// assert_eq!(Tile::Empty.to_char(), '.');
    /// assert_eq!(Tile::Unknown.to_char(), '?');
    /// ```
    pub fn to_char(self) -> char {
        match self {
            Tile::Empty => '.',
            Tile::Unknown => '?',
            Tile::Red => 'R',
            Tile::Blue => 'B',
            Tile::Green => 'G',
            Tile::Purple => 'P',
            Tile::Orange => 'O',
            Tile::Yellow => 'Y',
        }
    }

    /// Parses the character form produced by [`Tile::to_char`].
    pub fn from_char(ch: char) -> Option<Tile> {
        let tile = match ch {
            '.' => Tile::Empty,
            '?' => Tile::Unknown,
            'R' => Tile::Red,
            'B' => Tile::Blue,
            'G' => Tile::Green,
            'P' => Tile::Purple,
            'O' => Tile::Orange,
            'Y' => Tile::Yellow,
            _ => return None,
        };
        Some(tile)
    }

    /// Returns the ANSI background color sequence for terminal output.
    fn to_ansi_color_code(self) -> &'static str {
        match self {
            Tile::Empty => "40",
            Tile::Unknown => "47",
            Tile::Red => "41",
            Tile::Green => "42",
            Tile::Yellow => "43",
            Tile::Blue => "44",
            Tile::Purple => "45",
            Tile::Orange => "48;5;208",
        }
    }
}

/// A board coordinate.
///
/// Ordering is row-major, so sorting cells gives the board's scan order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Cell { row, col }
    }

    /// Returns the cell at `(row + d_row, col + d_col)`, or `None` when that
    /// falls outside a `rows` x `cols` board.
    pub fn offset(self, d_row: isize, d_col: isize, rows: usize, cols: usize) -> Option<Cell> {
        let row = self.row.checked_add_signed(d_row)?;
        let col = self.col.checked_add_signed(d_col)?;
        (row < rows && col < cols).then_some(Cell { row, col })
    }

    /// Like [`Cell::offset`] but without an upper bound, for membership tests
    /// against a set of cells.
    pub(crate) fn step(self, d_row: isize, d_col: isize) -> Option<Cell> {
        Some(Cell {
            row: self.row.checked_add_signed(d_row)?,
            col: self.col.checked_add_signed(d_col)?,
        })
    }

    /// Returns `true` if `other` is one of the eight cells surrounding `self`.
    ///
    /// A cell is not adjacent to itself.
    ///
    /// # Examples
    /// ```
    /// use collect_solver::engine::Cell;
    /// assert!(Cell::new(1, 1).is_adjacent(Cell::new(2, 2)));
    /// assert!(!Cell::new(1, 1).is_adjacent(Cell::new(1, 1)));
    /// assert!(!Cell::new(0, 0).is_adjacent(Cell::new(0, 2)));
    /// ```
    pub fn is_adjacent(self, other: Cell) -> bool {
        self != other && self.row.abs_diff(other.row) <= 1 && self.col.abs_diff(other.col) <= 1
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl From<(usize, usize)> for Cell {
    fn from((row, col): (usize, usize)) -> Self {
        Cell { row, col }
    }
}

/// Represents one snapshot of the game board as a grid of `Tile`s.
///
/// Dimensions are fixed when the board is built. Tiles are stored row-major.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    rows: usize,
    cols: usize,
    grid: Vec<Tile>,
}

impl Board {
    /// Creates a `rows` x `cols` board with every cell set to `Tile::Empty`.
    ///
    /// # Examples
    /// ```
    /// use collect_solver::engine::{Board, Tile};
    /// let board = Board::new_empty(6, 6);
    /// assert_eq!(board.get_tile(0, 0), Tile::Empty);
    /// assert_eq!(board.rows(), 6);
    /// ```
    pub fn new_empty(rows: usize, cols: usize) -> Self {
        Board {
            rows,
            cols,
            grid: vec![Tile::Empty; rows * cols],
        }
    }

    /// Creates a board from explicit rows of tiles.
    ///
    /// # Arguments
    /// * `rows`: The rows of the board, top row first. Every row must have the
    ///   same length.
    ///
    /// # Returns
    /// * `Ok(Board)` for a rectangular, non-empty grid.
    /// * `Err(ParseBoardError)` if there are no rows, the first row is empty,
    ///   or any row differs in length from the first.
    pub fn from_rows(rows: Vec<Vec<Tile>>) -> Result<Self, ParseBoardError> {
        let cols = rows.first().map_or(0, Vec::len);
        if cols == 0 {
            return Err(ParseBoardError::NoRows);
        }
        let n_rows = rows.len();
        let mut grid = Vec::with_capacity(n_rows * cols);
        for (row, tiles) in rows.into_iter().enumerate() {
            if tiles.len() != cols {
                return Err(ParseBoardError::RaggedRow {
                    row,
                    expected: cols,
                    found: tiles.len(),
                });
            }
            grid.extend(tiles);
        }
        Ok(Board {
            rows: n_rows,
            cols,
            grid,
        })
    }

    /// Creates a board filled with colors drawn from `palette` using a seeded RNG.
    ///
    /// The same seed and palette always produce the same board. No `Empty` or
    /// `Unknown` tiles are generated.
    ///
    /// # Panics
    /// Panics if `palette` is empty.
    pub fn new_random_with_seed(rows: usize, cols: usize, palette: &[Tile], seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut board = Board::new_empty(rows, cols);
        board.refill(palette, &mut rng);
        board
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns `true` if `cell` lies on the board.
    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.rows && cell.col < self.cols
    }

    /// Returns the tile at `cell`.
    ///
    /// # Panics
    /// Panics if `cell` is outside the board.
    pub fn tile(&self, cell: Cell) -> Tile {
        self.get_tile(cell.row, cell.col)
    }

    /// Returns the tile at row `r` and column `c`.
    ///
    /// # Panics
    /// Panics if `r` or `c` are outside the board dimensions.
    pub fn get_tile(&self, r: usize, c: usize) -> Tile {
        assert!(r < self.rows && c < self.cols, "({r}, {c}) is off the board");
        self.grid[r * self.cols + c]
    }

    /// Sets the tile at row `r` and column `c`.
    ///
    /// # Panics
    /// Panics if `r` or `c` are outside the board dimensions.
    pub fn set_tile(&mut self, r: usize, c: usize, tile: Tile) {
        assert!(r < self.rows && c < self.cols, "({r}, {c}) is off the board");
        self.grid[r * self.cols + c] = tile;
    }

    /// Iterates over every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.rows).flat_map(move |row| (0..self.cols).map(move |col| Cell { row, col }))
    }

    /// Renders the board in the board-file format: one character per cell,
    /// one line per row, no trailing newline.
    ///
    /// # Examples
    /// ```
    /// use collect_solver::utils::board_from_str_array;
    /// let board = board_from_str_array(&["RG", ".?"]).unwrap();
    /// assert_eq!(board.to_text(), "RG\n.?");
    /// ```
    pub fn to_text(&self) -> String {
        self.grid
            .chunks(self.cols)
            .map(|row| row.iter().map(|tile| tile.to_char()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Generates a colored terminal rendering of the board.
    ///
    /// The output has row and column numbers and uses ANSI escape codes for the
    /// tile colors. Cells listed in `highlight` are drawn as `..` instead of
    /// blank, which is how a planned path is shown.
    pub fn to_string_with_highlight(&self, highlight: Option<&[Cell]>) -> String {
        let mut output = String::from("  ");
        for c_idx in 0..self.cols {
            output.push_str(&format!("{c_idx:<2}"));
        }
        output.push('\n');

        for r_idx in 0..self.rows {
            output.push_str(&format!("{r_idx:<2}"));
            for c_idx in 0..self.cols {
                let cell = Cell::new(r_idx, c_idx);
                let is_highlight = highlight.is_some_and(|cells| cells.contains(&cell));
                let content = if is_highlight { ".." } else { "  " };
                let color_code = self.tile(cell).to_ansi_color_code();
                output.push_str(&format!("\x1b[{color_code}m{content}\x1b[m"));
            }
            if r_idx + 1 < self.rows {
                output.push('\n');
            }
        }
        output
    }

    /// Sets every listed cell to `Tile::Empty`.
    ///
    /// # Returns
    /// The number of cells that held a piece before clearing.
    pub fn clear_cells(&mut self, cells: &[Cell]) -> usize {
        let mut cleared = 0;
        for &cell in cells {
            if self.tile(cell) != Tile::Empty {
                cleared += 1;
            }
            self.set_tile(cell.row, cell.col, Tile::Empty);
        }
        cleared
    }

    /// Applies gravity to the board column by column.
    ///
    /// Every non-empty tile falls to the lowest free slot of its column. The
    /// relative order of tiles within a column is preserved.
    pub fn apply_gravity(&mut self) {
        for c in 0..self.cols {
            let mut empty_slot = self.rows;
            for r_check in (0..self.rows).rev() {
                let tile = self.get_tile(r_check, c);
                if tile != Tile::Empty {
                    empty_slot -= 1;
                    if r_check != empty_slot {
                        self.set_tile(empty_slot, c, tile);
                        self.set_tile(r_check, c, Tile::Empty);
                    }
                }
            }
        }
    }

    /// Replaces every `Tile::Empty` cell with a random color from `palette`.
    ///
    /// # Panics
    /// Panics if `palette` is empty and the board has an empty cell.
    pub fn refill(&mut self, palette: &[Tile], rng: &mut impl Rng) {
        for tile in &mut self.grid {
            if *tile == Tile::Empty {
                *tile = palette[rng.gen_range(0..palette.len())];
            }
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_with_highlight(None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::board_from_str_array;

    #[test]
    fn test_new_empty_board() {
        let board = Board::new_empty(4, 3);
        assert_eq!(board.rows(), 4);
        assert_eq!(board.cols(), 3);
        assert!(board.cells().all(|cell| board.tile(cell) == Tile::Empty));
    }

    #[test]
    fn test_new_random_with_seed_determinism() {
        let palette = [Tile::Red, Tile::Blue, Tile::Green];
        let board_a = Board::new_random_with_seed(6, 6, &palette, 42);
        let board_b = Board::new_random_with_seed(6, 6, &palette, 42);
        let board_c = Board::new_random_with_seed(6, 6, &palette, 43);
        assert_eq!(board_a, board_b);
        assert_ne!(board_a, board_c, "different seeds should give different boards");
        assert!(board_a.cells().all(|cell| palette.contains(&board_a.tile(cell))));
    }

    #[test]
    fn test_from_rows_rejects_ragged_input() {
        let rows = vec![vec![Tile::Red, Tile::Blue], vec![Tile::Red]];
        assert_eq!(
            Board::from_rows(rows),
            Err(ParseBoardError::RaggedRow {
                row: 1,
                expected: 2,
                found: 1
            })
        );
        assert_eq!(Board::from_rows(Vec::new()), Err(ParseBoardError::NoRows));
    }

    #[test]
    fn test_tile_char_round_trip_and_colors() {
        for tile in Tile::COLORS {
            assert!(tile.is_color());
            assert_eq!(Tile::from_char(tile.to_char()), Some(tile));
        }
        assert!(!Tile::Empty.is_color());
        assert!(!Tile::Unknown.is_color());
        assert_eq!(Tile::from_char('x'), None);
    }

    #[test]
    fn test_tile_display_and_serde_names() {
        assert_eq!(Tile::Red.to_string(), "RED");
        assert_eq!(Tile::Unknown.to_string(), "UNKNOWN");
        assert_eq!(serde_json::to_string(&Tile::Orange).unwrap(), "\"ORANGE\"");
        let parsed: Tile = serde_json::from_str("\"EMPTY\"").unwrap();
        assert_eq!(parsed, Tile::Empty);
    }

    #[test]
    fn test_cell_offset_bounds() {
        let corner = Cell::new(0, 0);
        assert_eq!(corner.offset(-1, 0, 3, 3), None);
        assert_eq!(corner.offset(0, -1, 3, 3), None);
        assert_eq!(corner.offset(1, 1, 3, 3), Some(Cell::new(1, 1)));
        assert_eq!(Cell::new(2, 2).offset(1, 0, 3, 3), None);
    }

    #[test]
    fn test_cell_ordering_is_row_major() {
        let mut cells = vec![Cell::new(1, 0), Cell::new(0, 2), Cell::new(0, 1)];
        cells.sort();
        assert_eq!(cells, vec![Cell::new(0, 1), Cell::new(0, 2), Cell::new(1, 0)]);
    }

    #[test]
    fn test_display_board_formatting() {
        let board = board_from_str_array(&["R.", "?B"]).unwrap();
        let output = board.to_string();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "  0 1 ");
        assert!(lines[1].starts_with("0 \x1b[41m  \x1b[m\x1b[40m  \x1b[m"));
        assert!(lines[2].starts_with("1 \x1b[47m  \x1b[m\x1b[44m  \x1b[m"));

        let highlighted = board.to_string_with_highlight(Some(&[Cell::new(1, 1)][..]));
        assert!(highlighted.contains("\x1b[44m..\x1b[m"));
    }

    #[test]
    fn test_clear_cells_counts_only_pieces() {
        let mut board = board_from_str_array(&["RR.", "GGG"]).unwrap();
        let cleared = board.clear_cells(&[Cell::new(0, 0), Cell::new(0, 2)]);
        assert_eq!(cleared, 1);
        assert_eq!(board.to_text(), ".R.\nGGG");
    }

    #[test]
    fn test_apply_gravity_mixed_column() {
        let mut board = board_from_str_array(&["R.", ".B", "G.", "..", "Y."]).unwrap();
        board.apply_gravity();
        assert_eq!(board.to_text(), "..\n..\nR.\nG.\nYB");
    }

    #[test]
    fn test_apply_gravity_column_already_settled() {
        let mut board = board_from_str_array(&["..", "RB", "GY"]).unwrap();
        let before = board.clone();
        board.apply_gravity();
        assert_eq!(board, before);
    }

    #[test]
    fn test_refill_only_fills_holes() {
        let mut board = board_from_str_array(&["R.", ".B"]).unwrap();
        let mut rng = SmallRng::seed_from_u64(7);
        board.refill(&[Tile::Green], &mut rng);
        assert_eq!(board.to_text(), "RG\nGB");
    }
}
