use crate::engine::{Board, Tile};
use crate::ParseBoardError;

/// Parses an array of string slices into a `Board` object.
///
/// Each string slice in the input array represents a row on the board, starting from row 0.
/// The board takes its dimensions from the input: as many rows as slices, as many
/// columns as characters in the first slice. Every row must have the same length.
///
/// Valid characters for tiles are:
/// - 'R': `Tile::Red`
/// - 'B': `Tile::Blue`
/// - 'G': `Tile::Green`
/// - 'P': `Tile::Purple`
/// - 'O': `Tile::Orange`
/// - 'Y': `Tile::Yellow`
/// - '.': `Tile::Empty`
/// - '?': `Tile::Unknown`
///
/// Any other character will result in an error.
///
/// # Returns
/// * `Ok(Board)` if parsing is successful.
/// * `Err(ParseBoardError)` if:
///     - `s` is empty or its first row is empty.
///     - Any row's character length differs from the first row's.
///     - An unrecognized character is encountered.
///
/// # Examples
/// ```
/// use collect_solver::utils::board_from_str_array;
/// use collect_solver::engine::Tile;
///
/// let board = board_from_str_array(&["RGY", "B.?"]).unwrap();
/// assert_eq!(board.rows(), 2);
/// assert_eq!(board.cols(), 3);
/// assert_eq!(board.get_tile(0, 2), Tile::Yellow);
/// assert_eq!(board.get_tile(1, 1), Tile::Empty);
/// assert_eq!(board.get_tile(1, 2), Tile::Unknown);
///
/// assert!(board_from_str_array(&["RXB"]).is_err());
/// assert!(board_from_str_array(&["RGB", "RG"]).is_err());
/// ```
pub fn board_from_str_array(s: &[&str]) -> Result<Board, ParseBoardError> {
    let mut rows = Vec::with_capacity(s.len());
    for (r, row_str) in s.iter().enumerate() {
        let row = row_str
            .chars()
            .enumerate()
            .map(|(c, ch)| {
                Tile::from_char(ch).ok_or(ParseBoardError::UnrecognizedChar { ch, row: r, col: c })
            })
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(row);
    }
    Board::from_rows(rows)
}

/// Parses a board file's contents.
///
/// Lines are trimmed and blank lines are skipped, so files may carry a
/// trailing newline or indentation. Otherwise the format is the one accepted by
/// [`board_from_str_array`].
pub fn board_from_text(text: &str) -> Result<Board, ParseBoardError> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    board_from_str_array(&lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_from_str_array_valid() {
        let board_str = ["RGBPOY", "......", "??????"];
        let board = board_from_str_array(&board_str).unwrap();
        assert_eq!(board.rows(), 3);
        assert_eq!(board.cols(), 6);
        assert_eq!(board.get_tile(0, 0), Tile::Red);
        assert_eq!(board.get_tile(0, 4), Tile::Orange);
        assert_eq!(board.get_tile(1, 0), Tile::Empty);
        assert_eq!(board.get_tile(2, 5), Tile::Unknown);
    }

    #[test]
    fn test_board_from_str_array_invalid_char() {
        let result = board_from_str_array(&["RGX"]);
        assert_eq!(
            result,
            Err(ParseBoardError::UnrecognizedChar {
                ch: 'X',
                row: 0,
                col: 2
            })
        );
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("unrecognized character 'X'"));
    }

    #[test]
    fn test_board_from_str_array_with_spaces() {
        let result = board_from_str_array(&["R G"]);
        assert!(matches!(
            result,
            Err(ParseBoardError::UnrecognizedChar { ch: ' ', .. })
        ));
    }

    #[test]
    fn test_board_from_str_array_ragged_rows() {
        let result = board_from_str_array(&["RGB", "RGBR"]);
        assert_eq!(
            result,
            Err(ParseBoardError::RaggedRow {
                row: 1,
                expected: 3,
                found: 4
            })
        );
    }

    #[test]
    fn test_board_from_str_array_empty_input() {
        let board_str: [&str; 0] = [];
        assert_eq!(board_from_str_array(&board_str), Err(ParseBoardError::NoRows));
    }

    #[test]
    fn test_board_from_text_skips_blank_lines() {
        let text = "\n  RGB\n\nRRR  \n";
        let board = board_from_text(text).unwrap();
        assert_eq!(board.to_text(), "RGB\nRRR");
    }
}
