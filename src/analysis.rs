//! The per-turn analysis pipeline.
//!
//! `analyze` validates a snapshot and runs group discovery, move selection and
//! path planning over it. It holds no state between calls.
use tracing::debug;

use crate::config::AnalysisConfig;
use crate::engine::Board;
use crate::groups::{find_all_groups, Group};
use crate::path::{build_path, Path};
use crate::selector::{rank_groups, select_best_move};
use crate::SnapshotError;

/// Result of analysing one snapshot.
#[derive(Clone, Debug, PartialEq, Eq, derive_more::IsVariant)]
pub enum Outcome {
    /// A group and a path long enough to drag.
    Move { group: Group, path: Path },
    /// The chosen group's path is too short to count as a move.
    Degenerate { group: Group, path: Path },
    /// No group reaches the minimum size.
    NoMove,
}

impl Outcome {
    pub fn group(&self) -> Option<&Group> {
        match self {
            Outcome::Move { group, .. } | Outcome::Degenerate { group, .. } => Some(group),
            Outcome::NoMove => None,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Outcome::Move { path, .. } | Outcome::Degenerate { path, .. } => Some(path),
            Outcome::NoMove => None,
        }
    }
}

/// Shortest path that can be dragged: the configured group minimum, and never
/// a single cell.
pub fn min_drag_len(config: &AnalysisConfig) -> usize {
    config.min_group_size.max(2)
}

/// Checks a snapshot against the configured dimensions and palette.
///
/// `Empty` and `Unknown` cells are always accepted.
pub fn validate_snapshot(board: &Board, config: &AnalysisConfig) -> Result<(), SnapshotError> {
    if board.rows() != config.rows || board.cols() != config.cols {
        return Err(SnapshotError::DimensionMismatch {
            expected_rows: config.rows,
            expected_cols: config.cols,
            actual_rows: board.rows(),
            actual_cols: board.cols(),
        });
    }
    for cell in board.cells() {
        let tile = board.tile(cell);
        if tile.is_color() && !config.palette.contains(&tile) {
            return Err(SnapshotError::LabelOutsidePalette { cell, tile });
        }
    }
    Ok(())
}

fn plan(group: &Group, config: &AnalysisConfig) -> Outcome {
    let path = build_path(group, config);
    if path.len() >= min_drag_len(config) {
        Outcome::Move {
            group: group.clone(),
            path,
        }
    } else {
        Outcome::Degenerate {
            group: group.clone(),
            path,
        }
    }
}

/// Analyses a snapshot and picks the move for this turn.
///
/// Runs `find_all_groups`, `select_best_move` and `build_path` in sequence.
///
/// # Returns
/// * `Ok(Outcome::Move)` when the largest group has a draggable path.
/// * `Ok(Outcome::Degenerate)` when that path is shorter than `min_drag_len`.
/// * `Ok(Outcome::NoMove)` when no group reaches the minimum size.
/// * `Err(SnapshotError)` when the snapshot does not match the configuration.
///
/// # Examples
/// ```
/// use collect_solver::analysis::{analyze, Outcome};
/// use collect_solver::config::AnalysisConfig;
/// use collect_solver::utils::board_from_str_array;
///
/// let config = AnalysisConfig::with_dimensions(2, 3);
/// let board = board_from_str_array(&["RRR", "BGB"]).unwrap();
/// let outcome = analyze(&board, &config).unwrap();
/// assert!(outcome.is_move());
/// assert_eq!(outcome.path().unwrap().len(), 3);
///
/// let board = board_from_str_array(&["RBR", "GPG"]).unwrap();
/// assert_eq!(analyze(&board, &config).unwrap(), Outcome::NoMove);
/// ```
pub fn analyze(board: &Board, config: &AnalysisConfig) -> Result<Outcome, SnapshotError> {
    validate_snapshot(board, config)?;

    let groups = find_all_groups(board, config);
    debug!(count = groups.len(), "found eligible groups");

    let Some(best) = select_best_move(&groups) else {
        debug!("no eligible group");
        return Ok(Outcome::NoMove);
    };
    let outcome = plan(best, config);
    debug!(
        color = %best.color(),
        size = best.len(),
        path_len = outcome.path().map_or(0, Path::len),
        "selected group"
    );
    Ok(outcome)
}

/// Like [`analyze`], but when the largest group's path is degenerate the
/// remaining groups are tried in [`rank_groups`] order and the first one with
/// a draggable path is returned.
///
/// `Outcome::Degenerate` (for the largest group) is only returned when no
/// group yields a draggable path.
pub fn analyze_with_fallback(
    board: &Board,
    config: &AnalysisConfig,
) -> Result<Outcome, SnapshotError> {
    validate_snapshot(board, config)?;

    let groups = find_all_groups(board, config);
    let mut first_degenerate = None;
    for group in rank_groups(&groups) {
        match plan(group, config) {
            outcome @ Outcome::Move { .. } => {
                debug!(color = %group.color(), size = group.len(), "selected group");
                return Ok(outcome);
            }
            outcome => {
                debug!(size = group.len(), "group has no draggable path, trying next");
                first_degenerate.get_or_insert(outcome);
            }
        }
    }
    Ok(first_degenerate.unwrap_or(Outcome::NoMove))
}
