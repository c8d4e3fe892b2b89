//! # Collect Solver Library
//!
//! This library provides the board analysis and move selection engine for a
//! tile-matching game in which a move is a single drag gesture across a chain
//! of same-colored, 8-connected pieces.
//!
//! Each turn the caller hands the engine a board snapshot (a grid of color
//! labels). The engine finds every removable group, picks the largest one and
//! orders its cells into a drag path that an external actuator can replay.
//!
//! It is used by two binaries:
//! - `plan_move`: Reads a board file and prints the groups, the chosen group and
//!   the drag path for it.
//! - `policy_evaluator`: Plays simulated games on seeded random boards and
//!   compares the available path planning policies.
//!
//! ## Modules
//! - `engine`: Board representation (`Board`), labels (`Tile`), coordinates (`Cell`)
//!   and the board mechanics used by the simulator (clearing, gravity, refill).
//! - `config`: The `AnalysisConfig` (dimensions, palette, minimum group size,
//!   adjacency table, path policy) and its JSON loading.
//! - `groups`: Group discovery by breadth-first flood fill.
//! - `selector`: Move selection among the discovered groups.
//! - `path`: Drag path construction for a chosen group.
//! - `analysis`: The per-turn pipeline tying the three together, with snapshot validation.
//! - `session`: The turn loop driving an external observer and actuator.
//! - `simulation`: An in-memory game implementing both collaborators, used for tests and evaluation.
//! - `utils`: Board parsing from text rows.

pub mod analysis;
pub mod config;
pub mod engine;
pub mod groups;
pub mod path;
pub mod selector;
pub mod session;
pub mod simulation;
pub mod utils;

use crate::engine::{Cell, Tile};

/// A board snapshot that breaks the observer contract.
///
/// This is the only hard failure of the analysis pipeline. Noise such as
/// `Tile::Unknown` cells is not an error; it is simply excluded from groups.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum SnapshotError {
    #[display(
        "board is {actual_rows}x{actual_cols}, expected {expected_rows}x{expected_cols}"
    )]
    DimensionMismatch {
        expected_rows: usize,
        expected_cols: usize,
        actual_rows: usize,
        actual_cols: usize,
    },
    #[display("label {tile} at {cell} is not in the configured palette")]
    LabelOutsidePalette { cell: Cell, tile: Tile },
}

/// Failure to turn text rows into a `Board`.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseBoardError {
    #[display("board has no rows")]
    NoRows,
    #[display("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[display("unrecognized character '{ch}' in row {row} col {col}")]
    UnrecognizedChar { ch: char, row: usize, col: usize },
}

/// An `AnalysisConfig` that could not be loaded or does not make sense.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("failed to read config: {_0}")]
    Io(std::io::Error),
    #[display("failed to parse config: {_0}")]
    Json(serde_json::Error),
    #[display("board dimensions must be non-zero, got {rows}x{cols}")]
    ZeroDimension { rows: usize, cols: usize },
    #[display("minimum group size must be at least 1")]
    ZeroMinGroupSize,
    #[display("palette must contain at least one color")]
    EmptyPalette,
    #[display("palette entry {tile} is not a color")]
    NonColorInPalette { tile: Tile },
    #[display("direction ({d_row}, {d_col}) is not a single-cell step")]
    InvalidDirection { d_row: isize, d_col: isize },
    #[display("direction table must contain at least one step")]
    EmptyDirections,
    #[display("direction ({d_row}, {d_col}) is listed more than once")]
    DuplicateDirection { d_row: isize, d_col: isize },
    #[display("direction ({d_row}, {d_col}) has no opposite step in the table")]
    AsymmetricDirection { d_row: isize, d_col: isize },
}

/// A session that stopped because a collaborator or the snapshot contract failed.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum SessionError {
    #[display("invalid board snapshot: {_0}")]
    Snapshot(SnapshotError),
    #[display("observer failed: {message}")]
    Observer { message: String },
    #[display("actuator failed: {message}")]
    Actuator { message: String },
}
