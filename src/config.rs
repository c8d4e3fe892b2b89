//! Analysis configuration.
//!
//! Everything the algorithms would otherwise hardcode lives here: board
//! dimensions, the color palette, the minimum removable group size, the
//! adjacency table and the path planning policy.
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::engine::Tile;
use crate::ConfigError;

pub const DEFAULT_ROWS: usize = 6;
pub const DEFAULT_COLS: usize = 6;
pub const DEFAULT_MIN_GROUP_SIZE: usize = 3;

/// The 8-connectivity table as `(d_row, d_col)` steps.
///
/// The order matters: it is the direction priority the path planner uses when
/// several neighbors are available (up, down, left, right, then the diagonals).
pub const DIRECTIONS: [(isize, isize); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

/// Upper bound on search nodes the `Backtrack` policy may expand for one group.
pub const BACKTRACK_NODE_BUDGET: usize = 20_000;

/// How the path planner orders a group's cells.
#[derive(
    Default,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::FromStr,
)]
#[serde(rename_all = "lowercase")]
pub enum PathPolicy {
    /// Walk greedily by direction priority and stop at the first dead end.
    #[default]
    #[display("greedy")]
    Greedy,
    /// Search depth-first for a walk covering the whole group, keeping the
    /// longest walk seen if the node budget runs out.
    #[display("backtrack")]
    Backtrack,
}

/// Parameters shared by group discovery, move selection and path planning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub rows: usize,
    pub cols: usize,
    /// Smallest group that counts as a move.
    pub min_group_size: usize,
    /// Colors the observer may report. `EMPTY` and `UNKNOWN` are always accepted
    /// on boards and must not appear here.
    pub palette: Vec<Tile>,
    pub directions: Vec<(isize, isize)>,
    pub path_policy: PathPolicy,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            min_group_size: DEFAULT_MIN_GROUP_SIZE,
            palette: vec![
                Tile::Red,
                Tile::Blue,
                Tile::Green,
                Tile::Purple,
                Tile::Orange,
            ],
            directions: DIRECTIONS.to_vec(),
            path_policy: PathPolicy::Greedy,
        }
    }
}

impl AnalysisConfig {
    /// Returns the default configuration resized to `rows` x `cols`.
    pub fn with_dimensions(rows: usize, cols: usize) -> Self {
        AnalysisConfig {
            rows,
            cols,
            ..AnalysisConfig::default()
        }
    }

    /// Parses a JSON document. Missing fields take their default values.
    ///
    /// # Examples
    /// ```
    /// use collect_solver::config::{AnalysisConfig, PathPolicy};
    /// let config = AnalysisConfig::from_json_str(
    ///     r#"{ "min_group_size": 4, "path_policy": "backtrack" }"#,
    /// ).unwrap();
    /// assert_eq!(config.min_group_size, 4);
    /// assert_eq!(config.path_policy, PathPolicy::Backtrack);
    /// assert_eq!(config.rows, 6);
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: AnalysisConfig = serde_json::from_str(json).map_err(ConfigError::Json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::from_json_str(&text)
    }

    /// Checks that the configuration describes something the algorithms can run on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(ConfigError::ZeroDimension {
                rows: self.rows,
                cols: self.cols,
            });
        }
        if self.min_group_size == 0 {
            return Err(ConfigError::ZeroMinGroupSize);
        }
        if self.palette.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        if let Some(&tile) = self.palette.iter().find(|tile| !tile.is_color()) {
            return Err(ConfigError::NonColorInPalette { tile });
        }
        if self.directions.is_empty() {
            return Err(ConfigError::EmptyDirections);
        }
        for (i, &(d_row, d_col)) in self.directions.iter().enumerate() {
            let is_unit_step = d_row.abs() <= 1 && d_col.abs() <= 1 && (d_row, d_col) != (0, 0);
            if !is_unit_step {
                return Err(ConfigError::InvalidDirection { d_row, d_col });
            }
            if self.directions[..i].contains(&(d_row, d_col)) {
                return Err(ConfigError::DuplicateDirection { d_row, d_col });
            }
            // adjacency must be symmetric or flood fill splits connected groups
            if !self.directions.contains(&(-d_row, -d_col)) {
                return Err(ConfigError::AsymmetricDirection { d_row, d_col });
            }
        }
        Ok(())
    }
}
