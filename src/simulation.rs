//! An in-memory stand-in for the live game.
//!
//! `SimulatedGame` plays both collaborator roles: it reports its board as an
//! observer and applies drags as an actuator. Clones share one game, so a
//! session can hold the observer and the actuator as separate handles.
use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::debug;

use crate::analysis::min_drag_len;
use crate::config::AnalysisConfig;
use crate::engine::{Board, Tile};
use crate::groups::find_all_groups;
use crate::path::{verify_path, Path};
use crate::session::{Actuator, Observation, Observer};

#[derive(Debug)]
struct GameState {
    board: Board,
    rng: SmallRng,
    refill: bool,
    cleared: usize,
    drags: usize,
}

/// A seeded game: drags clear cells, pieces fall, and holes refill with
/// random palette colors unless refilling is turned off.
#[derive(Clone, Debug)]
pub struct SimulatedGame {
    config: AnalysisConfig,
    state: Rc<RefCell<GameState>>,
}

impl SimulatedGame {
    /// Starts a game on a random board drawn from `config`'s palette.
    ///
    /// The same seed always produces the same game, including refills.
    pub fn new(config: AnalysisConfig, seed: u64) -> Self {
        let board = Board::new_random_with_seed(config.rows, config.cols, &config.palette, seed);
        Self::with_board(config, board, seed)
    }

    /// Starts a game on a given board. `seed` drives the refills.
    pub fn with_board(config: AnalysisConfig, board: Board, seed: u64) -> Self {
        SimulatedGame {
            config,
            state: Rc::new(RefCell::new(GameState {
                board,
                rng: SmallRng::seed_from_u64(seed),
                refill: true,
                cleared: 0,
                drags: 0,
            })),
        }
    }

    /// Turns refilling on or off. Without refilling the board eventually runs
    /// out of groups.
    pub fn with_refill(self, refill: bool) -> Self {
        self.state.borrow_mut().refill = refill;
        self
    }

    pub fn board(&self) -> Board {
        self.state.borrow().board.clone()
    }

    /// Cells currently holding a piece.
    pub fn piece_count(&self) -> usize {
        let state = self.state.borrow();
        state
            .board
            .cells()
            .filter(|&cell| state.board.tile(cell) != Tile::Empty)
            .count()
    }

    /// Total cells cleared by accepted drags.
    pub fn cleared(&self) -> usize {
        self.state.borrow().cleared
    }

    /// Number of accepted drags.
    pub fn drags(&self) -> usize {
        self.state.borrow().drags
    }

    /// A drag registers only if it stays on the board, forms a valid walk,
    /// covers a single color and is long enough.
    fn accepts(&self, board: &Board, path: &Path) -> bool {
        let cells = path.cells();
        if cells.len() < min_drag_len(&self.config) || !verify_path(cells) {
            return false;
        }
        if !cells.iter().all(|&cell| board.contains(cell)) {
            return false;
        }
        let color = board.tile(cells[0]);
        color.is_color() && cells.iter().all(|&cell| board.tile(cell) == color)
    }
}

impl Observer for SimulatedGame {
    type Error = Infallible;

    fn observe(&mut self) -> Result<Observation, Infallible> {
        Ok(Observation::clear(self.board()))
    }

    fn confirm_game_over(&mut self) -> bool {
        find_all_groups(&self.state.borrow().board, &self.config).is_empty()
    }
}

impl Actuator for SimulatedGame {
    type Error = Infallible;

    fn perform_drag(&mut self, path: &Path) -> Result<bool, Infallible> {
        let mut state = self.state.borrow_mut();
        if !self.accepts(&state.board, path) {
            debug!(len = path.len(), "simulated drag rejected");
            return Ok(false);
        }

        let state = &mut *state;
        state.cleared += state.board.clear_cells(path.cells());
        state.drags += 1;
        state.board.apply_gravity();
        if state.refill {
            state.board.refill(&self.config.palette, &mut state.rng);
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Cell;
    use crate::utils::board_from_str_array;

    fn game_on(rows: &[&str], refill: bool) -> SimulatedGame {
        let board = board_from_str_array(rows).unwrap();
        let config = AnalysisConfig::with_dimensions(board.rows(), board.cols());
        SimulatedGame::with_board(config, board, 1).with_refill(refill)
    }

    fn path(coords: &[(usize, usize)]) -> Path {
        Path::from(coords.iter().map(|&rc| Cell::from(rc)).collect::<Vec<_>>())
    }

    #[test]
    fn test_drag_clears_and_applies_gravity() {
        let mut game = game_on(&["BG.", "RRR"], false);
        let performed = game.perform_drag(&path(&[(1, 0), (1, 1), (1, 2)])).unwrap();
        assert!(performed);
        assert_eq!(game.board().to_text(), "...\nBG.");
        assert_eq!(game.cleared(), 3);
        assert_eq!(game.drags(), 1);
    }

    #[test]
    fn test_drag_rejects_invalid_paths() {
        let mut game = game_on(&["RRB", "RBB"], false);
        // too short
        assert!(!game.perform_drag(&path(&[(0, 0), (0, 1)])).unwrap());
        // mixed colors
        assert!(!game.perform_drag(&path(&[(0, 0), (0, 1), (0, 2)])).unwrap());
        // jumps a cell
        assert!(!game.perform_drag(&path(&[(0, 0), (1, 0), (0, 2)])).unwrap());
        // off the board
        assert!(!game.perform_drag(&path(&[(1, 1), (1, 2), (1, 3)])).unwrap());
        assert_eq!(game.drags(), 0);
        assert_eq!(game.board().to_text(), "RRB\nRBB");
    }

    #[test]
    fn test_refill_keeps_board_full() {
        let mut game = game_on(&["BGP", "RRR"], true);
        assert!(game.perform_drag(&path(&[(1, 0), (1, 1), (1, 2)])).unwrap());
        assert_eq!(game.piece_count(), 6);
    }

    #[test]
    fn test_clones_share_state() {
        let mut actuator = game_on(&["RRR"], false);
        let mut observer = actuator.clone();
        assert!(actuator.perform_drag(&path(&[(0, 0), (0, 1), (0, 2)])).unwrap());
        assert_eq!(observer.observe().unwrap().board.to_text(), "...");
        assert!(observer.confirm_game_over());
    }

    #[test]
    fn test_same_seed_same_game() {
        let config = AnalysisConfig::default();
        let a = SimulatedGame::new(config.clone(), 5);
        let b = SimulatedGame::new(config, 5);
        assert_eq!(a.board(), b.board());
    }
}
