//! The turn loop that drives an external observer and actuator.
//!
//! Each turn the observer produces a snapshot, the analysis pipeline picks a
//! move and the actuator replays its path as a drag. The loop decides when the
//! game is over: an obstruction on screen, a board that stopped changing, or
//! no usable move that the observer confirms as the end of the game.
use std::fmt;

use tracing::{info, warn};

use crate::analysis::{analyze, analyze_with_fallback, Outcome};
use crate::config::AnalysisConfig;
use crate::engine::Board;
use crate::path::Path;
use crate::SessionError;

/// One look at the live game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Observation {
    pub board: Board,
    /// Something (a popup, an interstitial) covers the board.
    pub obstructed: bool,
}

impl Observation {
    pub fn clear(board: Board) -> Self {
        Observation {
            board,
            obstructed: false,
        }
    }
}

/// Produces board snapshots from the game.
pub trait Observer {
    type Error: fmt::Display;

    fn observe(&mut self) -> Result<Observation, Self::Error>;

    /// Called after a turn without a usable move. Returns `true` if the game
    /// has really ended (e.g. a "no more moves" popup is showing) rather than
    /// the snapshot being misread.
    fn confirm_game_over(&mut self) -> bool;
}

/// Performs drag gestures on the game.
pub trait Actuator {
    type Error: fmt::Display;

    /// Drags through `path` in order. Returns `Ok(false)` when the gesture did
    /// not go through; the session then retries on a fresh snapshot.
    fn perform_drag(&mut self, path: &Path) -> Result<bool, Self::Error>;
}

/// Why a session stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, derive_more::Display, derive_more::IsVariant)]
pub enum EndReason {
    #[display("game over")]
    GameOver,
    #[display("board obstructed")]
    Obstructed,
    #[display("board stopped changing")]
    Stalled,
    #[display("no usable move")]
    NoMoveAvailable,
    #[display("turn limit reached")]
    TurnLimit,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionSettings {
    pub max_turns: usize,
    /// Consecutive repeats of the same snapshot that end the session.
    pub stall_limit: usize,
    /// Consecutive unconfirmed turns without a usable move that end the session.
    pub max_no_move_retries: usize,
    /// Try smaller groups when the largest one has no draggable path.
    pub use_fallback: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        SessionSettings {
            max_turns: 1000,
            stall_limit: 3,
            max_no_move_retries: 3,
            use_fallback: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionSummary {
    /// Drags the actuator reported as performed.
    pub moves: usize,
    /// Loop iterations, including retries.
    pub turns: usize,
    /// Total cells across all performed drags.
    pub cells_dragged: usize,
    pub end_reason: EndReason,
}

/// Runs turns until the game ends.
#[derive(Clone, Debug, Default)]
pub struct Session {
    config: AnalysisConfig,
    settings: SessionSettings,
}

impl Session {
    pub fn new(config: AnalysisConfig, settings: SessionSettings) -> Self {
        Session { config, settings }
    }

    /// Plays turns until an end condition is reached.
    ///
    /// # Returns
    /// * `Ok(SessionSummary)` for every normal ending, with the reason recorded.
    /// * `Err(SessionError)` if the observer or actuator fails, or a snapshot
    ///   does not match the configuration.
    pub fn run<O, A>(&self, observer: &mut O, actuator: &mut A) -> Result<SessionSummary, SessionError>
    where
        O: Observer,
        A: Actuator,
    {
        let mut moves = 0;
        let mut turns = 0;
        let mut cells_dragged = 0;
        let mut previous: Option<Board> = None;
        let mut same_board_count = 0;
        let mut no_move_streak = 0;

        let end_reason = loop {
            if turns >= self.settings.max_turns {
                break EndReason::TurnLimit;
            }
            turns += 1;

            let observation = observer.observe().map_err(|e| SessionError::Observer {
                message: e.to_string(),
            })?;
            if observation.obstructed {
                info!(turn = turns, "board obstructed");
                break EndReason::Obstructed;
            }

            let board = observation.board;
            if previous.as_ref() == Some(&board) {
                same_board_count += 1;
                warn!(turn = turns, repeats = same_board_count, "board unchanged since last turn");
                if same_board_count >= self.settings.stall_limit {
                    break EndReason::Stalled;
                }
            } else {
                same_board_count = 0;
            }

            let outcome = if self.settings.use_fallback {
                analyze_with_fallback(&board, &self.config)
            } else {
                analyze(&board, &self.config)
            }
            .map_err(SessionError::Snapshot)?;
            previous = Some(board);

            let path = match outcome {
                Outcome::Move { path, .. } => path,
                Outcome::Degenerate { .. } | Outcome::NoMove => {
                    if observer.confirm_game_over() {
                        info!(turn = turns, "game over confirmed");
                        break EndReason::GameOver;
                    }
                    no_move_streak += 1;
                    warn!(turn = turns, streak = no_move_streak, "no usable move, game not over");
                    if no_move_streak > self.settings.max_no_move_retries {
                        break EndReason::NoMoveAvailable;
                    }
                    continue;
                }
            };
            no_move_streak = 0;

            let performed = actuator.perform_drag(&path).map_err(|e| SessionError::Actuator {
                message: e.to_string(),
            })?;
            if !performed {
                warn!(turn = turns, "drag did not go through, retrying");
                continue;
            }
            moves += 1;
            cells_dragged += path.len();
            info!(turn = turns, moves, cells = path.len(), "move performed");
        };

        info!(moves, turns, reason = %end_reason, "session ended");
        Ok(SessionSummary {
            moves,
            turns,
            cells_dragged,
            end_reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::SimulatedGame;
    use crate::utils::board_from_str_array;
    use std::collections::VecDeque;

    /// Replays a fixed list of observations, repeating the last one.
    struct ScriptedObserver {
        script: VecDeque<Observation>,
        last: Option<Observation>,
        game_over: bool,
        fail: bool,
    }

    impl ScriptedObserver {
        fn new(boards: &[&[&str]]) -> Self {
            let script = boards
                .iter()
                .map(|rows| Observation::clear(board_from_str_array(rows).unwrap()))
                .collect();
            ScriptedObserver {
                script,
                last: None,
                game_over: false,
                fail: false,
            }
        }
    }

    impl Observer for ScriptedObserver {
        type Error = String;

        fn observe(&mut self) -> Result<Observation, String> {
            if self.fail {
                return Err("screen capture failed".to_string());
            }
            if let Some(next) = self.script.pop_front() {
                self.last = Some(next);
            }
            self.last.clone().ok_or_else(|| "empty script".to_string())
        }

        fn confirm_game_over(&mut self) -> bool {
            self.game_over
        }
    }

    #[derive(Default)]
    struct RecordingActuator {
        drags: Vec<Path>,
        accept: bool,
    }

    impl Actuator for RecordingActuator {
        type Error = String;

        fn perform_drag(&mut self, path: &Path) -> Result<bool, String> {
            self.drags.push(path.clone());
            Ok(self.accept)
        }
    }

    fn small_session(settings: SessionSettings) -> Session {
        Session::new(AnalysisConfig::with_dimensions(2, 3), settings)
    }

    const MOVE_BOARD: &[&str] = &["RRR", "BGB"];
    const NO_MOVE_A: &[&str] = &["RBR", "GPG"];
    const NO_MOVE_B: &[&str] = &["BRB", "PGP"];
    const WRONG_SIZE: &[&str] = &["RRRR"];

    #[test]
    fn test_obstruction_ends_session() {
        let mut observer = ScriptedObserver::new(&[MOVE_BOARD]);
        observer.script[0].obstructed = true;
        let mut actuator = RecordingActuator::default();
        let summary = small_session(SessionSettings::default())
            .run(&mut observer, &mut actuator)
            .unwrap();
        assert_eq!(summary.end_reason, EndReason::Obstructed);
        assert_eq!(summary.moves, 0);
        assert!(actuator.drags.is_empty());
    }

    #[test]
    fn test_unchanged_board_stalls() {
        let mut observer = ScriptedObserver::new(&[MOVE_BOARD]);
        let mut actuator = RecordingActuator {
            accept: true,
            ..Default::default()
        };
        let summary = small_session(SessionSettings::default())
            .run(&mut observer, &mut actuator)
            .unwrap();
        assert_eq!(summary.end_reason, EndReason::Stalled);
        assert_eq!(summary.moves, 3);
        assert_eq!(summary.turns, 4);
        assert_eq!(summary.cells_dragged, 9);
    }

    #[test]
    fn test_no_move_confirmed_is_game_over() {
        let mut observer = ScriptedObserver::new(&[NO_MOVE_A]);
        observer.game_over = true;
        let mut actuator = RecordingActuator::default();
        let summary = small_session(SessionSettings::default())
            .run(&mut observer, &mut actuator)
            .unwrap();
        assert_eq!(summary.end_reason, EndReason::GameOver);
        assert_eq!(summary.turns, 1);
    }

    #[test]
    fn test_unconfirmed_no_move_retries_then_gives_up() {
        let mut observer = ScriptedObserver::new(&[NO_MOVE_A, NO_MOVE_B, NO_MOVE_A]);
        let mut actuator = RecordingActuator::default();
        let settings = SessionSettings {
            max_no_move_retries: 1,
            ..SessionSettings::default()
        };
        let summary = small_session(settings)
            .run(&mut observer, &mut actuator)
            .unwrap();
        assert_eq!(summary.end_reason, EndReason::NoMoveAvailable);
        assert_eq!(summary.turns, 2);
    }

    #[test]
    fn test_rejected_drag_is_not_counted() {
        let mut observer = ScriptedObserver::new(&[MOVE_BOARD, MOVE_BOARD]);
        let mut actuator = RecordingActuator::default();
        let settings = SessionSettings {
            max_turns: 2,
            ..SessionSettings::default()
        };
        let summary = small_session(settings)
            .run(&mut observer, &mut actuator)
            .unwrap();
        assert_eq!(summary.end_reason, EndReason::TurnLimit);
        assert_eq!(summary.moves, 0);
        assert_eq!(actuator.drags.len(), 2);
    }

    #[test]
    fn test_observer_failure_is_an_error() {
        let mut observer = ScriptedObserver::new(&[MOVE_BOARD]);
        observer.fail = true;
        let mut actuator = RecordingActuator::default();
        let err = small_session(SessionSettings::default())
            .run(&mut observer, &mut actuator)
            .unwrap_err();
        assert!(matches!(err, SessionError::Observer { .. }));
        assert_eq!(err.to_string(), "observer failed: screen capture failed");
    }

    #[test]
    fn test_malformed_snapshot_is_an_error() {
        let mut observer = ScriptedObserver::new(&[WRONG_SIZE]);
        let mut actuator = RecordingActuator::default();
        let err = small_session(SessionSettings::default())
            .run(&mut observer, &mut actuator)
            .unwrap_err();
        assert!(matches!(err, SessionError::Snapshot(_)));
    }

    #[test]
    fn test_simulated_game_without_refill_runs_dry() {
        let config = AnalysisConfig::default();
        let mut game = SimulatedGame::new(config.clone(), 11).with_refill(false);
        let pieces_before = game.piece_count();
        let mut actuator = game.clone();

        let summary = Session::new(config, SessionSettings::default())
            .run(&mut game, &mut actuator)
            .unwrap();
        assert_eq!(summary.end_reason, EndReason::GameOver);
        assert!(summary.moves > 0);
        assert_eq!(summary.cells_dragged, pieces_before - game.piece_count());
    }
}
