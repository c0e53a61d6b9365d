use crate::engine::ai::ChessAi;
use crate::engine::config::EngineConfig;
use crate::engine::level::{Level, LevelInfo};
use crate::logic::board::{BoardCoordinate, Color};
use crate::logic::game::{CapturedSummary, GameState, MoveError, MoveRecord};
use crate::logic::puzzle::{Puzzle, PuzzleAttempt, PuzzleSet};
use crate::logic::status::{status_line, GameOverSummary};
use log::{debug, info, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Pause after a solved puzzle before the next one is loaded.
pub const PUZZLE_ADVANCE_DELAY: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameMode {
    #[default]
    Friend,
    Ai,
    Puzzle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserMoveOutcome {
    /// Move played. `ai_to_move` asks the caller to start the bot's turn.
    Moved { record: MoveRecord, ai_to_move: bool },
    Rejected(MoveError),
    /// Puzzle answered correctly; load the next one after `next_in`.
    PuzzleSolved { record: MoveRecord, next_in: Duration },
    /// Wrong answer, the position is unchanged.
    PuzzleFailed,
}

/// Everything behind one board: mode, bot level, puzzle progress.
pub struct GameSession {
    game: GameState,
    ai: ChessAi,
    puzzles: PuzzleSet,
    mode: GameMode,
    level: Level,
    ai_color: Color,
    ai_thinking: bool,
    current_puzzle: Option<usize>,
}

impl GameSession {
    #[must_use]
    pub fn new(config: Arc<EngineConfig>) -> Self {
        Self {
            game: GameState::new(),
            ai: ChessAi::new(config),
            puzzles: PuzzleSet::builtin(),
            mode: GameMode::Friend,
            level: Level::default(),
            ai_color: Color::Black,
            ai_thinking: false,
            current_puzzle: None,
        }
    }

    #[must_use]
    pub const fn game(&self) -> &GameState {
        &self.game
    }

    #[must_use]
    pub const fn mode(&self) -> GameMode {
        self.mode
    }

    #[must_use]
    pub const fn level(&self) -> Level {
        self.level
    }

    #[must_use]
    pub const fn ai_color(&self) -> Color {
        self.ai_color
    }

    #[must_use]
    pub const fn is_ai_thinking(&self) -> bool {
        self.ai_thinking
    }

    #[must_use]
    pub fn current_puzzle(&self) -> Option<&Puzzle> {
        self.current_puzzle.and_then(|i| self.puzzles.get(i))
    }

    pub fn set_puzzles(&mut self, puzzles: PuzzleSet) {
        self.puzzles = puzzles;
        self.current_puzzle = None;
    }

    /// Switching mode always starts a fresh game.
    pub fn set_mode(&mut self, mode: GameMode) {
        info!("mode changed to {mode:?}");
        self.mode = mode;
        self.current_puzzle = None;
        self.reset();
    }

    pub fn set_level(&mut self, level: u8) {
        self.level = Level::new(level);
        debug!("bot level set to {}", self.level.value());
    }

    #[must_use]
    pub fn level_info(&self) -> LevelInfo {
        self.level.info()
    }

    pub fn reset(&mut self) {
        self.game.reset();
        self.ai_thinking = false;
    }

    /// Takes back the last move; against the bot, the bot's reply too.
    /// Refused while the bot is thinking.
    pub fn undo(&mut self) -> bool {
        if self.mode == GameMode::Ai && self.ai_thinking {
            return false;
        }
        let undone = self.game.undo_move().is_some();
        if self.mode == GameMode::Ai {
            self.game.undo_move();
        }
        undone
    }

    /// Loads a random puzzle, avoiding the one just played.
    pub fn start_puzzle<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<&Puzzle> {
        let index = self.puzzles.next(rng, self.current_puzzle)?;
        let puzzle = self.puzzles.get(index)?;
        if let Err(e) = self.game.load_fen(&puzzle.fen) {
            warn!("puzzle '{}' has a bad position: {e}", puzzle.title);
            return None;
        }
        info!("puzzle started: {}", puzzle.title);
        self.mode = GameMode::Puzzle;
        self.ai_thinking = false;
        self.current_puzzle = Some(index);
        Some(puzzle)
    }

    pub fn user_move(&mut self, from: BoardCoordinate, to: BoardCoordinate) -> UserMoveOutcome {
        if self.mode == GameMode::Puzzle {
            return self.puzzle_move(from, to);
        }
        if self.game.is_game_over() {
            return UserMoveOutcome::Rejected(MoveError::GameOver);
        }
        if self.mode == GameMode::Ai && (self.ai_thinking || self.game.turn() == self.ai_color) {
            return UserMoveOutcome::Rejected(MoveError::NotYourTurn);
        }

        match self.game.make_move(from, to, None) {
            Ok(record) => {
                let ai_to_move = self.mode == GameMode::Ai && !self.game.is_game_over();
                UserMoveOutcome::Moved { record, ai_to_move }
            }
            Err(e) => UserMoveOutcome::Rejected(e),
        }
    }

    fn puzzle_move(&mut self, from: BoardCoordinate, to: BoardCoordinate) -> UserMoveOutcome {
        let Some(puzzle) = self.current_puzzle.and_then(|i| self.puzzles.get(i)) else {
            return UserMoveOutcome::Rejected(MoveError::GameOver);
        };
        match puzzle.check(&self.game, from, to, &mut self.ai) {
            PuzzleAttempt::Correct => match self.game.make_move(from, to, None) {
                Ok(record) => UserMoveOutcome::PuzzleSolved {
                    record,
                    next_in: PUZZLE_ADVANCE_DELAY,
                },
                Err(e) => UserMoveOutcome::Rejected(e),
            },
            PuzzleAttempt::Incorrect => UserMoveOutcome::PuzzleFailed,
        }
    }

    /// Marks the bot as thinking and returns how long to wait before calling
    /// `finish_ai_turn`. `None` when it is not the bot's turn.
    pub fn begin_ai_turn(&mut self) -> Option<Duration> {
        if self.mode != GameMode::Ai
            || self.ai_thinking
            || self.game.turn() != self.ai_color
            || self.game.is_game_over()
        {
            return None;
        }
        self.ai_thinking = true;
        Some(self.level.think_delay(self.ai.config()))
    }

    pub fn finish_ai_turn<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<MoveRecord> {
        if !self.ai_thinking {
            return None;
        }
        let record = self
            .ai
            .best_move(&self.game, self.level, rng)
            .map(|mv| self.game.play(&mv));
        if record.is_none() {
            warn!("bot found no move in {}", self.game.fen());
        }
        self.ai_thinking = false;
        record
    }

    #[must_use]
    pub fn status_line(&self) -> String {
        if self.ai_thinking {
            return "AI is thinking...".to_owned();
        }
        status_line(&self.game)
    }

    #[must_use]
    pub fn game_over_summary(&self) -> Option<GameOverSummary> {
        GameOverSummary::from_status(self.game.status())
    }

    #[must_use]
    pub fn captured_pieces(&self) -> CapturedSummary {
        self.game.captured_pieces()
    }
}
