use crate::engine::ai::ChessAi;
use crate::engine::{SearchLimit, Searcher};
use crate::logic::board::BoardCoordinate;
use crate::logic::game::{standard_squares, GameState, MoveError};
use rand::Rng;
use serde::{Deserialize, Serialize};
use shakmaty::Role;

/// Search depth used to grade puzzles that ship without a solution.
const GRADING_DEPTH: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleMove {
    pub from: BoardCoordinate,
    pub to: BoardCoordinate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Puzzle {
    #[serde(alias = "currentFen")]
    pub fen: String,
    #[serde(default, rename = "move")]
    pub solution: Option<PuzzleMove>,
    pub title: String,
    #[serde(default)]
    pub desc: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PuzzleAttempt {
    Correct,
    Incorrect,
}

impl Puzzle {
    #[must_use]
    pub fn description(&self) -> &str {
        self.desc.as_deref().unwrap_or("Find the best move!")
    }

    /// # Errors
    ///
    /// `MoveError::InvalidFen` when the stored position does not load.
    pub fn game(&self) -> Result<GameState, MoveError> {
        GameState::from_fen(&self.fen)
    }

    /// Grades a move made from the puzzle position. Without a stored
    /// solution any move the engine scores as high as its own choice counts.
    pub fn check(
        &self,
        game: &GameState,
        from: BoardCoordinate,
        to: BoardCoordinate,
        ai: &mut ChessAi,
    ) -> PuzzleAttempt {
        let correct = match self.solution {
            Some(solution) => solution.from == from && solution.to == to,
            None => matches_engine_best(game, from, to, ai),
        };
        if correct {
            PuzzleAttempt::Correct
        } else {
            PuzzleAttempt::Incorrect
        }
    }
}

fn matches_engine_best(
    game: &GameState,
    from: BoardCoordinate,
    to: BoardCoordinate,
    ai: &mut ChessAi,
) -> bool {
    let target = to.to_square();
    let Some(mv) = game.legal_moves_from(from).into_iter().find(|mv| {
        standard_squares(mv).is_some_and(|(_, t)| t == target)
            && mv.promotion().map_or(true, |p| p == Role::Queen)
    }) else {
        return false;
    };

    let engine = ai.engine_mut();
    let Some(best) = engine.search(game, SearchLimit::Depth(GRADING_DEPTH)) else {
        return false;
    };
    engine.score_move(game, &mv, GRADING_DEPTH) == best.score
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PuzzleSet {
    puzzles: Vec<Puzzle>,
}

impl Default for PuzzleSet {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PuzzleSet {
    #[must_use]
    pub fn new(puzzles: Vec<Puzzle>) -> Self {
        Self { puzzles }
    }

    #[must_use]
    pub fn builtin() -> Self {
        Self::new(vec![
            Puzzle {
                fen: "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4"
                    .to_owned(),
                solution: Some(PuzzleMove {
                    from: BoardCoordinate::new_unchecked(3, 7),
                    to: BoardCoordinate::new_unchecked(1, 5),
                }),
                title: "Scholar's Mate".to_owned(),
                desc: Some("White to move and checkmate in 1!".to_owned()),
            },
            Puzzle {
                fen: "r2qkbnr/pp1npppp/8/2ppP3/6b1/5N2/PPPPQPPP/RNB1KB1R w KQkq - 0 1"
                    .to_owned(),
                solution: None,
                title: "Tactical Shot".to_owned(),
                desc: Some("Find the best move!".to_owned()),
            },
        ])
    }

    /// Reads a JSON array of puzzles. Positions are checked up front so a
    /// broken entry fails the load instead of the puzzle screen.
    ///
    /// # Errors
    ///
    /// `PuzzleLoadError::Json` for malformed text, `PuzzleLoadError::Position`
    /// naming the first puzzle whose FEN does not load.
    pub fn from_json(json: &str) -> Result<Self, PuzzleLoadError> {
        let puzzles: Vec<Puzzle> = serde_json::from_str(json).map_err(PuzzleLoadError::Json)?;
        for puzzle in &puzzles {
            puzzle.game().map_err(|e| PuzzleLoadError::Position {
                title: puzzle.title.clone(),
                source: e,
            })?;
        }
        Ok(Self::new(puzzles))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.puzzles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.puzzles.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Puzzle> {
        self.puzzles.get(index)
    }

    /// Random puzzle index, different from `current` whenever there is a choice.
    pub fn next<R: Rng + ?Sized>(&self, rng: &mut R, current: Option<usize>) -> Option<usize> {
        match self.puzzles.len() {
            0 => None,
            1 => Some(0),
            n => loop {
                let idx = rng.gen_range(0..n);
                if Some(idx) != current {
                    break Some(idx);
                }
            },
        }
    }
}

#[derive(Debug)]
pub enum PuzzleLoadError {
    Json(serde_json::Error),
    Position { title: String, source: MoveError },
}

impl std::fmt::Display for PuzzleLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(e) => write!(f, "puzzle file is not valid JSON: {e}"),
            Self::Position { title, source } => write!(f, "puzzle '{title}': {source}"),
        }
    }
}

impl std::error::Error for PuzzleLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(e) => Some(e),
            Self::Position { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::EngineConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn sq(s: &str) -> BoardCoordinate {
        s.parse().unwrap()
    }

    fn ai() -> ChessAi {
        ChessAi::new(Arc::new(EngineConfig::default()))
    }

    #[test]
    fn test_builtin_puzzles_load() {
        let set = PuzzleSet::builtin();
        assert_eq!(set.len(), 2);
        for i in 0..set.len() {
            assert!(set.get(i).unwrap().game().is_ok());
        }
    }

    #[test]
    fn test_scholars_mate_solution() {
        let set = PuzzleSet::builtin();
        let puzzle = set.get(0).unwrap();
        let game = puzzle.game().unwrap();
        let mut ai = ai();

        assert_eq!(
            puzzle.check(&game, sq("h5"), sq("f7"), &mut ai),
            PuzzleAttempt::Correct
        );
        assert_eq!(
            puzzle.check(&game, sq("c4"), sq("f7"), &mut ai),
            PuzzleAttempt::Incorrect
        );
    }

    #[test]
    fn test_unsolved_puzzle_graded_by_engine() {
        // Free queen on d4 for the e3 pawn.
        let puzzle = Puzzle {
            fen: "4k3/8/8/8/3q4/4P3/8/4K3 w - - 0 1".to_owned(),
            solution: None,
            title: "Free Queen".to_owned(),
            desc: None,
        };
        let game = puzzle.game().unwrap();
        let mut ai = ai();
        assert_eq!(puzzle.description(), "Find the best move!");
        assert_eq!(
            puzzle.check(&game, sq("e3"), sq("d4"), &mut ai),
            PuzzleAttempt::Correct
        );
        assert_eq!(
            puzzle.check(&game, sq("e1"), sq("f1"), &mut ai),
            PuzzleAttempt::Incorrect
        );
    }

    #[test]
    fn test_any_equally_good_move_is_accepted() {
        // Ra8# and Re8# both mate on the back rank.
        let puzzle = Puzzle {
            fen: "6k1/5ppp/8/8/8/8/8/R3R1K1 w - - 0 1".to_owned(),
            solution: None,
            title: "Two Rooks".to_owned(),
            desc: None,
        };
        let game = puzzle.game().unwrap();
        let mut ai = ai();
        assert_eq!(
            puzzle.check(&game, sq("a1"), sq("a8"), &mut ai),
            PuzzleAttempt::Correct
        );
        assert_eq!(
            puzzle.check(&game, sq("e1"), sq("e8"), &mut ai),
            PuzzleAttempt::Correct
        );
        assert_eq!(
            puzzle.check(&game, sq("e1"), sq("e7"), &mut ai),
            PuzzleAttempt::Incorrect
        );
        // Not a legal move at all.
        assert_eq!(
            puzzle.check(&game, sq("a1"), sq("b2"), &mut ai),
            PuzzleAttempt::Incorrect
        );
    }

    #[test]
    fn test_from_json_accepts_both_fen_keys() {
        let json = r#"[
            {
                "currentFen": "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4",
                "move": { "from": "h5", "to": "f7" },
                "title": "Scholar's Mate"
            },
            {
                "fen": "4k3/8/8/8/3q4/4P3/8/4K3 w - - 0 1",
                "title": "Free Queen",
                "desc": "Take it"
            }
        ]"#;
        let set = PuzzleSet::from_json(json).unwrap();
        assert_eq!(set.len(), 2);
        let first = set.get(0).unwrap();
        assert_eq!(
            first.solution,
            Some(PuzzleMove {
                from: sq("h5"),
                to: sq("f7")
            })
        );
        assert_eq!(set.get(1).unwrap().description(), "Take it");
    }

    #[test]
    fn test_from_json_rejects_bad_position() {
        let json = r#"[{ "fen": "8/8/8/8/8/8/8/8 w - - 0 1", "title": "Empty" }]"#;
        assert!(matches!(
            PuzzleSet::from_json(json),
            Err(PuzzleLoadError::Position { .. })
        ));
        assert!(matches!(
            PuzzleSet::from_json("{"),
            Err(PuzzleLoadError::Json(_))
        ));
    }

    #[test]
    fn test_next_avoids_current() {
        let set = PuzzleSet::builtin();
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..20 {
            assert_eq!(set.next(&mut rng, Some(0)), Some(1));
            assert_eq!(set.next(&mut rng, Some(1)), Some(0));
        }

        let single = PuzzleSet::new(set.get(0).cloned().into_iter().collect());
        assert_eq!(single.next(&mut rng, Some(0)), Some(0));
        assert_eq!(PuzzleSet::new(Vec::new()).next(&mut rng, None), None);
    }
}
