use crate::logic::board::Color;
use crate::logic::game::{DrawReason, GameState, GameStatus};
use serde::{Deserialize, Serialize};

/// What the game-over dialog shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOverSummary {
    pub title: String,
    pub reason: String,
    pub winner: Option<Color>,
    pub white_score: String,
    pub black_score: String,
}

impl GameOverSummary {
    /// `None` while the game is still running.
    #[must_use]
    pub fn from_status(status: GameStatus) -> Option<Self> {
        match status {
            GameStatus::Playing | GameStatus::Check => None,
            GameStatus::Checkmate { winner } => {
                let (white_score, black_score) = match winner {
                    Color::White => ("1", "0"),
                    Color::Black => ("0", "1"),
                };
                Some(Self {
                    title: format!("{} Won!", winner.name()),
                    reason: "by checkmate".to_owned(),
                    winner: Some(winner),
                    white_score: white_score.to_owned(),
                    black_score: black_score.to_owned(),
                })
            }
            GameStatus::Draw(reason) => Some(Self {
                title: "Draw".to_owned(),
                reason: draw_reason_text(reason).to_owned(),
                winner: None,
                white_score: "½".to_owned(),
                black_score: "½".to_owned(),
            }),
        }
    }
}

#[must_use]
pub const fn draw_reason_text(reason: DrawReason) -> &'static str {
    match reason {
        DrawReason::Stalemate => "by stalemate",
        DrawReason::ThreefoldRepetition => "by repetition",
        DrawReason::InsufficientMaterial => "by insufficient material",
        DrawReason::FiftyMoveRule => "by fifty-move rule",
    }
}

/// One-line status for the side panel.
#[must_use]
pub fn status_line(game: &GameState) -> String {
    let status = game.status();
    if let Some(summary) = GameOverSummary::from_status(status) {
        return format!("{} {}", summary.title, summary.reason);
    }
    let side = game.turn().name();
    match status {
        GameStatus::Check => format!("{side} is in Check!"),
        _ => format!("{side} to move"),
    }
}
