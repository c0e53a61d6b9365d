use crate::engine::config::EngineConfig;
use crate::engine::eval_constants::{
    PST_BISHOP, PST_KING, PST_KNIGHT, PST_PAWN, PST_QUEEN, PST_ROOK,
};
use crate::engine::Evaluator;
use crate::logic::board::{BoardCoordinate, Color, Piece, PieceType};
use shakmaty::{Chess, Position, Square};
use std::sync::Arc;

/// Material plus piece-square bonus, summed over the whole board on every call.
pub struct PstEvaluator {
    config: Arc<EngineConfig>,
}

impl PstEvaluator {
    #[must_use]
    pub const fn new(config: Arc<EngineConfig>) -> Self {
        Self { config }
    }

    /// Signed worth of one piece standing on `coord`: positive for White.
    #[must_use]
    pub fn piece_value(&self, piece: Piece, coord: BoardCoordinate) -> i32 {
        let value = self.config.piece_value(piece.piece_type) + pst_bonus(piece, coord);
        match piece.color {
            Color::White => value,
            Color::Black => -value,
        }
    }
}

#[must_use]
pub fn pst_bonus(piece: Piece, coord: BoardCoordinate) -> i32 {
    let table = match piece.piece_type {
        PieceType::Pawn => &PST_PAWN,
        PieceType::Knight => &PST_KNIGHT,
        PieceType::Bishop => &PST_BISHOP,
        PieceType::Rook => &PST_ROOK,
        PieceType::Queen => &PST_QUEEN,
        PieceType::King => &PST_KING,
    };
    let row = match piece.color {
        Color::White => coord.row(),
        Color::Black => 7 - coord.row(),
    };
    table
        .get(row)
        .and_then(|r| r.get(coord.col()))
        .copied()
        .unwrap_or(0)
}

impl Evaluator for PstEvaluator {
    fn evaluate(&self, pos: &Chess) -> i32 {
        let board = pos.board();
        let mut score = 0;
        for sq in Square::ALL {
            if let Some(piece) = board.piece_at(sq) {
                score += self.piece_value(piece.into(), BoardCoordinate::from_square(sq));
            }
        }
        score
    }
}
