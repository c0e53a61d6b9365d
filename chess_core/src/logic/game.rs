use crate::logic::board::{BoardCoordinate, BoardSnapshot, Color, PieceType};
use serde::{Deserialize, Serialize};
use shakmaty::fen::Fen;
use shakmaty::san::{San, SanPlus};
use shakmaty::uci::Uci;
use shakmaty::{CastlingMode, Chess, EnPassantMode, Move, Position, Role, Square};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    GameOver,
    NotYourTurn,
    IllegalMove {
        from: BoardCoordinate,
        to: BoardCoordinate,
    },
    InvalidNotation(String),
    InvalidFen(String),
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GameOver => write!(f, "the game is already over"),
            Self::NotYourTurn => write!(f, "it is not your turn"),
            Self::IllegalMove { from, to } => write!(f, "illegal move {from}{to}"),
            Self::InvalidNotation(s) => write!(f, "cannot read move '{s}'"),
            Self::InvalidFen(s) => write!(f, "invalid FEN: {s}"),
        }
    }
}

impl std::error::Error for MoveError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawReason {
    Stalemate,
    ThreefoldRepetition,
    InsufficientMaterial,
    FiftyMoveRule,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Playing,
    Check,
    Checkmate { winner: Color },
    Draw(DrawReason),
}

impl GameStatus {
    #[must_use]
    pub const fn is_over(self) -> bool {
        matches!(self, Self::Checkmate { .. } | Self::Draw(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub from: BoardCoordinate,
    pub to: BoardCoordinate,
    pub san: String,
    pub uci: String,
    pub piece: PieceType,
    pub captured: Option<PieceType>,
    pub promotion: Option<PieceType>,
    pub color: Color,
    pub fen_after: String,
}

impl MoveRecord {
    #[must_use]
    pub const fn is_capture(&self) -> bool {
        self.captured.is_some()
    }
}

/// Destination marker for a selected piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveHint {
    pub to: BoardCoordinate,
    pub capture: bool,
}

/// Pieces taken so far, strongest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedSummary {
    pub by_white: Vec<PieceType>,
    pub by_black: Vec<PieceType>,
}

impl CapturedSummary {
    #[must_use]
    pub fn white_material(&self) -> i32 {
        self.by_white.iter().map(|p| p.capture_weight()).sum()
    }

    #[must_use]
    pub fn black_material(&self) -> i32 {
        self.by_black.iter().map(|p| p.capture_weight()).sum()
    }

    /// Positive when White has taken more material.
    #[must_use]
    pub fn material_diff(&self) -> i32 {
        self.white_material() - self.black_material()
    }
}

/// Origin and destination of a move in standard notation. Castling reports
/// the king's destination (e1g1), not the rook square.
#[must_use]
pub fn standard_squares(mv: &Move) -> Option<(Square, Square)> {
    match Uci::from_standard(mv) {
        Uci::Normal { from, to, .. } => Some((from, to)),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct GameState {
    position: Chess,
    undo_stack: Vec<Chess>,
    history: Vec<MoveRecord>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            position: Chess::default(),
            undo_stack: Vec::new(),
            history: Vec::new(),
        }
    }

    /// # Errors
    ///
    /// `MoveError::InvalidFen` when the text is not a legal chess position.
    pub fn from_fen(fen: &str) -> Result<Self, MoveError> {
        let mut game = Self::new();
        game.load_fen(fen)?;
        Ok(game)
    }

    /// Replaces the position and clears history. On error the game is untouched.
    ///
    /// # Errors
    ///
    /// `MoveError::InvalidFen` when the text is not a legal chess position.
    pub fn load_fen(&mut self, fen: &str) -> Result<(), MoveError> {
        let parsed: Fen = fen
            .trim()
            .parse()
            .map_err(|e| MoveError::InvalidFen(format!("{e}")))?;
        let position: Chess = parsed
            .into_position(CastlingMode::Standard)
            .map_err(|e| MoveError::InvalidFen(format!("{e}")))?;
        self.position = position;
        self.undo_stack.clear();
        self.history.clear();
        Ok(())
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    #[must_use]
    pub fn fen(&self) -> String {
        Fen::from_position(self.position.clone(), EnPassantMode::Legal).to_string()
    }

    #[must_use]
    pub const fn position(&self) -> &Chess {
        &self.position
    }

    #[must_use]
    pub fn turn(&self) -> Color {
        self.position.turn().into()
    }

    #[must_use]
    pub fn board(&self) -> BoardSnapshot {
        BoardSnapshot::from_position(&self.position)
    }

    #[must_use]
    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    #[must_use]
    pub fn last_move(&self) -> Option<&MoveRecord> {
        self.history.last()
    }

    #[must_use]
    pub fn legal_moves(&self) -> Vec<Move> {
        self.position.legal_moves().into_iter().collect()
    }

    #[must_use]
    pub fn legal_moves_from(&self, from: BoardCoordinate) -> Vec<Move> {
        let from = from.to_square();
        self.position
            .legal_moves()
            .into_iter()
            .filter(|mv| standard_squares(mv).is_some_and(|(f, _)| f == from))
            .collect()
    }

    /// Where the piece on `from` may go. Promotions collapse into one hint.
    #[must_use]
    pub fn move_hints(&self, from: BoardCoordinate) -> Vec<MoveHint> {
        let mut hints: Vec<MoveHint> = Vec::new();
        for mv in self.legal_moves_from(from) {
            if let Some((_, to)) = standard_squares(&mv) {
                let to = BoardCoordinate::from_square(to);
                if !hints.iter().any(|h| h.to == to) {
                    hints.push(MoveHint {
                        to,
                        capture: mv.is_capture(),
                    });
                }
            }
        }
        hints
    }

    #[must_use]
    pub fn in_check(&self) -> bool {
        self.position.is_check()
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        let pos = &self.position;
        if pos.is_checkmate() {
            return GameStatus::Checkmate {
                winner: self.turn().opposite(),
            };
        }
        if pos.is_stalemate() {
            return GameStatus::Draw(DrawReason::Stalemate);
        }
        if pos.is_insufficient_material() {
            return GameStatus::Draw(DrawReason::InsufficientMaterial);
        }
        if pos.halfmoves() >= 100 {
            return GameStatus::Draw(DrawReason::FiftyMoveRule);
        }
        if self.is_threefold_repetition() {
            return GameStatus::Draw(DrawReason::ThreefoldRepetition);
        }
        if pos.is_check() {
            GameStatus::Check
        } else {
            GameStatus::Playing
        }
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.status().is_over()
    }

    fn is_threefold_repetition(&self) -> bool {
        let current = position_key(&self.position);
        let seen = self
            .undo_stack
            .iter()
            .filter(|p| position_key(p) == current)
            .count();
        seen >= 2
    }

    /// Moves a piece by squares. A promotion without an explicit piece
    /// becomes a queen.
    ///
    /// # Errors
    ///
    /// `MoveError::GameOver` once the game has ended, `MoveError::IllegalMove`
    /// when no legal move joins the two squares.
    pub fn make_move(
        &mut self,
        from: BoardCoordinate,
        to: BoardCoordinate,
        promotion: Option<PieceType>,
    ) -> Result<MoveRecord, MoveError> {
        if self.is_game_over() {
            return Err(MoveError::GameOver);
        }

        let wanted = Role::from(promotion.unwrap_or(PieceType::Queen));
        let (f, t) = (from.to_square(), to.to_square());
        let mv = self
            .position
            .legal_moves()
            .into_iter()
            .find(|mv| {
                standard_squares(mv) == Some((f, t))
                    && mv.promotion().map_or(true, |p| p == wanted)
            })
            .ok_or(MoveError::IllegalMove { from, to })?;

        Ok(self.play(&mv))
    }

    /// # Errors
    ///
    /// `MoveError::GameOver` once the game has ended, `MoveError::InvalidNotation`
    /// when the text is not a legal move here.
    pub fn play_san(&mut self, san: &str) -> Result<MoveRecord, MoveError> {
        if self.is_game_over() {
            return Err(MoveError::GameOver);
        }
        let parsed: SanPlus = san
            .trim()
            .parse()
            .map_err(|_| MoveError::InvalidNotation(san.to_owned()))?;
        let mv = parsed
            .san
            .to_move(&self.position)
            .map_err(|_| MoveError::InvalidNotation(san.to_owned()))?;
        Ok(self.play(&mv))
    }

    /// # Errors
    ///
    /// Same as [`GameState::play_san`].
    pub fn play_uci(&mut self, uci: &str) -> Result<MoveRecord, MoveError> {
        if self.is_game_over() {
            return Err(MoveError::GameOver);
        }
        let parsed: Uci = uci
            .trim()
            .parse()
            .map_err(|_| MoveError::InvalidNotation(uci.to_owned()))?;
        let mv = parsed
            .to_move(&self.position)
            .map_err(|_| MoveError::InvalidNotation(uci.to_owned()))?;
        Ok(self.play(&mv))
    }

    /// Applies a move taken from this position's legal move list.
    pub fn play(&mut self, mv: &Move) -> MoveRecord {
        let color = self.turn();
        let (from, to) = standard_squares(mv).unwrap_or((mv.to(), mv.to()));
        let uci = Uci::from_standard(mv).to_string();

        let previous = self.position.clone();
        let san = SanPlus::from_move_and_play_unchecked(&mut self.position, mv);
        self.undo_stack.push(previous);

        let record = MoveRecord {
            from: BoardCoordinate::from_square(from),
            to: BoardCoordinate::from_square(to),
            san: san.to_string(),
            uci,
            piece: mv.role().into(),
            captured: mv.capture().map(PieceType::from),
            promotion: mv.promotion().map(PieceType::from),
            color,
            fen_after: self.fen(),
        };
        self.history.push(record.clone());
        record
    }

    pub fn undo_move(&mut self) -> Option<MoveRecord> {
        let previous = self.undo_stack.pop()?;
        self.position = previous;
        self.history.pop()
    }

    #[must_use]
    pub fn captured_pieces(&self) -> CapturedSummary {
        let mut summary = CapturedSummary::default();
        for record in &self.history {
            if let Some(captured) = record.captured {
                match record.color {
                    Color::White => summary.by_white.push(captured),
                    Color::Black => summary.by_black.push(captured),
                }
            }
        }
        let strongest_first =
            |a: &PieceType, b: &PieceType| b.capture_weight().cmp(&a.capture_weight());
        summary.by_white.sort_by(strongest_first);
        summary.by_black.sort_by(strongest_first);
        summary
    }

    /// SAN of a legal move in the current position, without check suffix.
    #[must_use]
    pub fn san_of(&self, mv: &Move) -> String {
        San::from_move(&self.position, mv).to_string()
    }
}

/// Placement, side to move, castling rights and en passant square: the
/// part of a FEN that decides whether two positions repeat.
fn position_key(pos: &Chess) -> String {
    let fen = Fen::from_position(pos.clone(), EnPassantMode::Legal).to_string();
    fen.split_whitespace().take(4).collect::<Vec<_>>().join(" ")
}
