use serde::{Deserialize, Serialize};
use shakmaty::{File, Position, Rank, Role, Square};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
}

impl Color {
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::White => "White",
            Self::Black => "Black",
        }
    }
}

impl From<shakmaty::Color> for Color {
    fn from(color: shakmaty::Color) -> Self {
        match color {
            shakmaty::Color::White => Self::White,
            shakmaty::Color::Black => Self::Black,
        }
    }
}

impl From<Color> for shakmaty::Color {
    fn from(color: Color) -> Self {
        match color {
            Color::White => Self::White,
            Color::Black => Self::Black,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceType {
    /// Material weight used for the captured-pieces tally (queen 9 .. pawn 1).
    #[must_use]
    pub const fn capture_weight(self) -> i32 {
        match self {
            Self::Pawn => 1,
            Self::Knight | Self::Bishop => 3,
            Self::Rook => 5,
            Self::Queen => 9,
            Self::King => 0,
        }
    }
}

impl From<Role> for PieceType {
    fn from(role: Role) -> Self {
        match role {
            Role::Pawn => Self::Pawn,
            Role::Knight => Self::Knight,
            Role::Bishop => Self::Bishop,
            Role::Rook => Self::Rook,
            Role::Queen => Self::Queen,
            Role::King => Self::King,
        }
    }
}

impl From<PieceType> for Role {
    fn from(piece_type: PieceType) -> Self {
        match piece_type {
            PieceType::Pawn => Self::Pawn,
            PieceType::Knight => Self::Knight,
            PieceType::Bishop => Self::Bishop,
            PieceType::Rook => Self::Rook,
            PieceType::Queen => Self::Queen,
            PieceType::King => Self::King,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub piece_type: PieceType,
    pub color: Color,
}

impl Piece {
    /// FEN letter: uppercase for White, lowercase for Black.
    #[must_use]
    pub fn fen_char(self) -> char {
        let c = Role::from(self.piece_type).char();
        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }
}

impl From<shakmaty::Piece> for Piece {
    fn from(piece: shakmaty::Piece) -> Self {
        Self {
            piece_type: piece.role.into(),
            color: piece.color.into(),
        }
    }
}

/// Square addressed the way a board snapshot is laid out: row 0 is rank 8,
/// col 0 is the a-file. Serialized as algebraic text ("e4").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BoardCoordinate {
    row: usize,
    col: usize,
}

impl BoardCoordinate {
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Option<Self> {
        if row < 8 && col < 8 {
            Some(Self { row, col })
        } else {
            None
        }
    }

    /// Caller guarantees `row < 8 && col < 8`.
    pub(crate) const fn new_unchecked(row: usize, col: usize) -> Self {
        debug_assert!(row < 8 && col < 8);
        Self { row, col }
    }

    #[must_use]
    pub const fn row(self) -> usize {
        self.row
    }

    #[must_use]
    pub const fn col(self) -> usize {
        self.col
    }

    #[must_use]
    pub fn from_square(sq: Square) -> Self {
        let idx = usize::from(sq);
        Self {
            row: 7 - idx / 8,
            col: idx % 8,
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn to_square(self) -> Square {
        Square::from_coords(File::new(self.col as u32), Rank::new((7 - self.row) as u32))
    }

    /// Same square seen from the other side of the board.
    #[must_use]
    pub const fn flipped(self) -> Self {
        Self {
            row: 7 - self.row,
            col: 7 - self.col,
        }
    }

    #[must_use]
    pub const fn is_light(self) -> bool {
        (self.row + self.col) % 2 == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCoordinateError(pub String);

impl fmt::Display for ParseCoordinateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid square '{}'", self.0)
    }
}

impl std::error::Error for ParseCoordinateError {}

impl FromStr for BoardCoordinate {
    type Err = ParseCoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        match bytes {
            [file @ b'a'..=b'h', rank @ b'1'..=b'8'] => Ok(Self {
                row: usize::from(b'8' - rank),
                col: usize::from(file - b'a'),
            }),
            _ => Err(ParseCoordinateError(s.to_owned())),
        }
    }
}

impl TryFrom<String> for BoardCoordinate {
    type Error = ParseCoordinateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BoardCoordinate> for String {
    fn from(coord: BoardCoordinate) -> Self {
        coord.to_string()
    }
}

impl fmt::Display for BoardCoordinate {
    #[allow(clippy::cast_possible_truncation)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = char::from(b'a' + self.col as u8);
        let rank = 8 - self.row;
        write!(f, "{file}{rank}")
    }
}

/// One square as a renderer would draw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquareView {
    pub coord: BoardCoordinate,
    pub piece: Option<Piece>,
    pub light: bool,
}

/// 8x8 copy of the rules engine board, rank 8 first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    grid: [[Option<Piece>; 8]; 8],
}

impl BoardSnapshot {
    #[must_use]
    pub fn from_position(pos: &impl Position) -> Self {
        let mut grid = [[None; 8]; 8];
        let board = pos.board();
        for sq in Square::ALL {
            if let Some(piece) = board.piece_at(sq) {
                let coord = BoardCoordinate::from_square(sq);
                if let Some(cell) = grid.get_mut(coord.row).and_then(|r| r.get_mut(coord.col)) {
                    *cell = Some(piece.into());
                }
            }
        }
        Self { grid }
    }

    #[must_use]
    pub fn get(&self, coord: BoardCoordinate) -> Option<Piece> {
        self.grid
            .get(coord.row)
            .and_then(|r| r.get(coord.col))
            .copied()
            .flatten()
    }

    #[must_use]
    pub const fn rows(&self) -> &[[Option<Piece>; 8]; 8] {
        &self.grid
    }

    pub fn iter(&self) -> impl Iterator<Item = (BoardCoordinate, Piece)> + '_ {
        self.grid.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .filter_map(move |(col, cell)| cell.map(|p| (BoardCoordinate { row, col }, p)))
        })
    }

    /// All 64 squares in drawing order. Unflipped puts rank 8 at the top
    /// with White at the bottom; flipped reverses both axes.
    #[must_use]
    pub fn squares(&self, flipped: bool) -> Vec<SquareView> {
        let mut out = Vec::with_capacity(64);
        for row in 0..8 {
            for col in 0..8 {
                let coord = BoardCoordinate { row, col };
                let coord = if flipped { coord.flipped() } else { coord };
                out.push(SquareView {
                    coord,
                    piece: self.get(coord),
                    light: coord.is_light(),
                });
            }
        }
        out
    }

    /// Piece placement field of a FEN string.
    #[must_use]
    pub fn placement(&self) -> String {
        let mut fen = String::new();
        for (row, cells) in self.grid.iter().enumerate() {
            let mut empty = 0;
            for cell in cells {
                match cell {
                    Some(p) => {
                        if empty > 0 {
                            fen.push_str(&empty.to_string());
                            empty = 0;
                        }
                        fen.push(p.fen_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                fen.push_str(&empty.to_string());
            }
            if row < 7 {
                fen.push('/');
            }
        }
        fen
    }
}
