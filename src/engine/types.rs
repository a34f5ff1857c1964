use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// The two sides in a chess match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// Index for array lookups: White=0, Black=1.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Row delta of a forward pawn step.
    #[inline]
    pub const fn forward(self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }
}

impl std::ops::Not for Color {
    type Output = Self;
    fn not(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

// ---------------------------------------------------------------------------
// PieceKind
// ---------------------------------------------------------------------------

/// The six piece kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}

impl PieceKind {
    /// Back-rank order from the a-file to the h-file.
    pub const BACK_RANK: [PieceKind; 8] = [
        PieceKind::Rook,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Queen,
        PieceKind::King,
        PieceKind::Bishop,
        PieceKind::Knight,
        PieceKind::Rook,
    ];

    /// Single uppercase letter for white, lowercase for black.
    pub fn to_char(self, color: Color) -> char {
        let c = match self {
            PieceKind::Pawn => 'p',
            PieceKind::Rook => 'r',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };
        match color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PieceKind::Pawn => write!(f, "pawn"),
            PieceKind::Rook => write!(f, "rook"),
            PieceKind::Knight => write!(f, "knight"),
            PieceKind::Bishop => write!(f, "bishop"),
            PieceKind::Queen => write!(f, "queen"),
            PieceKind::King => write!(f, "king"),
        }
    }
}

// ---------------------------------------------------------------------------
// Coordinate
// ---------------------------------------------------------------------------

/// A (row, column) pair. Row 0 is rank 8, column 0 is the a-file.
///
/// Components are signed so that ray casting can step off the board; use
/// [`crate::engine::Board::is_valid`] before indexing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Coordinate {
    pub row: i8,
    pub col: i8,
}

impl Coordinate {
    #[inline]
    pub const fn new(row: i8, col: i8) -> Self {
        Coordinate { row, col }
    }

    /// Convert board notation (file `'a'..='h'`, rank `1..=8`) to a coordinate.
    pub fn from_file_rank(file: char, rank: u8) -> Result<Self, ChessError> {
        let file = file.to_ascii_lowercase();
        if !('a'..='h').contains(&file) || !(1..=8).contains(&rank) {
            return Err(ChessError::InvalidSquare(format!("{file}{rank}")));
        }
        Ok(Coordinate::new(8 - rank as i8, (file as u8 - b'a') as i8))
    }

    /// Inverse of [`Coordinate::from_file_rank`]. `None` when off the 8×8 board.
    pub fn to_file_rank(self) -> Option<(char, u8)> {
        if !(0..8).contains(&self.row) || !(0..8).contains(&self.col) {
            return None;
        }
        Some(((b'a' + self.col as u8) as char, (8 - self.row) as u8))
    }

    /// The coordinate shifted by `(d_row, d_col)`.
    #[inline]
    pub const fn offset(self, d_row: i8, d_col: i8) -> Self {
        Coordinate::new(self.row + d_row, self.col + d_col)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_file_rank() {
            Some((file, rank)) => write!(f, "{file}{rank}"),
            None => write!(f, "({}, {})", self.row, self.col),
        }
    }
}

// ---------------------------------------------------------------------------
// MoveMap
// ---------------------------------------------------------------------------

/// Boolean destination matrix of an 8×8 board, one bit per square
/// (bit index = `row * 8 + col`).
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveMap(pub u64);

impl MoveMap {
    pub const EMPTY: MoveMap = MoveMap(0);

    #[inline]
    fn bit(at: Coordinate) -> Option<u64> {
        if (0..8).contains(&at.row) && (0..8).contains(&at.col) {
            Some(1u64 << (at.row as u32 * 8 + at.col as u32))
        } else {
            None
        }
    }

    /// Whether `at` is marked. Off-board coordinates are never marked.
    #[inline]
    pub fn is_set(self, at: Coordinate) -> bool {
        Self::bit(at).is_some_and(|b| self.0 & b != 0)
    }

    #[inline]
    pub fn set(&mut self, at: Coordinate) {
        if let Some(b) = Self::bit(at) {
            self.0 |= b;
        }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Iterate over all marked coordinates, row-major from a8.
    pub fn iter(self) -> MoveMapIter {
        MoveMapIter(self.0)
    }
}

/// Iterator over marked squares in a `MoveMap`.
pub struct MoveMapIter(u64);

impl Iterator for MoveMapIter {
    type Item = Coordinate;

    #[inline]
    fn next(&mut self) -> Option<Coordinate> {
        if self.0 == 0 {
            return None;
        }
        let idx = self.0.trailing_zeros() as i8;
        self.0 &= self.0 - 1;
        Some(Coordinate::new(idx / 8, idx % 8))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let count = self.0.count_ones() as usize;
        (count, Some(count))
    }
}

impl ExactSizeIterator for MoveMapIter {}

impl std::ops::BitOr for MoveMap {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        MoveMap(self.0 | rhs.0)
    }
}

impl fmt::Debug for MoveMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "MoveMap(0x{:016x})", self.0)?;
        for row in 0..8 {
            write!(f, "  {} ", 8 - row)?;
            for col in 0..8 {
                let set = self.is_set(Coordinate::new(row, col));
                write!(f, "{}", if set { '1' } else { '.' })?;
                if col < 7 {
                    write!(f, " ")?;
                }
            }
            writeln!(f)?;
        }
        writeln!(f, "    a b c d e f g h")
    }
}

// ---------------------------------------------------------------------------
// MatchStatus
// ---------------------------------------------------------------------------

/// Lifecycle of a match. `Terminated` is reached only by checkmate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    InProgress,
    Terminated,
}

impl MatchStatus {
    pub fn as_str(&self) -> &str {
        match self {
            MatchStatus::InProgress => "in_progress",
            MatchStatus::Terminated => "terminated",
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ChessError
// ---------------------------------------------------------------------------

/// Domain errors for the rules engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChessError {
    #[error("there is no piece on {0}")]
    EmptySquare(Coordinate),

    #[error("the piece on {at} belongs to {owner}, but it is {to_move}'s turn")]
    WrongOwner {
        at: Coordinate,
        owner: Color,
        to_move: Color,
    },

    #[error("the piece on {0} has no possible moves")]
    NoLegalMoves(Coordinate),

    #[error("the piece on {from} cannot move to {to}")]
    IllegalDestination { from: Coordinate, to: Coordinate },

    #[error("moving {from} -> {to} would leave your own king in check")]
    SelfCheck { from: Coordinate, to: Coordinate },

    #[error("there is no {0} king on the board")]
    NoKing(Color),

    #[error("the match is over: {0} was checkmated")]
    GameOver(Color),

    #[error("invalid square: {0}")]
    InvalidSquare(String),

    #[error("square {0} is already occupied")]
    SquareOccupied(Coordinate),

    #[error("invalid board dimensions: {rows}x{cols}")]
    InvalidDimensions { rows: i8, cols: i8 },
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
