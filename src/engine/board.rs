//! Mailbox board: a `rows × cols` grid of optional piece ids plus the arena
//! that owns every piece ever placed.
//!
//! Pieces are never destroyed. Removing a piece from the grid leaves it in the
//! arena with no position, which is how captured pieces are represented. The
//! board knows nothing about legality; it is pure storage.

use crate::engine::types::{ChessError, Color, Coordinate, PieceKind};

// ---------------------------------------------------------------------------
// Piece
// ---------------------------------------------------------------------------

/// Stable handle of a piece inside a [`Board`]'s arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(pub usize);

/// A chess piece and its mutable bookkeeping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    /// Current square; `None` while the piece is off the board (captured or
    /// not yet placed).
    pub position: Option<Coordinate>,
    /// Number of moves this piece has made (decremented again on undo).
    pub move_count: u32,
}

impl Piece {
    pub fn new(kind: PieceKind, color: Color) -> Self {
        Piece {
            kind,
            color,
            position: None,
            move_count: 0,
        }
    }

    #[inline]
    pub fn is_on_board(&self) -> bool {
        self.position.is_some()
    }

    /// Letter used by text renderers.
    #[inline]
    pub fn symbol(&self) -> char {
        self.kind.to_char(self.color)
    }
}

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    rows: i8,
    cols: i8,
    /// Row-major grid of occupant ids.
    grid: Vec<Option<PieceId>>,
    /// Every piece ever registered, indexed by `PieceId`.
    pieces: Vec<Piece>,
}

impl Board {
    /// Standard chess dimensions.
    pub const SIZE: i8 = 8;

    /// Create an empty board. Both dimensions must lie in `1..=8`.
    pub fn new(rows: i8, cols: i8) -> Result<Self, ChessError> {
        if !(1..=Self::SIZE).contains(&rows) || !(1..=Self::SIZE).contains(&cols) {
            return Err(ChessError::InvalidDimensions { rows, cols });
        }
        Ok(Board {
            rows,
            cols,
            grid: vec![None; rows as usize * cols as usize],
            pieces: Vec::with_capacity(32),
        })
    }

    /// An empty 8×8 board.
    pub fn standard() -> Self {
        Board {
            rows: Self::SIZE,
            cols: Self::SIZE,
            grid: vec![None; 64],
            pieces: Vec::with_capacity(32),
        }
    }

    #[inline]
    pub fn rows(&self) -> i8 {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> i8 {
        self.cols
    }

    /// Bounds check against the grid dimensions.
    #[inline]
    pub fn is_valid(&self, at: Coordinate) -> bool {
        (0..self.rows).contains(&at.row) && (0..self.cols).contains(&at.col)
    }

    #[inline]
    fn index(&self, at: Coordinate) -> usize {
        at.row as usize * self.cols as usize + at.col as usize
    }

    // -----------------------------------------------------------------------
    // Arena
    // -----------------------------------------------------------------------

    /// Register a new piece. It starts off the board.
    pub fn add_piece(&mut self, kind: PieceKind, color: Color) -> PieceId {
        self.pieces.push(Piece::new(kind, color));
        PieceId(self.pieces.len() - 1)
    }

    /// Look up a piece by id.
    ///
    /// Ids are only handed out by [`Board::add_piece`], so an unknown id is a
    /// caller bug and panics.
    #[inline]
    pub fn get(&self, id: PieceId) -> &Piece {
        &self.pieces[id.0]
    }

    /// All registered pieces, on or off the board.
    pub fn pieces(&self) -> impl Iterator<Item = (PieceId, &Piece)> {
        self.pieces.iter().enumerate().map(|(i, p)| (PieceId(i), p))
    }

    /// Ids of the pieces of `color` currently on the board, in registration order.
    pub fn pieces_on_board(&self, color: Color) -> Vec<PieceId> {
        self.pieces()
            .filter(|(_, p)| p.color == color && p.is_on_board())
            .map(|(id, _)| id)
            .collect()
    }

    #[inline]
    pub fn increment_move_count(&mut self, id: PieceId) {
        self.pieces[id.0].move_count += 1;
    }

    #[inline]
    pub fn decrement_move_count(&mut self, id: PieceId) {
        let piece = &mut self.pieces[id.0];
        piece.move_count = piece.move_count.saturating_sub(1);
    }

    // -----------------------------------------------------------------------
    // Grid
    // -----------------------------------------------------------------------

    /// Occupant id at `at`, if any. Invalid coordinates are empty.
    #[inline]
    pub fn piece_id(&self, at: Coordinate) -> Option<PieceId> {
        if !self.is_valid(at) {
            return None;
        }
        self.grid[self.index(at)]
    }

    /// Occupant at `at`, if any. Invalid coordinates are empty.
    #[inline]
    pub fn piece(&self, at: Coordinate) -> Option<&Piece> {
        self.piece_id(at).map(|id| self.get(id))
    }

    /// Whether `at` is on the board and unoccupied.
    #[inline]
    pub fn is_empty_square(&self, at: Coordinate) -> bool {
        self.is_valid(at) && self.grid[self.index(at)].is_none()
    }

    /// Put `id` on `at` and record the coordinate on the piece.
    ///
    /// Occupies the slot unconditionally; callers clear the slot first. `at`
    /// must be valid.
    pub fn place(&mut self, id: PieceId, at: Coordinate) {
        debug_assert!(self.is_valid(at), "place on invalid square {at}");
        let idx = self.index(at);
        self.grid[idx] = Some(id);
        self.pieces[id.0].position = Some(at);
    }

    /// Clear `at` and return its previous occupant, which is now off the board.
    pub fn remove(&mut self, at: Coordinate) -> Option<PieceId> {
        if !self.is_valid(at) {
            return None;
        }
        let idx = self.index(at);
        let id = self.grid[idx].take()?;
        self.pieces[id.0].position = None;
        Some(id)
    }

    // -----------------------------------------------------------------------
    // Sanity check
    // -----------------------------------------------------------------------

    /// Verify that every grid slot and every piece position agree.
    #[cfg(any(debug_assertions, test))]
    pub fn assert_consistent(&self) {
        for (id, piece) in self.pieces() {
            if let Some(at) = piece.position {
                assert_eq!(
                    self.piece_id(at),
                    Some(id),
                    "{} {} records {at} but the slot disagrees",
                    piece.color,
                    piece.kind,
                );
            }
        }
        for row in 0..self.rows {
            for col in 0..self.cols {
                let at = Coordinate::new(row, col);
                if let Some(id) = self.piece_id(at) {
                    assert_eq!(self.get(id).position, Some(at), "slot {at} is stale");
                }
            }
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
