//! Per-piece destination generation.
//!
//! Each variant marks every square it could move to on the current board,
//! *ignoring* whether the move would leave its own king in check. Filtering
//! self-check is the match's job (make the move, test, undo).

use crate::engine::board::{Board, Piece, PieceId};
use crate::engine::types::{Color, Coordinate, MoveMap, PieceKind};

/// Match state a piece needs to see while generating moves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MoveContext {
    /// The pawn that just advanced two squares, capturable en passant.
    pub en_passant_vulnerable: Option<PieceId>,
}

pub const ROOK_DIRS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

pub const BISHOP_DIRS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

pub const KING_STEPS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

pub const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

impl Piece {
    /// Squares this piece could move to, ignoring self-check.
    ///
    /// A piece that is off the board has no destinations.
    pub fn legal_destinations(&self, board: &Board, ctx: &MoveContext) -> MoveMap {
        let Some(from) = self.position else {
            return MoveMap::EMPTY;
        };
        match self.kind {
            PieceKind::Rook => slide(board, from, self.color, &ROOK_DIRS),
            PieceKind::Bishop => slide(board, from, self.color, &BISHOP_DIRS),
            PieceKind::Queen => {
                slide(board, from, self.color, &ROOK_DIRS)
                    | slide(board, from, self.color, &BISHOP_DIRS)
            }
            PieceKind::Knight => step(board, from, self.color, &KNIGHT_JUMPS),
            PieceKind::King => king_moves(board, self, from),
            PieceKind::Pawn => pawn_moves(board, self, from, ctx),
        }
    }

    /// Whether the destination matrix has at least one square.
    pub fn has_any_legal_move(&self, board: &Board, ctx: &MoveContext) -> bool {
        !self.legal_destinations(board, ctx).is_empty()
    }
}

// =========================================================================
// Shared helpers
// =========================================================================

/// On the board and not held by a piece of `color`.
#[inline]
fn can_land(board: &Board, at: Coordinate, color: Color) -> bool {
    board.is_valid(at) && board.piece(at).is_none_or(|p| p.color != color)
}

#[inline]
fn has_enemy(board: &Board, at: Coordinate, color: Color) -> bool {
    board.piece(at).is_some_and(|p| p.color != color)
}

// =========================================================================
// Sliders (rook, bishop, queen)
// =========================================================================

fn slide(board: &Board, from: Coordinate, color: Color, dirs: &[(i8, i8)]) -> MoveMap {
    let mut map = MoveMap::EMPTY;
    for &(dr, dc) in dirs {
        let mut at = from.offset(dr, dc);
        while board.is_valid(at) {
            match board.piece(at) {
                None => map.set(at),
                Some(p) => {
                    if p.color != color {
                        map.set(at);
                    }
                    break;
                }
            }
            at = at.offset(dr, dc);
        }
    }
    map
}

// =========================================================================
// Steppers (knight, king)
// =========================================================================

fn step(board: &Board, from: Coordinate, color: Color, deltas: &[(i8, i8)]) -> MoveMap {
    let mut map = MoveMap::EMPTY;
    for &(dr, dc) in deltas {
        let to = from.offset(dr, dc);
        if can_land(board, to, color) {
            map.set(to);
        }
    }
    map
}

// =========================================================================
// King (steps + castling)
// =========================================================================

/// An own-color rook that has never moved.
fn is_castling_rook(board: &Board, at: Coordinate, color: Color) -> bool {
    board
        .piece(at)
        .is_some_and(|p| p.kind == PieceKind::Rook && p.color == color && p.move_count == 0)
}

fn king_moves(board: &Board, king: &Piece, from: Coordinate) -> MoveMap {
    let mut map = step(board, from, king.color, &KING_STEPS);

    if king.move_count != 0 {
        return map;
    }

    // Kingside: f and g empty, rook on h.
    if is_castling_rook(board, from.offset(0, 3), king.color)
        && board.is_empty_square(from.offset(0, 1))
        && board.is_empty_square(from.offset(0, 2))
    {
        map.set(from.offset(0, 2));
    }

    // Queenside: d, c and b empty, rook on a.
    if is_castling_rook(board, from.offset(0, -4), king.color)
        && board.is_empty_square(from.offset(0, -1))
        && board.is_empty_square(from.offset(0, -2))
        && board.is_empty_square(from.offset(0, -3))
    {
        map.set(from.offset(0, -2));
    }

    map
}

// =========================================================================
// Pawn
// =========================================================================

/// Row on which a pawn of `color` may capture en passant.
#[inline]
pub const fn en_passant_row(color: Color) -> i8 {
    match color {
        Color::White => 3,
        Color::Black => 4,
    }
}

fn pawn_moves(board: &Board, pawn: &Piece, from: Coordinate, ctx: &MoveContext) -> MoveMap {
    let mut map = MoveMap::EMPTY;
    let fwd = pawn.color.forward();

    // Single and double push.
    let one = from.offset(fwd, 0);
    if board.is_empty_square(one) {
        map.set(one);
        let two = from.offset(2 * fwd, 0);
        if pawn.move_count == 0 && board.is_empty_square(two) {
            map.set(two);
        }
    }

    // Diagonal captures.
    for dc in [-1, 1] {
        let to = from.offset(fwd, dc);
        if board.is_valid(to) && has_enemy(board, to, pawn.color) {
            map.set(to);
        }
    }

    // En passant: the neighbour must be the pawn that just double-stepped.
    if from.row == en_passant_row(pawn.color)
        && let Some(vulnerable) = ctx.en_passant_vulnerable
    {
        for dc in [-1, 1] {
            let side = from.offset(0, dc);
            if has_enemy(board, side, pawn.color) && board.piece_id(side) == Some(vulnerable) {
                let to = side.offset(fwd, 0);
                if board.is_valid(to) {
                    map.set(to);
                }
            }
        }
    }

    map
}

// =========================================================================
// Tests
// =========================================================================
