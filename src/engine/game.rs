//! Stateful match controller wrapping the board.
//!
//! `Match` validates and plays moves, applies and reverts castling and en
//! passant, filters self-check by trial (execute, test, undo), and detects
//! check and checkmate. It is the primary type front-ends interact with.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::engine::board::{Board, PieceId};
use crate::engine::movegen::MoveContext;
use crate::engine::types::{ChessError, Color, Coordinate, MatchStatus, MoveMap, PieceKind};

// =========================================================================
// Capture / MoveRecord
// =========================================================================

/// A piece taken by [`Match::execute_move`], with the square it was taken
/// from. For en passant that square is not the mover's destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capture {
    pub piece: PieceId,
    pub square: Coordinate,
}

/// A committed move in the match history.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveRecord {
    pub turn: u32,
    pub player: Color,
    pub piece: PieceKind,
    pub from: Coordinate,
    pub to: Coordinate,
    pub captured: Option<PieceKind>,
    /// Whether the opponent was left in check.
    pub check: bool,
    pub checkmate: bool,
}

// =========================================================================
// MatchSnapshot
// =========================================================================

/// Read-only, serializable view of a match for front-ends.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSnapshot {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub turn: u32,
    pub current_player: Color,
    pub status: MatchStatus,
    pub check: bool,
    /// Rows from rank 8 down to rank 1. Cells are like `"wP"`, `"bK"`, or `""`.
    pub board: Vec<Vec<String>>,
    pub captured_white: Vec<PieceKind>,
    pub captured_black: Vec<PieceKind>,
}

// =========================================================================
// Match
// =========================================================================

/// A two-player chess match from setup to checkmate.
#[derive(Clone, Debug)]
pub struct Match {
    board: Board,
    turn: u32,
    current_player: Color,
    status: MatchStatus,
    check: bool,
    en_passant_vulnerable: Option<PieceId>,
    /// Captured pieces in capture order.
    captured: Vec<PieceId>,
    history: Vec<MoveRecord>,

    // Metadata
    pub id: String,
    pub created_at: DateTime<Utc>,
}

impl Match {
    // -----------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------

    /// A new match from the standard starting position, White to move.
    pub fn new() -> Self {
        let mut m = Self::empty(Color::White);
        for (color, back_row, pawn_row) in [(Color::White, 7, 6), (Color::Black, 0, 1)] {
            for (col, kind) in PieceKind::BACK_RANK.into_iter().enumerate() {
                m.spawn(kind, color, Coordinate::new(back_row, col as i8));
            }
            for col in 0..Board::SIZE {
                m.spawn(PieceKind::Pawn, color, Coordinate::new(pawn_row, col));
            }
        }
        m
    }

    /// A match on an empty board with `to_move` to play first.
    ///
    /// Populate it with [`Match::place_new_piece`]. Both sides need a king
    /// before any move is played.
    pub fn empty(to_move: Color) -> Self {
        let m = Self {
            board: Board::standard(),
            turn: 1,
            current_player: to_move,
            status: MatchStatus::InProgress,
            check: false,
            en_passant_vulnerable: None,
            captured: Vec::new(),
            history: Vec::new(),
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
        };
        debug!(match_id = %m.id, "match created");
        m
    }

    fn spawn(&mut self, kind: PieceKind, color: Color, at: Coordinate) -> PieceId {
        let id = self.board.add_piece(kind, color);
        self.board.place(id, at);
        id
    }

    /// Put a brand-new piece on an empty square.
    pub fn place_new_piece(
        &mut self,
        kind: PieceKind,
        color: Color,
        at: Coordinate,
    ) -> Result<PieceId, ChessError> {
        if !self.board.is_valid(at) {
            return Err(ChessError::InvalidSquare(at.to_string()));
        }
        if self.board.piece(at).is_some() {
            return Err(ChessError::SquareOccupied(at));
        }
        Ok(self.spawn(kind, color, at))
    }

    // -----------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------

    /// The underlying board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Turn counter, starting at 1. The mating move does not advance it.
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Side to move, or the winner once the match is over.
    pub fn current_player(&self) -> Color {
        self.current_player
    }

    /// Current match status.
    pub fn status(&self) -> MatchStatus {
        self.status
    }

    /// Whether the match ended in checkmate.
    pub fn is_terminated(&self) -> bool {
        self.status == MatchStatus::Terminated
    }

    /// Whether the side to move is in check after the last committed move.
    pub fn check(&self) -> bool {
        self.check
    }

    pub fn en_passant_vulnerable(&self) -> Option<PieceId> {
        self.en_passant_vulnerable
    }

    /// Captured pieces of `color`, in capture order.
    pub fn captured(&self, color: Color) -> Vec<PieceId> {
        self.captured
            .iter()
            .copied()
            .filter(|&id| self.board.get(id).color == color)
            .collect()
    }

    /// Committed moves, oldest first.
    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    fn context(&self) -> MoveContext {
        MoveContext {
            en_passant_vulnerable: self.en_passant_vulnerable,
        }
    }

    /// Destination matrix of the piece on `origin`, ignoring self-check.
    pub fn legal_destinations(&self, origin: Coordinate) -> Result<MoveMap, ChessError> {
        let piece = self
            .board
            .piece(origin)
            .ok_or(ChessError::EmptySquare(origin))?;
        Ok(piece.legal_destinations(&self.board, &self.context()))
    }

    // -----------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------

    fn ensure_in_progress(&self) -> Result<(), ChessError> {
        if self.is_terminated() {
            return Err(ChessError::GameOver(!self.current_player));
        }
        Ok(())
    }

    /// Check that `origin` holds a piece of the side to move that can move.
    pub fn validate_origin(&self, origin: Coordinate) -> Result<(), ChessError> {
        self.ensure_in_progress()?;
        if !self.board.is_valid(origin) {
            return Err(ChessError::InvalidSquare(origin.to_string()));
        }
        let piece = self
            .board
            .piece(origin)
            .ok_or(ChessError::EmptySquare(origin))?;
        if piece.color != self.current_player {
            return Err(ChessError::WrongOwner {
                at: origin,
                owner: piece.color,
                to_move: self.current_player,
            });
        }
        if !piece.has_any_legal_move(&self.board, &self.context()) {
            return Err(ChessError::NoLegalMoves(origin));
        }
        Ok(())
    }

    /// Check that the piece on `origin` may reach `dest` (ignoring self-check).
    pub fn validate_destination(
        &self,
        origin: Coordinate,
        dest: Coordinate,
    ) -> Result<(), ChessError> {
        if !self.legal_destinations(origin)?.is_set(dest) {
            return Err(ChessError::IllegalDestination {
                from: origin,
                to: dest,
            });
        }
        Ok(())
    }

    // -----------------------------------------------------------------
    // Execute / undo
    // -----------------------------------------------------------------

    /// Rook squares `(from, to)` for a king moving `origin -> dest`, if that
    /// move is a castle.
    fn castling_rook_squares(
        &self,
        mover: PieceKind,
        origin: Coordinate,
        dest: Coordinate,
    ) -> Option<(Coordinate, Coordinate)> {
        if mover != PieceKind::King || origin.row != dest.row {
            return None;
        }
        match dest.col - origin.col {
            2 => Some((origin.offset(0, 3), origin.offset(0, 1))),
            -2 => Some((origin.offset(0, -4), origin.offset(0, -1))),
            _ => None,
        }
    }

    /// Move the piece on `origin` to `dest` without any legality checks.
    ///
    /// Applies castling and en passant side effects. Returns the captured
    /// piece, which [`Match::undo_move`] needs to revert the move. Fails
    /// without mutating anything if `origin` (or a castling rook square) is
    /// empty.
    pub fn execute_move(
        &mut self,
        origin: Coordinate,
        dest: Coordinate,
    ) -> Result<Option<Capture>, ChessError> {
        let mover_kind = self
            .board
            .piece(origin)
            .ok_or(ChessError::EmptySquare(origin))?
            .kind;
        let castle = self.castling_rook_squares(mover_kind, origin, dest);
        if let Some((rook_from, _)) = castle
            && self.board.piece(rook_from).is_none()
        {
            return Err(ChessError::EmptySquare(rook_from));
        }

        let Some(mover) = self.board.remove(origin) else {
            return Err(ChessError::EmptySquare(origin));
        };
        self.board.increment_move_count(mover);
        let mut captured = self.board.remove(dest).map(|piece| Capture {
            piece,
            square: dest,
        });
        self.board.place(mover, dest);

        // ---- Castling: move the rook ----
        if let Some((rook_from, rook_to)) = castle
            && let Some(rook) = self.board.remove(rook_from)
        {
            self.board.increment_move_count(rook);
            self.board.place(rook, rook_to);
        }

        // ---- En passant: the taken pawn sits beside the origin ----
        if mover_kind == PieceKind::Pawn && origin.col != dest.col && captured.is_none() {
            let square = Coordinate::new(origin.row, dest.col);
            captured = self
                .board
                .remove(square)
                .map(|piece| Capture { piece, square });
        }

        if let Some(c) = captured {
            self.captured.push(c.piece);
        }
        Ok(captured)
    }

    /// Exact inverse of [`Match::execute_move`].
    pub fn undo_move(
        &mut self,
        origin: Coordinate,
        dest: Coordinate,
        captured: Option<Capture>,
    ) -> Result<(), ChessError> {
        let Some(mover) = self.board.remove(dest) else {
            return Err(ChessError::EmptySquare(dest));
        };
        self.board.decrement_move_count(mover);

        if let Some(c) = captured {
            self.board.place(c.piece, c.square);
            if let Some(idx) = self.captured.iter().rposition(|&id| id == c.piece) {
                self.captured.remove(idx);
            }
        }

        let mover_kind = self.board.get(mover).kind;
        if let Some((rook_from, rook_to)) = self.castling_rook_squares(mover_kind, origin, dest)
            && let Some(rook) = self.board.remove(rook_to)
        {
            self.board.decrement_move_count(rook);
            self.board.place(rook, rook_from);
        }

        self.board.place(mover, origin);
        Ok(())
    }

    // -----------------------------------------------------------------
    // Play
    // -----------------------------------------------------------------

    /// Validate and commit a move for the side to move.
    ///
    /// On any error the match is left exactly as it was.
    pub fn play(&mut self, origin: Coordinate, dest: Coordinate) -> Result<MoveRecord, ChessError> {
        self.validate_origin(origin)?;
        self.validate_destination(origin, dest)?;

        let us = self.current_player;
        let them = !us;
        let captured = self.execute_move(origin, dest)?;

        // The mover's own king must not be left attacked.
        let self_check = match self.is_in_check(us) {
            Ok(in_check) => in_check,
            Err(e) => {
                self.undo_move(origin, dest, captured)?;
                return Err(e);
            }
        };
        if self_check {
            self.undo_move(origin, dest, captured)?;
            debug!(match_id = %self.id, from = %origin, to = %dest, "rejected: self-check");
            return Err(ChessError::SelfCheck {
                from: origin,
                to: dest,
            });
        }

        let (check, checkmate) = match self.opponent_state(them) {
            Ok(state) => state,
            Err(e) => {
                self.undo_move(origin, dest, captured)?;
                return Err(e);
            }
        };

        let mover = self
            .board
            .piece_id(dest)
            .ok_or(ChessError::EmptySquare(dest))?;
        let piece = self.board.get(mover).kind;
        let record = MoveRecord {
            turn: self.turn,
            player: us,
            piece,
            from: origin,
            to: dest,
            captured: captured.map(|c| self.board.get(c.piece).kind),
            check,
            checkmate,
        };

        self.check = check;
        if checkmate {
            self.status = MatchStatus::Terminated;
            info!(match_id = %self.id, winner = %us, turn = self.turn, "checkmate");
        } else {
            self.turn += 1;
            self.current_player = them;
        }

        self.en_passant_vulnerable =
            (piece == PieceKind::Pawn && (dest.row - origin.row).abs() == 2).then_some(mover);

        debug!(
            match_id = %self.id,
            from = %origin,
            to = %dest,
            piece = %piece,
            check,
            "move played"
        );
        self.history.push(record.clone());
        Ok(record)
    }

    fn opponent_state(&mut self, them: Color) -> Result<(bool, bool), ChessError> {
        let check = self.is_in_check(them)?;
        let checkmate = check && self.is_in_checkmate(them)?;
        Ok((check, checkmate))
    }

    // -----------------------------------------------------------------
    // Check / checkmate
    // -----------------------------------------------------------------

    fn king_square(&self, color: Color) -> Result<Coordinate, ChessError> {
        self.board
            .pieces()
            .filter(|(_, p)| p.is_on_board())
            .find(|(_, p)| p.color == color && p.kind == PieceKind::King)
            .and_then(|(_, p)| p.position)
            .ok_or(ChessError::NoKing(color))
    }

    /// Whether any opposing piece can reach `color`'s king.
    pub fn is_in_check(&self, color: Color) -> Result<bool, ChessError> {
        let king = self.king_square(color)?;
        let ctx = self.context();
        Ok(self
            .board
            .pieces()
            .filter(|(_, p)| p.color != color && p.is_on_board())
            .any(|(_, p)| p.legal_destinations(&self.board, &ctx).is_set(king)))
    }

    /// Whether `color` is in check and no move of any of its pieces escapes.
    ///
    /// Every candidate is tried on the live board and rolled back, so the
    /// match is unchanged on return.
    pub fn is_in_checkmate(&mut self, color: Color) -> Result<bool, ChessError> {
        if !self.is_in_check(color)? {
            return Ok(false);
        }
        for id in self.board.pieces_on_board(color) {
            let piece = self.board.get(id);
            let Some(origin) = piece.position else {
                continue;
            };
            let targets = piece.legal_destinations(&self.board, &self.context());
            for dest in targets.iter() {
                if !self.try_move(origin, dest, color)? {
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }

    /// Execute, test whether `color` is in check, undo.
    fn try_move(
        &mut self,
        origin: Coordinate,
        dest: Coordinate,
        color: Color,
    ) -> Result<bool, ChessError> {
        let captured = self.execute_move(origin, dest)?;
        let in_check = self.is_in_check(color);
        self.undo_move(origin, dest, captured)?;
        in_check
    }

    /// Every `(origin, dest)` pair for `color` that does not leave its own
    /// king in check.
    pub fn legal_moves(&mut self, color: Color) -> Result<Vec<(Coordinate, Coordinate)>, ChessError> {
        let mut moves = Vec::new();
        for id in self.board.pieces_on_board(color) {
            let piece = self.board.get(id);
            let Some(origin) = piece.position else {
                continue;
            };
            let targets = piece.legal_destinations(&self.board, &self.context());
            for dest in targets.iter() {
                if !self.try_move(origin, dest, color)? {
                    moves.push((origin, dest));
                }
            }
        }
        Ok(moves)
    }

    // -----------------------------------------------------------------
    // Snapshot
    // -----------------------------------------------------------------

    /// Serializable view of the current state.
    pub fn snapshot(&self) -> MatchSnapshot {
        let board = (0..self.board.rows())
            .map(|row| {
                (0..self.board.cols())
                    .map(|col| match self.board.piece(Coordinate::new(row, col)) {
                        Some(p) => {
                            let c = match p.color {
                                Color::White => 'w',
                                Color::Black => 'b',
                            };
                            format!("{c}{}", p.kind.to_char(Color::White))
                        }
                        None => String::new(),
                    })
                    .collect()
            })
            .collect();
        let kinds = |color: Color| -> Vec<PieceKind> {
            self.captured(color)
                .into_iter()
                .map(|id| self.board.get(id).kind)
                .collect()
        };
        MatchSnapshot {
            id: self.id.clone(),
            created_at: self.created_at,
            turn: self.turn,
            current_player: self.current_player,
            status: self.status,
            check: self.check,
            board,
            captured_white: kinds(Color::White),
            captured_black: kinds(Color::Black),
        }
    }
}

impl Default for Match {
    fn default() -> Self {
        Self::new()
    }
}

// =========================================================================
// Tests
// =========================================================================
